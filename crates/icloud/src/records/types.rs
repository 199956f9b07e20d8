//! Record request and response types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::wire::wire_enum;

use super::fields::{Field, Fields};

/// Maximum number of operations accepted in one [`RecordsRequest`].
pub const MAX_OPERATIONS_PER_REQUEST: usize = 200;

wire_enum! {
    /// The verb applied to a single record.
    pub enum OperationType as "operation type" {
        /// Create a new record. Fails if a record with the same name exists.
        Create => "create",
        /// Update an existing record. Only the fields specified are changed.
        Update => "update",
        /// Update regardless of conflicts. Creates the record if it doesn't exist.
        ForceUpdate => "forceUpdate",
        /// Replace a record. Fields whose values are not specified are set to null.
        Replace => "replace",
        /// Replace regardless of conflicts. Creates the record if it doesn't exist.
        ForceReplace => "forceReplace",
        /// Delete the specified record.
        Delete => "delete",
        /// Delete the specified record regardless of conflicts.
        ForceDelete => "forceDelete",
    }
}

/// A record in the database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Name of the record. Assigned by the server when absent on create.
    #[serde(rename = "recordName", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Schema name of the record.
    #[serde(rename = "recordType", default, skip_serializing_if = "String::is_empty")]
    pub record_type: String,

    /// Server change tag. Sent back on update and replace to detect conflicts.
    #[serde(rename = "recordChangeTag", default, skip_serializing_if = "Option::is_none")]
    pub change_tag: Option<String>,

    /// Fields of the record.
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub fields: Fields,
}

impl Record {
    /// Create an unnamed record of the given type.
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            ..Self::default()
        }
    }

    /// Set the record name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the change tag.
    pub fn with_change_tag(mut self, tag: impl Into<String>) -> Self {
        self.change_tag = Some(tag.into());
        self
    }

    /// Append an untyped field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push(Field::new(name, value));
        self
    }

    /// Append a typed field.
    pub fn typed_field(
        mut self,
        name: impl Into<String>,
        field_type: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.fields.push(Field::typed(name, field_type, value));
        self
    }
}

/// An operation on a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordOperation {
    /// The verb to apply.
    #[serde(rename = "operationType")]
    pub operation_type: OperationType,

    /// The record to create, update, replace or delete.
    pub record: Record,
}

impl RecordOperation {
    pub fn new(operation_type: OperationType, record: Record) -> Self {
        Self {
            operation_type,
            record,
        }
    }

    pub fn create(record: Record) -> Self {
        Self::new(OperationType::Create, record)
    }

    pub fn update(record: Record) -> Self {
        Self::new(OperationType::Update, record)
    }

    pub fn force_update(record: Record) -> Self {
        Self::new(OperationType::ForceUpdate, record)
    }

    pub fn replace(record: Record) -> Self {
        Self::new(OperationType::Replace, record)
    }

    pub fn force_replace(record: Record) -> Self {
        Self::new(OperationType::ForceReplace, record)
    }

    pub fn delete(record: Record) -> Self {
        Self::new(OperationType::Delete, record)
    }

    pub fn force_delete(record: Record) -> Self {
        Self::new(OperationType::ForceDelete, record)
    }
}

/// Request body for the records modify endpoint.
///
/// The server applies operations in list order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsRequest {
    /// Operations to apply. Limited to [`MAX_OPERATIONS_PER_REQUEST`].
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<RecordOperation>,

    /// Apply all operations or none of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atomic: Option<bool>,
}

impl RecordsRequest {
    pub fn new(operations: Vec<RecordOperation>) -> Self {
        Self {
            operations,
            atomic: None,
        }
    }

    /// Request all-or-nothing application.
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = Some(atomic);
        self
    }
}

/// Response body of the records modify endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsResponse {
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<Record>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
