//! Record fields and their object-keyed wire form.
//!
//! In memory a record's fields are an ordered list. On the wire they are a
//! JSON object keyed by field name:
//!
//! ```json
//! {"MyField": {"value": "Hello"}, "Qty": {"type": "INT64", "value": 1000}}
//! ```
//!
//! Both directions live here so that name handling stays in one place:
//! serialization moves the name into the object key, deserialization moves
//! the key back into [`Field::name`].

use std::collections::HashMap;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A named, optionally typed value within a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Name of the field. Travels as the object key, never as a value.
    pub name: String,
    /// Type of the field. Inferred by the server when absent.
    pub field_type: Option<String>,
    /// Value of the field.
    pub value: Value,
}

impl Field {
    /// Create an untyped field.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            field_type: None,
            value: value.into(),
        }
    }

    /// Create a field with an explicit type, e.g. `"STRING"` or `"INT64"`.
    pub fn typed(
        name: impl Into<String>,
        field_type: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            field_type: Some(field_type.into()),
            value: value.into(),
        }
    }
}

/// The `{type, value}` body of one entry in the wire object, as written.
#[derive(Serialize)]
struct FieldBodyRef<'a> {
    #[serde(rename = "type", skip_serializing_if = "is_blank")]
    field_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Value::is_null")]
    value: &'a Value,
}

fn is_blank(field_type: &Option<&str>) -> bool {
    field_type.is_none_or(str::is_empty)
}

/// The `{type, value}` body of one entry in the wire object, as read.
#[derive(Deserialize)]
struct FieldBody {
    #[serde(rename = "type", default)]
    field_type: Option<String>,
    #[serde(default)]
    value: Value,
}

/// Ordered list of record fields.
///
/// Field names should be unique. When serializing a list that repeats a
/// name, the later entry wins and takes the position of the first.
/// Deserialized lists carry no meaningful order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Vec<Field>);

impl Fields {
    /// Create an empty field list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    pub fn push(&mut self, field: Field) {
        self.0.push(field);
    }

    /// Returns the last field with the given name, which is the one that
    /// would be sent.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.0.iter().rev().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Field> {
        self.0
    }
}

impl From<Vec<Field>> for Fields {
    fn from(fields: Vec<Field>) -> Self {
        Self(fields)
    }
}

impl FromIterator<Field> for Fields {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Field> for Fields {
    fn extend<I: IntoIterator<Item = Field>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Fields {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for Fields {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Collapse duplicate names first so the object never repeats a key.
        let mut slots: HashMap<&str, usize> = HashMap::with_capacity(self.0.len());
        let mut entries: Vec<&Field> = Vec::with_capacity(self.0.len());
        for field in &self.0 {
            match slots.get(field.name.as_str()) {
                Some(&i) => entries[i] = field,
                None => {
                    slots.insert(&field.name, entries.len());
                    entries.push(field);
                }
            }
        }

        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for field in entries {
            let body = FieldBodyRef {
                field_type: field.field_type.as_deref(),
                value: &field.value,
            };
            map.serialize_entry(&field.name, &body)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(FieldsVisitor)
    }
}

struct FieldsVisitor;

impl<'de> Visitor<'de> for FieldsVisitor {
    type Value = Fields;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("an object mapping field names to {type, value}")
    }

    fn visit_none<E>(self) -> Result<Fields, E>
    where
        E: de::Error,
    {
        Ok(Fields::default())
    }

    fn visit_unit<E>(self) -> Result<Fields, E>
    where
        E: de::Error,
    {
        Ok(Fields::default())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Fields, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }

    fn visit_map<A>(self, mut access: A) -> Result<Fields, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, body)) = access.next_entry::<String, FieldBody>()? {
            fields.push(Field {
                name,
                field_type: body.field_type,
                value: body.value,
            });
        }
        Ok(Fields(fields))
    }
}
