//! Records: model, wire adapters, and the modify verb.

mod fields;
mod service;
mod types;

pub use fields::{Field, Fields};
pub use service::RecordsService;
pub use types::{
    MAX_OPERATIONS_PER_REQUEST, OperationType, Record, RecordOperation, RecordsRequest,
    RecordsResponse,
};
