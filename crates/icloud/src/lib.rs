//! icloud - CloudKit Web Services client.
//!
//! Signs every request with a server-to-server ECDSA P-256 key and maps
//! records, fields, and operations to and from the service's JSON shapes.
//! All record operations flow through a [`Client`].
//!
//! # Example
//!
//! ```no_run
//! use icloud::{Client, Database, Environment, Record, RecordOperation, RecordsRequest};
//! use p256::ecdsa::SigningKey;
//!
//! # async fn example(key: SigningKey) -> Result<(), icloud::Error> {
//! let client = Client::new(
//!     "iCloud.com.example.App",
//!     "my-key-id",
//!     Some(key),
//!     Environment::Development,
//! )?;
//!
//! let request = RecordsRequest::new(vec![RecordOperation::create(
//!     Record::new("MyRecord").field("MyField", "Hello, World!"),
//! )]);
//!
//! match client.records().modify(Database::Public, &request).await {
//!     Ok(response) => println!("saved {} records", response.records.len()),
//!     Err(icloud::Error::Api(err)) if err.is_retryable() => {
//!         println!("try again in {:?}", err.retry_after);
//!     }
//!     Err(err) => return Err(err),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Parsing the private key is left to the caller; any
//! [`p256::ecdsa::SigningKey`] will do.
//!
//! Calls are cancelled by dropping their future. Deadlines are the caller's
//! responsibility, for example via `tokio::time::timeout`.

pub mod client;
pub mod error;
pub mod http;
pub mod records;
pub mod sign;
pub mod types;

// Re-export primary types at crate root for convenience
pub use client::{Client, ClientBuilder, ClientOption, default_http_client};
pub use error::{ApiError, Error};
pub use http::NO_BODY;
pub use records::{
    Field, Fields, MAX_OPERATIONS_PER_REQUEST, OperationType, Record, RecordOperation,
    RecordsRequest, RecordsResponse, RecordsService,
};
pub use reqwest::Method;
pub use types::{Database, Environment, ErrorCode, ParseEnumError, is_icloud_container};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
