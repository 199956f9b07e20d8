//! Closed value sets of the CloudKit Web Services API.
//!
//! Every enum here maps one-to-one onto a canonical wire string. Encoding
//! always emits that string and decoding rejects anything outside the set.

pub(crate) mod wire;

mod container;
mod database;
pub(crate) mod duration;
mod environment;
mod error_code;

pub use container::is_icloud_container;
pub use database::Database;
pub use environment::Environment;
pub use error_code::ErrorCode;

/// Error returned when a wire string does not name a known enum value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} {value:?}")]
pub struct ParseEnumError {
    /// Human name of the enum, e.g. `"database"`.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_message_names_kind_and_value() {
        let err = "staging".parse::<Environment>().unwrap_err();
        assert_eq!(err.to_string(), r#"unknown environment "staging""#);
    }

    #[test]
    fn every_enum_round_trips_through_json() {
        for env in Environment::ALL {
            let json = serde_json::to_string(env).unwrap();
            assert_eq!(serde_json::from_str::<Environment>(&json).unwrap(), *env);
        }
        for db in Database::ALL {
            let json = serde_json::to_string(db).unwrap();
            assert_eq!(serde_json::from_str::<Database>(&json).unwrap(), *db);
        }
        for code in ErrorCode::ALL {
            let json = serde_json::to_string(code).unwrap();
            assert_eq!(serde_json::from_str::<ErrorCode>(&json).unwrap(), *code);
        }
    }

    #[test]
    fn non_string_input_is_rejected() {
        assert!(serde_json::from_str::<Database>("1").is_err());
    }
}
