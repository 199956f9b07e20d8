//! Server error codes.

use super::wire::wire_enum;

wire_enum! {
    /// Error code reported by the server in `serverErrorCode`.
    #[derive(Default)]
    pub enum ErrorCode as "error code" {
        #[default]
        Unknown => "UNKNOWN",
        AccessDenied => "ACCESS_DENIED",
        AtomicError => "ATOMIC_ERROR",
        AuthenticationFailed => "AUTHENTICATION_FAILED",
        AuthenticationRequired => "AUTHENTICATION_REQUIRED",
        BadRequest => "BAD_REQUEST",
        Conflict => "CONFLICT",
        Exists => "EXISTS",
        InternalError => "INTERNAL_ERROR",
        NotFound => "NOT_FOUND",
        QuotaExceeded => "QUOTA_EXCEEDED",
        Throttled => "THROTTLED",
        TryAgainLater => "TRY_AGAIN_LATER",
        ValidatingReferenceError => "VALIDATING_REFERENCE_ERROR",
        ZoneNotFound => "ZONE_NOT_FOUND",
    }
}

impl ErrorCode {
    /// Human readable description of the error code.
    pub const fn description(self) -> &'static str {
        match self {
            ErrorCode::Unknown => "An unknown error occurred.",
            ErrorCode::AccessDenied => {
                "You don't have permission to access the endpoint, record, zone, or database."
            }
            ErrorCode::AtomicError => "An atomic batch operation failed.",
            ErrorCode::AuthenticationFailed => "Authentication was rejected.",
            ErrorCode::AuthenticationRequired => {
                "The request requires authentication but none was provided."
            }
            ErrorCode::BadRequest => "The request was not valid.",
            ErrorCode::Conflict => {
                "The recordChangeTag value expired. (Retry the request with the latest tag.)"
            }
            ErrorCode::Exists => "The resource that you attempted to create already exists.",
            ErrorCode::InternalError => "An internal error occurred.",
            ErrorCode::NotFound => "The resource was not found.",
            ErrorCode::QuotaExceeded => {
                "If accessing the public database, you exceeded the app's quota. \
                 If accessing the private database, you exceeded the user's iCloud quota."
            }
            ErrorCode::Throttled => "The request was throttled. Try the request again later.",
            ErrorCode::TryAgainLater => "An internal error occurred. Try the request again.",
            ErrorCode::ValidatingReferenceError => {
                "The request violates a validating reference constraint."
            }
            ErrorCode::ZoneNotFound => "The zone specified in the request was not found.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_fifteen_codes() {
        assert_eq!(ErrorCode::ALL.len(), 15);
        assert_eq!(ErrorCode::ALL[0], ErrorCode::default());
    }

    #[test]
    fn every_code_has_a_description() {
        for code in ErrorCode::ALL {
            assert!(!code.description().is_empty(), "{code} has no description");
        }
    }

    #[test]
    fn decodes_server_spelling() {
        let code: ErrorCode = serde_json::from_str(r#""TRY_AGAIN_LATER""#).unwrap();
        assert_eq!(code, ErrorCode::TryAgainLater);
        assert!(serde_json::from_str::<ErrorCode>(r#""try_again_later""#).is_err());
    }

    #[test]
    fn quota_description_is_one_sentence_pair() {
        assert!(
            ErrorCode::QuotaExceeded
                .description()
                .contains("quota. If accessing the private")
        );
    }
}
