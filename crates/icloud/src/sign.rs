//! Request signing (signature version 1).
//!
//! Every request carries three headers: the key ID, an RFC 3339 UTC date, and
//! an ECDSA P-256 signature over the canonical message
//!
//! ```text
//! <date>:<base64(sha256(body))>:<url path>
//! ```
//!
//! The message is hashed with SHA-256 and the digest is signed. The
//! signature travels base64-encoded in DER form.

use std::fmt;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use chrono::{DateTime, SecondsFormat, Utc};
use p256::ecdsa::signature::hazmat::RandomizedPrehashSigner;
use p256::ecdsa::{Signature, SigningKey};
use rand::rngs::OsRng;
use reqwest::header::HeaderValue;
use sha2::{Digest, Sha256};
use tracing::trace;

use crate::error::{Error, InvalidInputError, SigningError};

/// Header carrying the key identifier.
pub const KEY_ID_HEADER: &str = "x-apple-cloudkit-request-keyid";

/// Header carrying the signing date.
pub const DATE_HEADER: &str = "x-apple-cloudkit-request-iso8601date";

/// Header carrying the base64 DER signature.
pub const SIGNATURE_HEADER: &str = "x-apple-cloudkit-request-signaturev1";

/// Signs outgoing requests with the configured server-to-server key.
#[derive(Clone)]
pub struct RequestSigner {
    key_id: String,
    key: Option<SigningKey>,
}

impl RequestSigner {
    /// Create a signer. A `None` key fails every signing attempt.
    pub fn new(key_id: impl Into<String>, key: Option<SigningKey>) -> Self {
        Self {
            key_id: key_id.into(),
            key,
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// Sign `request` in place.
    ///
    /// `body_digest` must be the SHA-256 of the exact body bytes attached to
    /// the request (the digest of zero bytes when there is no body).
    pub fn sign(
        &self,
        request: &mut reqwest::Request,
        body_digest: &[u8],
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        let date = format_date(now);
        let message = canonical_message(&date, body_digest, request.url().path());
        trace!(%message, "signature message");

        let signature = self.sign_message(message.as_bytes())?;

        let headers = request.headers_mut();
        headers.insert(KEY_ID_HEADER, header_value(KEY_ID_HEADER, &self.key_id)?);
        headers.insert(DATE_HEADER, header_value(DATE_HEADER, &date)?);
        headers.insert(SIGNATURE_HEADER, header_value(SIGNATURE_HEADER, &signature)?);
        Ok(())
    }

    /// Hash and sign a canonical message, returning the base64 DER signature.
    pub fn sign_message(&self, message: &[u8]) -> Result<String, SigningError> {
        let key = self.key.as_ref().ok_or(SigningError::MissingKey)?;
        let digest = Sha256::digest(message);
        let signature: Signature = key.sign_prehash_with_rng(&mut OsRng, &digest)?;
        Ok(BASE64_STANDARD.encode(signature.to_der().as_bytes()))
    }
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("key_id", &self.key_id)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Format the signing date: RFC 3339, UTC, whole seconds, `Z` suffix.
pub fn format_date(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Build `<date>:<base64 body digest>:<path>`.
pub fn canonical_message(date: &str, body_digest: &[u8], path: &str) -> String {
    let body = BASE64_STANDARD.encode(body_digest);
    let mut message = String::with_capacity(date.len() + body.len() + path.len() + 2);
    message.push_str(date);
    message.push(':');
    message.push_str(&body);
    message.push(':');
    message.push_str(path);
    message
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value).map_err(|_| InvalidInputError::Header { name }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use p256::ecdsa::VerifyingKey;
    use p256::ecdsa::signature::hazmat::PrehashVerifier;

    const KEY_ID: &str = "6459b5a4f4ce9c2dbaaf09ae996235cfa8a0c96bd1b595fb9fc229d35beb4c9a";
    const PATH: &str = "/database/1/iCloud.com.example.App/development/public/records/modify";

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap()
    }

    fn request() -> reqwest::Request {
        let url = format!("https://api.apple-cloudkit.com{PATH}?ignored=1");
        reqwest::Request::new(reqwest::Method::POST, url.parse().unwrap())
    }

    fn verify(key: &VerifyingKey, message: &str, signature_b64: &str) {
        let der = BASE64_STANDARD.decode(signature_b64).unwrap();
        let signature = Signature::from_der(&der).unwrap();
        let digest = Sha256::digest(message.as_bytes());
        key.verify_prehash(&digest, &signature)
            .expect("signature should verify");
    }

    #[test]
    fn date_is_rfc3339_utc_seconds() {
        assert_eq!(format_date(fixed_now()), "2024-01-02T15:04:05Z");
    }

    #[test]
    fn canonical_message_for_empty_body() {
        let digest = Sha256::digest(b"");
        assert_eq!(
            canonical_message("2024-01-02T15:04:05Z", &digest, "/a/b"),
            "2024-01-02T15:04:05Z:47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=:/a/b"
        );
    }

    #[test]
    fn signs_path_without_query() {
        let key = SigningKey::random(&mut OsRng);
        let signer = RequestSigner::new(KEY_ID, Some(key.clone()));
        let body = br#"{"operations":[]}"#;
        let digest = Sha256::digest(body);

        let mut req = request();
        signer.sign(&mut req, &digest, fixed_now()).unwrap();

        let headers = req.headers();
        assert_eq!(headers[KEY_ID_HEADER], KEY_ID);
        assert_eq!(headers[DATE_HEADER], "2024-01-02T15:04:05Z");

        let message = canonical_message("2024-01-02T15:04:05Z", &digest, PATH);
        verify(
            key.verifying_key(),
            &message,
            headers[SIGNATURE_HEADER].to_str().unwrap(),
        );
    }

    #[test]
    fn signature_does_not_verify_for_other_body() {
        let key = SigningKey::random(&mut OsRng);
        let signer = RequestSigner::new(KEY_ID, Some(key.clone()));
        let message = canonical_message("2024-01-02T15:04:05Z", &Sha256::digest(b"a"), PATH);
        let other = canonical_message("2024-01-02T15:04:05Z", &Sha256::digest(b"b"), PATH);

        let signature = signer.sign_message(message.as_bytes()).unwrap();
        let der = BASE64_STANDARD.decode(signature).unwrap();
        let signature = Signature::from_der(&der).unwrap();
        assert!(
            key.verifying_key()
                .verify_prehash(&Sha256::digest(other.as_bytes()), &signature)
                .is_err()
        );
    }

    #[test]
    fn missing_key_is_a_signing_error() {
        let signer = RequestSigner::new(KEY_ID, None);
        let mut req = request();
        let err = signer
            .sign(&mut req, &Sha256::digest(b""), fixed_now())
            .unwrap_err();
        assert!(matches!(err, Error::Signing(SigningError::MissingKey)));
        assert!(req.headers().get(SIGNATURE_HEADER).is_none());
    }

    #[test]
    fn debug_redacts_key() {
        let signer = RequestSigner::new(KEY_ID, Some(SigningKey::random(&mut OsRng)));
        let debug = format!("{signer:?}");
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains(KEY_ID));
    }
}
