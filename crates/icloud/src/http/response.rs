//! Response decoding.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{ApiError, Error};
use crate::types::ErrorCode;

use super::APPLICATION_JSON;

/// Turn a response with a status of 400 or above into an [`ApiError`].
///
/// Non-JSON bodies yield the status text. JSON bodies are decoded; when that
/// leaves neither reason nor code, the raw body becomes the reason. Only a
/// failure to read the body is returned as an error.
pub(super) async fn api_error(response: Response) -> Result<ApiError, Error> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with(APPLICATION_JSON));

    if !is_json {
        return Ok(ApiError::new(status_text(status), ErrorCode::Unknown));
    }

    let raw = response.bytes().await?;
    Ok(decode_api_error(status, &raw))
}

pub(super) fn decode_api_error(status: StatusCode, raw: &[u8]) -> ApiError {
    let mut error = match serde_json::from_slice::<ApiError>(raw) {
        Ok(error) => error,
        Err(err) => {
            warn!(%status, error = %err, "undecodable error response");
            ApiError::default()
        }
    };

    if error.reason.is_empty() && error.code == ErrorCode::Unknown {
        let body = String::from_utf8_lossy(raw).replace('\n', " ");
        let body = body.trim();
        error.reason = if body.is_empty() {
            status_text(status)
        } else {
            body.to_string()
        };
    }
    error
}

/// Decode a success body, optionally rejecting unknown fields.
pub(super) fn decode<R: DeserializeOwned>(bytes: &[u8], strict: bool) -> Result<R, Error> {
    if !strict {
        return serde_json::from_slice(bytes).map_err(Error::Decode);
    }

    let mut unknown = Vec::new();
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let value: R = serde_ignored::deserialize(&mut de, |path| unknown.push(path.to_string()))
        .map_err(Error::Decode)?;
    de.end().map_err(Error::Decode)?;

    if !unknown.is_empty() {
        return Err(Error::UnknownFields(unknown));
    }
    Ok(value)
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}
