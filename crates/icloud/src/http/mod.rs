//! HTTP engine.
//!
//! Builds requests against the client's base URL, encodes and digests the
//! body in one pass, signs, dispatches, and turns responses into either the
//! caller's output or a structured [`ApiError`](crate::ApiError).

mod body;
pub(crate) mod path;
mod response;

use chrono::Utc;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue, USER_AGENT};
use reqwest::{Method, Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument, trace};

use crate::client::Client;
use crate::error::{Error, InvalidInputError};

use body::DigestWriter;

const APPLICATION_JSON: &str = "application/json";

/// Placeholder for calls that send no request body.
///
/// ```no_run
/// # async fn example(client: &icloud::Client) -> icloud::Result<()> {
/// use icloud::{Method, NO_BODY};
///
/// let value: serde_json::Value = client.call(Method::GET, "/public/zones/list", NO_BODY).await?;
/// # Ok(())
/// # }
/// ```
pub const NO_BODY: Option<&'static ()> = None;

impl Client {
    /// Build and sign a request without sending it.
    ///
    /// `endpoint` is joined onto the base URL path. A `Some` body is encoded
    /// as JSON; `None` leaves the request without a body and signs the digest
    /// of zero bytes.
    pub fn new_request<B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Request, Error>
    where
        B: Serialize + ?Sized,
    {
        let url = path::resolve(self.base_url(), endpoint);

        let mut writer = DigestWriter::new(Vec::new());
        if let Some(body) = body {
            serde_json::to_writer(&mut writer, body).map_err(Error::Encode)?;
        }
        let (bytes, digest) = writer.finish();

        let mut request = Request::new(method, url);
        let headers = request.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(self.user_agent())
                .map_err(|_| InvalidInputError::Header { name: "user-agent" })?,
        );
        if body.is_some() {
            trace!(bytes = bytes.len(), "encoded request body");
            *request.body_mut() = Some(bytes.into());
        }

        self.signer().sign(&mut request, &digest, Utc::now())?;
        Ok(request)
    }

    /// Send a prepared request.
    ///
    /// Responses with a status of 400 or above become [`Error::Api`];
    /// transport failures are returned as [`Error::Transport`] untouched.
    #[instrument(
        skip(self, request),
        fields(method = %request.method(), path = %request.url().path())
    )]
    pub async fn execute(&self, request: Request) -> Result<Response, Error> {
        debug!("dispatching request");
        let response = self.http_client().execute(request).await?;

        let status = response.status();
        debug!(%status, "response received");

        if status.as_u16() >= 400 {
            let error = response::api_error(response).await?;
            debug!(code = %error.code, reason = %error.reason, "API error");
            return Err(Error::Api(error));
        }
        Ok(response)
    }

    /// Send a request and decode the JSON response into `R`.
    ///
    /// With strict decoding enabled, fields unknown to `R` fail the call.
    pub async fn call<B, R>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.new_request(method, endpoint, body)?;
        let response = self.execute(request).await?;
        let bytes = response.bytes().await?;
        response::decode(&bytes, self.strict_decoding())
    }

    /// Send a request and stream the raw response body into `out`.
    ///
    /// Returns the number of bytes written.
    pub async fn call_raw<B, W>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        out: &mut W,
    ) -> Result<u64, Error>
    where
        B: Serialize + ?Sized,
        W: AsyncWrite + Unpin + ?Sized,
    {
        let request = self.new_request(method, endpoint, body)?;
        let mut response = self.execute(request).await?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            out.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        out.flush().await?;
        Ok(written)
    }

    /// Send a request and discard the response body.
    pub async fn call_discard<B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<(), Error>
    where
        B: Serialize + ?Sized,
    {
        let request = self.new_request(method, endpoint, body)?;
        self.execute(request).await?;
        Ok(())
    }
}
