//! CloudKit Web Services client.

use std::time::Duration;

use p256::ecdsa::SigningKey;
use tracing::warn;
use url::Url;

use crate::error::{Error, InvalidInputError};
use crate::records::RecordsService;
use crate::sign::RequestSigner;
use crate::types::{Environment, is_icloud_container};

/// Origin of the production API.
pub const DEFAULT_ENDPOINT: &str = "https://api.apple-cloudkit.com";

/// Version segment of the database API path.
pub const API_VERSION: u32 = 1;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "icloud-go";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Returns the HTTP client used when none is supplied.
///
/// Connection setup (TCP dial and TLS handshake) is capped at five seconds.
/// There is no overall request deadline.
pub fn default_http_client() -> Result<reqwest::Client, Error> {
    Ok(reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?)
}

/// A configuration change applied through [`Client::options`].
#[derive(Debug, Clone)]
pub enum ClientOption {
    /// Replace the HTTP client used to send requests.
    HttpClient(reqwest::Client),
    /// Replace the user agent.
    UserAgent(String),
    /// Reject success responses containing fields unknown to the target type.
    StrictDecoding(bool),
}

/// Client for the CloudKit Web Services API.
///
/// All calls take `&self`, so one client can serve concurrent tasks.
/// Reconfiguring needs `&mut self` and therefore cannot overlap with a call
/// in flight.
///
/// # Example
///
/// ```no_run
/// use icloud::{Client, Database, Environment, Record, RecordOperation, RecordsRequest};
///
/// # async fn example(key: p256::ecdsa::SigningKey) -> icloud::Result<()> {
/// let client = Client::new(
///     "iCloud.com.example.App",
///     "6459b5a4f4ce9c2dbaaf09ae996235cfa8a0c96bd1b595fb9fc229d35beb4c9a",
///     Some(key),
///     Environment::Development,
/// )?;
///
/// let request = RecordsRequest::new(vec![RecordOperation::create(
///     Record::new("MyRecord")
///         .field("MyField", "Hello, World!")
///         .field("MyOtherField", 1000),
/// )]);
/// let response = client.records().modify(Database::Public, &request).await?;
/// println!("{} records", response.records.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    user_agent: String,
    signer: RequestSigner,
    http: reqwest::Client,
    strict_decoding: bool,
}

impl Client {
    /// Create a client with default settings.
    ///
    /// `private_key` may only be `None` if the client never sends a request.
    pub fn new(
        container: &str,
        key_id: impl Into<String>,
        private_key: Option<SigningKey>,
        environment: Environment,
    ) -> Result<Self, Error> {
        let mut builder = Self::builder(container, key_id, environment);
        if let Some(key) = private_key {
            builder = builder.private_key(key);
        }
        builder.build()
    }

    /// Start configuring a client.
    pub fn builder(
        container: impl Into<String>,
        key_id: impl Into<String>,
        environment: Environment,
    ) -> ClientBuilder {
        ClientBuilder {
            container: container.into(),
            key_id: key_id.into(),
            environment,
            private_key: None,
            http_client: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            strict_decoding: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Records operations.
    pub fn records(&self) -> RecordsService<'_> {
        RecordsService::new(self)
    }

    /// The base URL all endpoints are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn key_id(&self) -> &str {
        self.signer.key_id()
    }

    pub fn strict_decoding(&self) -> bool {
        self.strict_decoding
    }

    /// Whether a signing key is configured. Without one every call fails
    /// with [`SigningError::MissingKey`](crate::error::SigningError::MissingKey).
    pub fn has_private_key(&self) -> bool {
        self.signer.has_key()
    }

    /// Apply a list of options in order.
    pub fn options(&mut self, options: impl IntoIterator<Item = ClientOption>) {
        for option in options {
            match option {
                ClientOption::HttpClient(client) => self.set_http_client(client),
                ClientOption::UserAgent(user_agent) => self.set_user_agent(user_agent),
                ClientOption::StrictDecoding(strict) => self.set_strict_decoding(strict),
            }
        }
    }

    pub fn set_http_client(&mut self, client: reqwest::Client) {
        self.http = client;
    }

    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = user_agent.into();
    }

    pub fn set_strict_decoding(&mut self, strict: bool) {
        self.strict_decoding = strict;
    }

    pub(crate) fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    pub(crate) fn http_client(&self) -> &reqwest::Client {
        &self.http
    }
}

/// Builder for [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    container: String,
    key_id: String,
    environment: Environment,
    private_key: Option<SigningKey>,
    http_client: Option<reqwest::Client>,
    user_agent: String,
    strict_decoding: bool,
    endpoint: String,
}

impl ClientBuilder {
    /// The key used to sign requests.
    pub fn private_key(mut self, key: SigningKey) -> Self {
        self.private_key = Some(key);
        self
    }

    /// Use a custom HTTP client instead of [`default_http_client`].
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn strict_decoding(mut self, strict: bool) -> Self {
        self.strict_decoding = strict;
        self
    }

    /// Override the API origin, e.g. to target a local mock server.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Fails if the derived base URL is malformed or the default HTTP client
    /// cannot be created.
    pub fn build(self) -> Result<Client, Error> {
        if !is_icloud_container(&self.container) {
            warn!(container = %self.container, "container does not start with \"iCloud.\"");
        }

        let base_url = base_url(&self.endpoint, &self.container, self.environment)?;
        let http = match self.http_client {
            Some(client) => client,
            None => default_http_client()?,
        };

        Ok(Client {
            base_url,
            user_agent: self.user_agent,
            signer: RequestSigner::new(self.key_id, self.private_key),
            http,
            strict_decoding: self.strict_decoding,
        })
    }
}

fn base_url(endpoint: &str, container: &str, environment: Environment) -> Result<Url, Error> {
    let endpoint = endpoint.trim_end_matches('/');
    let raw = format!("{endpoint}/database/{API_VERSION}/{container}/{environment}");
    let url = Url::parse(&raw).map_err(|e| InvalidInputError::BaseUrl {
        value: raw.clone(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(InvalidInputError::BaseUrl {
            value: raw,
            reason: "must be an absolute URL with a host".to_string(),
        }
        .into());
    }
    Ok(url)
}
