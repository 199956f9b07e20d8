//! Client construction from command-line and environment settings.

use std::path::Path;

use anyhow::{Context, Result, bail};
use icloud::Client;
use p256::SecretKey;
use p256::ecdsa::SigningKey;
use p256::pkcs8::DecodePrivateKey;
use tracing::debug;

use crate::cli::ConnectionArgs;

/// Environment variable holding the PEM text of the private key.
pub const PRIVATE_KEY_ENV: &str = "ICLOUD_PRIVATE_KEY";

impl ConnectionArgs {
    /// Build a client, requiring container, key ID and private key.
    pub fn client(&self) -> Result<Client> {
        let key = self
            .signing_key()?
            .context("No private key. Set ICLOUD_PRIVATE_KEY or --private-key-file.")?;
        let mut builder = self.builder()?.private_key(key);
        if let Some(endpoint) = &self.endpoint {
            builder = builder.endpoint(endpoint);
        }
        builder.build().context("Failed to create client")
    }

    /// Build a client that may lack a private key. Used for inspection only.
    pub fn unsigned_client(&self) -> Result<Client> {
        let mut builder = self.builder()?;
        if let Some(key) = self.signing_key()? {
            builder = builder.private_key(key);
        }
        if let Some(endpoint) = &self.endpoint {
            builder = builder.endpoint(endpoint);
        }
        builder.build().context("Failed to create client")
    }

    fn builder(&self) -> Result<icloud::ClientBuilder> {
        let container = self
            .container
            .as_deref()
            .context("No container. Set ICLOUD_CONTAINER or --container.")?;
        let key_id = self.key_id.as_deref().unwrap_or_default();

        let mut builder = Client::builder(container, key_id, self.environment);
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        Ok(builder)
    }

    fn signing_key(&self) -> Result<Option<SigningKey>> {
        if let Some(path) = &self.private_key_file {
            return load_private_key(path).map(Some);
        }
        match std::env::var(PRIVATE_KEY_ENV) {
            Ok(pem) if !pem.trim().is_empty() => {
                debug!("using private key from {}", PRIVATE_KEY_ENV);
                parse_private_key(&pem).map(Some)
            }
            _ => Ok(None),
        }
    }
}

/// Read a PEM encoded P-256 private key from disk.
pub fn load_private_key(path: &Path) -> Result<SigningKey> {
    debug!(path = %path.display(), "loading private key");
    let pem = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read private key from {}", path.display()))?;
    parse_private_key(&pem)
}

/// Parse a P-256 private key in SEC1 (`EC PRIVATE KEY`) or PKCS#8
/// (`PRIVATE KEY`) PEM form.
pub fn parse_private_key(pem: &str) -> Result<SigningKey> {
    let pem = pem.trim();
    if pem.contains("BEGIN EC PRIVATE KEY") {
        let secret = SecretKey::from_sec1_pem(pem).context("Invalid SEC1 private key")?;
        return Ok(SigningKey::from(secret));
    }
    if pem.contains("BEGIN PRIVATE KEY") {
        return SigningKey::from_pkcs8_pem(pem).context("Invalid PKCS#8 private key");
    }
    bail!("Private key must be a PEM encoded P-256 key")
}
