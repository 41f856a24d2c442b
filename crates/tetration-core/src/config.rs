//! Configuration structures for Tetration clients.
//!
//! This module provides the appliance endpoint and API credentials used to
//! build and sign every request. A configuration is validated once when it is
//! created and is read-only afterwards.

use crate::Error;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Configuration for a Tetration client instance.
///
/// Holds the appliance base URL, the API key pair used for request signing,
/// and the transport settings applied to the underlying HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TetrationClientConfig {
    /// Appliance base URL (e.g. `https://tetration.example.com`)
    #[validate(url)]
    pub api_url: String,

    /// API key identifier sent in the `Id` header
    #[validate(length(min = 1))]
    pub api_key: String,

    /// API secret used to compute request signatures
    #[serde(
        skip_serializing,
        default = "empty_secret",
        deserialize_with = "deserialize_secret"
    )]
    pub api_secret: SecretString,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Optional path to custom CA certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_ca_cert: Option<std::path::PathBuf>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    30
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl TetrationClientConfig {
    /// Create a new client configuration with required parameters.
    ///
    /// # Arguments
    ///
    /// * `api_url` - The appliance base URL (e.g., "https://tetration.example.com")
    /// * `api_key` - The API key identifier
    /// * `api_secret` - The API secret paired with `api_key`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, Error> {
        let config = Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
            tls_verify: default_tls_verify(),
            tls_ca_cert: None,
            request_timeout_secs: default_request_timeout_secs(),
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set custom CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: std::path::PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse the appliance URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or cannot carry a path.
    pub fn parse_api_url(&self) -> Result<Url, Error> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| Error::ConfigError(format!("Invalid API URL: {e}")))?;

        if url.cannot_be_a_base() {
            return Err(Error::ConfigError(format!(
                "API URL `{}` cannot be used as a base",
                self.api_url
            )));
        }

        Ok(url)
    }
}
