//! HTTP client configuration and request dispatch.
//!
//! [`ApiClient`] composes endpoint URLs under the appliance base URL, hands
//! serialized bodies to a [`RequestSigner`], and dispatches the signed
//! request. It performs no retries; a failed call is reported once.

use crate::config::TetrationClientConfig;
use crate::signer::{HmacSigner, RequestSigner};
use crate::{Error, Result};
use reqwest::{Client, ClientBuilder, Method, Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Default timeout for appliance requests, in seconds
pub const TETRATION_DEFAULT_TIMEOUT: u64 = 30;

/// Default idle timeout for connection pools, in seconds
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client configuration.
///
/// Configures HTTP client behavior including timeouts and connection pooling.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(TETRATION_DEFAULT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ApiClient`].
#[derive(Clone)]
pub struct ApiClientBuilder {
    config: TetrationClientConfig,
    http_config: ClientConfig,
    signer: Option<Arc<dyn RequestSigner>>,
    user_agent: Option<String>,
}

impl fmt::Debug for ApiClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClientBuilder")
            .field("config", &self.config)
            .field("http_config", &self.http_config)
            .field("custom_signer", &self.signer.is_some())
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ApiClientBuilder {
    /// Create a new builder from a [`TetrationClientConfig`].
    ///
    /// The HTTP timeout starts at the configuration's `request_timeout_secs`.
    #[must_use]
    pub fn new(config: TetrationClientConfig) -> Self {
        let http_config = ClientConfig::new().with_timeout(config.timeout());
        Self {
            config,
            http_config,
            signer: None,
            user_agent: None,
        }
    }

    /// Override the HTTP client configuration used when building the client.
    ///
    /// Its timeout replaces the one taken from the client configuration.
    #[must_use]
    pub fn with_http_config(mut self, http_config: ClientConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Replace the default [`HmacSigner`].
    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Set the `User-Agent` used by the default signer.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Finalise the builder and create the [`ApiClient`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the base URL is unusable, the CA
    /// certificate cannot be loaded, or the HTTP client fails to build.
    pub fn build(self) -> Result<ApiClient> {
        let base_url = self.config.parse_api_url()?;

        let http_config = self.http_config;

        let mut builder = ClientBuilder::new()
            .timeout(http_config.timeout)
            .pool_idle_timeout(http_config.pool_idle_timeout)
            .pool_max_idle_per_host(http_config.pool_max_idle_per_host)
            .connect_timeout(CONNECT_TIMEOUT)
            .gzip(http_config.enable_compression);

        if !self.config.tls_verify {
            warn!("TLS verification disabled for Tetration client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &self.config.tls_ca_cert {
            debug!("loading Tetration CA certificate from {}", ca_cert.display());
            let bytes = std::fs::read(ca_cert).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read CA certificate {}: {err}",
                    ca_cert.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid CA certificate: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        let signer: Arc<dyn RequestSigner> = match self.signer {
            Some(signer) => signer,
            None => {
                let mut signer = HmacSigner::from_config(&self.config);
                if let Some(user_agent) = self.user_agent {
                    signer = signer.with_user_agent(user_agent);
                }
                Arc::new(signer)
            }
        };

        Ok(ApiClient {
            http,
            base_url,
            signer,
        })
    }
}

/// Asynchronous client for the Tetration OpenAPI.
///
/// Holds no mutable state; clones share the connection pool and signer.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    signer: Arc<dyn RequestSigner>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Construct a client with default HTTP settings and the HMAC signer.
    ///
    /// # Errors
    ///
    /// See [`ApiClientBuilder::build`].
    pub fn from_config(config: &TetrationClientConfig) -> Result<Self> {
        ApiClientBuilder::new(config.clone()).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: TetrationClientConfig) -> ApiClientBuilder {
        ApiClientBuilder::new(config)
    }

    /// Return the appliance base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL under the base URL.
    ///
    /// Each segment is appended as a single path segment and percent-encoded,
    /// so `/`, `?` and `#` inside a value cannot change the URL structure.
    /// Query pairs are form-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the base URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);

        url.path_segments_mut()
            .map_err(|()| {
                Error::InvalidEndpoint(format!("Base URL `{}` cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// Serialize `body` as JSON and sign a request for `url`.
    ///
    /// Nothing is sent; failures here are construction errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationError`] if the body cannot be encoded, or
    /// whatever error the signer reports.
    pub fn prepare<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<Request>
    where
        B: Serialize + ?Sized,
    {
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|err| Error::SerializationError(err.to_string()))?;

        self.signer.sign(method, url, payload)
    }

    /// Dispatch a signed request and discard the response body.
    ///
    /// # Errors
    ///
    /// Returns a transport error on network failure or a non-success status.
    pub async fn send(&self, request: Request) -> Result<()> {
        self.execute(request).await.map(|_| ())
    }

    /// Dispatch a signed request and decode the JSON response body.
    ///
    /// # Errors
    ///
    /// Returns a transport error on network failure or a non-success status,
    /// and [`Error::ParseError`] if the body does not decode into `T`.
    pub async fn send_json<T>(&self, request: Request) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let path = request.url().path().to_string();
        let response = self.execute(request).await?;
        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|err| {
            Error::ParseError(format!("Failed to parse response for `{path}`: {err}"))
        })
    }

    async fn execute(&self, request: Request) -> Result<Response> {
        let method = request.method().clone();
        let path = request.url().path().to_string();

        info!(%method, path = %path, "Sending Tetration request");

        let response = self.http.execute(request).await?;
        let status = response.status();
        debug!(%method, path = %path, %status, "Tetration response received");

        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(map_status_to_error(status, message))
    }
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Unauthorized(format!("Tetration authentication failed: {text}"))
        }
        StatusCode::CONFLICT => Error::Conflict(text),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("Tetration temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("Tetration server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("Tetration error {status}: {text}")),
    }
}
