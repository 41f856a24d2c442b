//! Request signing for the Tetration OpenAPI.
//!
//! The appliance authenticates each request with an API key pair. The key id
//! travels in the `Id` header and the secret signs a canonical message built
//! from the method, path, body checksum, content type and timestamp:
//!
//! ```text
//! METHOD\nPATH[?QUERY]\nCHECKSUM\nCONTENT_TYPE\nTIMESTAMP\n
//! ```
//!
//! The base64 HMAC-SHA256 of that message is sent as `Authorization`.

use crate::config::TetrationClientConfig;
use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, Request};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use url::Url;

type HmacSha256 = Hmac<Sha256>;

/// Content type sent with, and signed into, every request.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Header carrying the API key id.
pub const ID_HEADER: HeaderName = HeaderName::from_static("id");

/// Header carrying the signing timestamp.
pub const TIMESTAMP_HEADER: HeaderName = HeaderName::from_static("timestamp");

/// Header carrying the hex SHA-256 of the request body.
pub const CHECKSUM_HEADER: HeaderName = HeaderName::from_static("x-tetration-cksum");

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+0000";

const DEFAULT_USER_AGENT: &str = concat!("tetration-core/", env!("CARGO_PKG_VERSION"));

/// Turns a method, URL and optional body into a ready-to-send request.
///
/// Implementations must not perform I/O; a failure here means nothing was
/// dispatched.
pub trait RequestSigner: Send + Sync {
    /// Build a signed request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SigningError`] when the request cannot be signed.
    fn sign(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> Result<Request>;
}

/// Default signer using the appliance's HMAC-SHA256 API key scheme.
#[derive(Debug, Clone)]
pub struct HmacSigner {
    api_key: String,
    api_secret: SecretString,
    user_agent: String,
}

impl HmacSigner {
    /// Create a signer from an API key pair.
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: SecretString) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Create a signer from the credentials in a client configuration.
    #[must_use]
    pub fn from_config(config: &TetrationClientConfig) -> Self {
        Self::new(
            config.api_key.clone(),
            SecretString::from(config.api_secret.expose_secret().to_owned()),
        )
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Return the API key id.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign a request as of the given instant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SigningError`] if the secret is empty or a header value
    /// is not representable.
    pub fn sign_at(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
        at: DateTime<Utc>,
    ) -> Result<Request> {
        let secret = self.api_secret.expose_secret();
        if secret.is_empty() {
            return Err(Error::SigningError("API secret is empty".to_string()));
        }

        let timestamp = at.format(TIMESTAMP_FORMAT).to_string();
        let checksum = match &body {
            Some(bytes) if method == Method::POST || method == Method::PUT => body_checksum(bytes),
            _ => String::new(),
        };

        let message = canonical_message(&method, &url, &checksum, &timestamp);
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|err| Error::SigningError(err.to_string()))?;
        mac.update(message.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        let mut request = Request::new(method, url);
        let headers = request.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        headers.insert(ID_HEADER, HeaderValue::from_str(&self.api_key)?);
        headers.insert(TIMESTAMP_HEADER, HeaderValue::from_str(&timestamp)?);
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&signature)?);
        if !checksum.is_empty() {
            headers.insert(CHECKSUM_HEADER, HeaderValue::from_str(&checksum)?);
        }

        if let Some(bytes) = body {
            *request.body_mut() = Some(bytes.into());
        }

        Ok(request)
    }
}

impl RequestSigner for HmacSigner {
    fn sign(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> Result<Request> {
        self.sign_at(method, url, body, Utc::now())
    }
}

fn body_checksum(body: &[u8]) -> String {
    format!("{:x}", Sha256::digest(body))
}

fn canonical_message(method: &Method, url: &Url, checksum: &str, timestamp: &str) -> String {
    let path = match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    };
    format!("{method}\n{path}\n{checksum}\n{JSON_CONTENT_TYPE}\n{timestamp}\n")
}
