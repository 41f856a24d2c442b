//! Asynchronous inventory tag client.

use crate::models::{CreateTagRequest, DeleteTagRequest, DescribeTagRequest, Tag};
use crate::Result;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use tetration_core::client::{ApiClient, ApiClientBuilder, ClientConfig};
use tetration_core::config::TetrationClientConfig;
use tetration_core::signer::RequestSigner;
use tracing::debug;
use url::Url;
use validator::Validate;

const USER_AGENT: &str = concat!("tetration-tags/", env!("CARGO_PKG_VERSION"));

/// Base path of version 1 of the OpenAPI.
pub const API_V1_BASE_PATH: &str = "/openapi/v1";

/// Base path of the inventory tags resource.
pub const TAGS_API_V1_BASE_PATH: &str = "/openapi/v1/inventory/tags";

/// Builder for [`TagsClient`].
#[derive(Debug, Clone)]
pub struct TagsClientBuilder {
    inner: ApiClientBuilder,
}

impl TagsClientBuilder {
    /// Create a builder for the given configuration.
    #[must_use]
    pub fn new(config: TetrationClientConfig) -> Self {
        let builder = ApiClientBuilder::new(config).with_user_agent(USER_AGENT);
        Self { inner: builder }
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Use a custom request signer instead of the API key signer.
    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.inner = self.inner.with_signer(signer);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn build(self) -> Result<TagsClient> {
        let inner = self.inner.build()?;
        Ok(TagsClient { inner })
    }
}

/// Asynchronous client for inventory tags.
#[derive(Debug, Clone)]
pub struct TagsClient {
    inner: ApiClient,
}

impl TagsClient {
    /// Construct a client directly from the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: TetrationClientConfig) -> Result<Self> {
        TagsClientBuilder::new(config).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: TetrationClientConfig) -> TagsClientBuilder {
        TagsClientBuilder::new(config)
    }

    /// Return the appliance base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// Create or update the tag for an address.
    ///
    /// The returned [`Tag`] echoes the request; the response body is not read.
    ///
    /// # Errors
    ///
    /// Returns a construction error if validation or signing fails, and a
    /// transport error if the appliance rejects the request.
    pub async fn create_tag(&self, request: &CreateTagRequest) -> Result<Tag> {
        request.validate()?;
        debug!(scope = %request.root_scope_name, ip = %request.ip, "creating tag");

        let url = self.tags_url(&request.root_scope_name, &[])?;
        let signed = self.inner.prepare(Method::POST, url, Some(request))?;
        self.inner.send(signed).await?;

        Ok(Tag {
            ip: request.ip.clone(),
            attributes: request.attributes.clone(),
        })
    }

    /// Fetch the attributes tagged on an address as a string map.
    ///
    /// # Errors
    ///
    /// Fails like [`TagsClient::describe_tag_as`].
    pub async fn describe_tag(
        &self,
        request: &DescribeTagRequest,
    ) -> Result<BTreeMap<String, String>> {
        self.describe_tag_as(request).await
    }

    /// Fetch the attributes tagged on an address, decoded into `T`.
    ///
    /// # Errors
    ///
    /// Returns a construction error if validation or signing fails, a
    /// transport error if the appliance rejects the request, and a parse
    /// error if the body does not decode into `T`.
    pub async fn describe_tag_as<T>(&self, request: &DescribeTagRequest) -> Result<T>
    where
        T: DeserializeOwned,
    {
        request.validate()?;
        debug!(scope = %request.root_app_scope_name, ip = %request.ip, "describing tag");

        let url = self.tags_url(
            &request.root_app_scope_name,
            &[("ip", request.ip.as_str())],
        )?;
        let signed = self.inner.prepare::<()>(Method::GET, url, None)?;
        self.inner.send_json(signed).await
    }

    /// Fetch the attributes tagged on an address into `destination`.
    ///
    /// `destination` is only written after a successful decode.
    ///
    /// # Errors
    ///
    /// Fails like [`TagsClient::describe_tag_as`].
    pub async fn describe_tag_into<T>(
        &self,
        request: &DescribeTagRequest,
        destination: &mut T,
    ) -> Result<()>
    where
        T: DeserializeOwned,
    {
        *destination = self.describe_tag_as(request).await?;
        Ok(())
    }

    /// Delete all tags for an address under a root scope.
    ///
    /// # Errors
    ///
    /// Returns a construction error if validation or signing fails, and a
    /// transport error if the appliance rejects the request.
    pub async fn delete_tag(&self, request: &DeleteTagRequest) -> Result<()> {
        request.validate()?;
        debug!(scope = %request.root_app_scope_name, ip = %request.ip, "deleting tag");

        let url = self.tags_url(&request.root_app_scope_name, &[])?;
        let signed = self.inner.prepare(Method::DELETE, url, Some(request))?;
        self.inner.send(signed).await
    }

    fn tags_url(&self, root_scope_name: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut segments: Vec<&str> = TAGS_API_V1_BASE_PATH
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        segments.push(root_scope_name);
        self.inner.endpoint(&segments, query)
    }
}
