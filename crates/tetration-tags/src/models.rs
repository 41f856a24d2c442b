//! Tag models and request payloads.

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;
use validator::{Validate, ValidationError};

/// Key/value annotations attached to an address or subnet.
pub type TagAttributes = BTreeMap<String, serde_json::Value>;

/// Annotations for tagging flows and inventory items in a root scope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Tag {
    /// IPv4/IPv6 address or subnet.
    pub ip: String,
    /// Key/value map applied to matching flows and inventory items.
    #[serde(default)]
    pub attributes: TagAttributes,
}

/// Request to create or update the tag for an address in a root scope.
///
/// Only `ip` and `attributes` are sent as the body; the scope name is part of
/// the path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct CreateTagRequest {
    /// Root scope the tag belongs to.
    #[serde(skip)]
    #[validate(length(min = 1))]
    pub root_scope_name: String,
    /// IPv4/IPv6 address or subnet.
    #[validate(custom(function = "validate_ip_or_subnet"))]
    pub ip: String,
    /// Attributes to apply.
    #[serde(default)]
    pub attributes: TagAttributes,
}

impl CreateTagRequest {
    /// Create a request with no attributes.
    #[must_use]
    pub fn new(root_scope_name: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            root_scope_name: root_scope_name.into(),
            ip: ip.into(),
            attributes: TagAttributes::new(),
        }
    }

    /// Add a single attribute.
    #[must_use]
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Replace all attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: TagAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Request to fetch the attributes tagged on an address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct DescribeTagRequest {
    /// Root scope to look in.
    #[validate(length(min = 1))]
    pub root_app_scope_name: String,
    /// IPv4/IPv6 address or subnet.
    #[validate(custom(function = "validate_ip_or_subnet"))]
    pub ip: String,
}

impl DescribeTagRequest {
    /// Create a describe request.
    #[must_use]
    pub fn new(root_app_scope_name: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            root_app_scope_name: root_app_scope_name.into(),
            ip: ip.into(),
        }
    }
}

/// Request to delete all tags for an address under a root scope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct DeleteTagRequest {
    /// Root scope to delete from.
    #[serde(skip)]
    #[validate(length(min = 1))]
    pub root_app_scope_name: String,
    /// IPv4/IPv6 address or subnet.
    #[validate(custom(function = "validate_ip_or_subnet"))]
    pub ip: String,
}

impl DeleteTagRequest {
    /// Create a delete request.
    #[must_use]
    pub fn new(root_app_scope_name: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            root_app_scope_name: root_app_scope_name.into(),
            ip: ip.into(),
        }
    }
}

/// Accepts a bare address or an `address/prefix` network.
fn validate_ip_or_subnet(value: &str) -> Result<(), ValidationError> {
    if value.parse::<IpAddr>().is_ok() || value.parse::<IpNet>().is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_ip_or_subnet"))
    }
}
