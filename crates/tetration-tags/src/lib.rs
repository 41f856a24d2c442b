//! Inventory tag client for the Tetration OpenAPI.
//!
//! Tags annotate an IP address or subnet inside a root scope with arbitrary
//! key/value attributes. This crate provides the request models and an
//! asynchronous client for creating, describing and deleting them.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{TagsClient, TagsClientBuilder, API_V1_BASE_PATH, TAGS_API_V1_BASE_PATH};
pub use models::{CreateTagRequest, DeleteTagRequest, DescribeTagRequest, Tag, TagAttributes};

/// Convenient result alias that reuses the shared Tetration error type.
pub type Result<T> = tetration_core::Result<T>;
