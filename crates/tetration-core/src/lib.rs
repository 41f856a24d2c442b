//! # tetration-core
//!
//! Core types and utilities for talking to a Tetration appliance over its
//! OpenAPI surface.
//!
//! This crate provides configuration, error handling, request signing and the
//! HTTP transport shared by the resource crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code mapping
//! - [`config`] - Appliance endpoint and credential configuration
//! - [`signer`] - API-key request signing
//! - [`client`] - HTTP client configuration and request dispatch

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod signer;

// Re-export commonly used types
pub use client::{ApiClient, ApiClientBuilder, ClientConfig};
pub use config::TetrationClientConfig;
pub use error::{Error, ErrorKind, Result};
pub use signer::{HmacSigner, RequestSigner};
