//! Circonus API interaction module
//!
//! This module provides the plumbing the resource operations run on:
//! credentials, the HTTP client, the transport trait and error types.
//!
//! # Module Structure
//!
//! - [`auth`] - API token and application name headers
//! - [`client`] - Main client, implements [`Transport`]
//! - [`error`] - Transport and operation errors
//! - [`http`] - HTTP utilities for REST API calls
//! - [`transport`] - The four-verb transport trait
//!
//! # Example
//!
//! ```ignore
//! use circapi::api::{ApiClient, ApiConfig};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = ApiClient::new(&ApiConfig::new("my-token"))?;
//!     let me = client.fetch_user(None).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod transport;

pub use client::{format_api_error, ApiClient, ApiConfig};
pub use error::{ApiError, ApiResult, HttpError};
pub use transport::{Transport, DEBUG_LOG_TARGET};
