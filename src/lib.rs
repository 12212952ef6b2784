//! Circonus API client
//!
//! Typed access to maintenance windows, annotations and users.
//!
//! - [`api`] - credentials, HTTP client, transport trait and errors
//! - [`resource`] - record types and the generic CRUD operations
//! - [`config`] - persistent settings for the command line tool

pub mod api;
pub mod config;
pub mod resource;

pub use api::{ApiClient, ApiConfig, ApiError, ApiResult, HttpError, Transport};
pub use resource::{Annotation, Maintenance, SearchFilter, SearchQuery, Severities, User};
