//! Resource abstraction layer
//!
//! This module provides a data-driven approach to the Circonus resources.
//! Each resource type is a record struct plus a [`ResourceDef`] holding its
//! collection prefix and CID pattern; the CRUD logic is written once in
//! [`ops`] and shared by all of them.
//!
//! # Architecture
//!
//! - [`cid`] - CID normalization and validation
//! - [`registry`] - Per-resource prefixes, patterns and defaults
//! - [`search`] - Search terms and filter criteria
//! - [`ops`] - Generic Fetch / FetchAll / Search / Create / Update / Delete
//! - [`maintenance`], [`annotation`], [`user`] - Record types
//!
//! # Example
//!
//! ```ignore
//! use circapi::resource::{SearchFilter, SearchQuery};
//!
//! async fn deploys(client: &circapi::api::ApiClient) -> anyhow::Result<()> {
//!     let filter = SearchFilter::new().with("f_category", &["deploy"]);
//!     let found = client
//!         .search_annotations(Some(&SearchQuery::new("web")), Some(&filter))
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod annotation;
pub mod cid;
pub mod maintenance;
pub mod ops;
pub mod registry;
pub mod search;
pub mod user;

pub use annotation::Annotation;
pub use maintenance::{Maintenance, Severities};
pub use ops::Resource;
pub use registry::{get_all_resource_keys, get_resource, ResourceDef};
pub use search::{SearchFilter, SearchQuery};
pub use user::{User, UserContactInfo};

use serde::{Deserialize, Deserializer};

pub(crate) fn is_zero(value: &u64) -> bool {
    *value == 0
}

/// Decode JSON `null` as the type's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
