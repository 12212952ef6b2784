//! Transport abstraction
//!
//! Resource operations only need four verbs and a debug switch. `ApiClient`
//! is the HTTP implementation; tests plug in in-memory ones.

use super::error::HttpError;
use std::future::Future;

/// Tracing target of the payload echo lines
pub const DEBUG_LOG_TARGET: &str = "circapi::debug";

/// The request/response collaborator the resource operations run on.
///
/// Paths are relative to the API root and may carry a query string
/// (`/annotation?search=deploy`). Bodies are JSON bytes.
pub trait Transport: Send + Sync {
    fn get(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send;

    fn put(
        &self,
        path: &str,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send;

    fn post(
        &self,
        path: &str,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send;

    fn delete(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send;

    /// Whether request/response payloads should be echoed through `log_line`
    fn debug_enabled(&self) -> bool {
        false
    }

    fn log_line(&self, line: &str) {
        tracing::info!(target: DEBUG_LOG_TARGET, "{}", line);
    }
}
