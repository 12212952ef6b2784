//! Circonus Client
//!
//! Main client for interacting with the Circonus API, combining credentials
//! and HTTP functionality.

use super::auth::{ApiCredentials, DEFAULT_APP_NAME};
use super::error::{ApiError, HttpError};
use super::http::ApiHttpClient;
use super::transport::Transport;
use std::time::Duration;

/// Default API root
pub const DEFAULT_API_URL: &str = "https://api.circonus.com/v2";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolved settings for building an [`ApiClient`]
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub url: String,
    pub token: String,
    pub app_name: String,
    pub debug: bool,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(token: &str) -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            token: token.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            debug: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Main Circonus client
#[derive(Clone)]
pub struct ApiClient {
    pub credentials: ApiCredentials,
    pub http: ApiHttpClient,
    pub debug: bool,
}

impl ApiClient {
    /// Create a new client
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        if !super::auth::validate_token(config.token.trim()) {
            anyhow::bail!("API token is required. Set CIRCONUS_API_TOKEN or use --token");
        }

        let app_name = if config.app_name.trim().is_empty() {
            DEFAULT_APP_NAME
        } else {
            config.app_name.as_str()
        };
        let credentials = ApiCredentials::new(&config.token, app_name);

        let http = ApiHttpClient::new(&config.url, &credentials, config.timeout)
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        tracing::debug!("API client ready for {} as {}", http.base_url(), app_name);

        Ok(Self {
            credentials,
            http,
            debug: config.debug,
        })
    }
}

impl Transport for ApiClient {
    async fn get(&self, path: &str) -> Result<Vec<u8>, HttpError> {
        self.http.get(path).await
    }

    async fn put(&self, path: &str, body: Vec<u8>) -> Result<Vec<u8>, HttpError> {
        self.http.put(path, body).await
    }

    async fn post(&self, path: &str, body: Vec<u8>) -> Result<Vec<u8>, HttpError> {
        self.http.post(path, body).await
    }

    async fn delete(&self, path: &str) -> Result<Vec<u8>, HttpError> {
        self.http.delete(path).await
    }

    fn debug_enabled(&self) -> bool {
        self.debug
    }
}

/// Format an API error for display
/// Security: Generic messages for HTTP failures avoid echoing API internals
pub fn format_api_error(error: &ApiError) -> String {
    let ApiError::Transport { context, source } = error else {
        return error.to_string();
    };

    let hint = match source.status() {
        Some(401) => "Authentication failed. Check your API token.",
        Some(403) => "Permission denied. Check the token's app name and role.",
        Some(404) => "Resource not found.",
        Some(409) => "Resource conflict. The resource may already exist or be in use.",
        Some(429) => "Rate limit exceeded. Please try again later.",
        Some(400) => "Invalid request. Check your parameters.",
        Some(500..=599) => "Circonus service temporarily unavailable. Please try again.",
        _ => match source {
            HttpError::Request(_) => "Request failed. Check your network connection and try again.",
            _ => return error.to_string(),
        },
    };

    format!("{}: {}", context, hint)
}
