//! HTTP utilities for Circonus REST API calls

use super::auth::ApiCredentials;
use super::error::HttpError;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use std::time::Duration;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let char_count = body.chars().count();
    let truncated = if char_count > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for Circonus API calls
#[derive(Clone)]
pub struct ApiHttpClient {
    client: Client,
    base_url: String,
}

impl ApiHttpClient {
    /// Create a new HTTP client rooted at `base_url`
    pub fn new(
        base_url: &str,
        credentials: &ApiCredentials,
        timeout: Duration,
    ) -> Result<Self, HttpError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|source| HttpError::InvalidUrl {
            url: base_url.clone(),
            source,
        })?;

        let client = Client::builder()
            .user_agent(concat!("circapi/", env!("CARGO_PKG_VERSION")))
            .default_headers(credentials.headers()?)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a request path (optionally carrying a query string) onto the base URL
    pub fn url_for(&self, path: &str) -> Result<Url, HttpError> {
        let joined = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };

        Url::parse(&joined).map_err(|source| HttpError::InvalidUrl {
            url: joined,
            source,
        })
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Vec<u8>, HttpError> {
        self.execute(Method::GET, path, None).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(&self, path: &str, body: Vec<u8>) -> Result<Vec<u8>, HttpError> {
        self.execute(Method::PUT, path, Some(body)).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, path: &str, body: Vec<u8>) -> Result<Vec<u8>, HttpError> {
        self.execute(Method::POST, path, Some(body)).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<Vec<u8>, HttpError> {
        self.execute(Method::DELETE, path, None).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, HttpError> {
        let url = self.url_for(path)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);

        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }

        let response = request.send().await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = sanitize_for_log(&String::from_utf8_lossy(&bytes));
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, body);
            return Err(HttpError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiHttpClient {
        let creds = ApiCredentials::new("token", "app");
        ApiHttpClient::new(base, &creds, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(sanitized.contains("truncated, 500 bytes total"));
    }

    #[test]
    fn test_sanitize_handles_multibyte_text() {
        let body = "é".repeat(300);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("truncated, 600 bytes total"));
    }

    #[test]
    fn test_sanitize_strips_control_chars() {
        assert_eq!(sanitize_for_log("bad\r\nrequest"), "badrequest");
    }

    #[test]
    fn test_url_for_joins_paths() {
        let http = client("https://api.circonus.com/v2/");
        assert_eq!(http.base_url(), "https://api.circonus.com/v2");

        let url = http.url_for("/annotation/123").unwrap();
        assert_eq!(url.as_str(), "https://api.circonus.com/v2/annotation/123");

        let url = http.url_for("user?email=a%40b.c").unwrap();
        assert_eq!(url.path(), "/v2/user");
        assert_eq!(url.query(), Some("email=a%40b.c"));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let creds = ApiCredentials::new("token", "app");
        let result = ApiHttpClient::new("not a url", &creds, Duration::from_secs(5));
        assert!(matches!(result, Err(HttpError::InvalidUrl { .. })));
    }
}
