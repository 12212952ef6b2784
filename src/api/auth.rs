//! Circonus API Authentication
//!
//! Every request carries an API token and an application name. Both may come
//! from the command line, the environment or the config file.

use super::error::HttpError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

/// Header carrying the API token
pub const AUTH_TOKEN_HEADER: &str = "x-circonus-auth-token";

/// Header carrying the application name the token is registered for
pub const APP_NAME_HEADER: &str = "x-circonus-app-name";

/// Application name used when none is configured
pub const DEFAULT_APP_NAME: &str = "circapi";

/// API token and application name sent with every request
#[derive(Clone)]
pub struct ApiCredentials {
    token: String,
    app_name: String,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Security: never print the token
        f.debug_struct("ApiCredentials")
            .field("token", &"<redacted>")
            .field("app_name", &self.app_name)
            .finish()
    }
}

impl ApiCredentials {
    pub fn new(token: &str, app_name: &str) -> Self {
        Self {
            token: token.trim().to_string(),
            app_name: app_name.trim().to_string(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Build the authentication headers for the HTTP client
    pub fn headers(&self) -> Result<HeaderMap, HttpError> {
        let mut headers = HeaderMap::new();

        let mut token = HeaderValue::from_str(&self.token)
            .map_err(|_| HttpError::InvalidHeader(AUTH_TOKEN_HEADER))?;
        token.set_sensitive(true);
        headers.insert(AUTH_TOKEN_HEADER, token);

        let app = HeaderValue::from_str(&self.app_name)
            .map_err(|_| HttpError::InvalidHeader(APP_NAME_HEADER))?;
        headers.insert(APP_NAME_HEADER, app);

        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(headers)
    }
}

/// Validate an API token
/// Tokens must be non-empty and contain only visible ASCII (they travel in a header)
pub fn validate_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_graphic())
}

/// Read the API token from the environment
/// Security: Validates token format before returning
pub fn get_default_token() -> Option<String> {
    let token = std::env::var("CIRCONUS_API_TOKEN").ok()?;
    let token = token.trim().to_string();
    if validate_token(&token) {
        return Some(token);
    }
    tracing::warn!("Invalid token format in CIRCONUS_API_TOKEN");
    None
}

/// Read the application name from the environment
pub fn get_default_app_name() -> Option<String> {
    std::env::var("CIRCONUS_APP_NAME")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Read the API base URL from the environment
pub fn get_default_url() -> Option<String> {
    std::env::var("CIRCONUS_API_URL")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
