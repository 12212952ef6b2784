//! Configuration Management
//!
//! Handles persistent configuration storage for circapi.

use crate::api::auth::{self, DEFAULT_APP_NAME};
use crate::api::client::{ApiConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// API root, e.g. https://api.circonus.com/v2
    #[serde(default)]
    pub api_url: Option<String>,
    /// API token
    #[serde(default)]
    pub api_token: Option<String>,
    /// Application name registered with the token
    #[serde(default)]
    pub app_name: Option<String>,
    /// Echo request/response payloads
    #[serde(default)]
    pub debug: bool,
    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Settings given on the command line; each one wins over env and file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub app_name: Option<String>,
    pub debug: bool,
}

/// First non-empty value in precedence order
fn pick(candidates: [Option<String>; 3]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

/// Write a file only the owner can read; the config may hold the API token
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;

    // mode() only applies on creation; tighten files left by older versions
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(content)
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("circapi").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path().context("No config directory available")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        write_private(path, content.as_bytes())
            .with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective API URL (CLI > env > config > default)
    pub fn effective_url(&self, cli: Option<&str>) -> String {
        pick([cli.map(String::from), auth::get_default_url(), self.api_url.clone()])
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Get effective API token (CLI > env > config)
    pub fn effective_token(&self, cli: Option<&str>) -> Option<String> {
        pick([cli.map(String::from), auth::get_default_token(), self.api_token.clone()])
    }

    /// Get effective application name (CLI > env > config > default)
    pub fn effective_app_name(&self, cli: Option<&str>) -> String {
        pick([cli.map(String::from), auth::get_default_app_name(), self.app_name.clone()])
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string())
    }

    /// Resolve everything an [`ApiClient`](crate::api::ApiClient) needs
    pub fn api_config(&self, overrides: &Overrides) -> Result<ApiConfig> {
        let token = self
            .effective_token(overrides.api_token.as_deref())
            .context("No API token configured. Set CIRCONUS_API_TOKEN or use --token")?;

        Ok(ApiConfig {
            url: self.effective_url(overrides.api_url.as_deref()),
            token,
            app_name: self.effective_app_name(overrides.app_name.as_deref()),
            debug: overrides.debug || self.debug,
            timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        })
    }

    /// Merge command line settings into the stored config (for `configure`)
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(url) = &overrides.api_url {
            self.api_url = Some(url.clone());
        }
        if let Some(token) = &overrides.api_token {
            self.api_token = Some(token.clone());
        }
        if let Some(app) = &overrides.app_name {
            self.app_name = Some(app.clone());
        }
        if overrides.debug {
            self.debug = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("circapi-test-{}-{}", std::process::id(), name))
            .join("config.json")
    }

    #[test]
    fn test_pick_precedence() {
        assert_eq!(
            pick([Some("cli".into()), Some("env".into()), Some("file".into())]),
            Some("cli".to_string())
        );
        assert_eq!(
            pick([None, Some("  ".into()), Some("file".into())]),
            Some("file".to_string())
        );
        assert_eq!(pick([None, None, None]), None);
    }

    #[test]
    fn test_cli_token_wins() {
        let config = Config {
            api_token: Some("from-file".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.effective_token(Some("from-cli")),
            Some("from-cli".to_string())
        );
    }

    #[test]
    fn test_api_config_uses_file_values() {
        let config = Config {
            api_url: Some("https://circonus.example.com/api/v2".to_string()),
            api_token: Some("file-token".to_string()),
            app_name: Some("ops-tools".to_string()),
            debug: false,
            timeout_secs: Some(5),
        };
        let overrides = Overrides {
            api_url: Some("http://127.0.0.1:9000".to_string()),
            api_token: Some("cli-token".to_string()),
            app_name: Some("cli-app".to_string()),
            debug: true,
        };

        let api = config.api_config(&overrides).unwrap();
        assert_eq!(api.url, "http://127.0.0.1:9000");
        assert_eq!(api.token, "cli-token");
        assert_eq!(api.app_name, "cli-app");
        assert!(api.debug);
        assert_eq!(api.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_path("roundtrip");
        let mut config = Config::default();
        config.apply(&Overrides {
            api_token: Some("abc".to_string()),
            ..Overrides::default()
        });

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_config_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let path = temp_path("permissions");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let config = Config {
            api_token: Some("secret-token".to_string()),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(Config::load_from(&path), config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_malformed_file_yields_default() {
        let path = temp_path("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_yields_default() {
        assert_eq!(
            Config::load_from(Path::new("/nonexistent/circapi/config.json")),
            Config::default()
        );
    }
}
