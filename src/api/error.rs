//! Error types for Circonus API calls

use thiserror::Error;

/// Failures raised by the HTTP transport itself.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("failed to send request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API request failed: {status} {body}")]
    Status { status: u16, body: String },

    #[error("invalid request URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),
}

impl HttpError {
    /// HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            HttpError::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Errors surfaced by resource operations.
///
/// `kind` is the human name of the resource ("maintenance window",
/// "annotation", "user"); `context` names the failed step the same way the
/// log lines do ("fetching annotation", "parsing users").
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid {kind} CID (none)")]
    MissingIdentifier { kind: &'static str },

    #[error("invalid {kind} CID ({cid})")]
    InvalidIdentifier { kind: &'static str, cid: String },

    #[error("invalid {kind} config (nil)")]
    InvalidConfig { kind: &'static str },

    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: HttpError,
    },

    #[error("{context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context}: {source}")]
    Encode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result alias used by the resource operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_messages() {
        let missing = ApiError::MissingIdentifier { kind: "annotation" };
        assert_eq!(missing.to_string(), "invalid annotation CID (none)");

        let invalid = ApiError::InvalidIdentifier {
            kind: "maintenance window",
            cid: "/maintenance/abc".to_string(),
        };
        assert_eq!(
            invalid.to_string(),
            "invalid maintenance window CID (/maintenance/abc)"
        );
    }

    #[test]
    fn test_transport_error_keeps_source() {
        let err = ApiError::Transport {
            context: "fetching user".to_string(),
            source: HttpError::Status {
                status: 404,
                body: "not found".to_string(),
            },
        };

        assert_eq!(
            err.to_string(),
            "fetching user: API request failed: 404 not found"
        );

        let source = std::error::Error::source(&err).expect("source preserved");
        assert!(source.to_string().contains("404"));
    }
}
