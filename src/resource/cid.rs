//! CID (canonical identifier) resolution
//!
//! A CID is the server-assigned path of a resource, e.g. `/maintenance/1234`.
//! Callers may pass either the full path or just the trailing id.

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidError {
    #[error("identifier is empty")]
    Missing,

    #[error("identifier {cid} does not match the resource pattern")]
    Invalid { cid: String },
}

/// Prefix `raw` with `prefix/` unless it already starts with `prefix`
pub fn normalize(raw: &str, prefix: &str) -> String {
    if raw.starts_with(prefix) {
        raw.to_string()
    } else {
        format!("{}/{}", prefix, raw)
    }
}

/// Resolve a possibly partial identifier into a validated resource path.
///
/// `None` and `""` are both treated as missing. The pattern is expected to be
/// anchored; the normalized path must match it in full.
pub fn resolve(raw: Option<&str>, prefix: &str, pattern: &Regex) -> Result<String, CidError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(CidError::Missing),
    };

    let cid = normalize(raw, prefix);
    if pattern.is_match(&cid) {
        Ok(cid)
    } else {
        Err(CidError::Invalid { cid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> Regex {
        Regex::new(r"^/maintenance/[A-Za-z0-9]+$").unwrap()
    }

    #[test]
    fn test_resolve_prepends_prefix() {
        assert_eq!(
            resolve(Some("abc123"), "/maintenance", &pattern()),
            Ok("/maintenance/abc123".to_string())
        );
    }

    #[test]
    fn test_resolve_keeps_full_path() {
        assert_eq!(
            resolve(Some("/maintenance/abc123"), "/maintenance", &pattern()),
            Ok("/maintenance/abc123".to_string())
        );
    }

    #[test]
    fn test_resolve_missing() {
        assert_eq!(resolve(Some(""), "/maintenance", &pattern()), Err(CidError::Missing));
        assert_eq!(resolve(None, "/maintenance", &pattern()), Err(CidError::Missing));
    }

    #[test]
    fn test_resolve_rejects_space() {
        assert_eq!(
            resolve(Some("abc 123"), "/maintenance", &pattern()),
            Err(CidError::Invalid {
                cid: "/maintenance/abc 123".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_rejects_other_prefix() {
        let err = resolve(Some("/annotation/12"), "/maintenance", &pattern()).unwrap_err();
        assert_eq!(
            err,
            CidError::Invalid {
                cid: "/maintenance//annotation/12".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_prefix_lookalike_is_not_reprefixed() {
        // Starts with the prefix text, so it is taken as-is and then rejected
        let err = resolve(Some("/maintenancefoo"), "/maintenance", &pattern()).unwrap_err();
        assert_eq!(
            err,
            CidError::Invalid {
                cid: "/maintenancefoo".to_string()
            }
        );
    }
}
