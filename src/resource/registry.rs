//! Resource Registry - per-resource constants
//!
//! Each resource type is described by data rather than code: its collection
//! prefix, its CID pattern and an optional default CID. The generic
//! operations in [`super::ops`] are driven entirely by these definitions.

use super::cid::{self, CidError};
use crate::api::ApiError;
use regex::Regex;
use std::sync::LazyLock;

/// Resource definition
#[derive(Debug)]
pub struct ResourceDef {
    /// Registry key, also used on the command line
    pub key: &'static str,
    /// Singular human name used in errors and log lines
    pub kind: &'static str,
    /// Plural human name
    pub plural: &'static str,
    /// Collection path
    pub prefix: &'static str,
    /// Anchored CID pattern
    pub cid_pattern: &'static str,
    /// CID used by fetch when none is given
    pub default_cid: Option<&'static str>,
    cid_regex: LazyLock<Regex>,
}

impl ResourceDef {
    /// Compiled CID pattern
    pub fn cid_regex(&self) -> &Regex {
        &self.cid_regex
    }

    /// Resolve a raw identifier against this resource's prefix and pattern
    pub fn resolve(&self, raw: Option<&str>) -> Result<String, ApiError> {
        cid::resolve(raw, self.prefix, self.cid_regex()).map_err(|err| match err {
            CidError::Missing => ApiError::MissingIdentifier { kind: self.kind },
            CidError::Invalid { cid } => ApiError::InvalidIdentifier {
                kind: self.kind,
                cid,
            },
        })
    }

    /// Like [`ResourceDef::resolve`], but a missing identifier falls back to
    /// `default_cid` when the resource has one
    pub fn resolve_or_default(&self, raw: Option<&str>) -> Result<String, ApiError> {
        let missing = raw.map_or(true, str::is_empty);
        match (missing, self.default_cid) {
            (true, Some(default)) => self.resolve(Some(default)),
            _ => self.resolve(raw),
        }
    }
}

/// Anchored CID patterns must compile; they are constants
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("Invalid CID pattern {}: {}", pattern, e))
}

pub static MAINTENANCE: ResourceDef = ResourceDef {
    key: "maintenance",
    kind: "maintenance window",
    plural: "maintenance windows",
    prefix: "/maintenance",
    cid_pattern: r"^/maintenance/[0-9]+$",
    default_cid: None,
    cid_regex: LazyLock::new(|| compile(MAINTENANCE.cid_pattern)),
};

pub static ANNOTATION: ResourceDef = ResourceDef {
    key: "annotation",
    kind: "annotation",
    plural: "annotations",
    prefix: "/annotation",
    cid_pattern: r"^/annotation/[0-9]+$",
    default_cid: None,
    cid_regex: LazyLock::new(|| compile(ANNOTATION.cid_pattern)),
};

pub static USER: ResourceDef = ResourceDef {
    key: "user",
    kind: "user",
    plural: "users",
    prefix: "/user",
    cid_pattern: r"^/user/([0-9]+|current)$",
    default_cid: Some("/user/current"),
    cid_regex: LazyLock::new(|| compile(USER.cid_pattern)),
};

/// All known resources
static REGISTRY: [&ResourceDef; 3] = [&MAINTENANCE, &ANNOTATION, &USER];

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    REGISTRY.iter().copied().find(|def| def.key == key)
}

/// Get all resource keys (for help text and completion)
pub fn get_all_resource_keys() -> Vec<&'static str> {
    REGISTRY.iter().map(|def| def.key).collect()
}
