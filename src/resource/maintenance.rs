//! Maintenance windows - Fetch, Create, Update, Delete, and Search

use super::ops::{self, Resource};
use super::registry::{ResourceDef, MAINTENANCE};
use super::search::{SearchFilter, SearchQuery};
use super::{is_zero, null_as_default};
use crate::api::{ApiClient, ApiResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Alert severities covered by a window.
///
/// The API accepts either a CSV string (`"1,2,3"`) or a list; both decode to
/// the same ordered list and are always sent back as a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Severities(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum SeverityEntry {
    Text(String),
    Number(u64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeveritiesWire {
    Csv(String),
    List(Vec<SeverityEntry>),
}

impl Severities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a comma-separated list, dropping blanks
    pub fn from_csv(csv: &str) -> Self {
        Self(
            csv.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Severities {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(Into::into)
                .map(|s: String| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }
}

impl Serialize for Severities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Severities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<SeveritiesWire>::deserialize(deserializer)? {
            None => Severities::new(),
            Some(SeveritiesWire::Csv(csv)) => Severities::from_csv(&csv),
            Some(SeveritiesWire::List(entries)) => entries
                .into_iter()
                .map(|entry| match entry {
                    SeverityEntry::Text(s) => s,
                    SeverityEntry::Number(n) => n.to_string(),
                })
                .collect(),
        })
    }
}

/// Maintenance window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maintenance {
    #[serde(default, skip_serializing_if = "Severities::is_empty")]
    pub severities: Severities,
    #[serde(
        rename = "_cid",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub cid: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub item: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub notes: String,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub start: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub stop: u64,
}

impl Maintenance {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Resource for Maintenance {
    fn def() -> &'static ResourceDef {
        &MAINTENANCE
    }

    fn cid(&self) -> &str {
        &self.cid
    }

    fn set_cid(&mut self, cid: String) {
        self.cid = cid;
    }
}

impl ApiClient {
    /// Retrieve the maintenance window with the passed CID
    pub async fn fetch_maintenance_window(&self, cid: &str) -> ApiResult<Maintenance> {
        ops::fetch(self, Some(cid)).await
    }

    /// Retrieve all maintenance windows available to the API token
    pub async fn fetch_maintenance_windows(&self) -> ApiResult<Vec<Maintenance>> {
        ops::fetch_all(self).await
    }

    pub async fn create_maintenance_window(&self, cfg: &Maintenance) -> ApiResult<Maintenance> {
        ops::create(self, Some(cfg)).await
    }

    pub async fn update_maintenance_window(&self, cfg: &Maintenance) -> ApiResult<Maintenance> {
        ops::update(self, Some(cfg)).await
    }

    pub async fn delete_maintenance_window(&self, cfg: &Maintenance) -> ApiResult<bool> {
        ops::delete(self, Some(cfg)).await
    }

    pub async fn delete_maintenance_window_by_cid(&self, cid: &str) -> ApiResult<bool> {
        ops::delete_by_cid::<Maintenance, _>(self, Some(cid)).await
    }

    /// Search maintenance windows. Passing neither criteria returns all windows.
    pub async fn search_maintenance_windows(
        &self,
        query: Option<&SearchQuery>,
        filter: Option<&SearchFilter>,
    ) -> ApiResult<Vec<Maintenance>> {
        ops::search(self, query, filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severities_from_csv() {
        let window: Maintenance = serde_json::from_value(json!({
            "_cid": "/maintenance/1",
            "severities": "1, 2,,3"
        }))
        .unwrap();
        assert_eq!(window.severities.as_slice(), ["1", "2", "3"]);
    }

    #[test]
    fn test_severities_from_list_and_numbers() {
        let window: Maintenance =
            serde_json::from_value(json!({ "severities": ["1", 2, " 5 "] })).unwrap();
        assert_eq!(window.severities.as_slice(), ["1", "2", "5"]);

        let window: Maintenance = serde_json::from_value(json!({ "severities": null })).unwrap();
        assert!(window.severities.is_empty());
    }

    #[test]
    fn test_severities_always_encode_as_list() {
        let window = Maintenance {
            severities: Severities::from_csv("1,2"),
            ..Maintenance::new()
        };
        assert_eq!(
            serde_json::to_value(&window).unwrap(),
            json!({ "severities": ["1", "2"] })
        );
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        assert_eq!(serde_json::to_string(&Maintenance::new()).unwrap(), "{}");
    }

    #[test]
    fn test_wire_field_order_and_names() {
        let window = Maintenance {
            severities: ["1"].into_iter().collect(),
            cid: "/maintenance/12".to_string(),
            item: "/check_bundle/7".to_string(),
            notes: "db upgrade".to_string(),
            kind: "check_bundle".to_string(),
            tags: vec!["env:prod".to_string()],
            start: 1_700_000_000,
            stop: 1_700_003_600,
        };

        assert_eq!(
            serde_json::to_string(&window).unwrap(),
            r#"{"severities":["1"],"_cid":"/maintenance/12","item":"/check_bundle/7","notes":"db upgrade","type":"check_bundle","tags":["env:prod"],"start":1700000000,"stop":1700003600}"#
        );
    }
}
