//! Annotations - Fetch, Create, Update, Delete, and Search

use super::ops::{self, Resource};
use super::registry::{ResourceDef, ANNOTATION};
use super::search::{SearchFilter, SearchQuery};
use super::{is_zero, null_as_default};
use crate::api::{ApiClient, ApiResult};
use serde::{Deserialize, Serialize};

/// Annotation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(
        rename = "_cid",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub cid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(
        rename = "_last_modified_by",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub last_modified_by: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "rel_metrics", default, deserialize_with = "null_as_default")]
    pub related_metrics: Vec<String>,
    #[serde(rename = "_last_modified", default, skip_serializing_if = "is_zero")]
    pub last_modified: u64,
    #[serde(rename = "_created", default, skip_serializing_if = "is_zero")]
    pub created: u64,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub stop: u64,
}

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Resource for Annotation {
    fn def() -> &'static ResourceDef {
        &ANNOTATION
    }

    fn cid(&self) -> &str {
        &self.cid
    }

    fn set_cid(&mut self, cid: String) {
        self.cid = cid;
    }
}

impl ApiClient {
    /// Retrieve the annotation with the passed CID
    pub async fn fetch_annotation(&self, cid: &str) -> ApiResult<Annotation> {
        ops::fetch(self, Some(cid)).await
    }

    /// Retrieve all annotations available to the API token
    pub async fn fetch_annotations(&self) -> ApiResult<Vec<Annotation>> {
        ops::fetch_all(self).await
    }

    pub async fn create_annotation(&self, cfg: &Annotation) -> ApiResult<Annotation> {
        ops::create(self, Some(cfg)).await
    }

    pub async fn update_annotation(&self, cfg: &Annotation) -> ApiResult<Annotation> {
        ops::update(self, Some(cfg)).await
    }

    pub async fn delete_annotation(&self, cfg: &Annotation) -> ApiResult<bool> {
        ops::delete(self, Some(cfg)).await
    }

    pub async fn delete_annotation_by_cid(&self, cid: &str) -> ApiResult<bool> {
        ops::delete_by_cid::<Annotation, _>(self, Some(cid)).await
    }

    /// Search annotations. Passing neither criteria returns all annotations.
    pub async fn search_annotations(
        &self,
        query: Option<&SearchQuery>,
        filter: Option<&SearchFilter>,
    ) -> ApiResult<Vec<Annotation>> {
        ops::search(self, query, filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_annotation_wire_shape() {
        // Required fields are always sent, server fields never are
        assert_eq!(
            serde_json::to_value(Annotation::new()).unwrap(),
            json!({
                "category": "",
                "description": "",
                "title": "",
                "rel_metrics": [],
                "start": 0,
                "stop": 0
            })
        );
    }

    #[test]
    fn test_decode_server_response() {
        let annotation: Annotation = serde_json::from_value(json!({
            "_cid": "/annotation/145",
            "_created": 1483033102,
            "_last_modified": 1483033102,
            "_last_modified_by": "/user/1",
            "category": "deploy",
            "description": "web tier",
            "rel_metrics": null,
            "start": 1483033100,
            "stop": 1483033200,
            "title": "v1.2.3"
        }))
        .unwrap();

        assert_eq!(annotation.cid, "/annotation/145");
        assert_eq!(annotation.last_modified_by, "/user/1");
        assert_eq!(annotation.created, 1483033102);
        assert!(annotation.related_metrics.is_empty());
        assert_eq!(annotation.stop, 1483033200);
    }
}
