//! Users - Fetch, Update, and Search
//!
//! The user endpoint cannot create or delete users (that goes through account
//! invitations), so only the read and update helpers are offered here.

use super::null_as_default;
use super::ops::{self, Resource};
use super::registry::{ResourceDef, USER};
use super::search::SearchFilter;
use crate::api::{ApiClient, ApiResult};
use serde::{Deserialize, Serialize};

/// Known contact details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContactInfo {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub sms: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub xmpp: String,
}

/// User
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(
        rename = "_cid",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub cid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact_info: UserContactInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub firstname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lastname: String,
}

impl Resource for User {
    fn def() -> &'static ResourceDef {
        &USER
    }

    fn cid(&self) -> &str {
        &self.cid
    }

    fn set_cid(&mut self, cid: String) {
        self.cid = cid;
    }
}

impl ApiClient {
    /// Retrieve the user with the passed CID. `None` or `""` fetch the
    /// user owning the API token (`/user/current`).
    pub async fn fetch_user(&self, cid: Option<&str>) -> ApiResult<User> {
        ops::fetch(self, cid).await
    }

    /// Retrieve all users available to the API token
    pub async fn fetch_users(&self) -> ApiResult<Vec<User>> {
        ops::fetch_all(self).await
    }

    pub async fn update_user(&self, cfg: &User) -> ApiResult<User> {
        ops::update(self, Some(cfg)).await
    }

    /// Search users by filter; the endpoint has no free-text search
    pub async fn search_users(&self, filter: Option<&SearchFilter>) -> ApiResult<Vec<User>> {
        ops::search(self, None, filter).await
    }
}
