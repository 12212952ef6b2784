//! Generic resource operations
//!
//! Fetch / FetchAll / Search / Create / Update / Delete written once and
//! instantiated per record type through [`Resource`].

use super::registry::ResourceDef;
use super::search::{search_path, SearchFilter, SearchQuery};
use crate::api::{ApiError, ApiResult, Transport};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record type served under one [`ResourceDef`]
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync {
    fn def() -> &'static ResourceDef;

    /// Server-assigned identifier, empty until created
    fn cid(&self) -> &str;

    fn set_cid(&mut self, cid: String);
}

fn decode<T: DeserializeOwned>(bytes: &[u8], context: String) -> ApiResult<T> {
    serde_json::from_slice(bytes).map_err(|source| ApiError::Decode { context, source })
}

fn encode<T: Serialize>(record: &T, def: &ResourceDef) -> ApiResult<Vec<u8>> {
    serde_json::to_vec(record).map_err(|source| ApiError::Encode {
        context: format!("encoding {}", def.kind),
        source,
    })
}

async fn fetch_path<T: Resource, C: Transport>(client: &C, path: &str) -> ApiResult<T> {
    let def = T::def();
    let result = client
        .get(path)
        .await
        .map_err(|source| ApiError::Transport {
            context: format!("fetching {}", def.kind),
            source,
        })?;

    if client.debug_enabled() {
        client.log_line(&format!(
            "fetch {}, received JSON: {}",
            def.kind,
            String::from_utf8_lossy(&result)
        ));
    }

    decode(&result, format!("parsing {}", def.kind))
}

async fn fetch_list<T: Resource, C: Transport>(
    client: &C,
    path: &str,
    action: &str,
) -> ApiResult<Vec<T>> {
    let def = T::def();
    let result = client
        .get(path)
        .await
        .map_err(|source| ApiError::Transport {
            context: format!("{} {}", action, def.plural),
            source,
        })?;

    decode(&result, format!("parsing {}", def.plural))
}

/// Fetch one record. A missing CID falls back to the resource default, if any.
pub async fn fetch<T: Resource, C: Transport>(client: &C, cid: Option<&str>) -> ApiResult<T> {
    let path = T::def().resolve_or_default(cid)?;
    fetch_path(client, &path).await
}

/// Fetch several records concurrently. Every CID is validated before the
/// first request goes out; the first failure aborts the whole batch.
pub async fn fetch_many<T: Resource, C: Transport>(client: &C, cids: &[&str]) -> ApiResult<Vec<T>> {
    let def = T::def();
    let paths = cids
        .iter()
        .map(|cid| def.resolve(Some(*cid)))
        .collect::<ApiResult<Vec<String>>>()?;

    futures::future::try_join_all(paths.iter().map(|path| fetch_path::<T, C>(client, path))).await
}

/// Fetch every record visible to the token
pub async fn fetch_all<T: Resource, C: Transport>(client: &C) -> ApiResult<Vec<T>> {
    fetch_list(client, T::def().prefix, "fetching").await
}

/// Search a collection. With neither a term nor filter values this is exactly
/// [`fetch_all`].
pub async fn search<T: Resource, C: Transport>(
    client: &C,
    query: Option<&SearchQuery>,
    filter: Option<&SearchFilter>,
) -> ApiResult<Vec<T>> {
    let def = T::def();
    let path = search_path(def.prefix, query, filter);
    if path == def.prefix {
        return fetch_all(client).await;
    }

    fetch_list(client, &path, "searching").await
}

/// Create a record; the server assigns the CID
pub async fn create<T: Resource, C: Transport>(client: &C, record: Option<&T>) -> ApiResult<T> {
    let def = T::def();
    let Some(record) = record else {
        return Err(ApiError::InvalidConfig { kind: def.kind });
    };

    let mut record = record.clone();
    record.set_cid(String::new());
    let body = encode(&record, def)?;

    if client.debug_enabled() {
        client.log_line(&format!(
            "create {}, sending JSON: {}",
            def.kind,
            String::from_utf8_lossy(&body)
        ));
    }

    let result = client
        .post(def.prefix, body)
        .await
        .map_err(|source| ApiError::Transport {
            context: format!("creating {}", def.kind),
            source,
        })?;

    decode(&result, format!("parsing {}", def.kind))
}

/// Overwrite a record in full. The record must carry a valid CID.
pub async fn update<T: Resource, C: Transport>(client: &C, record: Option<&T>) -> ApiResult<T> {
    let def = T::def();
    let Some(record) = record else {
        return Err(ApiError::InvalidConfig { kind: def.kind });
    };

    let path = def.resolve(Some(record.cid())).map_err(|err| match err {
        ApiError::MissingIdentifier { kind } => ApiError::InvalidIdentifier {
            kind,
            cid: String::new(),
        },
        other => other,
    })?;

    let mut record = record.clone();
    record.set_cid(path.clone());
    let body = encode(&record, def)?;

    if client.debug_enabled() {
        client.log_line(&format!(
            "update {}, sending JSON: {}",
            def.kind,
            String::from_utf8_lossy(&body)
        ));
    }

    let result = client
        .put(&path, body)
        .await
        .map_err(|source| ApiError::Transport {
            context: format!("updating {}", def.kind),
            source,
        })?;

    decode(&result, format!("parsing {}", def.kind))
}

/// Delete a record by its own CID
pub async fn delete<T: Resource, C: Transport>(client: &C, record: Option<&T>) -> ApiResult<bool> {
    let def = T::def();
    let Some(record) = record else {
        return Err(ApiError::InvalidConfig { kind: def.kind });
    };

    delete_by_cid_in(client, def, Some(record.cid())).await
}

/// Delete the record with the given CID
pub async fn delete_by_cid<T: Resource, C: Transport>(
    client: &C,
    cid: Option<&str>,
) -> ApiResult<bool> {
    delete_by_cid_in(client, T::def(), cid).await
}

async fn delete_by_cid_in<C: Transport>(
    client: &C,
    def: &ResourceDef,
    cid: Option<&str>,
) -> ApiResult<bool> {
    let path = def.resolve(cid)?;

    client
        .delete(&path)
        .await
        .map_err(|source| ApiError::Transport {
            context: format!("deleting {}", def.kind),
            source,
        })?;

    Ok(true)
}
