//! `/api` handlers. Each one reads the current snapshot through the shared
//! store and never triggers a crawl.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use dirview_core::{ShallowEntry, SnapshotStatus, SnapshotStore};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    /// Defaults to 100 when absent.
    pub limit: Option<usize>,
}

pub async fn list(
    State(store): State<Arc<SnapshotStore>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<ShallowEntry>>, ApiError> {
    let Query(params) = params?;
    let path = params
        .path
        .ok_or_else(|| ApiError::bad_request("path is not string"))?;

    let entries = store.list_path(&path);
    debug!("list {:?} -> {} entries", path, entries.len());
    Ok(Json(entries))
}

pub async fn search(
    State(store): State<Arc<SnapshotStore>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<ShallowEntry>>, ApiError> {
    let Query(params) = params?;
    let query = params
        .query
        .ok_or_else(|| ApiError::bad_request("query is not string"))?;

    let entries = store.search(&query, params.limit);
    debug!("search {:?} -> {} entries", query, entries.len());
    Ok(Json(entries))
}

pub async fn status(State(store): State<Arc<SnapshotStore>>) -> Json<SnapshotStatus> {
    Json(store.status())
}
