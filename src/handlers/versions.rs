//! Version list aggregation.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Json;
use tracing::{error, info};

use super::{require_headers, AppState};
use crate::error::ApiError;
use crate::mapper;
use crate::models::VersionsPage;

/// `GET /datasets/{datasetID}/editions/{editionID}/versions`
///
/// Fetches the dataset and edition for display names plus the batched
/// version list, then returns rows newest-version-first.
pub async fn get_versions(
    State(state): State<AppState>,
    Path((dataset_id, edition_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<VersionsPage>, ApiError> {
    let auth = require_headers(&headers)?;

    info!(dataset_id = %dataset_id, edition = %edition_id, "calling get versions");

    let dataset = state
        .registry
        .get_dataset_current_and_next(&auth, &dataset_id)
        .await
        .map_err(|e| {
            error!(dataset_id = %dataset_id, error = %e, "error getting dataset from dataset API");
            ApiError::fetch_with_cause("error getting dataset from dataset API", &e)
        })?;

    let edition = state
        .registry
        .get_edition(&auth, &dataset_id, &edition_id)
        .await
        .map_err(|e| {
            error!(dataset_id = %dataset_id, edition = %edition_id, error = %e, "error getting edition from dataset API");
            ApiError::fetch_with_cause("error getting edition from dataset API", &e)
        })?;

    let versions = state
        .registry
        .list_versions(
            &auth,
            &dataset_id,
            &edition_id,
            state.batch_size,
            state.batch_workers,
        )
        .await
        .map_err(|e| {
            error!(dataset_id = %dataset_id, edition = %edition_id, error = %e, "error getting all versions from dataset API");
            ApiError::fetch_with_cause("error getting all versions from dataset API", &e)
        })?;

    let page = mapper::all_versions(&dataset, &edition, versions);

    info!(dataset_id = %dataset_id, edition = %edition_id, "get versions: request successful");
    Ok(Json(page))
}
