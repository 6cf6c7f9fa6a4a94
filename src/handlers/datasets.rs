//! Dataset catalogue listing and the topics lookup for the creation screen.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Json;
use tracing::{error, info};

use super::{require_headers, AppState};
use crate::error::ApiError;
use crate::mapper;
use crate::models::{DatasetRow, TopicRow};

/// `GET /datasets` — the full catalogue of datasets with a draft, sorted
/// for display.
pub async fn get_all(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<DatasetRow>>, ApiError> {
    let auth = require_headers(&headers)?;

    info!(collection_id = %auth.collection_id, "calling get all datasets");

    let datasets = state
        .registry
        .list_datasets(&auth, state.batch_size, state.batch_workers)
        .await
        .map_err(|e| {
            error!(error = %e, "error getting all datasets from dataset API");
            ApiError::fetch("error getting all datasets from dataset API", &e)
        })?;

    let rows = mapper::all_datasets(datasets);

    info!(datasets = rows.len(), "get all datasets: request successful");
    Ok(Json(rows))
}

/// `GET /datasets/{datasetID}/create` — topic titles offered when creating
/// a dataset.
pub async fn get_topics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<TopicRow>>, ApiError> {
    let auth = require_headers(&headers)?;

    let result = state
        .taxonomy
        .get_topics(&auth.access_token)
        .await
        .map_err(|e| {
            error!(error = %e, "error getting topics from topics API");
            ApiError::fetch("error getting topics from topics API", &e)
        })?;

    Ok(Json(mapper::topics(result)))
}
