//! Edition list aggregation with best-effort release-date resolution.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Json;
use tracing::{error, info, warn};

use super::{require_headers, AppState};
use crate::error::ApiError;
use crate::mapper;
use crate::models::EditionsPage;

/// `GET /datasets/{datasetID}/editions`
///
/// The dataset and edition list are primary entities: either failing fails
/// the request. The per-edition latest-version release date is cosmetic;
/// a broken link or a failed version fetch leaves that edition's date
/// empty and the loop carries on.
pub async fn get_editions(
    State(state): State<AppState>,
    Path(dataset_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<EditionsPage>, ApiError> {
    let auth = require_headers(&headers)?;

    info!(dataset_id = %dataset_id, collection_id = %auth.collection_id, "calling get editions");

    let dataset = state
        .registry
        .get_dataset_current_and_next(&auth, &dataset_id)
        .await
        .map_err(|e| {
            error!(dataset_id = %dataset_id, error = %e, "error getting dataset from dataset API");
            ApiError::fetch_with_cause("error getting dataset from dataset API", &e)
        })?;

    let editions = state.registry.get_editions(&auth, &dataset_id).await.map_err(|e| {
        error!(dataset_id = %dataset_id, error = %e, "error getting editions from dataset API");
        ApiError::fetch_with_cause("error getting editions from dataset API", &e)
    })?;

    let mut latest_versions: HashMap<String, String> = HashMap::new();
    for edition in &editions {
        let link = edition
            .links
            .as_ref()
            .and_then(|links| links.latest_version.as_ref())
            .map(|latest| latest.href.as_str())
            .unwrap_or_default();

        let version_id = match mapper::ids_from_version_link(link) {
            Ok((_, _, version_id)) => version_id,
            Err(e) => {
                warn!(edition = %edition.edition, error = %e, "failed to parse latest version link");
                latest_versions.insert(edition.edition.clone(), String::new());
                continue;
            }
        };

        match state
            .registry
            .get_version(&auth, &dataset_id, &edition.edition, &version_id)
            .await
        {
            Ok(version) => {
                latest_versions.insert(edition.edition.clone(), version.release_date);
            }
            Err(e) => {
                warn!(edition = %edition.edition, error = %e, "failed to get latest version details");
                latest_versions.insert(edition.edition.clone(), String::new());
            }
        }
    }

    let page = mapper::all_editions(&dataset, editions, &latest_versions);

    info!(dataset_id = %dataset_id, "get editions: request successful");
    Ok(Json(page))
}
