//! Metadata reconciler: the edit-view read path and both write paths.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use tracing::{error, info, warn};

use super::{require_headers, AppState};
use crate::clients::RequestHeaders;
use crate::error::ApiError;
use crate::mapper::{self, EDITION_CONFIRMED_STATE};
use crate::models::{Collection, Dimension, EditMetadata, MetadataPayload};

/// `GET /datasets/{datasetID}/editions/{editionID}/versions/{versionID}`
///
/// Assembles the edit view: draft dataset + target version + pre-populated
/// dimensions + workflow state, carrying the version ETag the registry
/// issued so the eventual save can be made conditional on it.
pub async fn get_edit_metadata(
    State(state): State<AppState>,
    Path((dataset_id, edition_id, version_id)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Json<EditMetadata>, ApiError> {
    let auth = require_headers(&headers)?;

    info!(dataset_id = %dataset_id, edition = %edition_id, version = %version_id, "calling get edit metadata");

    let (version, etag) = state
        .registry
        .get_version_with_etag(&auth, &dataset_id, &edition_id, &version_id)
        .await
        .map_err(|e| {
            error!(dataset_id = %dataset_id, error = %e, "failed to get version details");
            ApiError::fetch("error getting version from dataset API", &e)
        })?;

    // Both projections are needed: the draft feeds the view, the published
    // doc locates the latest published version for dimension pre-population.
    let dataset = state
        .registry
        .get_dataset_current_and_next(&auth, &dataset_id)
        .await
        .map_err(|e| {
            error!(dataset_id = %dataset_id, error = %e, "failed to get dataset details");
            ApiError::fetch("error getting dataset from dataset API", &e)
        })?;

    let mut dimensions = Vec::new();
    if version.state == EDITION_CONFIRMED_STATE && version.version > 1 {
        let latest_version_link = dataset
            .current
            .as_ref()
            .and_then(|current| current.links.as_ref())
            .and_then(|links| links.latest_version.as_ref())
            .map(|link| link.href.clone())
            .unwrap_or_default();
        dimensions =
            latest_published_dimensions(&state, &auth, &latest_version_link).await;
    }

    let draft = dataset.next.ok_or_else(|| ApiError::UpstreamFetch {
        message: "dataset has no draft state".to_string(),
        status: StatusCode::INTERNAL_SERVER_ERROR,
    })?;

    // No collection association yet is a legitimate state, not an error.
    let collection = if draft.collection_id.is_empty() {
        Collection::default()
    } else {
        state
            .collection
            .get_collection(&auth.access_token, &draft.collection_id)
            .await
            .map_err(|e| {
                error!(dataset_id = %dataset_id, error = %e, "failed to get collection details");
                ApiError::fetch("error getting collection details", &e)
            })?
    };

    let mut view = mapper::edit_metadata(draft, version, dimensions, &collection);
    view.version_etag = etag;

    info!(dataset_id = %dataset_id, "get edit metadata: request successful");
    Ok(Json(view))
}

/// Resolve the latest published version behind `link` and return its
/// dimensions. Any failure — malformed link, fetch error — degrades to no
/// pre-population; the edit view is still served.
async fn latest_published_dimensions(
    state: &AppState,
    auth: &RequestHeaders,
    link: &str,
) -> Vec<Dimension> {
    let (dataset_id, edition_id, version_id) = match mapper::ids_from_version_link(link) {
        Ok(ids) => ids,
        Err(e) => {
            warn!(error = %e, "failed to parse latest version link");
            return Vec::new();
        }
    };

    match state
        .registry
        .get_version(auth, &dataset_id, &edition_id, &version_id)
        .await
    {
        Ok(version) => version.dimensions,
        Err(e) => {
            warn!(error = %e, "failed to get latest published version details");
            Vec::new()
        }
    }
}

/// `PUT /datasets/{datasetID}/editions/{editionID}/versions/{versionID}`
///
/// Full-object replace: dataset, version and instance are written to the
/// registry as three independent calls — there is no rollback if a later
/// call fails, the earlier writes have already persisted upstream. The
/// collection store is only touched once all three registry writes landed.
pub async fn put_metadata(
    State(state): State<AppState>,
    Path((dataset_id, edition_id, version_id)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(payload): Json<MetadataPayload>,
) -> Result<StatusCode, ApiError> {
    let auth = require_headers(&headers)?;

    info!(dataset_id = %dataset_id, edition = %edition_id, version = %version_id, "calling put metadata");

    state
        .registry
        .put_dataset(&auth, &dataset_id, &payload.dataset)
        .await
        .map_err(|e| {
            error!(dataset_id = %dataset_id, error = %e, "error updating dataset");
            ApiError::update("error updating dataset")
        })?;

    state
        .registry
        .put_version(&auth, &dataset_id, &edition_id, &version_id, &payload.version)
        .await
        .map_err(|e| {
            error!(dataset_id = %dataset_id, error = %e, "error updating version");
            ApiError::update("error updating version")
        })?;

    state
        .registry
        .put_instance(&auth, &payload.version.id, &payload.instance, "*")
        .await
        .map_err(|e| {
            error!(dataset_id = %dataset_id, error = %e, "error updating instance");
            ApiError::update("error updating instance")
        })?;

    propagate_collection_state(
        &state,
        &auth,
        &dataset_id,
        &edition_id,
        &version_id,
        &payload.collection_state,
    )
    .await
    .map_err(|e| {
        error!(dataset_id = %dataset_id, error = %e, "error updating collection state");
        ApiError::update("error updating collection state")
    })?;

    info!(dataset_id = %dataset_id, "put metadata: request successful");
    Ok(StatusCode::OK)
}

/// `PUT /datasets/{datasetID}/editions/{editionID}/versions/{versionID}/metadata`
///
/// Editable-field patch. The registry write is a single call conditional
/// on the ETag carried in the view; on a stale ETag the registry rejects
/// and nothing is sent to the collection store. A collection-store failure
/// after a successful registry write is reported as the same update error:
/// the caller must re-read before retrying, its ETag is stale by then.
pub async fn put_editable_metadata(
    State(state): State<AppState>,
    Path((dataset_id, edition_id, version_id)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(view): Json<EditMetadata>,
) -> Result<StatusCode, ApiError> {
    let auth = require_headers(&headers)?;

    info!(dataset_id = %dataset_id, edition = %edition_id, version = %version_id, "calling put editable metadata");

    let patch = mapper::editable_metadata(&view);

    state
        .registry
        .put_metadata(
            &auth,
            &dataset_id,
            &edition_id,
            &version_id,
            &patch,
            &view.version_etag,
        )
        .await
        .map_err(|e| {
            error!(dataset_id = %dataset_id, error = %e, "error updating metadata");
            ApiError::update("error updating metadata")
        })?;

    propagate_collection_state(
        &state,
        &auth,
        &dataset_id,
        &edition_id,
        &version_id,
        &view.collection_state,
    )
    .await
    .map_err(|e| {
        error!(dataset_id = %dataset_id, error = %e, "error updating collection state after metadata write");
        ApiError::update("error updating metadata")
    })?;

    info!(dataset_id = %dataset_id, "put editable metadata: request successful");
    Ok(StatusCode::OK)
}

/// Move both the dataset-level and dataset-version-level workflow entries
/// to `state` in the caller's working collection.
async fn propagate_collection_state(
    state: &AppState,
    auth: &RequestHeaders,
    dataset_id: &str,
    edition_id: &str,
    version_id: &str,
    collection_state: &str,
) -> Result<(), crate::clients::ClientError> {
    state
        .collection
        .set_dataset_state(
            &auth.access_token,
            &auth.collection_id,
            "",
            dataset_id,
            collection_state,
        )
        .await?;

    state
        .collection
        .set_dataset_version_state(
            &auth.access_token,
            &auth.collection_id,
            "",
            dataset_id,
            edition_id,
            version_id,
            collection_state,
        )
        .await
}
