//! HTTP handlers: the request guard plus one module per aggregator.

pub mod datasets;
pub mod editions;
pub mod metadata;
pub mod versions;

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::response::Json;

use crate::clients::{
    CollectionApi, RegistryApi, RequestHeaders, TaxonomyApi, ACCESS_TOKEN_HEADER,
    COLLECTION_ID_HEADER,
};
use crate::error::ApiError;

/// Shared handler state. Clients sit behind trait objects so tests can
/// swap in deterministic substitutes; there is no other shared mutable
/// state, so concurrent requests never contend in-process.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn RegistryApi>,
    pub collection: Arc<dyn CollectionApi>,
    pub taxonomy: Arc<dyn TaxonomyApi>,
    pub batch_size: usize,
    pub batch_workers: usize,
}

/// Pull the identity headers off the request and check both are present.
///
/// The collection id is checked before the access token; either failure is
/// a 400 and no upstream call is made.
pub fn require_headers(headers: &HeaderMap) -> Result<RequestHeaders, ApiError> {
    let collection_id = header_value(headers, COLLECTION_ID_HEADER);
    let access_token = header_value(headers, ACCESS_TOKEN_HEADER);

    if collection_id.is_empty() {
        return Err(ApiError::MissingCollectionId);
    }
    if access_token.is_empty() {
        return Err(ApiError::MissingAccessToken);
    }

    Ok(RequestHeaders {
        access_token,
        collection_id,
    })
}

fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}
