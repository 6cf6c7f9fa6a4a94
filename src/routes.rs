//! Router construction.

use axum::routing::{get, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, datasets, editions, metadata, versions, AppState};

/// Build the application router. Paths and methods are part of the
/// contract with the publishing UI.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/datasets", get(datasets::get_all))
        .route("/datasets/:dataset_id/create", get(datasets::get_topics))
        .route("/datasets/:dataset_id/editions", get(editions::get_editions))
        .route(
            "/datasets/:dataset_id/editions/:edition_id/versions",
            get(versions::get_versions),
        )
        .route(
            "/datasets/:dataset_id/editions/:edition_id/versions/:version_id",
            get(metadata::get_edit_metadata).put(metadata::put_metadata),
        )
        .route(
            "/datasets/:dataset_id/editions/:edition_id/versions/:version_id/metadata",
            put(metadata::put_editable_metadata),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
