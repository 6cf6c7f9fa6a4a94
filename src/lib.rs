//! Backend-for-frontend controller for browsing and editing statistical
//! datasets during publishing.
//!
//! The controller fans out to three upstream services per request — the
//! dataset registry, the collection (workflow) store and the topics
//! taxonomy — and merges their results into the single views the publishing
//! UI works with. It owns no dataset state of its own: every write is
//! forwarded upstream, with optimistic-concurrency handled by the version
//! ETag the registry hands out on read.

pub mod clients;
pub mod config;
pub mod error;
pub mod handlers;
pub mod mapper;
pub mod models;
pub mod routes;

pub use config::Config;
pub use error::ApiError;
pub use handlers::AppState;
