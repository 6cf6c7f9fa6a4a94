//! Upstream capability contracts and their reqwest-backed implementations.
//!
//! The three upstreams — dataset registry, collection (workflow) store and
//! topics taxonomy — are abstracted behind async traits so the aggregation
//! layer can be exercised in tests with in-process substitutes.

pub mod collection;
pub mod registry;
pub mod taxonomy;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Collection, Dataset, DatasetUpdate, EditableMetadata, Edition, InstanceUpdate, TopicsResult,
    Version,
};

/// Inbound header carrying the collection the caller is working in.
pub const COLLECTION_ID_HEADER: &str = "Collection-Id";
/// Inbound header carrying the caller's access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-User-Access-Token";

/// Identity headers forwarded verbatim on every upstream call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestHeaders {
    pub access_token: String,
    pub collection_id: String,
}

/// Failure talking to an upstream service.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned {status}: {body}")]
    ErrorResponse {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("invalid response from {service}: {detail}")]
    InvalidResponse {
        service: &'static str,
        detail: String,
    },
}

impl ClientError {
    /// The upstream explicitly reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::ErrorResponse { status: 404, .. })
    }
}

/// Dataset registry operations.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Fetch the full dataset catalogue, paginating internally.
    async fn list_datasets(
        &self,
        headers: &RequestHeaders,
        batch_size: usize,
        max_workers: usize,
    ) -> Result<Vec<DatasetUpdate>, ClientError>;

    /// Fetch both the published and draft projections of a dataset.
    async fn get_dataset_current_and_next(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
    ) -> Result<DatasetUpdate, ClientError>;

    async fn get_editions(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
    ) -> Result<Vec<Edition>, ClientError>;

    async fn get_edition(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
    ) -> Result<Edition, ClientError>;

    async fn get_version(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        version: &str,
    ) -> Result<Version, ClientError>;

    /// Fetch a version together with the ETag the registry issued for it.
    async fn get_version_with_etag(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        version: &str,
    ) -> Result<(Version, String), ClientError>;

    /// Fetch all versions of an edition, paginating internally.
    async fn list_versions(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        batch_size: usize,
        max_workers: usize,
    ) -> Result<Vec<Version>, ClientError>;

    async fn put_dataset(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        dataset: &Dataset,
    ) -> Result<(), ClientError>;

    async fn put_version(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        version: &str,
        body: &Version,
    ) -> Result<Version, ClientError>;

    async fn put_instance(
        &self,
        headers: &RequestHeaders,
        instance_id: &str,
        instance: &InstanceUpdate,
        if_match: &str,
    ) -> Result<String, ClientError>;

    /// Apply a combined dataset/version metadata patch, conditional on the
    /// ETag observed at read time. The registry must reject a stale ETag
    /// with a precondition failure; this call never retries.
    async fn put_metadata(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        version: &str,
        metadata: &EditableMetadata,
        version_etag: &str,
    ) -> Result<(), ClientError>;
}

/// Collection (workflow) store operations.
#[async_trait]
pub trait CollectionApi: Send + Sync {
    async fn get_collection(
        &self,
        access_token: &str,
        collection_id: &str,
    ) -> Result<Collection, ClientError>;

    async fn set_dataset_state(
        &self,
        access_token: &str,
        collection_id: &str,
        lang: &str,
        dataset_id: &str,
        state: &str,
    ) -> Result<(), ClientError>;

    #[allow(clippy::too_many_arguments)]
    async fn set_dataset_version_state(
        &self,
        access_token: &str,
        collection_id: &str,
        lang: &str,
        dataset_id: &str,
        edition: &str,
        version: &str,
        state: &str,
    ) -> Result<(), ClientError>;
}

/// Topics taxonomy operations.
#[async_trait]
pub trait TaxonomyApi: Send + Sync {
    async fn get_topics(&self, access_token: &str) -> Result<TopicsResult, ClientError>;
}
