//! Reqwest-backed dataset registry client.
//!
//! List endpoints are batch-paginated: the first page establishes the total
//! count, remaining pages are fetched concurrently under a bounded worker
//! pool, and the results are reassembled in offset order so callers see the
//! upstream's natural ordering regardless of fetch interleaving.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::{
    ClientError, RegistryApi, RequestHeaders, ACCESS_TOKEN_HEADER, COLLECTION_ID_HEADER,
};
use crate::models::{
    Dataset, DatasetUpdate, EditableMetadata, Edition, InstanceUpdate, Version,
};

const SERVICE: &str = "dataset API";

/// One page of a batched list response.
#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(default)]
    total_count: usize,
}

#[derive(Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn get(&self, path: &str, headers: &RequestHeaders) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .header(ACCESS_TOKEN_HEADER, &headers.access_token)
            .header(COLLECTION_ID_HEADER, &headers.collection_id)
    }

    fn put(&self, path: &str, headers: &RequestHeaders) -> reqwest::RequestBuilder {
        self.http
            .put(format!("{}{}", self.base_url, path))
            .header(ACCESS_TOKEN_HEADER, &headers.access_token)
            .header(COLLECTION_ID_HEADER, &headers.collection_id)
    }

    async fn send(builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let response = builder.send().await.map_err(|source| ClientError::Transport {
            service: SERVICE,
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::ErrorResponse {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = Self::send(builder).await?;
        response.json().await.map_err(|source| ClientError::Transport {
            service: SERVICE,
            source,
        })
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        headers: &RequestHeaders,
        path: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Page<T>, ClientError> {
        let paged = format!("{path}?offset={offset}&limit={limit}");
        Self::send_json(self.get(&paged, headers)).await
    }

    /// Fetch every page of `path`, at most `max_workers` pages in flight.
    async fn list_in_batches<T>(
        &self,
        headers: &RequestHeaders,
        path: &str,
        batch_size: usize,
        max_workers: usize,
    ) -> Result<Vec<T>, ClientError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let batch_size = batch_size.max(1);
        let first: Page<T> = self.get_page(headers, path, batch_size, 0).await?;
        let total = first.total_count;
        let mut items = first.items;

        if total <= items.len() {
            return Ok(items);
        }

        let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
        let mut tasks: JoinSet<(usize, Result<Page<T>, ClientError>)> = JoinSet::new();

        let mut offset = batch_size;
        while offset < total {
            let client = self.clone();
            let headers = headers.clone();
            let path = path.to_string();
            let semaphore = semaphore.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let page = client.get_page(&headers, &path, batch_size, offset).await;
                (offset, page)
            });
            offset += batch_size;
        }

        let mut pages = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let (offset, page) = joined.map_err(|e| ClientError::InvalidResponse {
                service: SERVICE,
                detail: format!("batch fetch task failed: {e}"),
            })?;
            pages.push((offset, page?.items));
        }

        // Reassemble in offset order; the upstream ordering is preserved.
        pages.sort_by_key(|(offset, _)| *offset);
        for (_, mut batch) in pages {
            items.append(&mut batch);
        }
        Ok(items)
    }
}

#[async_trait]
impl RegistryApi for RegistryClient {
    async fn list_datasets(
        &self,
        headers: &RequestHeaders,
        batch_size: usize,
        max_workers: usize,
    ) -> Result<Vec<DatasetUpdate>, ClientError> {
        self.list_in_batches(headers, "/datasets", batch_size, max_workers)
            .await
    }

    async fn get_dataset_current_and_next(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
    ) -> Result<DatasetUpdate, ClientError> {
        Self::send_json(self.get(&format!("/datasets/{dataset_id}"), headers)).await
    }

    async fn get_editions(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
    ) -> Result<Vec<Edition>, ClientError> {
        let page: Page<Edition> =
            Self::send_json(self.get(&format!("/datasets/{dataset_id}/editions"), headers))
                .await?;
        Ok(page.items)
    }

    async fn get_edition(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
    ) -> Result<Edition, ClientError> {
        Self::send_json(self.get(
            &format!("/datasets/{dataset_id}/editions/{edition}"),
            headers,
        ))
        .await
    }

    async fn get_version(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        version: &str,
    ) -> Result<Version, ClientError> {
        Self::send_json(self.get(
            &format!("/datasets/{dataset_id}/editions/{edition}/versions/{version}"),
            headers,
        ))
        .await
    }

    async fn get_version_with_etag(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        version: &str,
    ) -> Result<(Version, String), ClientError> {
        let response = Self::send(self.get(
            &format!("/datasets/{dataset_id}/editions/{edition}/versions/{version}"),
            headers,
        ))
        .await?;

        let etag = response
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = response.json().await.map_err(|source| ClientError::Transport {
            service: SERVICE,
            source,
        })?;
        Ok((body, etag))
    }

    async fn list_versions(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        batch_size: usize,
        max_workers: usize,
    ) -> Result<Vec<Version>, ClientError> {
        self.list_in_batches(
            headers,
            &format!("/datasets/{dataset_id}/editions/{edition}/versions"),
            batch_size,
            max_workers,
        )
        .await
    }

    async fn put_dataset(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        dataset: &Dataset,
    ) -> Result<(), ClientError> {
        Self::send(self.put(&format!("/datasets/{dataset_id}"), headers).json(dataset)).await?;
        Ok(())
    }

    async fn put_version(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        version: &str,
        body: &Version,
    ) -> Result<Version, ClientError> {
        Self::send_json(
            self.put(
                &format!("/datasets/{dataset_id}/editions/{edition}/versions/{version}"),
                headers,
            )
            .json(body),
        )
        .await
    }

    async fn put_instance(
        &self,
        headers: &RequestHeaders,
        instance_id: &str,
        instance: &InstanceUpdate,
        if_match: &str,
    ) -> Result<String, ClientError> {
        let response = Self::send(
            self.put(&format!("/instances/{instance_id}"), headers)
                .header(reqwest::header::IF_MATCH, if_match)
                .json(instance),
        )
        .await?;

        Ok(response
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string())
    }

    async fn put_metadata(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        version: &str,
        metadata: &EditableMetadata,
        version_etag: &str,
    ) -> Result<(), ClientError> {
        Self::send(
            self.put(
                &format!("/datasets/{dataset_id}/editions/{edition}/versions/{version}/metadata"),
                headers,
            )
            .header(reqwest::header::IF_MATCH, version_etag)
            .json(metadata),
        )
        .await?;
        Ok(())
    }
}
