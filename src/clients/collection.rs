//! Reqwest-backed collection (workflow) store client.

use async_trait::async_trait;
use serde::Serialize;

use super::{ClientError, CollectionApi, ACCESS_TOKEN_HEADER};
use crate::models::Collection;

const SERVICE: &str = "collection API";

#[derive(Serialize)]
struct StateChange<'a> {
    state: &'a str,
}

#[derive(Clone)]
pub struct CollectionClient {
    http: reqwest::Client,
    base_url: String,
}

impl CollectionClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str, lang: &str) -> String {
        if lang.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?lang={}", self.base_url, path, lang)
        }
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
}

#[async_trait]
impl CollectionApi for CollectionClient {
    async fn get_collection(
        &self,
        access_token: &str,
        collection_id: &str,
    ) -> Result<Collection, ClientError> {
        let response = Self::send(
            self.http
                .get(format!("{}/collections/{}", self.base_url, collection_id))
                .header(ACCESS_TOKEN_HEADER, access_token),
        )
        .await?;

        response.json().await.map_err(|source| ClientError::Transport {
            service: SERVICE,
            source,
        })
    }

    async fn set_dataset_state(
        &self,
        access_token: &str,
        collection_id: &str,
        lang: &str,
        dataset_id: &str,
        state: &str,
    ) -> Result<(), ClientError> {
        let path = format!("/collections/{collection_id}/datasets/{dataset_id}");
        Self::send(
            self.http
                .put(self.url(&path, lang))
                .header(ACCESS_TOKEN_HEADER, access_token)
                .json(&StateChange { state }),
        )
        .await?;
        Ok(())
    }

    async fn set_dataset_version_state(
        &self,
        access_token: &str,
        collection_id: &str,
        lang: &str,
        dataset_id: &str,
        edition: &str,
        version: &str,
        state: &str,
    ) -> Result<(), ClientError> {
        let path = format!(
            "/collections/{collection_id}/datasets/{dataset_id}/editions/{edition}/versions/{version}"
        );
        Self::send(
            self.http
                .put(self.url(&path, lang))
                .header(ACCESS_TOKEN_HEADER, access_token)
                .json(&StateChange { state }),
        )
        .await?;
        Ok(())
    }
}
