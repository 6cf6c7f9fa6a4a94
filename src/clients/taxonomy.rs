//! Reqwest-backed topics taxonomy client.

use async_trait::async_trait;

use super::{ClientError, TaxonomyApi, ACCESS_TOKEN_HEADER};
use crate::models::TopicsResult;

const SERVICE: &str = "topics API";

#[derive(Clone)]
pub struct TaxonomyClient {
    http: reqwest::Client,
    base_url: String,
}

impl TaxonomyClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TaxonomyApi for TaxonomyClient {
    async fn get_topics(&self, access_token: &str) -> Result<TopicsResult, ClientError> {
        let response = self
            .http
            .get(format!("{}/topics", self.base_url))
            .header(ACCESS_TOKEN_HEADER, access_token)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
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

        response.json().await.map_err(|source| ClientError::Transport {
            service: SERVICE,
            source,
        })
    }
}
