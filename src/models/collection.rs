//! Collection (workflow) store and topics taxonomy models.
//!
//! A collection tracks editorial workflow state per dataset; its lifecycle
//! is driven by the publishing workflow, not by the dataset registry, and
//! its identities are independent of registry identities.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collection {
    pub id: String,
    pub datasets: Vec<CollectionItem>,
    pub dataset_versions: Vec<CollectionItem>,
}

/// Per-dataset workflow entry inside a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionItem {
    pub id: String,
    pub state: String,
    pub last_edited_by: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicsResult {
    pub topics: TopicResults,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicResults {
    pub results: Vec<TopicResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicResult {
    pub description: TopicDescription,
    pub uri: String,
    #[serde(rename = "type")]
    pub result_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicDescription {
    pub title: String,
}
