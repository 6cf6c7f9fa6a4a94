//! View models returned to (and accepted from) the publishing UI.

use serde::{Deserialize, Serialize};

use super::collection::CollectionItem;
use super::registry::{Dataset, Dimension, InstanceUpdate, Version};

/// One row of the dataset catalogue listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditionsPage {
    pub dataset_name: String,
    pub editions: Vec<EditionRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditionRow {
    pub id: String,
    pub title: String,
    pub release_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionsPage {
    pub dataset_name: String,
    pub edition_name: String,
    pub versions: Vec<VersionRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionRow {
    pub id: String,
    pub title: String,
    pub version: i32,
    pub release_date: String,
    pub state: String,
}

/// The edit view exchanged with the metadata editing screens.
///
/// Assembled from the draft dataset, the target version, any pre-populated
/// dimensions and the matching collection entry. It is never persisted as
/// is: on save it is decomposed back into a registry metadata patch and a
/// collection state transition. `version_etag` carries the concurrency
/// token observed at read time and must round-trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditMetadata {
    pub dataset: Dataset,
    pub version: Version,
    pub dimensions: Vec<Dimension>,
    pub collection_id: String,
    pub collection_state: String,
    pub collection_last_edited_by: String,
    pub version_etag: String,
}

impl EditMetadata {
    /// Fill the collection-derived fields from the entry matching the
    /// dataset, if the collection holds one.
    pub fn with_collection_item(mut self, item: Option<&CollectionItem>) -> Self {
        if let Some(item) = item {
            self.collection_state = item.state.clone();
            self.collection_last_edited_by = item.last_edited_by.clone();
        }
        self
    }
}

/// Request body for the full-object replace write path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataPayload {
    pub dataset: Dataset,
    pub version: Version,
    pub instance: InstanceUpdate,
    pub collection_id: String,
    pub collection_state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicRow {
    pub title: String,
}
