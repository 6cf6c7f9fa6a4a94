//! Dataset registry models.
//!
//! A dataset exists upstream in two projections at once: `current` is the
//! last published document, `next` is the draft being edited. The registry
//! returns both from its current-and-next endpoint; everything mutable in
//! this controller operates on `next`.

use serde::{Deserialize, Serialize};

/// The current/next pair for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetUpdate {
    pub id: String,
    pub current: Option<Dataset>,
    pub next: Option<Dataset>,
}

/// One projection of a dataset's descriptive metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub id: String,
    pub collection_id: String,
    pub contacts: Vec<ContactDetails>,
    pub description: String,
    pub keywords: Vec<String>,
    pub license: String,
    pub links: Option<DatasetLinks>,
    pub methodologies: Vec<GeneralDetails>,
    pub national_statistic: Option<bool>,
    pub next_release: String,
    pub publications: Vec<GeneralDetails>,
    pub qmi: Option<GeneralDetails>,
    pub related_datasets: Vec<GeneralDetails>,
    pub related_content: Vec<GeneralDetails>,
    pub release_frequency: String,
    pub state: String,
    pub survey: String,
    pub title: String,
    pub unit_of_measure: String,
    pub canonical_topic: String,
    pub subtopics: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetLinks {
    pub editions: Option<LinkObject>,
    pub latest_version: Option<LinkObject>,
    #[serde(rename = "self")]
    pub self_link: Option<LinkObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkObject {
    pub href: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactDetails {
    pub email: String,
    pub name: String,
    pub telephone: String,
}

/// Title/link/description triple used for methodologies, publications,
/// related content and the QMI link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralDetails {
    pub description: String,
    pub href: String,
    pub title: String,
}

/// A named grouping of versions of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Edition {
    pub id: String,
    pub edition: String,
    pub state: String,
    pub links: Option<EditionLinks>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditionLinks {
    pub latest_version: Option<LinkObject>,
    #[serde(rename = "self")]
    pub self_link: Option<LinkObject>,
}

/// One version of an edition, including its lifecycle state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Version {
    pub id: String,
    pub collection_id: String,
    pub edition: String,
    pub version: i32,
    pub state: String,
    pub release_date: String,
    pub dimensions: Vec<Dimension>,
    pub alerts: Option<Vec<Alert>>,
    pub latest_changes: Option<Vec<LatestChange>>,
    pub usage_notes: Option<Vec<UsageNote>>,
    pub links: Option<VersionLinks>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionLinks {
    pub dataset: Option<LinkObject>,
    pub edition: Option<LinkObject>,
    #[serde(rename = "self")]
    pub self_link: Option<LinkObject>,
    pub version: Option<LinkObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimension {
    pub id: String,
    pub name: String,
    pub label: String,
    pub description: String,
    pub links: Option<DimensionLinks>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionLinks {
    pub code_list: Option<LinkObject>,
    pub options: Option<LinkObject>,
    pub version: Option<LinkObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alert {
    pub date: String,
    pub description: String,
    #[serde(rename = "type")]
    pub alert_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatestChange {
    pub description: String,
    pub name: String,
    #[serde(rename = "type")]
    pub change_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageNote {
    pub note: String,
    pub title: String,
}

/// The editable-field subset written back to the registry as a single
/// conditional metadata patch. Dataset fields and version fields travel
/// together; the registry applies both under one If-Match check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditableMetadata {
    // Dataset fields
    pub canonical_topic: String,
    pub contacts: Vec<ContactDetails>,
    pub description: String,
    pub keywords: Vec<String>,
    pub license: String,
    pub methodologies: Vec<GeneralDetails>,
    pub national_statistic: Option<bool>,
    pub next_release: String,
    pub publications: Vec<GeneralDetails>,
    pub qmi: Option<GeneralDetails>,
    pub related_content: Vec<GeneralDetails>,
    pub related_datasets: Vec<GeneralDetails>,
    pub release_frequency: String,
    pub subtopics: Vec<String>,
    pub survey: String,
    pub title: String,
    pub unit_of_measure: String,
    // Version fields
    pub alerts: Option<Vec<Alert>>,
    pub dimensions: Vec<Dimension>,
    pub latest_changes: Option<Vec<LatestChange>>,
    pub release_date: String,
    pub usage_notes: Option<Vec<UsageNote>>,
}

/// Instance patch forwarded untouched on the full-replace write path.
/// Fields we do not model are carried through `extra` rather than dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceUpdate {
    pub edition: Option<String>,
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
