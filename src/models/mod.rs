//! Data models exchanged with the upstream services and the publishing UI.

pub mod collection;
pub mod registry;
pub mod views;

pub use collection::{Collection, CollectionItem, TopicsResult};
pub use registry::{
    Alert, ContactDetails, Dataset, DatasetLinks, DatasetUpdate, Dimension, EditableMetadata,
    Edition, GeneralDetails, InstanceUpdate, LatestChange, LinkObject, UsageNote, Version,
};
pub use views::{
    DatasetRow, EditMetadata, EditionRow, EditionsPage, MetadataPayload, TopicRow, VersionRow,
    VersionsPage,
};
