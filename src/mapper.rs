//! Pure merge, sort and format functions behind the aggregators.
//!
//! Everything in here is deterministic and side-effect free so the merge
//! rules can be pinned down by unit tests without any upstream in play.

use std::collections::HashMap;

use chrono::DateTime;
use thiserror::Error;
use url::Url;

use crate::models::{
    Collection, Dataset, DatasetRow, DatasetUpdate, Dimension, EditMetadata, EditableMetadata,
    Edition, EditionRow, EditionsPage, TopicRow, TopicsResult, Version, VersionRow, VersionsPage,
};

/// Pre-publication state in which a version may inherit dimensions from
/// the last published version.
pub const EDITION_CONFIRMED_STATE: &str = "edition-confirmed";
const PUBLISHED_STATE: &str = "published";

/// Display format for release dates, e.g. `07 November 2020`.
const DISPLAY_DATE_FORMAT: &str = "%d %B %Y";

/// Catalogue rows for every dataset that has a draft projection, sorted
/// case-insensitively. A row's sort key is its title, except that an
/// empty-titled dataset sorts by its id instead; ties break on id.
pub fn all_datasets(items: Vec<DatasetUpdate>) -> Vec<DatasetRow> {
    let mut rows: Vec<DatasetRow> = items
        .into_iter()
        .filter_map(|item| {
            item.next.map(|next| DatasetRow {
                id: item.id,
                title: next.title,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        let key = |row: &DatasetRow| {
            if row.title.is_empty() {
                row.id.to_lowercase()
            } else {
                row.title.to_lowercase()
            }
        };
        key(a).cmp(&key(b)).then_with(|| {
            a.id.to_lowercase().cmp(&b.id.to_lowercase())
        })
    });
    rows
}

/// Edition list page, in upstream order. `latest_versions` maps an edition
/// label to the raw release date of its latest version ("" when the
/// resolution failed); dates that parse are reformatted for display,
/// anything else stays empty.
pub fn all_editions(
    dataset: &DatasetUpdate,
    editions: Vec<Edition>,
    latest_versions: &HashMap<String, String>,
) -> EditionsPage {
    let editions = editions
        .into_iter()
        .map(|edition| {
            let release_date = latest_versions
                .get(&edition.edition)
                .and_then(|raw| format_release_date(raw))
                .unwrap_or_default();
            EditionRow {
                id: edition.edition.clone(),
                title: edition.edition,
                release_date,
            }
        })
        .collect();

    EditionsPage {
        dataset_name: draft_title(dataset),
        editions,
    }
}

/// Version list page, newest version first. Published versions are marked
/// in their display title; a release date that fails to parse is passed
/// through as received.
pub fn all_versions(
    dataset: &DatasetUpdate,
    edition: &Edition,
    mut versions: Vec<Version>,
) -> VersionsPage {
    versions.sort_by(|a, b| b.version.cmp(&a.version));

    let versions = versions
        .into_iter()
        .map(|v| {
            let title = if v.state == PUBLISHED_STATE {
                format!("Version: {} (published)", v.version)
            } else {
                format!("Version: {}", v.version)
            };
            let release_date =
                format_release_date(&v.release_date).unwrap_or_else(|| v.release_date.clone());
            VersionRow {
                id: v.id,
                title,
                version: v.version,
                release_date,
                state: v.state,
            }
        })
        .collect();

    VersionsPage {
        dataset_name: draft_title(dataset),
        edition_name: edition.edition.clone(),
        versions,
    }
}

/// Assemble the edit view from the draft dataset, the target version, any
/// pre-populated dimensions and the collection the dataset sits in. The
/// workflow fields come from the collection entry matching the dataset id.
pub fn edit_metadata(
    dataset: Dataset,
    version: Version,
    dimensions: Vec<Dimension>,
    collection: &Collection,
) -> EditMetadata {
    let item = collection
        .datasets
        .iter()
        .find(|item| item.id == dataset.id);

    EditMetadata {
        collection_id: collection.id.clone(),
        dataset,
        version,
        dimensions,
        ..Default::default()
    }
    .with_collection_item(item)
}

/// Decompose the edit view into the registry's editable-metadata patch:
/// the editable dataset fields plus the editable version fields.
pub fn editable_metadata(meta: &EditMetadata) -> EditableMetadata {
    EditableMetadata {
        canonical_topic: meta.dataset.canonical_topic.clone(),
        contacts: meta.dataset.contacts.clone(),
        description: meta.dataset.description.clone(),
        keywords: meta.dataset.keywords.clone(),
        license: meta.dataset.license.clone(),
        methodologies: meta.dataset.methodologies.clone(),
        national_statistic: meta.dataset.national_statistic,
        next_release: meta.dataset.next_release.clone(),
        publications: meta.dataset.publications.clone(),
        qmi: meta.dataset.qmi.clone(),
        related_content: meta.dataset.related_content.clone(),
        related_datasets: meta.dataset.related_datasets.clone(),
        release_frequency: meta.dataset.release_frequency.clone(),
        subtopics: meta.dataset.subtopics.clone(),
        survey: meta.dataset.survey.clone(),
        title: meta.dataset.title.clone(),
        unit_of_measure: meta.dataset.unit_of_measure.clone(),
        alerts: meta.version.alerts.clone(),
        dimensions: meta.version.dimensions.clone(),
        latest_changes: meta.version.latest_changes.clone(),
        release_date: meta.version.release_date.clone(),
        usage_notes: meta.version.usage_notes.clone(),
    }
}

/// Topic titles for the dataset-creation screen.
pub fn topics(result: TopicsResult) -> Vec<TopicRow> {
    result
        .topics
        .results
        .into_iter()
        .map(|topic| TopicRow {
            title: topic.description.title,
        })
        .collect()
}

/// Reformat an RFC3339 timestamp as a long human date; `None` when the
/// input does not parse (including the empty string).
pub fn format_release_date(raw: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(raw).ok()?;
    Some(parsed.format(DISPLAY_DATE_FORMAT).to_string())
}

#[derive(Error, Debug, PartialEq)]
pub enum VersionLinkError {
    #[error("failed to parse version link: {0}")]
    Malformed(String),

    #[error("not enough segments in version link path")]
    TooShort,
}

/// Recover the (dataset, edition, version) triple a "latest version" link
/// points at.
///
/// The path must have at least 8 `/`-separated segments with the ids at
/// fixed offsets 3/5/7 (`/v1/datasets/{id}/editions/{ed}/versions/{v}`).
/// The heuristic is brittle by construction and callers treat any failure
/// as "no release date", never as a request failure.
pub fn ids_from_version_link(raw: &str) -> Result<(String, String, String), VersionLinkError> {
    let path = match Url::parse(raw) {
        Ok(url) => url.path().to_string(),
        // Bare paths are valid links too.
        Err(url::ParseError::RelativeUrlWithoutBase) => raw.to_string(),
        Err(e) => return Err(VersionLinkError::Malformed(e.to_string())),
    };

    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() < 8 {
        return Err(VersionLinkError::TooShort);
    }
    Ok((
        segments[3].to_string(),
        segments[5].to_string(),
        segments[7].to_string(),
    ))
}

fn draft_title(dataset: &DatasetUpdate) -> String {
    dataset
        .next
        .as_ref()
        .map(|next| next.title.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alert, CollectionItem, ContactDetails, LatestChange, UsageNote};
    use crate::models::collection::{TopicDescription, TopicResult, TopicResults};

    fn update(id: &str, title: Option<&str>) -> DatasetUpdate {
        DatasetUpdate {
            id: id.to_string(),
            current: None,
            next: title.map(|t| Dataset {
                title: t.to_string(),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn all_datasets_excludes_items_without_a_draft() {
        let rows = all_datasets(vec![
            update("test-id-1", Some("test title 1")),
            update("test-id-2", Some("test title 2")),
            update("test-id-3", None),
        ]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "test-id-1");
        assert_eq!(rows[0].title, "test title 1");
        assert_eq!(rows[1].id, "test-id-2");
        assert_eq!(rows[1].title, "test title 2");
    }

    #[test]
    fn all_datasets_orders_alphabetically_by_title() {
        let rows = all_datasets(vec![
            update("test-id-3", Some("3rd Title")),
            update("test-id-1", Some("1st Title")),
            update("test-id-2", Some("2nd Title")),
        ]);

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["test-id-1", "test-id-2", "test-id-3"]);
    }

    #[test]
    fn all_datasets_sorts_empty_titles_by_id() {
        let rows = all_datasets(vec![
            update("test-id-4", Some("DFG")),
            update("test-id-1", Some("")),
            update("test-id-2", Some("")),
            update("test-id-3", Some("ABC")),
        ]);

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["test-id-3", "test-id-4", "test-id-1", "test-id-2"]);
    }

    #[test]
    fn all_datasets_ignores_casing_in_title_and_id() {
        let rows = all_datasets(vec![
            update("test-id-4", Some("dfg")),
            update("Test-id-1", Some("")),
            update("test-id-2", Some("ABC")),
            update("test-id-3", Some("123")),
        ]);

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["test-id-3", "test-id-2", "test-id-4", "Test-id-1"]);
    }

    #[test]
    fn all_editions_formats_resolved_dates_and_leaves_failures_empty() {
        let dataset = update("ds-1", Some("Test title"));
        let editions = vec![
            Edition {
                edition: "edition-1".to_string(),
                ..Default::default()
            },
            Edition {
                edition: "edition-2".to_string(),
                ..Default::default()
            },
        ];
        let latest_versions = HashMap::from([
            ("edition-1".to_string(), "2020-11-07T00:00:00.000Z".to_string()),
            ("edition-2".to_string(), String::new()),
        ]);

        let page = all_editions(&dataset, editions, &latest_versions);

        assert_eq!(page.dataset_name, "Test title");
        assert_eq!(
            page.editions,
            vec![
                EditionRow {
                    id: "edition-1".to_string(),
                    title: "edition-1".to_string(),
                    release_date: "07 November 2020".to_string(),
                },
                EditionRow {
                    id: "edition-2".to_string(),
                    title: "edition-2".to_string(),
                    release_date: String::new(),
                },
            ]
        );
    }

    #[test]
    fn all_versions_sorts_newest_first_and_marks_published() {
        let dataset = update("ds-1", Some("Test title"));
        let edition = Edition {
            edition: "edition-1".to_string(),
            ..Default::default()
        };
        let versions = vec![
            Version {
                id: "test-id-3".to_string(),
                version: 3,
                state: "edition-confirmed".to_string(),
                ..Default::default()
            },
            Version {
                id: "test-id-1".to_string(),
                version: 1,
                release_date: "2020-11-07T00:00:00.000Z".to_string(),
                state: "published".to_string(),
                ..Default::default()
            },
            Version {
                id: "test-id-2".to_string(),
                version: 2,
                release_date: "2020-11-20T00:00:00.000Z".to_string(),
                state: "published".to_string(),
                ..Default::default()
            },
        ];

        let page = all_versions(&dataset, &edition, versions);

        assert_eq!(page.dataset_name, "Test title");
        assert_eq!(page.edition_name, "edition-1");
        assert_eq!(
            page.versions,
            vec![
                VersionRow {
                    id: "test-id-3".to_string(),
                    title: "Version: 3".to_string(),
                    version: 3,
                    release_date: String::new(),
                    state: "edition-confirmed".to_string(),
                },
                VersionRow {
                    id: "test-id-2".to_string(),
                    title: "Version: 2 (published)".to_string(),
                    version: 2,
                    release_date: "20 November 2020".to_string(),
                    state: "published".to_string(),
                },
                VersionRow {
                    id: "test-id-1".to_string(),
                    title: "Version: 1 (published)".to_string(),
                    version: 1,
                    release_date: "07 November 2020".to_string(),
                    state: "published".to_string(),
                },
            ]
        );
    }

    #[test]
    fn all_versions_passes_unparsable_release_dates_through() {
        let dataset = update("ds-1", Some("t"));
        let edition = Edition::default();
        let versions = vec![Version {
            id: "v".to_string(),
            version: 1,
            release_date: "not-a-date".to_string(),
            ..Default::default()
        }];

        let page = all_versions(&dataset, &edition, versions);
        assert_eq!(page.versions[0].release_date, "not-a-date");
    }

    fn full_dataset() -> Dataset {
        Dataset {
            id: "foo".to_string(),
            collection_id: "Bar".to_string(),
            contacts: vec![ContactDetails {
                name: "foo".to_string(),
                telephone: "Bar".to_string(),
                email: "bAz".to_string(),
            }],
            description: "bAz".to_string(),
            keywords: vec!["foo".to_string(), "Bar".to_string()],
            license: "qux".to_string(),
            national_statistic: Some(false),
            next_release: "quux".to_string(),
            release_frequency: "grault".to_string(),
            title: "fred".to_string(),
            unit_of_measure: "plugh".to_string(),
            canonical_topic: "1234".to_string(),
            subtopics: vec!["5678".to_string(), "9012".to_string()],
            survey: "census".to_string(),
            ..Default::default()
        }
    }

    fn full_version() -> Version {
        Version {
            id: "bAz".to_string(),
            edition: "Bar".to_string(),
            version: 1,
            release_date: "grault".to_string(),
            state: "grault".to_string(),
            dimensions: vec![Dimension {
                label: "bAz".to_string(),
                ..Default::default()
            }],
            alerts: Some(vec![Alert {
                date: "2020-02-04T11:05:06.000Z".to_string(),
                description: "Bar".to_string(),
                alert_type: "bAz".to_string(),
            }]),
            latest_changes: Some(vec![LatestChange {
                description: "foo".to_string(),
                name: "Bar".to_string(),
                change_type: "bAz".to_string(),
            }]),
            usage_notes: Some(vec![UsageNote {
                title: "foo".to_string(),
                note: "Bar".to_string(),
            }]),
            ..Default::default()
        }
    }

    #[test]
    fn edit_metadata_picks_the_matching_collection_entry() {
        let dataset = full_dataset();
        let version = full_version();
        let dimensions = version.dimensions.clone();

        let collection = Collection {
            id: "test-collection".to_string(),
            datasets: vec![
                CollectionItem {
                    id: "other dataset id".to_string(),
                    state: "reviewed".to_string(),
                    last_edited_by: "Other user".to_string(),
                },
                CollectionItem {
                    id: "foo".to_string(),
                    state: "inProgress".to_string(),
                    last_edited_by: "User".to_string(),
                },
            ],
            ..Default::default()
        };

        let view = edit_metadata(dataset.clone(), version.clone(), dimensions.clone(), &collection);

        assert_eq!(view.dataset, dataset);
        assert_eq!(view.version, version);
        assert_eq!(view.dimensions, dimensions);
        assert_eq!(view.collection_id, "test-collection");
        assert_eq!(view.collection_state, "inProgress");
        assert_eq!(view.collection_last_edited_by, "User");
        assert_eq!(view.version_etag, "");
    }

    #[test]
    fn edit_metadata_with_no_matching_entry_leaves_workflow_fields_empty() {
        let view = edit_metadata(
            full_dataset(),
            full_version(),
            vec![],
            &Collection::default(),
        );
        assert_eq!(view.collection_state, "");
        assert_eq!(view.collection_last_edited_by, "");
    }

    #[test]
    fn editable_metadata_from_an_empty_view_is_empty() {
        let patch = editable_metadata(&EditMetadata::default());

        assert!(patch.description.is_empty());
        assert!(patch.keywords.is_empty());
        assert!(patch.title.is_empty());
        assert!(patch.unit_of_measure.is_empty());
        assert!(patch.contacts.is_empty());
        assert!(patch.qmi.is_none());
        assert!(patch.related_content.is_empty());
        assert!(patch.canonical_topic.is_empty());
        assert!(patch.subtopics.is_empty());
        assert!(patch.national_statistic.is_none());
        assert!(patch.dimensions.is_empty());
        assert!(patch.release_date.is_empty());
        assert!(patch.alerts.is_none());
        assert!(patch.latest_changes.is_none());
        assert!(patch.usage_notes.is_none());
    }

    #[test]
    fn editable_metadata_copies_the_editable_subset() {
        let view = EditMetadata {
            dataset: full_dataset(),
            version: full_version(),
            ..Default::default()
        };

        let patch = editable_metadata(&view);

        assert_eq!(patch.description, view.dataset.description);
        assert_eq!(patch.keywords, view.dataset.keywords);
        assert_eq!(patch.title, view.dataset.title);
        assert_eq!(patch.unit_of_measure, view.dataset.unit_of_measure);
        assert_eq!(patch.contacts, view.dataset.contacts);
        assert_eq!(patch.canonical_topic, view.dataset.canonical_topic);
        assert_eq!(patch.subtopics, view.dataset.subtopics);
        assert_eq!(patch.license, view.dataset.license);
        assert_eq!(patch.national_statistic, view.dataset.national_statistic);
        assert_eq!(patch.next_release, view.dataset.next_release);
        assert_eq!(patch.release_frequency, view.dataset.release_frequency);
        assert_eq!(patch.survey, view.dataset.survey);
        assert_eq!(patch.dimensions, view.version.dimensions);
        assert_eq!(patch.release_date, view.version.release_date);
        assert_eq!(patch.alerts, view.version.alerts);
        assert_eq!(patch.latest_changes, view.version.latest_changes);
        assert_eq!(patch.usage_notes, view.version.usage_notes);
    }

    #[test]
    fn topics_maps_titles_and_tolerates_empty_results() {
        let result = TopicsResult {
            topics: TopicResults {
                results: vec![
                    TopicResult {
                        description: TopicDescription {
                            title: "test 1".to_string(),
                        },
                        uri: "/test/uri/1".to_string(),
                        result_type: "page".to_string(),
                    },
                    TopicResult {
                        description: TopicDescription {
                            title: "test 2".to_string(),
                        },
                        uri: "/test/uri/2".to_string(),
                        result_type: "page".to_string(),
                    },
                ],
            },
        };

        let rows = topics(result);
        assert_eq!(
            rows,
            vec![
                TopicRow {
                    title: "test 1".to_string()
                },
                TopicRow {
                    title: "test 2".to_string()
                },
            ]
        );

        assert!(topics(TopicsResult::default()).is_empty());
    }

    #[test]
    fn format_release_date_handles_fractional_seconds() {
        assert_eq!(
            format_release_date("2020-11-07T00:00:00.000Z").as_deref(),
            Some("07 November 2020")
        );
        assert_eq!(format_release_date(""), None);
        assert_eq!(format_release_date("yesterday"), None);
    }

    #[test]
    fn ids_from_version_link_reads_fixed_offsets() {
        let (dataset, edition, version) = ids_from_version_link(
            "http://localhost:22000/v1/datasets/my-dataset/editions/time-series/versions/4",
        )
        .unwrap();
        assert_eq!(dataset, "my-dataset");
        assert_eq!(edition, "time-series");
        assert_eq!(version, "4");
    }

    #[test]
    fn ids_from_version_link_accepts_bare_paths() {
        let (dataset, edition, version) =
            ids_from_version_link("/v1/datasets/d/editions/e/versions/1").unwrap();
        assert_eq!(dataset, "d");
        assert_eq!(edition, "e");
        assert_eq!(version, "1");
    }

    #[test]
    fn ids_from_version_link_rejects_short_paths() {
        assert_eq!(
            ids_from_version_link("http://localhost:22000/datasets/only"),
            Err(VersionLinkError::TooShort)
        );
        assert_eq!(ids_from_version_link(""), Err(VersionLinkError::TooShort));
    }
}
