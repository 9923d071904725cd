//! Types for the item catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Availability of an item on the remote site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Not yet determined.
    Unknown,
    /// The detail page exists and was parsed.
    Available,
    /// The site reports the item as gone.
    Deleted,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Unknown => "unknown",
            Availability::Available => "available",
            Availability::Deleted => "deleted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unknown" => Some(Availability::Unknown),
            "available" => Some(Availability::Available),
            "deleted" => Some(Availability::Deleted),
            _ => None,
        }
    }
}

/// Download intent of an item.
///
/// Flows forward only: nothing resets `Downloaded` to an earlier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadStatus {
    /// No decision made yet.
    Unset,
    /// Selected for retrieval by the ingestion loop.
    Queued,
    /// Payload retrieved, or marked as obtained out-of-band.
    Downloaded,
    /// Operator declined the item.
    Skip,
}

impl DownloadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadStatus::Unset => "unset",
            DownloadStatus::Queued => "queued",
            DownloadStatus::Downloaded => "downloaded",
            DownloadStatus::Skip => "skip",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unset" => Some(DownloadStatus::Unset),
            "queued" => Some(DownloadStatus::Queued),
            "downloaded" => Some(DownloadStatus::Downloaded),
            "skip" => Some(DownloadStatus::Skip),
            _ => None,
        }
    }
}

/// Triage decision recorded against a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryTriage {
    /// Not yet triaged.
    Unset,
    /// Queue every eligible item in the category.
    DownloadAll,
    /// Skip every pending item in the category.
    Ignore,
    /// Decide item by item.
    AskEach,
}

impl CategoryTriage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryTriage::Unset => "unset",
            CategoryTriage::DownloadAll => "download_all",
            CategoryTriage::Ignore => "ignore",
            CategoryTriage::AskEach => "ask_each",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unset" => Some(CategoryTriage::Unset),
            "download_all" => Some(CategoryTriage::DownloadAll),
            "ignore" => Some(CategoryTriage::Ignore),
            "ask_each" => Some(CategoryTriage::AskEach),
            _ => None,
        }
    }
}

/// A category as seen on the remote site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier, assigned on first sight.
    pub id: i64,
    /// Display name (lookup is case-insensitive).
    pub name: String,
    pub triage: CategoryTriage,
    /// When the category was first seen.
    pub created_at: DateTime<Utc>,
}

/// A catalog item keyed by the remote site's numeric identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Externally assigned identifier, never generated locally.
    pub id: u32,
    pub availability: Availability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Size in kibibytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_kib: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seeders: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leechers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked_at: Option<DateTime<Utc>>,
    pub download: DownloadStatus,
}

/// Fields for a newly discovered available item.
///
/// Title, size, category and peer counts are write-once at creation;
/// there is no refresh path.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub id: u32,
    pub title: String,
    pub size_kib: f64,
    pub category_id: i64,
    pub seeders: u32,
    pub leechers: u32,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    /// The store's lock could not be acquired within the busy timeout.
    /// Callers treat this as "no data" rather than a failure; the other
    /// process may simply be mid-write.
    #[error("Store busy")]
    Busy,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Schema version {found} is not supported (expected {supported}); run the migration step")]
    SchemaVersion { found: i64, supported: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips() {
        for status in [
            DownloadStatus::Unset,
            DownloadStatus::Queued,
            DownloadStatus::Downloaded,
            DownloadStatus::Skip,
        ] {
            assert_eq!(DownloadStatus::parse(status.as_str()), Some(status));
        }
        for triage in [
            CategoryTriage::Unset,
            CategoryTriage::DownloadAll,
            CategoryTriage::Ignore,
            CategoryTriage::AskEach,
        ] {
            assert_eq!(CategoryTriage::parse(triage.as_str()), Some(triage));
        }
        for availability in [
            Availability::Unknown,
            Availability::Available,
            Availability::Deleted,
        ] {
            assert_eq!(Availability::parse(availability.as_str()), Some(availability));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_labels() {
        assert_eq!(DownloadStatus::parse("paused"), None);
        assert_eq!(CategoryTriage::parse(""), None);
        assert_eq!(Availability::parse("gone"), None);
    }

    #[test]
    fn test_item_serialization_skips_absent_fields() {
        let item = Item {
            id: 42,
            availability: Availability::Deleted,
            title: None,
            size_kib: None,
            category_id: None,
            seeders: None,
            leechers: None,
            last_checked_at: None,
            download: DownloadStatus::Unset,
        };

        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("title"));
        assert!(!json.contains("seeders"));
        assert!(json.contains("\"deleted\""));
    }
}
