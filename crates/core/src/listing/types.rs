//! Types for listing page extraction.

use serde::{Deserialize, Serialize};

/// Outcome of parsing one item detail page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// The detail marker was present and all fields were extracted.
    Found(ListedItem),
    /// The site reports the identifier as gone.
    NotFound,
    /// Neither marker matched, or the field layout diverged. Surfaced to
    /// the operator as a warning; never a store mutation.
    Unrecognized,
}

/// One item as listed on its detail page, size already normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedItem {
    pub title: String,
    /// Size in kibibytes.
    pub size_kib: f64,
    /// Category label as displayed; resolution to an identifier happens
    /// in the catalog.
    pub category: String,
    pub seeders: u32,
    pub leechers: u32,
}
