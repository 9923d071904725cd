//! Types for the classification workflow.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{CatalogError, Category, Item};

/// Operator decision for one untriaged category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryDecision {
    /// Decide the category's items one by one.
    AskEach,
    /// Queue every pending eligible item in the category.
    DownloadAll,
    /// Skip every pending item in the category.
    Ignore,
}

/// Operator decision for one undecided item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemDecision {
    /// Queue the item for retrieval by the ingestion loop.
    QueueDownload,
    /// Decline the item.
    Skip,
    /// Decide later; only pushes the item to the back of the queue.
    Defer,
    /// Record the item as already obtained out-of-band.
    MarkDownloaded,
}

/// Interface the presentation layer implements to surface decisions.
///
/// `None` means the operator exited the loop.
#[async_trait]
pub trait DecisionPrompter: Send + Sync {
    async fn decide_category(&self, category: &Category) -> Option<CategoryDecision>;

    async fn decide_item(&self, item: &Item) -> Option<ItemDecision>;
}

/// What one workflow invocation did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TriageSummary {
    pub categories_triaged: usize,
    /// Items queued, by decision or by the `DownloadAll` cascade.
    pub items_queued: usize,
    /// Items skipped, by decision or by the `Ignore` cascade.
    pub items_skipped: usize,
    pub items_deferred: usize,
    pub items_marked_downloaded: usize,
    /// The operator left before the queues drained. An exit during
    /// category triage also skips item triage for the invocation.
    pub exited_early: bool,
}

/// Errors for the classification workflow.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
