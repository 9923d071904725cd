//! Classification workflow implementation.

use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::{CatalogError, CatalogStore, CategoryTriage, DownloadStatus};

use super::types::{
    CategoryDecision, ClassifyError, DecisionPrompter, ItemDecision, TriageSummary,
};

/// Walks untriaged categories and undecided items, applying operator
/// choices as catalog mutations.
pub struct ClassificationWorkflow {
    store: Arc<dyn CatalogStore>,
}

impl ClassificationWorkflow {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Run category triage, then item triage.
    ///
    /// An operator exit during category triage short-circuits item triage
    /// for this invocation: items are only processed once categories are
    /// fully dealt with.
    pub async fn run(&self, prompter: &dyn DecisionPrompter) -> Result<TriageSummary, ClassifyError> {
        let mut summary = TriageSummary::default();

        loop {
            let category = match self.store.oldest_unset_category() {
                Ok(Some(category)) => category,
                Ok(None) => break,
                // The other process is mid-write; present nothing rather
                // than fail the session.
                Err(CatalogError::Busy) => {
                    debug!("store busy, ending category triage");
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            let Some(decision) = prompter.decide_category(&category).await else {
                summary.exited_early = true;
                info!(
                    categories = summary.categories_triaged,
                    "operator left category triage early"
                );
                return Ok(summary);
            };

            self.apply_category_decision(category.id, decision, &mut summary)?;
            summary.categories_triaged += 1;
        }

        loop {
            let item = match self.store.next_undecided_item() {
                Ok(Some(item)) => item,
                Ok(None) => break,
                Err(CatalogError::Busy) => {
                    debug!("store busy, ending item triage");
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            let Some(decision) = prompter.decide_item(&item).await else {
                summary.exited_early = true;
                return Ok(summary);
            };

            self.apply_item_decision(item.id, decision, &mut summary)?;
        }

        Ok(summary)
    }

    fn apply_category_decision(
        &self,
        category_id: i64,
        decision: CategoryDecision,
        summary: &mut TriageSummary,
    ) -> Result<(), ClassifyError> {
        match decision {
            CategoryDecision::AskEach => {
                self.store
                    .set_category_triage(category_id, CategoryTriage::AskEach)?;
            }
            CategoryDecision::DownloadAll => {
                self.store
                    .set_category_triage(category_id, CategoryTriage::DownloadAll)?;
                let queued = self.store.queue_category_downloads(category_id)?;
                summary.items_queued += queued;
                info!(category_id, queued, "queued category for download");
            }
            CategoryDecision::Ignore => {
                self.store
                    .set_category_triage(category_id, CategoryTriage::Ignore)?;
                let skipped = self.store.skip_category_downloads(category_id)?;
                summary.items_skipped += skipped;
                info!(category_id, skipped, "ignored category");
            }
        }
        Ok(())
    }

    fn apply_item_decision(
        &self,
        item_id: u32,
        decision: ItemDecision,
        summary: &mut TriageSummary,
    ) -> Result<(), ClassifyError> {
        match decision {
            ItemDecision::QueueDownload => {
                self.store
                    .set_download_status(item_id, DownloadStatus::Queued)?;
                summary.items_queued += 1;
            }
            ItemDecision::Skip => {
                self.store
                    .set_download_status(item_id, DownloadStatus::Skip)?;
                summary.items_skipped += 1;
            }
            ItemDecision::Defer => {
                // Download status untouched; the item just moves to the
                // back of the queue.
                self.store.touch_item(item_id)?;
                summary.items_deferred += 1;
            }
            ItemDecision::MarkDownloaded => {
                self.store
                    .set_download_status(item_id, DownloadStatus::Downloaded)?;
                summary.items_marked_downloaded += 1;
            }
        }
        Ok(())
    }
}
