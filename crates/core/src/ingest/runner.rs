//! Ingestion loop implementation.
//!
//! Each cycle: discover at most one new item, service at most one queued
//! download, sleep, then check the persisted stop flag. The cursor (the
//! highest identifier in the catalog) only advances when a page parses
//! as `Found` or `NotFound`; transient failures and unrecognized layouts
//! leave it in place so the same identifier is retried.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::catalog::{
    CatalogError, CatalogStore, DownloadStatus, NewItem, SETTING_DOWNLOAD_DIR,
};
use crate::config::IngestConfig;
use crate::listing::{parse_item_page, PageOutcome};
use crate::metrics;
use crate::site::ListingSite;

use super::types::{DiscoveryOutcome, IngestError, IngestState};

/// The background ingestion loop.
///
/// Cheap to clone; clones share state and observe the same store.
#[derive(Clone)]
pub struct IngestLoop {
    store: Arc<dyn CatalogStore>,
    site: Arc<dyn ListingSite>,
    poll_interval: Duration,
    /// Captured once at process start; discovery stops when the catalog
    /// catches up with it.
    latest_remote_id: u32,
    state: Arc<RwLock<IngestState>>,
}

impl IngestLoop {
    pub fn new(
        config: &IngestConfig,
        store: Arc<dyn CatalogStore>,
        site: Arc<dyn ListingSite>,
        latest_remote_id: u32,
    ) -> Self {
        Self {
            store,
            site,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            latest_remote_id,
            state: Arc::new(RwLock::new(IngestState::Stopped)),
        }
    }

    /// Spawn the loop on the runtime. The returned handle completes once
    /// the loop has observed the stop flag and exited; the foreground
    /// awaits it on shutdown.
    pub fn start(&self) -> tokio::task::JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.run().await })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> IngestState {
        *self.state.read().unwrap()
    }

    /// Run until the stop flag is observed.
    pub async fn run(&self) {
        self.set_state(IngestState::Running);
        info!(
            latest_remote_id = self.latest_remote_id,
            "ingestion loop started"
        );

        loop {
            self.run_cycle().await;

            tokio::time::sleep(self.poll_interval).await;

            // Checked once per cycle, after the cycle has completed; there
            // is no mid-step cancellation.
            match self.store.stop_requested() {
                Ok(true) => {
                    self.set_state(IngestState::Stopping);
                    info!("stop requested, exiting ingestion loop");
                    break;
                }
                Ok(false) => {}
                Err(CatalogError::Busy) => {
                    // The flag is re-read next cycle.
                    metrics::STORE_BUSY.inc();
                }
                Err(e) => warn!("failed to read stop flag: {e}"),
            }
        }

        self.set_state(IngestState::Stopped);
        info!("ingestion loop stopped");
    }

    /// One full cycle: discovery, then download queue servicing. Errors
    /// are logged and absorbed; nothing in a cycle is fatal.
    pub async fn run_cycle(&self) {
        metrics::INGEST_CYCLES.inc();

        match self.discover_next().await {
            Ok(DiscoveryOutcome::StoreBusy) => {
                metrics::STORE_BUSY.inc();
                debug!("store busy, discovery skipped this cycle");
            }
            Ok(_) => {}
            Err(IngestError::Catalog(CatalogError::Busy)) => {
                metrics::STORE_BUSY.inc();
                debug!("store busy, discovery commit retried next cycle");
            }
            Err(e) => warn!("discovery failed, will retry next cycle: {e}"),
        }

        match self.service_download_queue().await {
            Ok(_) => {}
            Err(IngestError::Catalog(CatalogError::Busy)) => {
                metrics::STORE_BUSY.inc();
            }
            Err(e) => {
                metrics::PAYLOAD_FETCHES.with_label_values(&["error"]).inc();
                warn!("payload retrieval failed, item left queued: {e}");
            }
        }
    }

    /// Fetch and commit the next unknown identifier, if any.
    pub async fn discover_next(&self) -> Result<DiscoveryOutcome, IngestError> {
        let cursor = match self.store.highest_item_id() {
            Ok(id) => id,
            Err(CatalogError::Busy) => return Ok(DiscoveryOutcome::StoreBusy),
            Err(e) => return Err(e.into()),
        };

        if cursor >= self.latest_remote_id {
            return Ok(DiscoveryOutcome::UpToDate);
        }

        let id = cursor + 1;
        let body = match self.site.item_page(id).await {
            Ok(body) => body,
            Err(e) => {
                metrics::PAGES_FETCHED.with_label_values(&["error"]).inc();
                return Err(e.into());
            }
        };

        match parse_item_page(&body) {
            PageOutcome::Found(listed) => {
                metrics::PAGES_FETCHED.with_label_values(&["found"]).inc();
                let category_id = self.store.resolve_category(&listed.category)?;
                self.store.insert_available(&NewItem {
                    id,
                    title: listed.title,
                    size_kib: listed.size_kib,
                    category_id,
                    seeders: listed.seeders,
                    leechers: listed.leechers,
                })?;
                metrics::ITEMS_DISCOVERED
                    .with_label_values(&["available"])
                    .inc();
                info!(id, "cataloged available item");
                Ok(DiscoveryOutcome::Discovered(id))
            }
            PageOutcome::NotFound => {
                metrics::PAGES_FETCHED
                    .with_label_values(&["not_found"])
                    .inc();
                self.store.insert_deleted(id)?;
                metrics::ITEMS_DISCOVERED
                    .with_label_values(&["deleted"])
                    .inc();
                debug!(id, "cataloged deleted item");
                Ok(DiscoveryOutcome::DiscoveredDeleted(id))
            }
            PageOutcome::Unrecognized => {
                metrics::PAGES_FETCHED
                    .with_label_values(&["unrecognized"])
                    .inc();
                // Retrying self-heals a transient glitch; a true layout
                // change needs a parser update and will keep warning.
                warn!(id, "page layout not recognized, identifier will be retried");
                Ok(DiscoveryOutcome::Unrecognized(id))
            }
        }
    }

    /// Retrieve the payload for the single most due queued item, if any.
    /// On failure the item stays queued and is retried next cycle.
    pub async fn service_download_queue(&self) -> Result<Option<u32>, IngestError> {
        let item = match self.store.next_queued_item() {
            Ok(item) => item,
            Err(CatalogError::Busy) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let Some(item) = item else {
            return Ok(None);
        };

        let Some(dir) = self.store.setting(SETTING_DOWNLOAD_DIR)? else {
            warn!("download directory not configured, leaving queue untouched");
            return Ok(None);
        };
        let dir = PathBuf::from(dir);

        let bytes = self.site.fetch_payload(item.id).await?;

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| IngestError::Io(e.to_string()))?;
        let path = dir.join(item.id.to_string());
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| IngestError::Io(e.to_string()))?;

        self.store
            .set_download_status(item.id, DownloadStatus::Downloaded)?;
        metrics::PAYLOAD_FETCHES
            .with_label_values(&["success"])
            .inc();
        info!(id = item.id, path = %path.display(), "payload retrieved");
        Ok(Some(item.id))
    }

    fn set_state(&self, state: IngestState) {
        *self.state.write().unwrap() = state;
    }
}
