//! Types for the ingestion loop.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::site::SiteError;

/// Errors inside one ingestion cycle. All of them leave the cursor where
/// it was and are retried on the next scheduled cycle.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Site(#[from] SiteError),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Lifecycle of the ingestion loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestState {
    /// Cycling normally.
    Running,
    /// Stop observed; the current cycle finishes, then the loop exits.
    Stopping,
    /// Terminal. Also the state before the loop is started.
    Stopped,
}

/// What the discovery step of one cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// The catalog has caught up with the remote sequence.
    UpToDate,
    /// Committed a new available item.
    Discovered(u32),
    /// Committed a placeholder for an identifier the site reports gone.
    DiscoveredDeleted(u32),
    /// Page layout mismatch; nothing committed, the identifier will be
    /// retried next cycle.
    Unrecognized(u32),
    /// The store lock was contended; nothing was read this cycle.
    StoreBusy,
}
