//! Catalog synchronization and classification engine for a remote
//! listing site.
//!
//! A background ingestion loop discovers items one identifier at a time,
//! parses their detail pages, and reconciles them into a SQLite catalog
//! shared with an interactive foreground consumer. The two processes
//! coordinate only through the catalog and a persisted stop flag.

pub mod catalog;
pub mod classify;
pub mod config;
pub mod ingest;
pub mod listing;
pub mod metrics;
pub mod site;
pub mod testing;

pub use catalog::{
    Availability, CatalogError, CatalogStore, Category, CategoryTriage, DownloadStatus, Item,
    NewItem, SqliteCatalog, SETTING_DOWNLOAD_DIR, SETTING_SESSION_TOKEN,
};
pub use classify::{
    CategoryDecision, ClassificationWorkflow, ClassifyError, DecisionPrompter, ItemDecision,
    TriageSummary,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SiteConfig,
};
pub use ingest::{DiscoveryOutcome, IngestError, IngestLoop, IngestState};
pub use listing::{parse_item_page, to_kib, ListedItem, PageOutcome};
pub use site::{HttpListingSite, ListingSite, SiteError};
