//! Item catalog - the persistent store shared by the ingestion loop and
//! the interactive consumer.
//!
//! The catalog is the single source of truth: the two processes never
//! communicate directly, only through these tables and the stop flag.
//! Every operation is a single parameterized statement; operator-supplied
//! text is never interpolated into SQL.

mod sqlite;
mod types;

pub use sqlite::SqliteCatalog;
pub use types::*;

/// Well-known setting holding the payload download directory.
pub const SETTING_DOWNLOAD_DIR: &str = "download_dir";

/// Well-known setting holding the remote session token.
pub const SETTING_SESSION_TOKEN: &str = "session_token";

/// Trait for catalog storage.
///
/// Lock contention inside an implementation surfaces as
/// [`CatalogError::Busy`] after a bounded wait; callers treat that as
/// "no data this cycle" for reads and retry idempotent writes on their
/// next cycle.
pub trait CatalogStore: Send + Sync {
    // --- configuration (singleton row) ---

    /// Schema version recorded in the store.
    fn schema_version(&self) -> Result<i64, CatalogError>;

    /// Remote base URL, if one has been persisted.
    fn base_url(&self) -> Result<Option<String>, CatalogError>;

    fn set_base_url(&self, url: &str) -> Result<(), CatalogError>;

    /// Whether cooperative shutdown has been requested.
    ///
    /// The ingestion loop reads this at the end of every cycle; it is the
    /// only cross-process coordination primitive.
    fn stop_requested(&self) -> Result<bool, CatalogError>;

    fn request_stop(&self) -> Result<(), CatalogError>;

    /// Clear a stale stop flag left over from a previous run.
    fn clear_stop_request(&self) -> Result<(), CatalogError>;

    // --- settings (name/value) ---

    /// Read a free-form setting. Absent names yield `None`.
    fn setting(&self, name: &str) -> Result<Option<String>, CatalogError>;

    /// Upsert a free-form setting: insert if absent, else update.
    fn set_setting(&self, name: &str, value: &str) -> Result<(), CatalogError>;

    // --- categories ---

    /// Map a category name to its stable identifier, creating one on
    /// first sight. Lookup is case-insensitive; a duplicate insert race
    /// with the other process falls back to the lookup.
    fn resolve_category(&self, name: &str) -> Result<i64, CatalogError>;

    fn category(&self, id: i64) -> Result<Category, CatalogError>;

    /// The untriaged category that has been known the longest.
    fn oldest_unset_category(&self) -> Result<Option<Category>, CatalogError>;

    /// Record a triage decision. Re-application is idempotent; only the
    /// first transition away from `Unset` is meaningful.
    fn set_category_triage(&self, id: i64, triage: CategoryTriage) -> Result<(), CatalogError>;

    /// Cascade for `DownloadAll`: queue the category's pending items
    /// (download unset, available, seeders > 0). Returns the number of
    /// items transitioned.
    fn queue_category_downloads(&self, id: i64) -> Result<usize, CatalogError>;

    /// Cascade for `Ignore`: skip the category's pending items (download
    /// unset). Returns the number of items transitioned.
    fn skip_category_downloads(&self, id: i64) -> Result<usize, CatalogError>;

    // --- items ---

    /// Highest item identifier in the catalog, 0 when empty. Drives
    /// discovery: the ingestion loop only ever requests this plus one.
    fn highest_item_id(&self) -> Result<u32, CatalogError>;

    /// Insert a newly discovered available item, download unset,
    /// last-checked now. Items are created once per identifier and never
    /// re-created.
    fn insert_available(&self, item: &NewItem) -> Result<(), CatalogError>;

    /// Insert a minimal placeholder for an identifier the site reports
    /// as gone.
    fn insert_deleted(&self, id: u32) -> Result<(), CatalogError>;

    fn item(&self, id: u32) -> Result<Item, CatalogError>;

    /// The next undecided item for interactive triage: available,
    /// download unset, seeders > 0, oldest-checked first.
    fn next_undecided_item(&self) -> Result<Option<Item>, CatalogError>;

    /// The next item due for retrieval: queued, available, seeders > 0,
    /// ordered last-checked ascending then identifier descending.
    fn next_queued_item(&self) -> Result<Option<Item>, CatalogError>;

    /// Assert a download status. Guarded so that a row already
    /// `Downloaded` is never moved to an earlier state; re-assertion is
    /// idempotent and safe to retry.
    fn set_download_status(&self, id: u32, status: DownloadStatus) -> Result<(), CatalogError>;

    /// Update an item's last-checked timestamp to now, pushing it to the
    /// back of the triage and retrieval queues.
    fn touch_item(&self, id: u32) -> Result<(), CatalogError>;
}
