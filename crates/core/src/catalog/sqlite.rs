//! SQLite-backed catalog implementation.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::debug;

use super::{
    Availability, CatalogError, CatalogStore, Category, CategoryTriage, DownloadStatus, Item,
    NewItem,
};

/// Schema version this build reads and writes. A store recording a
/// different version is refused; the upgrade itself is a separate,
/// version-gated migration step outside this crate.
pub const SCHEMA_VERSION: i64 = 1;

/// Bounded wait before a statement is abandoned under lock contention.
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// SQLite-backed catalog.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Open a catalog, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(db_err)?;
        Self::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize(conn: &Connection) -> Result<(), CatalogError> {
        conn.busy_timeout(BUSY_TIMEOUT).map_err(db_err)?;

        conn.execute_batch(
            r#"
            -- Singleton configuration row (id is pinned to 1)
            CREATE TABLE IF NOT EXISTS app_config (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                schema_version INTEGER NOT NULL,
                base_url TEXT,
                stop_requested INTEGER NOT NULL DEFAULT 0
            );

            -- Free-form name/value settings
            CREATE TABLE IF NOT EXISTS settings (
                name TEXT PRIMARY KEY,
                value TEXT
            );

            -- Categories, created on first sight
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE COLLATE NOCASE,
                triage TEXT NOT NULL DEFAULT 'unset',
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_categories_triage ON categories(triage);

            -- Items, keyed by the remote site's numeric identifier
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY,
                availability TEXT NOT NULL,
                title TEXT,
                size_kib REAL,
                category_id INTEGER REFERENCES categories(id),
                seeders INTEGER,
                leechers INTEGER,
                last_checked_at TEXT,
                download TEXT NOT NULL DEFAULT 'unset'
            );

            CREATE INDEX IF NOT EXISTS idx_items_download ON items(download);
            CREATE INDEX IF NOT EXISTS idx_items_category ON items(category_id);
            "#,
        )
        .map_err(db_err)?;

        // Seed the singleton on first open, then gate on the recorded version.
        conn.execute(
            "INSERT OR IGNORE INTO app_config (id, schema_version, base_url, stop_requested)
             VALUES (1, ?1, NULL, 0)",
            params![SCHEMA_VERSION],
        )
        .map_err(db_err)?;

        let found: i64 = conn
            .query_row("SELECT schema_version FROM app_config WHERE id = 1", [], |row| {
                row.get(0)
            })
            .map_err(db_err)?;

        if found != SCHEMA_VERSION {
            return Err(CatalogError::SchemaVersion {
                found,
                supported: SCHEMA_VERSION,
            });
        }

        debug!(schema_version = found, "catalog opened");
        Ok(())
    }

    fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
        let triage_str: String = row.get(2)?;
        let triage = CategoryTriage::parse(&triage_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                format!("unknown category triage: {triage_str}").into(),
            )
        })?;

        let created_at_str: String = row.get(3)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            triage,
            created_at,
        })
    }

    fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<Item> {
        let availability_str: String = row.get(1)?;
        let availability = Availability::parse(&availability_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                format!("unknown availability: {availability_str}").into(),
            )
        })?;

        let download_str: String = row.get(8)?;
        let download = DownloadStatus::parse(&download_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                8,
                rusqlite::types::Type::Text,
                format!("unknown download status: {download_str}").into(),
            )
        })?;

        let last_checked_str: Option<String> = row.get(7)?;
        let last_checked_at = last_checked_str
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let id: i64 = row.get(0)?;
        let seeders: Option<i64> = row.get(5)?;
        let leechers: Option<i64> = row.get(6)?;

        Ok(Item {
            id: id as u32,
            availability,
            title: row.get(2)?,
            size_kib: row.get(3)?,
            category_id: row.get(4)?,
            seeders: seeders.map(|n| n as u32),
            leechers: leechers.map(|n| n as u32),
            last_checked_at,
            download,
        })
    }
}

const ITEM_COLUMNS: &str =
    "id, availability, title, size_kib, category_id, seeders, leechers, last_checked_at, download";

impl CatalogStore for SqliteCatalog {
    fn schema_version(&self) -> Result<i64, CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT schema_version FROM app_config WHERE id = 1", [], |row| {
            row.get(0)
        })
        .map_err(db_err)
    }

    fn base_url(&self) -> Result<Option<String>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT base_url FROM app_config WHERE id = 1", [], |row| {
            row.get(0)
        })
        .map_err(db_err)
    }

    fn set_base_url(&self, url: &str) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE app_config SET base_url = ?1 WHERE id = 1",
            params![url],
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn stop_requested(&self) -> Result<bool, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let flag: i64 = conn
            .query_row("SELECT stop_requested FROM app_config WHERE id = 1", [], |row| {
                row.get(0)
            })
            .map_err(db_err)?;
        Ok(flag != 0)
    }

    fn request_stop(&self) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("UPDATE app_config SET stop_requested = 1 WHERE id = 1", [])
            .map_err(db_err)?;
        Ok(())
    }

    fn clear_stop_request(&self) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("UPDATE app_config SET stop_requested = 0 WHERE id = 1", [])
            .map_err(db_err)?;
        Ok(())
    }

    fn setting(&self, name: &str) -> Result<Option<String>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        match conn.query_row(
            "SELECT value FROM settings WHERE name = ?1",
            params![name],
            |row| row.get(0),
        ) {
            Ok(value) => Ok(value),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(db_err(e)),
        }
    }

    fn set_setting(&self, name: &str, value: &str) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO settings (name, value) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
            params![name, value],
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn resolve_category(&self, name: &str) -> Result<i64, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let now_str = Utc::now().to_rfc3339();

        // Tolerates losing an insert race to the other process: the
        // conflict is swallowed and the lookup below finds the winner.
        conn.execute(
            "INSERT INTO categories (name, triage, created_at) VALUES (?1, 'unset', ?2)
             ON CONFLICT(name) DO NOTHING",
            params![name, &now_str],
        )
        .map_err(db_err)?;

        conn.query_row(
            "SELECT id FROM categories WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .map_err(db_err)
    }

    fn category(&self, id: i64) -> Result<Category, CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, name, triage, created_at FROM categories WHERE id = ?1",
            params![id],
            Self::row_to_category,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => CatalogError::NotFound(format!("category {id}")),
            _ => db_err(e),
        })
    }

    fn oldest_unset_category(&self) -> Result<Option<Category>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        match conn.query_row(
            "SELECT id, name, triage, created_at FROM categories
             WHERE triage = 'unset'
             ORDER BY created_at ASC, id ASC
             LIMIT 1",
            [],
            Self::row_to_category,
        ) {
            Ok(category) => Ok(Some(category)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(db_err(e)),
        }
    }

    fn set_category_triage(&self, id: i64, triage: CategoryTriage) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE categories SET triage = ?1 WHERE id = ?2",
            params![triage.as_str(), id],
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn queue_category_downloads(&self, id: i64) -> Result<usize, CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE items SET download = 'queued'
             WHERE category_id = ?1 AND download = 'unset'
               AND availability = 'available' AND seeders > 0",
            params![id],
        )
        .map_err(db_err)
    }

    fn skip_category_downloads(&self, id: i64) -> Result<usize, CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE items SET download = 'skip'
             WHERE category_id = ?1 AND download = 'unset'",
            params![id],
        )
        .map_err(db_err)
    }

    fn highest_item_id(&self) -> Result<u32, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let id: i64 = conn
            .query_row("SELECT COALESCE(MAX(id), 0) FROM items", [], |row| row.get(0))
            .map_err(db_err)?;
        Ok(id as u32)
    }

    fn insert_available(&self, item: &NewItem) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();
        let now_str = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO items (id, availability, title, size_kib, category_id, seeders, leechers, last_checked_at, download)
             VALUES (?1, 'available', ?2, ?3, ?4, ?5, ?6, ?7, 'unset')",
            params![
                item.id as i64,
                &item.title,
                item.size_kib,
                item.category_id,
                item.seeders as i64,
                item.leechers as i64,
                &now_str,
            ],
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn insert_deleted(&self, id: u32) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO items (id, availability, download) VALUES (?1, 'deleted', 'unset')",
            params![id as i64],
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn item(&self, id: u32) -> Result<Item, CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"),
            params![id as i64],
            Self::row_to_item,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => CatalogError::NotFound(format!("item {id}")),
            _ => db_err(e),
        })
    }

    fn next_undecided_item(&self) -> Result<Option<Item>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        match conn.query_row(
            &format!(
                "SELECT {ITEM_COLUMNS} FROM items
                 WHERE availability = 'available' AND download = 'unset' AND seeders > 0
                 ORDER BY last_checked_at ASC, id ASC
                 LIMIT 1"
            ),
            [],
            Self::row_to_item,
        ) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(db_err(e)),
        }
    }

    fn next_queued_item(&self) -> Result<Option<Item>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        match conn.query_row(
            &format!(
                "SELECT {ITEM_COLUMNS} FROM items
                 WHERE download = 'queued' AND availability = 'available' AND seeders > 0
                 ORDER BY last_checked_at ASC, id DESC
                 LIMIT 1"
            ),
            [],
            Self::row_to_item,
        ) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(db_err(e)),
        }
    }

    fn set_download_status(&self, id: u32, status: DownloadStatus) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();
        // Rows already downloaded are left alone; download status only
        // flows forward.
        conn.execute(
            "UPDATE items SET download = ?1 WHERE id = ?2 AND download <> 'downloaded'",
            params![status.as_str(), id as i64],
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn touch_item(&self, id: u32) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();
        let now_str = Utc::now().to_rfc3339();
        conn.execute(
            "UPDATE items SET last_checked_at = ?1 WHERE id = ?2",
            params![&now_str, id as i64],
        )
        .map_err(db_err)?;
        Ok(())
    }
}

/// Map a driver error, distinguishing bounded-wait lock timeouts so
/// callers can degrade to "no data" instead of failing.
fn db_err(e: rusqlite::Error) -> CatalogError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::DatabaseBusy
                || err.code == rusqlite::ErrorCode::DatabaseLocked =>
        {
            CatalogError::Busy
        }
        _ => CatalogError::Database(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_catalog() -> SqliteCatalog {
        SqliteCatalog::in_memory().unwrap()
    }

    fn test_item(id: u32, category_id: i64, seeders: u32) -> NewItem {
        NewItem {
            id,
            title: format!("Item {id}"),
            size_kib: 1024.0,
            category_id,
            seeders,
            leechers: 1,
        }
    }

    #[test]
    fn test_fresh_store_has_current_schema_version() {
        let catalog = create_test_catalog();
        assert_eq!(catalog.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_base_url_round_trip() {
        let catalog = create_test_catalog();
        assert!(catalog.base_url().unwrap().is_none());

        catalog.set_base_url("https://example.org").unwrap();
        assert_eq!(
            catalog.base_url().unwrap().as_deref(),
            Some("https://example.org")
        );
    }

    #[test]
    fn test_stop_flag_round_trip() {
        let catalog = create_test_catalog();
        assert!(!catalog.stop_requested().unwrap());

        catalog.request_stop().unwrap();
        assert!(catalog.stop_requested().unwrap());

        catalog.clear_stop_request().unwrap();
        assert!(!catalog.stop_requested().unwrap());
    }

    #[test]
    fn test_setting_upsert() {
        let catalog = create_test_catalog();
        assert!(catalog.setting("download_dir").unwrap().is_none());

        catalog.set_setting("download_dir", "/tmp/a").unwrap();
        assert_eq!(
            catalog.setting("download_dir").unwrap().as_deref(),
            Some("/tmp/a")
        );

        catalog.set_setting("download_dir", "/tmp/b").unwrap();
        assert_eq!(
            catalog.setting("download_dir").unwrap().as_deref(),
            Some("/tmp/b")
        );
    }

    #[test]
    fn test_resolve_category_is_idempotent() {
        let catalog = create_test_catalog();

        let first = catalog.resolve_category("Movies").unwrap();
        let second = catalog.resolve_category("Movies").unwrap();
        assert_eq!(first, second);

        // Case variants resolve to the same row.
        let third = catalog.resolve_category("MOVIES").unwrap();
        assert_eq!(first, third);

        let category = catalog.category(first).unwrap();
        assert_eq!(category.name, "Movies");
        assert_eq!(category.triage, CategoryTriage::Unset);
    }

    #[test]
    fn test_oldest_unset_category_order() {
        let catalog = create_test_catalog();
        let first = catalog.resolve_category("First").unwrap();
        let second = catalog.resolve_category("Second").unwrap();

        let oldest = catalog.oldest_unset_category().unwrap().unwrap();
        assert_eq!(oldest.id, first);

        catalog
            .set_category_triage(first, CategoryTriage::AskEach)
            .unwrap();
        let oldest = catalog.oldest_unset_category().unwrap().unwrap();
        assert_eq!(oldest.id, second);

        catalog
            .set_category_triage(second, CategoryTriage::Ignore)
            .unwrap();
        assert!(catalog.oldest_unset_category().unwrap().is_none());
    }

    #[test]
    fn test_highest_item_id_empty_is_zero() {
        let catalog = create_test_catalog();
        assert_eq!(catalog.highest_item_id().unwrap(), 0);
    }

    #[test]
    fn test_insert_available_and_read_back() {
        let catalog = create_test_catalog();
        let cat = catalog.resolve_category("Software").unwrap();
        catalog.insert_available(&test_item(1, cat, 5)).unwrap();

        let item = catalog.item(1).unwrap();
        assert_eq!(item.availability, Availability::Available);
        assert_eq!(item.title.as_deref(), Some("Item 1"));
        assert_eq!(item.category_id, Some(cat));
        assert_eq!(item.seeders, Some(5));
        assert_eq!(item.download, DownloadStatus::Unset);
        assert!(item.last_checked_at.is_some());
        assert_eq!(catalog.highest_item_id().unwrap(), 1);
    }

    #[test]
    fn test_insert_deleted_is_minimal() {
        let catalog = create_test_catalog();
        catalog.insert_deleted(7).unwrap();

        let item = catalog.item(7).unwrap();
        assert_eq!(item.availability, Availability::Deleted);
        assert!(item.title.is_none());
        assert!(item.category_id.is_none());
        assert!(item.seeders.is_none());
        assert!(item.last_checked_at.is_none());
        assert_eq!(catalog.highest_item_id().unwrap(), 7);
    }

    #[test]
    fn test_item_not_found() {
        let catalog = create_test_catalog();
        assert!(matches!(
            catalog.item(99),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_item_insert_is_refused() {
        let catalog = create_test_catalog();
        let cat = catalog.resolve_category("Software").unwrap();
        catalog.insert_available(&test_item(1, cat, 5)).unwrap();
        assert!(catalog.insert_available(&test_item(1, cat, 5)).is_err());
    }

    #[test]
    fn test_queue_cascade_is_scoped() {
        let catalog = create_test_catalog();
        let foo = catalog.resolve_category("Foo").unwrap();
        let bar = catalog.resolve_category("Bar").unwrap();

        catalog.insert_available(&test_item(1, foo, 5)).unwrap();
        catalog.insert_available(&test_item(2, foo, 0)).unwrap(); // no seeders
        catalog.insert_available(&test_item(3, bar, 5)).unwrap(); // other category
        catalog.insert_deleted(4).unwrap();

        // Item 5 is in Foo but already decided.
        catalog.insert_available(&test_item(5, foo, 5)).unwrap();
        catalog
            .set_download_status(5, DownloadStatus::Skip)
            .unwrap();

        let queued = catalog.queue_category_downloads(foo).unwrap();
        assert_eq!(queued, 1);

        assert_eq!(catalog.item(1).unwrap().download, DownloadStatus::Queued);
        assert_eq!(catalog.item(2).unwrap().download, DownloadStatus::Unset);
        assert_eq!(catalog.item(3).unwrap().download, DownloadStatus::Unset);
        assert_eq!(catalog.item(4).unwrap().download, DownloadStatus::Unset);
        assert_eq!(catalog.item(5).unwrap().download, DownloadStatus::Skip);
    }

    #[test]
    fn test_skip_cascade_covers_all_pending() {
        let catalog = create_test_catalog();
        let foo = catalog.resolve_category("Foo").unwrap();

        catalog.insert_available(&test_item(1, foo, 5)).unwrap();
        catalog.insert_available(&test_item(2, foo, 0)).unwrap();

        let skipped = catalog.skip_category_downloads(foo).unwrap();
        assert_eq!(skipped, 2);
        assert_eq!(catalog.item(1).unwrap().download, DownloadStatus::Skip);
        assert_eq!(catalog.item(2).unwrap().download, DownloadStatus::Skip);
    }

    #[test]
    fn test_downloaded_is_terminal() {
        let catalog = create_test_catalog();
        let cat = catalog.resolve_category("Software").unwrap();
        catalog.insert_available(&test_item(1, cat, 5)).unwrap();

        catalog
            .set_download_status(1, DownloadStatus::Downloaded)
            .unwrap();
        catalog
            .set_download_status(1, DownloadStatus::Queued)
            .unwrap();
        assert_eq!(
            catalog.item(1).unwrap().download,
            DownloadStatus::Downloaded
        );

        // The cascade must not move it either.
        catalog.queue_category_downloads(cat).unwrap();
        assert_eq!(
            catalog.item(1).unwrap().download,
            DownloadStatus::Downloaded
        );
    }

    #[test]
    fn test_next_queued_item_filters_and_order() {
        let catalog = create_test_catalog();
        let cat = catalog.resolve_category("Software").unwrap();

        catalog.insert_available(&test_item(1, cat, 5)).unwrap();
        catalog.insert_available(&test_item(2, cat, 5)).unwrap();
        catalog.insert_deleted(3).unwrap();
        catalog.insert_available(&test_item(4, cat, 0)).unwrap();

        assert!(catalog.next_queued_item().unwrap().is_none());

        for id in [1, 2, 3, 4] {
            catalog
                .set_download_status(id, DownloadStatus::Queued)
                .unwrap();
        }

        // Pin identical last-checked values so the tie-break is observable.
        catalog
            .conn
            .lock()
            .unwrap()
            .execute(
                "UPDATE items SET last_checked_at = '2026-01-01T00:00:00+00:00'",
                [],
            )
            .unwrap();

        // Deleted and seederless items never enter the selection; ties on
        // last-checked break toward the higher identifier.
        let next = catalog.next_queued_item().unwrap().unwrap();
        assert_eq!(next.id, 2);

        // Touching pushes an item to the back of the queue.
        catalog.touch_item(2).unwrap();
        let next = catalog.next_queued_item().unwrap().unwrap();
        assert_eq!(next.id, 1);
    }

    #[test]
    fn test_next_undecided_item_oldest_checked_first() {
        let catalog = create_test_catalog();
        let cat = catalog.resolve_category("Software").unwrap();

        catalog.insert_available(&test_item(1, cat, 5)).unwrap();
        catalog.insert_available(&test_item(2, cat, 5)).unwrap();
        catalog.insert_available(&test_item(3, cat, 0)).unwrap();

        let next = catalog.next_undecided_item().unwrap().unwrap();
        assert_eq!(next.id, 1);

        catalog.touch_item(1).unwrap();
        let next = catalog.next_undecided_item().unwrap().unwrap();
        assert_eq!(next.id, 2);

        catalog
            .set_download_status(1, DownloadStatus::Skip)
            .unwrap();
        catalog
            .set_download_status(2, DownloadStatus::Queued)
            .unwrap();
        assert!(catalog.next_undecided_item().unwrap().is_none());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");

        {
            let catalog = SqliteCatalog::new(&path).unwrap();
            let cat = catalog.resolve_category("Software").unwrap();
            catalog.insert_available(&test_item(1, cat, 5)).unwrap();
            catalog.request_stop().unwrap();
        }

        let catalog = SqliteCatalog::new(&path).unwrap();
        assert_eq!(catalog.highest_item_id().unwrap(), 1);
        assert!(catalog.stop_requested().unwrap());
        assert_eq!(catalog.schema_version().unwrap(), SCHEMA_VERSION);
    }
}
