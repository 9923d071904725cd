//! Mock listing site with scriptable pages and failure injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::site::{ListingSite, SiteError};

use super::fixtures;

/// In-memory [`ListingSite`] for tests.
///
/// Identifiers without a scripted page serve the missing-item page, so a
/// mock with pages 1 and 3 behaves like a site where 2 was deleted.
pub struct MockListingSite {
    latest_id: u32,
    pages: Mutex<HashMap<u32, String>>,
    payloads: Mutex<HashMap<u32, Vec<u8>>>,
    fail_page_fetches: AtomicBool,
    fail_payload_fetches: AtomicBool,
    page_fetches: AtomicU32,
    payload_fetches: AtomicU32,
}

impl MockListingSite {
    pub fn new(latest_id: u32) -> Self {
        Self {
            latest_id,
            pages: Mutex::new(HashMap::new()),
            payloads: Mutex::new(HashMap::new()),
            fail_page_fetches: AtomicBool::new(false),
            fail_payload_fetches: AtomicBool::new(false),
            page_fetches: AtomicU32::new(0),
            payload_fetches: AtomicU32::new(0),
        }
    }

    /// Script the body served for one identifier.
    pub fn set_page(&self, id: u32, body: impl Into<String>) {
        self.pages.lock().unwrap().insert(id, body.into());
    }

    /// Script a detail page from its fields.
    pub fn set_detail_page(&self, id: u32, title: &str, category: &str, seeders: u32) {
        self.set_page(
            id,
            fixtures::detail_page(title, 1.0, "GiB", category, seeders, 1),
        );
    }

    pub fn set_payload(&self, id: u32, bytes: Vec<u8>) {
        self.payloads.lock().unwrap().insert(id, bytes);
    }

    /// Make page fetches fail with a connection error until cleared.
    pub fn fail_page_fetches(&self, fail: bool) {
        self.fail_page_fetches.store(fail, Ordering::SeqCst);
    }

    /// Make payload fetches fail with a connection error until cleared.
    pub fn fail_payload_fetches(&self, fail: bool) {
        self.fail_payload_fetches.store(fail, Ordering::SeqCst);
    }

    pub fn page_fetches(&self) -> u32 {
        self.page_fetches.load(Ordering::SeqCst)
    }

    pub fn payload_fetches(&self) -> u32 {
        self.payload_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingSite for MockListingSite {
    async fn latest_item_id(&self) -> Result<u32, SiteError> {
        Ok(self.latest_id)
    }

    async fn item_page(&self, id: u32) -> Result<String, SiteError> {
        self.page_fetches.fetch_add(1, Ordering::SeqCst);

        if self.fail_page_fetches.load(Ordering::SeqCst) {
            return Err(SiteError::ConnectionFailed("mock failure".to_string()));
        }

        Ok(self
            .pages
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_else(fixtures::missing_page))
    }

    async fn fetch_payload(&self, id: u32) -> Result<Vec<u8>, SiteError> {
        self.payload_fetches.fetch_add(1, Ordering::SeqCst);

        if self.fail_payload_fetches.load(Ordering::SeqCst) {
            return Err(SiteError::ConnectionFailed("mock failure".to_string()));
        }

        self.payloads
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(SiteError::Http(404))
    }
}
