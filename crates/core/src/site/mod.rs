//! Remote listing site access.
//!
//! Three read/write endpoints over one authenticated HTTP session: the
//! item detail page, the recent-listings page used to discover the most
//! recent identifier, and payload retrieval. Session establishment is a
//! separate login collaborator; this module only reuses its token.

mod http;
mod types;

pub use http::HttpListingSite;
pub use types::SiteError;

use async_trait::async_trait;

/// Trait for remote listing site access.
#[async_trait]
pub trait ListingSite: Send + Sync {
    /// Most recent item identifier visible on the listing page.
    async fn latest_item_id(&self) -> Result<u32, SiteError>;

    /// Raw body of one item detail page. Missing items still yield a
    /// body; the page parser owns that distinction.
    async fn item_page(&self, id: u32) -> Result<String, SiteError>;

    /// Payload bytes for one item.
    async fn fetch_payload(&self, id: u32) -> Result<Vec<u8>, SiteError>;
}
