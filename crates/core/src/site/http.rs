//! HTTP implementation of the listing site client.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::config::SiteConfig;

use super::{ListingSite, SiteError};

/// Item links on the recent-listings page.
static ITEM_LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"/item/([0-9]+)"#).unwrap());

/// Listing site client over an authenticated HTTP session.
///
/// The session token comes from the login collaborator (persisted in
/// the settings store) and is sent as a cookie on every request.
pub struct HttpListingSite {
    client: Client,
    base_url: String,
    session_cookie: String,
}

impl HttpListingSite {
    pub fn new(config: &SiteConfig, session_token: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session_cookie: format!("session={session_token}"),
        }
    }

    fn item_url(&self, id: u32) -> String {
        format!("{}/item/{}", self.base_url, id)
    }

    fn recent_url(&self) -> String {
        format!("{}/recent", self.base_url)
    }

    fn payload_url(&self, id: u32) -> String {
        format!("{}/payload/{}", self.base_url, id)
    }

    async fn get(&self, url: &str) -> Result<Response, SiteError> {
        let response = self
            .client
            .get(url)
            .header("Cookie", &self.session_cookie)
            .send()
            .await
            .map_err(map_transport_err)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SiteError::SessionRejected),
            _ => Ok(response),
        }
    }
}

#[async_trait]
impl ListingSite for HttpListingSite {
    async fn latest_item_id(&self) -> Result<u32, SiteError> {
        let response = self.get(&self.recent_url()).await?;
        if !response.status().is_success() {
            return Err(SiteError::Http(response.status().as_u16()));
        }

        let body = response.text().await.map_err(map_transport_err)?;
        let latest = extract_latest_id(&body)
            .ok_or_else(|| SiteError::Malformed("no item links on listing page".to_string()))?;

        debug!(latest, "discovered latest remote item id");
        Ok(latest)
    }

    async fn item_page(&self, id: u32) -> Result<String, SiteError> {
        let response = self.get(&self.item_url(id)).await?;
        let status = response.status();

        // The missing-item page is served with a 404; the parser owns
        // that distinction, so the body comes back either way.
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(SiteError::Http(status.as_u16()));
        }

        response.text().await.map_err(map_transport_err)
    }

    async fn fetch_payload(&self, id: u32) -> Result<Vec<u8>, SiteError> {
        let response = self.get(&self.payload_url(id)).await?;
        if !response.status().is_success() {
            return Err(SiteError::Http(response.status().as_u16()));
        }

        let bytes = response.bytes().await.map_err(map_transport_err)?;
        Ok(bytes.to_vec())
    }
}

/// Highest item identifier linked from a listing page body.
fn extract_latest_id(body: &str) -> Option<u32> {
    ITEM_LINK_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .max()
}

fn map_transport_err(e: reqwest::Error) -> SiteError {
    if e.is_timeout() {
        SiteError::Timeout
    } else if e.is_connect() {
        SiteError::ConnectionFailed(e.to_string())
    } else {
        SiteError::Transport(e.to_string())
    }
}
