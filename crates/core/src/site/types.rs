//! Types for remote site access.

use thiserror::Error;

/// Errors for listing site operations.
///
/// All of these are treated as transient by the ingestion loop (retried
/// on the next scheduled cycle); only startup treats reachability as
/// fatal.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP {0}")]
    Http(u16),

    /// The site no longer accepts the stored session token; the login
    /// collaborator must establish a new one.
    #[error("Session rejected by the site")]
    SessionRejected,

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Transport error: {0}")]
    Transport(String),
}
