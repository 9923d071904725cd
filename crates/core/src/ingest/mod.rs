//! Background ingestion loop.
//!
//! Discovers new items one identifier at a time, commits parse results
//! to the catalog, and services the download queue. Strictly serial:
//! never more than one network fetch in flight, with a fixed pause
//! between cycles to bound the request rate against the site.

mod runner;
mod types;

pub use runner::IngestLoop;
pub use types::{DiscoveryOutcome, IngestError, IngestState};
