//! Prometheus metrics for core components.
//!
//! Covers the ingestion loop (cycles, page fetches, discoveries, payload
//! retrievals) and store contention.

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

/// Ingestion cycles run.
pub static INGEST_CYCLES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("trawler_ingest_cycles_total", "Total ingestion cycles run").unwrap()
});

/// Detail pages fetched, by parse outcome.
pub static PAGES_FETCHED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("trawler_pages_fetched_total", "Detail pages fetched"),
        &["outcome"], // "found", "not_found", "unrecognized", "error"
    )
    .unwrap()
});

/// Items committed to the catalog, by availability.
pub static ITEMS_DISCOVERED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("trawler_items_discovered_total", "Items added to the catalog"),
        &["availability"], // "available", "deleted"
    )
    .unwrap()
});

/// Payload retrievals, by result.
pub static PAYLOAD_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("trawler_payload_fetches_total", "Payload retrieval attempts"),
        &["result"], // "success", "error"
    )
    .unwrap()
});

/// Statements abandoned because the store lock was held too long.
pub static STORE_BUSY: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "trawler_store_busy_total",
        "Store accesses abandoned under lock contention",
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(INGEST_CYCLES.clone()),
        Box::new(PAGES_FETCHED.clone()),
        Box::new(ITEMS_DISCOVERED.clone()),
        Box::new(PAYLOAD_FETCHES.clone()),
        Box::new(STORE_BUSY.clone()),
    ]
}
