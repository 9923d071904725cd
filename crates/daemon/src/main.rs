use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trawler_core::{
    load_config, validate_config, CatalogStore, HttpListingSite, IngestLoop, ListingSite,
    SqliteCatalog, SETTING_DOWNLOAD_DIR, SETTING_SESSION_TOKEN,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("TRAWLER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    // Compute config hash so runs are attributable in logs
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        version = VERSION,
        config_hash = &config_hash[..16],
        "Configuration loaded"
    );

    // Create the catalog store; failure here is fatal and leaves no
    // partial state behind.
    let store: Arc<dyn CatalogStore> = Arc::new(
        SqliteCatalog::new(&config.database.path).context("Failed to create catalog store")?,
    );
    info!("Catalog store initialized at {:?}", config.database.path);

    store
        .set_base_url(&config.site.base_url)
        .context("Failed to persist base URL")?;

    // Seed the download directory on first run; afterwards the directory
    // selection dialog owns the setting.
    if store.setting(SETTING_DOWNLOAD_DIR)?.is_none() {
        store.set_setting(
            SETTING_DOWNLOAD_DIR,
            &config.download.dir.display().to_string(),
        )?;
    }

    // The login helper establishes sessions; this process only reuses
    // the stored token. A token in the config takes precedence and is
    // persisted for the next run.
    let session_token = match &config.site.session_token {
        Some(token) => {
            store.set_setting(SETTING_SESSION_TOKEN, token)?;
            token.clone()
        }
        None => match store.setting(SETTING_SESSION_TOKEN)? {
            Some(token) => token,
            None => bail!("No session token available; run the login helper first"),
        },
    };

    let site: Arc<dyn ListingSite> =
        Arc::new(HttpListingSite::new(&config.site, &session_token));

    // Captured once; the loop stops discovering when the catalog catches
    // up with it. Unreachable site at startup is fatal.
    let latest_remote_id = site
        .latest_item_id()
        .await
        .context("Failed to reach the listing site")?;
    info!(latest_remote_id, "Listing site reachable");

    // A stale stop flag from an unclean shutdown would make the loop
    // exit immediately.
    store
        .clear_stop_request()
        .context("Failed to clear stop flag")?;

    let ingest = IngestLoop::new(
        &config.ingest,
        Arc::clone(&store),
        Arc::clone(&site),
        latest_remote_id,
    );
    let ingest_handle = ingest.start();
    info!("Ingestion loop started");

    shutdown_signal().await;

    // Stop Signal round-trip: set the flag, then block until the loop
    // has observed it and exited.
    info!("Shutting down, requesting ingestion stop");
    store.request_stop().context("Failed to set stop flag")?;
    ingest_handle
        .await
        .context("Ingestion loop panicked during shutdown")?;
    info!("Ingestion loop stopped, exiting");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
