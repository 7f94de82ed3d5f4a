// TecaiKids API - Web Server
// Loads configuration, opens the document store and serves the REST API

use std::sync::Arc;

use anyhow::{Context, Result};
use tecaikids_api::api::{self, AppState};
use tecaikids_api::{logger, Config, DatabaseLocation, DocumentStore, ProgramCatalog, SqliteStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("Failed to load configuration")?;
    logger::init(&config.log_level, config.log_format)?;

    info!(version = tecaikids_api::VERSION, "TecaiKids API starting up...");

    let store: Arc<dyn DocumentStore> = match &config.database {
        DatabaseLocation::InMemory => {
            warn!("using in-memory database; data is lost on shutdown");
            Arc::new(SqliteStore::open_in_memory()?)
        }
        DatabaseLocation::File(path) => {
            let store = SqliteStore::open(path)?;
            info!(path = %path.display(), db_name = %config.db_name, "database opened");
            Arc::new(store)
        }
    };

    let catalog = ProgramCatalog::new();
    info!(programs = catalog.count(), "program catalog loaded");

    let app = api::router(AppState::new(catalog, store), &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "server listening; API under /api");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("TecaiKids API shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c; shutting down");
    }
}
