use std::sync::Arc;

use anyhow::Context;
use common::RecordStore;
use common::options::{MemoryOptionStore, OptionStore};
use tracing::{Level, info, warn};

use server::config::{AppConfig, StoreBackend};
use server::database::init_db;
use server::state::AppState;
use server::store::DatabaseOptionStore;
use server::utils::releases::{VersionChange, record_service_version};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let backend: Arc<dyn OptionStore> = match config.store.backend {
        StoreBackend::Database => {
            let db = init_db(&config.database.url)
                .await
                .context("Failed to connect to the options database")?;
            Arc::new(DatabaseOptionStore::new(db))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory option store; data is lost on exit");
            Arc::new(MemoryOptionStore::new())
        }
    };
    let records = RecordStore::new(backend, &config.store.options_prefix);

    let current = env!("CARGO_PKG_VERSION");
    match record_service_version(&records, current)
        .await
        .context("Failed to record the service version")?
    {
        VersionChange::Installed => info!(version = current, "Fresh install"),
        VersionChange::Upgraded { from } => info!(from = %from, to = current, "Upgraded"),
        VersionChange::Unchanged => info!(version = current, "Starting"),
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { records, config };
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
