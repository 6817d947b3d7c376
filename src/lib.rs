pub mod api; // HTTP router, endpoints, server lifecycle
pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;
pub mod tabs; // Per-tab presentation bundles

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{DashboardConfig, SourceConfig};
use crate::db::{CsvDirSource, DataSource, SourceError, SqliteSource};
use crate::models::{Entity, ExportFormat, Table};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Data source setup failed: {0}")]
    Source(#[from] SourceError),
    #[error(transparent)]
    Server(#[from] api::ServerError),
    #[error("Template export failed: {0}")]
    Export(#[from] pipeline::export::ExportError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Construct the configured data source.
pub fn build_source(config: &DashboardConfig) -> Arc<dyn DataSource> {
    match &config.source {
        SourceConfig::Sqlite { path } => Arc::new(
            SqliteSource::new(path.clone()).with_busy_timeout(config.query_timeout),
        ),
        SourceConfig::CsvDir { dir } => Arc::new(CsvDirSource::new(dir.clone())),
    }
}

/// Create an empty store for the configured source: a migrated SQLite
/// database, or one header-only `<table>.csv` per entity. Existing data
/// is left untouched.
pub fn init_store(config: &DashboardConfig) -> Result<(), RunError> {
    match &config.source {
        SourceConfig::Sqlite { path } => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let conn = db::open_database(path)?;
            let tables = db::count_tables(&conn)?;
            tracing::info!(path = %path.display(), tables, "SQLite database ready");
        }
        SourceConfig::CsvDir { dir } => {
            std::fs::create_dir_all(dir)?;
            for entity in Entity::ALL {
                let path = dir.join(format!("{}.csv", entity.source_table()));
                if path.exists() {
                    continue;
                }
                let columns = entity
                    .source_columns()
                    .iter()
                    .filter(|c| entity.lookup_join().map_or(true, |j| j.target != c.name))
                    .copied()
                    .collect();
                let header = pipeline::export::export(&Table::new(columns), ExportFormat::Csv)?;
                std::fs::write(&path, header)?;
                tracing::info!(path = %path.display(), "Wrote CSV template");
            }
        }
    }
    Ok(())
}

/// Entry point for the binary: initialise logging, read configuration and
/// serve until Ctrl-C. `--init` creates the store and exits.
pub async fn run() -> Result<(), RunError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Hospital dashboard starting v{}", config::APP_VERSION);

    let config = DashboardConfig::from_env();

    if std::env::args().skip(1).any(|arg| arg == "--init") {
        return init_store(&config);
    }

    let source = build_source(&config);
    let ctx = api::ApiContext::new(source, config.query_timeout);
    let server = api::start_server(ctx, config.bind, config.static_dir.clone()).await?;
    tracing::info!(addr = %server.addr, "Dashboard available at http://{}/api/overview", server.addr);

    tokio::signal::ctrl_c().await?;
    server.stop().await;
    Ok(())
}
