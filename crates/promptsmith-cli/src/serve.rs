//! `promptsmith serve` — runs the HTTP API.
//!
//! Startup sequence:
//! 1. Open the request log (SQLite file, or in memory with `--no-history`)
//! 2. Build the provider catalog from config
//! 3. Serve until Ctrl+C

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use promptsmith_core::config::Config;
use promptsmith_core::history::HistoryStore;
use promptsmith_server::{run_server, AppState};

use crate::helpers;

pub async fn run(config: &Config, no_history: bool) -> Result<()> {
    helpers::print_banner();

    let history = if no_history {
        warn!("request log kept in memory only");
        HistoryStore::open_in_memory().context("failed to create in-memory request log")?
    } else {
        let path = config.database.resolved_path();
        HistoryStore::open(&path)
            .with_context(|| format!("failed to open request log {}", path.display()))?
    };

    let catalog = crate::build_catalog(config)?;
    let state = AppState::new(catalog, Arc::new(history));

    info!(
        bind = %config.server.bind_addr(),
        cors = %config.server.cors_origins,
        "starting HTTP API"
    );
    run_server(&config.server, state).await
}
