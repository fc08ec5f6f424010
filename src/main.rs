mod api;
mod bindings;
mod config;
mod db;
mod error;
mod palette;
mod pipeline;
mod sankey;
mod state;
mod types;
mod views;

use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::health::HealthState;
use crate::api::latency::LatencyStats;
use crate::api::routes::{router, ApiState};
use crate::bindings::{comparison_page, overview_page};
use crate::config::Config;
use crate::db::{connect, FactStoreReader};
use crate::error::Result;
use crate::pipeline::derive;
use crate::state::FactStore;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Fact store: load once, derive, freeze ---
    let pool = connect(&cfg.db_path, cfg.init_schema).await?;
    info!("Fact store opened at {}", cfg.db_path);

    let raw = FactStoreReader::new(pool.clone()).load_all().await?;
    pool.close().await;

    let store = FactStore::new(derive(raw));
    store.ensure_palettes()?;
    if store.financial_facts().is_empty() {
        warn!("No income statements loaded; the overview page will show placeholders");
    }

    let health = Arc::new(HealthState::new());
    health.record_load(&store);

    // --- Pages: each binding graph computes its outputs once up front ---
    let overview = overview_page(Arc::clone(&store), cfg.default_company.as_deref())?;
    let comparison = comparison_page(Arc::clone(&store))?;
    info!(
        overview = ?overview.filter(),
        comparison = ?comparison.filter(),
        "Pages ready"
    );

    // --- HTTP API server ---
    let api_state = ApiState {
        store,
        overview: Arc::new(Mutex::new(overview)),
        comparison: Arc::new(Mutex::new(comparison)),
        health,
        latency: Arc::new(LatencyStats::new()),
    };
    let app = router(api_state);
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
