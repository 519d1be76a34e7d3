mod applications;
mod catalog;
mod config;
mod db;
mod errors;
mod extract;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::applications::store::{ApplicationStore, MemoryApplicationStore, PgApplicationStore};
use crate::catalog::Catalog;
use crate::config::{Config, StoreKind};
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Placement API v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config).await?;

    let catalog = Catalog::load()?;
    info!(
        jobs = catalog.jobs.len(),
        trainings = catalog.trainings.len(),
        events = catalog.events.len(),
        "Catalog loaded"
    );

    info!(
        "Resume upload limit: {} bytes",
        config.max_resume_bytes
    );

    let state = AppState {
        store,
        catalog: Arc::new(catalog),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the portal has a fixed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_store(config: &Config) -> Result<Arc<dyn ApplicationStore>> {
    match config.store {
        StoreKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store")?;
            let pool = create_pool(url, config.db_max_connections).await?;
            Ok(Arc::new(PgApplicationStore::new(pool)))
        }
        StoreKind::Memory => {
            warn!("Using in-memory application store; submissions are lost on restart");
            Ok(Arc::new(MemoryApplicationStore::new()))
        }
    }
}
