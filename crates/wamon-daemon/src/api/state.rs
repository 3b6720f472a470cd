//! Application state for API handlers

use prometheus::Registry;
use sqlx::PgPool;
use std::sync::Arc;
use wamon_collector::CollectionRunner;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Collection pass runner
    pub runner: Arc<CollectionRunner>,

    /// Metric registry rendered by the scrape endpoint
    pub registry: Arc<Registry>,

    /// Database pool, used directly by the readiness probe
    pub pool: PgPool,

    /// Exporter version
    pub version: String,
}

impl AppState {
    /// Create new application state
    pub fn new(runner: Arc<CollectionRunner>, registry: Arc<Registry>, pool: PgPool) -> Self {
        Self {
            runner,
            registry,
            pool,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
