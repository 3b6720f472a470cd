//! Server setup and lifecycle management

use crate::api::{create_router, AppState};
use crate::config::ExporterConfig;
use crate::error::{DaemonError, DaemonResult};
use prometheus::Registry;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use wamon_collector::{Collect, CollectionRunner, DatabaseCollector, WhatsappProbe};
use wamon_metrics::ExporterMetrics;

/// wamon exporter server
pub struct Server {
    config: ExporterConfig,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: ExporterConfig) -> Self {
        Self { config }
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        // The pool is lazy: the exporter must come up and expose a
        // snapshot even while the database is unreachable.
        let pool = PgPoolOptions::new()
            .max_connections(self.config.database.max_connections)
            .acquire_timeout(Duration::from_secs(self.config.database.acquire_timeout_secs))
            .connect_lazy(&self.config.database.url)
            .map_err(|e| DaemonError::Config(format!("Invalid database URL: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.whatsapp.timeout_secs))
            .build()
            .map_err(|e| DaemonError::Server(format!("Failed to build HTTP client: {e}")))?;

        let registry = Arc::new(Registry::new());
        let metrics = Arc::new(ExporterMetrics::new(&registry));

        let whatsapp: Arc<dyn Collect> = Arc::new(WhatsappProbe::new(
            client,
            self.config.whatsapp.base_url.clone(),
            self.config.whatsapp.auth(),
            metrics.clone(),
        ));
        let database: Arc<dyn Collect> =
            Arc::new(DatabaseCollector::new(pool.clone(), metrics.clone()));
        let runner = Arc::new(CollectionRunner::new(
            vec![whatsapp, database],
            metrics.clone(),
        ));

        let state = AppState::new(runner, registry, pool);
        let app = create_router(state);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("wamon exporter listening on {}", addr);
        tracing::info!("Metrics are collected on-demand when /metrics is scraped");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("wamon exporter shutting down");

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
