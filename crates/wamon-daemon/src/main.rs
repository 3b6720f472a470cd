//! wamon exporter daemon
//!
//! Serves Prometheus metrics about a WhatsApp messaging platform:
//! device connectivity and API health, message/group/sender counts from
//! the platform database, and the exporter's own scrape performance.
//! Collection runs on demand, once per scrape.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod server;

use config::ExporterConfig;
use error::{DaemonError, DaemonResult};
use server::Server;

/// wamon exporter CLI
#[derive(Parser)]
#[command(name = "wamond")]
#[command(about = "Prometheus exporter for a WhatsApp messaging platform", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "WAMON_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(short, long, env = "WAMON_LISTEN_ADDR")]
    listen: Option<String>,

    /// Database connection URL
    #[arg(long, env = "DB_URI")]
    db_uri: Option<String>,

    /// WhatsApp API base URL
    #[arg(long, env = "WHATSAPP_HOST")]
    whatsapp_host: Option<String>,

    /// WhatsApp API basic auth user
    #[arg(long, env = "WHATSAPP_BASIC_AUTH_USER")]
    basic_auth_user: Option<String>,

    /// WhatsApp API basic auth password
    #[arg(long, env = "WHATSAPP_BASIC_AUTH_PASSWORD")]
    basic_auth_password: Option<String>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "WAMON_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load configuration
    let mut config = ExporterConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if let Some(db_uri) = cli.db_uri {
        config.database.url = db_uri;
    }
    if let Some(host) = cli.whatsapp_host {
        config.whatsapp.base_url = host;
    }
    if let Some(user) = cli.basic_auth_user {
        config.whatsapp.basic_auth_user = Some(user);
    }
    if let Some(password) = cli.basic_auth_password {
        config.whatsapp.basic_auth_password = Some(password);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.server.listen_addr,
        whatsapp = %config.whatsapp.base_url,
        "Starting wamon exporter"
    );

    Server::new(config).run().await
}
