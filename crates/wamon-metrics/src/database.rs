//! Database performance metrics

use prometheus::{HistogramOpts, HistogramVec, IntGauge, IntGaugeVec, Opts, Registry};

/// Metrics about the platform database itself
pub struct DatabaseMetrics {
    /// Connection status (1=connected, 0=disconnected)
    pub connection_status: IntGauge,

    /// Query latency by query category
    pub query_latency_seconds: HistogramVec,

    /// Approximate row count per table
    pub table_rows: IntGaugeVec,
}

impl DatabaseMetrics {
    /// Create and register the database metric group
    pub fn new(registry: &Registry) -> Self {
        let connection_status = IntGauge::new(
            "whatsapp_db_connection_status",
            "Database connection status (1=connected, 0=disconnected)",
        )
        .expect("Failed to create whatsapp_db_connection_status metric");
        registry
            .register(Box::new(connection_status.clone()))
            .expect("Failed to register whatsapp_db_connection_status");

        let query_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "whatsapp_db_query_latency_seconds",
                "Database query latency in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
            &["query_type"],
        )
        .expect("Failed to create whatsapp_db_query_latency_seconds metric");
        registry
            .register(Box::new(query_latency_seconds.clone()))
            .expect("Failed to register whatsapp_db_query_latency_seconds");

        let table_rows = IntGaugeVec::new(
            Opts::new("whatsapp_db_table_rows", "Approximate row count per table"),
            &["table_name"],
        )
        .expect("Failed to create whatsapp_db_table_rows metric");
        registry
            .register(Box::new(table_rows.clone()))
            .expect("Failed to register whatsapp_db_table_rows");

        Self {
            connection_status,
            query_latency_seconds,
            table_rows,
        }
    }

    /// Record latency for a query category
    pub fn observe_query(&self, query_type: &str, seconds: f64) {
        self.query_latency_seconds
            .with_label_values(&[query_type])
            .observe(seconds);
    }
}
