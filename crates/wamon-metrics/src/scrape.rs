//! Exporter self-instrumentation

use prometheus::{Gauge, Histogram, HistogramOpts, IntCounterVec, Opts, Registry};

/// Metrics about the collection passes themselves
pub struct ScrapeMetrics {
    /// Unix timestamp of the last completed collection pass
    pub last_scrape_timestamp: Gauge,

    /// Wall time of a full collection pass
    pub scrape_duration_seconds: Histogram,

    /// Errors encountered during collection, by kind
    pub scrape_errors_total: IntCounterVec,
}

impl ScrapeMetrics {
    /// Create and register the scrape metric group
    pub fn new(registry: &Registry) -> Self {
        let last_scrape_timestamp = Gauge::new(
            "whatsapp_exporter_last_scrape_timestamp",
            "Timestamp of last successful metrics scrape",
        )
        .expect("Failed to create whatsapp_exporter_last_scrape_timestamp metric");
        registry
            .register(Box::new(last_scrape_timestamp.clone()))
            .expect("Failed to register whatsapp_exporter_last_scrape_timestamp");

        let scrape_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "whatsapp_exporter_scrape_duration_seconds",
                "Duration of metrics collection in seconds",
            )
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )
        .expect("Failed to create whatsapp_exporter_scrape_duration_seconds metric");
        registry
            .register(Box::new(scrape_duration_seconds.clone()))
            .expect("Failed to register whatsapp_exporter_scrape_duration_seconds");

        let scrape_errors_total = IntCounterVec::new(
            Opts::new(
                "whatsapp_exporter_scrape_errors_total",
                "Total number of scrape errors",
            ),
            &["error_type"],
        )
        .expect("Failed to create whatsapp_exporter_scrape_errors_total metric");
        registry
            .register(Box::new(scrape_errors_total.clone()))
            .expect("Failed to register whatsapp_exporter_scrape_errors_total");

        Self {
            last_scrape_timestamp,
            scrape_duration_seconds,
            scrape_errors_total,
        }
    }

    /// Count one error of the given kind
    pub fn record_error(&self, kind: &str) {
        self.scrape_errors_total.with_label_values(&[kind]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_metrics_register() {
        let registry = Registry::new();
        let metrics = ScrapeMetrics::new(&registry);

        metrics.last_scrape_timestamp.set(1_700_000_000.0);
        metrics.scrape_duration_seconds.observe(0.4);
        metrics.record_error("database_error");

        let families = registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "whatsapp_exporter_scrape_errors_total"));
    }

    #[test]
    fn test_error_counter_is_monotonic_per_kind() {
        let registry = Registry::new();
        let metrics = ScrapeMetrics::new(&registry);

        metrics.record_error("database_error");
        metrics.record_error("database_error");

        let count = metrics
            .scrape_errors_total
            .with_label_values(&["database_error"])
            .get();
        assert_eq!(count, 2);
    }
}
