//! WhatsApp device and API metrics

use prometheus::{HistogramOpts, HistogramVec, IntGauge, IntGaugeVec, Opts, Registry};

/// Metrics describing the connected WhatsApp device session and API health
pub struct WhatsappMetrics {
    /// Number of devices currently reported by the API
    pub devices_total: IntGauge,

    /// Connection status (1=connected, 0=disconnected)
    pub connection_status: IntGauge,

    /// Identity of the connected device, encoded as labels on a constant 1
    pub device_info: IntGaugeVec,

    /// API round-trip latency by endpoint
    pub api_latency_seconds: HistogramVec,
}

impl WhatsappMetrics {
    /// Create and register the WhatsApp metric group
    pub fn new(registry: &Registry) -> Self {
        let devices_total = IntGauge::new(
            "whatsapp_devices_total",
            "Total number of WhatsApp devices connected",
        )
        .expect("Failed to create whatsapp_devices_total metric");
        registry
            .register(Box::new(devices_total.clone()))
            .expect("Failed to register whatsapp_devices_total");

        let connection_status = IntGauge::new(
            "whatsapp_connection_status",
            "WhatsApp connection status (1=connected, 0=disconnected)",
        )
        .expect("Failed to create whatsapp_connection_status metric");
        registry
            .register(Box::new(connection_status.clone()))
            .expect("Failed to register whatsapp_connection_status");

        let device_info = IntGaugeVec::new(
            Opts::new("whatsapp_device_info", "WhatsApp device information"),
            &["name", "device"],
        )
        .expect("Failed to create whatsapp_device_info metric");
        registry
            .register(Box::new(device_info.clone()))
            .expect("Failed to register whatsapp_device_info");

        let api_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "whatsapp_api_latency_seconds",
                "WhatsApp API response latency in seconds",
            )
            .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["endpoint"],
        )
        .expect("Failed to create whatsapp_api_latency_seconds metric");
        registry
            .register(Box::new(api_latency_seconds.clone()))
            .expect("Failed to register whatsapp_api_latency_seconds");

        Self {
            devices_total,
            connection_status,
            device_info,
            api_latency_seconds,
        }
    }

    /// Record an API round trip for an endpoint
    pub fn observe_api_latency(&self, endpoint: &str, seconds: f64) {
        self.api_latency_seconds
            .with_label_values(&[endpoint])
            .observe(seconds);
    }

    /// Replace the device identity record wholesale
    pub fn set_device_info(&self, name: &str, device: &str) {
        self.device_info.reset();
        self.device_info.with_label_values(&[name, device]).set(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_metrics_register() {
        let registry = Registry::new();
        let metrics = WhatsappMetrics::new(&registry);

        metrics.devices_total.set(1);
        metrics.connection_status.set(1);
        metrics.observe_api_latency("/app/devices", 0.05);

        let families = registry.gather();
        assert!(!families.is_empty());
    }

    #[test]
    fn test_device_info_replaced_wholesale() {
        let registry = Registry::new();
        let metrics = WhatsappMetrics::new(&registry);

        metrics.set_device_info("Phone", "dev1");
        metrics.set_device_info("Tablet", "dev2");

        let info = registry
            .gather()
            .into_iter()
            .find(|f| f.get_name() == "whatsapp_device_info")
            .expect("info family missing");
        // Only the most recent identity survives.
        assert_eq!(info.get_metric().len(), 1);
        let labels = info.get_metric()[0].get_label();
        assert!(labels.iter().any(|l| l.get_value() == "dev2"));
    }
}
