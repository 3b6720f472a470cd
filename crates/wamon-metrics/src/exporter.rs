//! Prometheus text exposition

use prometheus::{Encoder, Registry, TextEncoder};

/// Content type of the Prometheus text exposition format
pub const CONTENT_TYPE_TEXT: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render the registry's current state in Prometheus text format
pub fn export_metrics(registry: &Registry) -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        // Encoding a gathered snapshot only fails on a broken writer,
        // which a Vec is not; keep the endpoint infallible regardless.
        return format!("# encoding error: {e}\n");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
