//! Aggregate of all exporter metric groups

use crate::{DatabaseMetrics, ScrapeMetrics, StoreMetrics, WhatsappMetrics};
use prometheus::Registry;

/// All metric groups, registered against one registry
///
/// Created once at process start and shared (behind an `Arc`) with every
/// collector. Updates are independent slot writes on prometheus
/// primitives, so concurrent collection passes never need coordination
/// beyond what the primitives provide.
pub struct ExporterMetrics {
    pub whatsapp: WhatsappMetrics,
    pub store: StoreMetrics,
    pub database: DatabaseMetrics,
    pub scrape: ScrapeMetrics,
}

impl ExporterMetrics {
    /// Create and register every exporter metric
    pub fn new(registry: &Registry) -> Self {
        Self {
            whatsapp: WhatsappMetrics::new(registry),
            store: StoreMetrics::new(registry),
            database: DatabaseMetrics::new(registry),
            scrape: ScrapeMetrics::new(registry),
        }
    }
}
