//! Measurement registry for the wamon exporter
//!
//! Every metric the exporter publishes lives here, grouped by domain and
//! registered against an injected [`prometheus::Registry`]. Collectors
//! receive the groups by reference; nothing in this crate is global state.

pub mod database;
pub mod exporter;
pub mod registry;
pub mod scrape;
pub mod store;
pub mod whatsapp;

pub use database::DatabaseMetrics;
pub use exporter::{export_metrics, CONTENT_TYPE_TEXT};
pub use registry::ExporterMetrics;
pub use scrape::ScrapeMetrics;
pub use store::StoreMetrics;
pub use whatsapp::WhatsappMetrics;
