//! Collection engine for the wamon exporter
//!
//! One collection pass runs the WhatsApp API probe and the store query
//! batch concurrently, isolates failures per measurement, and records the
//! pass's own duration and error counts. Passes are triggered on demand
//! by the scrape endpoint; overlapping scrapes coalesce onto the pass
//! already in flight.

pub mod database;
pub mod error;
pub mod runner;
pub mod sanitize;
pub mod whatsapp;

pub use database::{DatabaseCollector, SchemaCapabilities};
pub use error::{CollectorError, CollectorResult};
pub use runner::{Collect, CollectionRunner};
pub use sanitize::sanitize_label;
pub use whatsapp::WhatsappProbe;
