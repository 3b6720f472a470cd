//! HTTP handlers

mod health;
mod metrics;

pub use health::{health, ready};
pub use metrics::metrics;
