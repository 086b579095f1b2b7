//! Observability for the slotwatch service.

pub mod metrics;
pub mod logging;

pub use metrics::Metrics;
pub use logging::init_logging;
