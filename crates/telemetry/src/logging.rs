//! Structured logging setup.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured JSON logging with environment-based filtering.
///
/// # Arguments
/// * `log_level` - Optional filter override (e.g., "info", "slotwatch_rewards=debug")
pub fn init_logging(log_level: Option<&str>) -> anyhow::Result<()> {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .try_init()?;

    Ok(())
}

