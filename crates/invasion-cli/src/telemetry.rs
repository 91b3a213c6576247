//! Logging setup for the command-line runner.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Logs go to stderr so the report on
/// stdout stays clean.
///
/// `RUST_LOG` wins over `filter`, which wins over [`DEFAULT_FILTER`].
pub fn init_telemetry(filter: Option<&str>, json: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter.unwrap_or(DEFAULT_FILTER)))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(fmt_layer.json()).try_init()?;
    } else {
        registry.with(fmt_layer).try_init()?;
    }

    info!("Telemetry initialized");
    Ok(())
}
