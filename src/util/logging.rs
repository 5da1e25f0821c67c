//! Tracing subscriber setup for hosts embedding the engine.

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter when set. Errors if a subscriber
/// is already installed.
pub fn init_logging(verbose: bool) -> Result<()> {
    let default_filter = if verbose {
        "rhythm_core=debug,warn"
    } else {
        "rhythm_core=info,warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()?;
    Ok(())
}
