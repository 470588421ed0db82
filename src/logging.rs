//! Logging setup and the error-reporting sink for failed background work.

use std::fs::File;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Initialise logging into `path`. With debug enabled `RUST_LOG` can override
/// the level; otherwise it is pinned to `info`.
pub fn init(debug: bool, path: &str) -> Result<()> {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bk_palette=debug"))
    } else {
        EnvFilter::new("bk_palette=info")
    };

    let file = File::create(path).with_context(|| format!("opening log file {path}"))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

/// Report a failure that the palette recovers from.
pub fn report_error(context: &str, err: &anyhow::Error) {
    error!(context, error = %format!("{err:#}"), "operation failed");
}
