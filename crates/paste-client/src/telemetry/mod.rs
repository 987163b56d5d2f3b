//! Telemetry initialisation for the `paste` binary.
//!
//! Structured JSON logs only, written to stderr so stdout stays free for the
//! paste URL.
//!
//! # Telemetry invariants
//!
//! - **No plaintext, key or ciphertext** may appear in any log field; log
//!   lengths and identifiers instead.
//! - Log level is configurable via `PASTE_LOG_LEVEL` (default: `info`);
//!   `RUST_LOG` takes precedence when set.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the tracing subscriber.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}
