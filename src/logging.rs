//! Diagnostic logging.
//!
//! Log lines go to stderr so they never mix with the menu on stdout. The
//! level is controlled with `RUST_LOG`, e.g. `RUST_LOG=mssh=debug`.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global tracing subscriber.
pub fn init() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::from_default_env())
        .init();
}
