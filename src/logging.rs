//! Logging initialization for the CLI.
//!
//! The library only emits `tracing` events; the binary decides where they go.
//! Progress lines are `info`, skipped sub-trees are `warn`.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber.
///
/// * `verbosity` - 0 = INFO, 1 = DEBUG, 2+ = TRACE
/// * `silent` - only show warnings and errors, regardless of verbosity
///
/// `RUST_LOG` replaces the computed filter when set.
pub fn init(verbosity: u8, silent: bool) {
    let level = if silent {
        Level::WARN
    } else {
        match verbosity {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,lsdeps={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}
