//! Logging setup for the `workout` binary.
//!
//! The decoder reports through `tracing` and never installs a subscriber:
//!
//! - `debug`: a tag resolved by fuzzy matching, with the candidate and its
//!   score; a duplicate goal kind replacing an earlier goal
//! - `trace`: a bare list or lone step wrapped into a workout
//!
//! Decode failures are returned as [`crate::Error`], not logged. Run with
//! `RUST_LOG=workout_core=debug` to see which misspelled tags were accepted.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the stderr subscriber at `warn` unless `RUST_LOG` says otherwise
///
/// Decoded trees go to stdout, so log lines never mix into them.
pub fn init() {
    init_with_level("warn")
}

/// Like [`init`], falling back to `default_level` (`trace` through `error`,
/// or any `EnvFilter` directive) when `RUST_LOG` is unset or unparsable
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Route every decoder event into the test harness output
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("trace"))
        .try_init();
}
