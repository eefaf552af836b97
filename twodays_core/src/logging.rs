//! Tracing setup for the `twodays` binary.
//!
//! Everything is written to stderr: `replay` prints its snapshot on stdout
//! and that output must stay parseable JSON. The default level is `warn`, so
//! `status` and `complete` print only their own report unless `RUST_LOG`
//! asks for store dispatch traces (`RUST_LOG=twodays_core=debug`).

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the stderr subscriber at `warn`
pub fn init() {
    init_with_level("warn")
}

/// Install the stderr subscriber, falling back to `default_level` when
/// `RUST_LOG` is unset or unparsable
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Route dispatch traces into the test harness output
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("twodays_core=debug"))
        .try_init();
}
