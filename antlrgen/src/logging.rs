//! Log output for the binary.
//!
//! Events go to stderr so stdout carries only reports and the `output=`
//! line. `RUST_LOG` wins over `-v` when set.

use tracing_subscriber::EnvFilter;

/// Default filter for a `-v` count.
fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
