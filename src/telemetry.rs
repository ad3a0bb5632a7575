// src/telemetry.rs
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Line-oriented, timestamped logs on stdout. `RUST_LOG` overrides the
/// default `info` filter. Calling it twice is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout).with_target(false))
        .try_init();
}
