//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the Foresight tracing/logging system.
///
/// Reads the `FORESIGHT_LOG` environment variable for per-subsystem log
/// levels. Format: `FORESIGHT_LOG=foresight_pipeline=debug,foresight_stores=warn`
///
/// Falls back to `info` if `FORESIGHT_LOG` is not set or is invalid.
///
/// This function is idempotent; calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("FORESIGHT_LOG")
            .unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
