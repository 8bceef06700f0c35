//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "CALLWIRE_LOG";

/// Filter used when `CALLWIRE_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "callwire=info";

/// Initialize the callwire tracing/logging system.
///
/// Reads `CALLWIRE_LOG` for per-module log levels, e.g.
/// `CALLWIRE_LOG=callwire_analysis::call_graph=debug,callwire_analysis::model=warn`.
///
/// Falls back to `callwire=info` if `CALLWIRE_LOG` is not set or is invalid.
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
