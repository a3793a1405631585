//! Tracing initialization.

use std::{io, sync::Once};

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding an `EnvFilter` directive, e.g. `TDQA_LOG=tdqa::core=debug`.
pub const LOG_ENV: &str = "TDQA_LOG";

static INIT: Once = Once::new();

/// Install the global subscriber, writing to stderr.
///
/// `TDQA_LOG` takes precedence; otherwise `tdqa=warn`, or `tdqa=debug`
/// when `verbose` is set. Calling this more than once has no effect.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(verbose)
                    .without_time(),
            )
            .with(filter)
            .init();
    });
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "tdqa=debug" } else { "tdqa=warn" }
}
