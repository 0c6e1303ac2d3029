use std::io;
use tracing_subscriber::{fmt, EnvFilter};

use crate::env::AppEnv;

/// Default filter when `RUST_LOG` is not set. SQL statement logs stay quiet
/// unless asked for explicitly.
const DEFAULT_FILTER: &str = "info,sea_orm=warn,sqlx=warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize tracing subscriber with compact, human readable output on stdout.
/// - Respects `RUST_LOG` if set
pub fn init_logging_default() {
    let _ = fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output on stdout.
/// - Respects `RUST_LOG` if set
pub fn init_logging_json() {
    let _ = fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

/// Pick the log format for an environment: compact in debug environments,
/// JSON everywhere else.
pub fn init_logging_for(env: &AppEnv) {
    if env.is_debug() {
        init_logging_default();
    } else {
        init_logging_json();
    }
}
