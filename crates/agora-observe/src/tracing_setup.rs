//! Tracing subscriber initialization with structured logging.
//!
//! The CLI's verbosity flags map to a default filter; `RUST_LOG` always
//! takes precedence when set. The JSON mode swaps the human-readable fmt
//! layer for line-delimited JSON, for piping server logs into collectors.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Verbosity mapping (ignored when `RUST_LOG` is set):
/// - quiet: errors only
/// - default: warnings, plus info from the agora crates
/// - `-v`: info, plus debug from the agora crates
/// - `-vv` and up: trace everything
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_tracing(verbose: u8, quiet: bool, json: bool) -> Result<(), TryInitError> {
    let fallback = match verbose {
        0 if quiet => "error",
        0 => "warn,agora_site=info,agora_core=info,agora_render=info",
        1 => "info,agora_site=debug,agora_core=debug,agora_render=debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init()
    }
}
