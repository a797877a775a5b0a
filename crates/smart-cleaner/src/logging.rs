//! Process-wide log subscriber.

use tracing_subscriber::EnvFilter;

/// Install the `fmt` subscriber once.
///
/// `RUST_LOG` takes precedence over `level`; `quiet` lowers the default to
/// `warn`. With `json_output` no subscriber is installed so stdout carries
/// only JSON. Installing twice is a no-op.
pub fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    let effective_level = if quiet { "warn" } else { level };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
