//! Diagnostic logging setup

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TOKCOST_LOG";

fn default_directive(debug: bool) -> &'static str {
    if debug { "tokcost=debug" } else { "warn" }
}

/// Install the stderr subscriber. `TOKCOST_LOG` wins over `--debug`.
pub(crate) fn init(debug: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .ok();
}
