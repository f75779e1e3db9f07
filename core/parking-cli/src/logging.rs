use std::env;

use tracing_subscriber::EnvFilter;

const DEBUG_ENV: &str = "PARKING_LOT_DEBUG_LOG";

fn debug_enabled(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "TRUE" | "yes" | "YES"))
}

/// Installs the stderr subscriber. Prompts own stdout, so log lines never
/// interleave with them.
pub fn init() {
    let filter = if debug_enabled(env::var(DEBUG_ENV).ok().as_deref()) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
