//! Log output

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber writing to stderr
///
/// `RUST_LOG` takes precedence over `filter` when set.
pub fn init_logging(filter: &str) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| err.to_string())
}
