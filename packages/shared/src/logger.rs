//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the given default level is
/// applied to the named binary and the `hearth` crates.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{bin_name}={default_level},hearth_server={default_level},hearth_client={default_level}"
        ))
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
