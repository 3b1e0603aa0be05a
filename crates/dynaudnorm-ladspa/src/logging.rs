//! Optional stderr logging for the loaded plugin.
//!
//! Hosts rarely install a `tracing` subscriber, so with the `stderr-log`
//! feature the plugin installs its own when the registry is built. The
//! filter comes from `DYNAUDNORM_LOG` (e.g. `DYNAUDNORM_LOG=debug`) and
//! defaults to `warn`. Without the feature this is a no-op and events go to
//! whatever subscriber the process has.

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "DYNAUDNORM_LOG";

/// Install the stderr subscriber unless one is already set.
#[cfg(feature = "stderr-log")]
pub fn init() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Install the stderr subscriber unless one is already set.
#[cfg(not(feature = "stderr-log"))]
pub fn init() {}
