use tracing_subscriber::EnvFilter;

/// Initialise logging at `info`, or at `debug` when enabled in the settings.
///
/// `RUST_LOG` is only honoured when debug logging is enabled, so a variable
/// left in the environment does not make normal runs verbose.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
