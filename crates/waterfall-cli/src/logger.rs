// stderr log output for the CLI. waterfall-core logs through the `log`
// facade; the fmt subscriber picks those records up via tracing-log.

use tracing_subscriber::EnvFilter;

/// `-v` flags win; otherwise the WATERFALL_LOG filter; default warn.
pub fn filter_for(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_env("WATERFALL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

pub fn init(verbose: u8) {
    // Fails only if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbose))
        .with_writer(std::io::stderr)
        .try_init();
}
