use std::io;

use tracing_subscriber::EnvFilter;

use crate::args::LogFormat;

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber, writing to stderr.
pub fn init(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_new(level.to_ascii_lowercase()).unwrap_or_else(|_| {
        eprintln!("Invalid log level specified {level}, defaulting to {DEFAULT_FILTER}");
        EnvFilter::new(DEFAULT_FILTER)
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
