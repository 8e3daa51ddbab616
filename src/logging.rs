use crate::errors::{NctError, Result};

/// Initialize tracing on stderr. RUST_LOG (if set) takes precedence,
/// otherwise -v/-vv map to "debug"/"trace".
pub fn init_tracing(verbosity: u8) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| level_for(verbosity).to_string());
    let filter_layer = EnvFilter::try_new(&filter)
        .map_err(|e| NctError::Config(format!("invalid RUST_LOG filter '{}': {}", filter, e)))?;

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    // Allow re-init to be a no-op in tests
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init();

    Ok(())
}

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}
