//! Logging for TypedRoutes
//!
//! Every module logs through the standard `log` macros (`info!`, `debug!`, ...).
//! [`init_logging`] installs `env_logger` as the backend once, with the filter
//! and output format taken from [`LoggingConfig`](crate::config::LoggingConfig).
//! `RUST_LOG`, when set, is applied on top of the configured level.
//!
//! ```rust,no_run
//! use typedroutes_core::config::LoggingConfig;
//!
//! typedroutes_core::logging::init_logging(&LoggingConfig::default()).unwrap();
//! log::info!("Server starting on port {}", 8000);
//! ```

pub mod formatter;

pub use formatter::LogFormat;

use crate::config::LoggingConfig;
use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging
///
/// Safe to call multiple times: only the first call installs the logger.
/// Fails only when the configured format is unknown.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let format = LogFormat::parse(&config.format)
        .ok_or_else(|| anyhow::anyhow!("Unknown log format: {}", config.format))?;

    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&config.level);
        if let Ok(directives) = std::env::var("RUST_LOG") {
            builder.parse_filters(&directives);
        }
        builder.format(move |buf, record| writeln!(buf, "{}", format.format_record(record)));

        // Another logger may already be installed (tests, embedding applications)
        let _ = builder.try_init();
    });

    Ok(())
}
