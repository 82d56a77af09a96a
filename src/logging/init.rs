use serde::{Deserialize, Serialize};
use std::sync::Once;

/// Color behavior of log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogStyle {
    /// Color when writing to a terminal.
    #[default]
    Auto,
    /// Always emit ANSI colors.
    Always,
    /// Never emit ANSI colors.
    Never,
}

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "spatia=debug"). Without it `RUST_LOG` is used, then `info`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directives.
    pub env_filter: Option<String>,
    /// Output coloring.
    pub style: LogStyle,
}

static INIT: Once = Once::new();

/// Install the global logger once. Later calls are ignored, as is a logger
/// installed by someone else first.
pub fn init_logging(config: &LoggingConfig) {
    INIT.call_once(|| install(config));
}

#[cfg(not(target_arch = "wasm32"))]
fn install(config: &LoggingConfig) {
    let mut builder = env_logger::Builder::new();

    if let Some(filter) = &config.env_filter {
        builder.parse_filters(filter);
    } else if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        builder.filter_level(log::LevelFilter::Info);
    }

    builder.write_style(match config.style {
        LogStyle::Auto => env_logger::WriteStyle::Auto,
        LogStyle::Always => env_logger::WriteStyle::Always,
        LogStyle::Never => env_logger::WriteStyle::Never,
    });

    if builder.try_init().is_ok() {
        log::debug!("logging initialized");
    }
}

#[cfg(target_arch = "wasm32")]
fn install(_config: &LoggingConfig) {}
