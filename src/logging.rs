//=========================================================================
// Logging
//=========================================================================
//
// Process-wide `env_logger` setup.
//
// `EngineBuilder::build` calls `init_logging` with the configured level.
// `RUST_LOG` takes precedence when set. Only the first call in a process
// installs anything, and an already-installed logger (an embedding
// application's or a test harness's) is left alone.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Once;

use log::LevelFilter;

//=== LoggingConfig =======================================================

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax, e.g.
/// `"warn,aetheric_loop=debug"`. When absent, `RUST_LOG` is consulted and
/// then `level`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: LevelFilter,
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Warn,
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl From<LevelFilter> for LoggingConfig {
    fn from(level: LevelFilter) -> Self {
        Self { level, ..Self::default() }
    }
}

//=== Initialization ======================================================

static INIT: Once = Once::new();

/// Installs the global logger once per process.
///
/// Subsequent calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter.as_deref() {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(config.level);
        }

        builder.write_style(config.write_style);

        match builder.try_init() {
            Ok(()) => log::debug!("Logging initialized at {}", config.level),
            Err(_) => log::debug!("Logger already installed; keeping it"),
        }
    });
}

//=========================================================================
// Unit Tests
//=========================================================================
