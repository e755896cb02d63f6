//! Structured logging setup.
//!
//! Production runs emit one JSON object per line; development runs use the
//! pretty text format. `RUST_LOG` overrides the configured level when set.
//!
//! ```json
//! {"timestamp":"2024-01-15T10:30:00.000Z","level":"INFO","target":"ownergate::http","fields":{"message":"request completed","status":302}}
//! ```

use tracing::{subscriber::SetGlobalDefaultError, Level};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use ownergate_server::config::LoggingSettings;

/// Output format of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Level used when `RUST_LOG` is not set.
    pub level: Level,
    /// Also log a line when a span closes, with its busy time.
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            level: Level::INFO,
            span_events: false,
        }
    }
}

impl LoggingConfig {
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

impl From<&LoggingSettings> for LoggingConfig {
    fn from(settings: &LoggingSettings) -> Self {
        Self {
            format: if settings.json {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            },
            level: parse_log_level(&settings.level),
            span_events: settings.span_events,
        }
    }
}

/// Parses a configured log level, falling back to INFO.
///
/// Configuration validation already rejects unknown names.
pub fn parse_log_level(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<(), SetGlobalDefaultError> {
    let registry = tracing_subscriber::registry().with(config.filter());

    match config.format {
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_span_events(config.span_events())
                    .with_target(true),
            ),
        ),
        LogFormat::Pretty => tracing::subscriber::set_global_default(
            registry.with(
                fmt::layer()
                    .pretty()
                    .with_span_events(config.span_events())
                    .with_target(true),
            ),
        ),
    }
}
