use crate::errors::types::{Error, Result};
use serde::Deserialize;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

/// Subscriber settings, read from the `[logging]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`; `RUST_LOG` directives add to it
    pub level: String,
    /// One JSON object per line on stdout
    pub json: bool,
    /// Source file and line of each event
    pub file_info: bool,
    /// Span enter/exit events, e.g. around each console execution
    pub log_spans: bool,
    pub app_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            json: false,
            file_info: false,
            log_spans: false,
            app_name: "bwks".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn new(level: Level, app_name: impl Into<String>) -> Self {
        LoggingConfig {
            level: level.to_string().to_lowercase(),
            app_name: app_name.into(),
            ..Default::default()
        }
    }

    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn spans(mut self, log_spans: bool) -> Self {
        self.log_spans = log_spans;
        self
    }
}

/// Install the global `tracing` subscriber
///
/// Fails with [`Error::Logging`] when one is already installed.
pub fn setup_logging(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let span_events = if config.log_spans {
        FmtSpan::ACTIVE
    } else {
        FmtSpan::NONE
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(span_events)
        .with_file(config.file_info)
        .with_line_number(config.file_info);

    let installed = if config.json {
        subscriber.with_writer(std::io::stdout).json().try_init()
    } else {
        subscriber.try_init()
    };

    installed.map_err(|e| Error::Logging(e.to_string()))
}

/// Case-insensitive level name
pub fn parse_log_level(level: &str) -> Result<Level> {
    Level::from_str(level).map_err(|_| Error::Config(format!("Invalid log level: {}", level)))
}

pub fn log_welcome(app_name: &str, version: &str) {
    tracing::info!(app = app_name, version, "starting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_log_level("WARN").unwrap(), Level::WARN);
        assert!(matches!(parse_log_level("loud"), Err(Error::Config(_))));
    }

    #[test]
    fn test_new_config_lowercases_level() {
        let config = LoggingConfig::new(Level::TRACE, "xsi").json(true);
        assert_eq!(config.level, "trace");
        assert_eq!(config.app_name, "xsi");
        assert!(config.json);
        assert!(!config.file_info);
    }
}
