//! Serde-loadable logger configuration

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use crate::appenders::console::ConsoleConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for [`Logger::init`](super::Logger::init)
///
/// # Example
///
/// ```
/// use rust_console_logger::core::{LogLevel, LoggerConfig};
///
/// let config = LoggerConfig::from_json(r#"{"level":"debug","console":{"no_color":true}}"#).unwrap();
/// assert_eq!(config.level, LogLevel::Debug);
/// assert!(config.console.no_color);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum level that reaches the appenders
    pub level: LogLevel,
    pub console: ConsoleConfig,
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LoggerError::config("LoggerConfig", e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::config("LoggerConfig", format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timestamp::TimeFieldFormat;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(LoggerConfig::from_json("{}").unwrap(), LoggerConfig::default());
    }

    #[test]
    fn test_nested_console_settings() {
        let config = LoggerConfig::from_json(
            r#"{"level":"warn","console":{"time_field_format":"UnixMs","parts_exclude":["context"]}}"#,
        )
        .unwrap();
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.console.time_field_format, TimeFieldFormat::UnixMs);
        assert_eq!(config.console.parts_exclude, vec!["context".to_string()]);
        assert!(!config.console.no_color);
    }

    #[test]
    fn test_invalid_json() {
        let err = LoggerConfig::from_json(r#"{"level":"loud"}"#).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = LoggerConfig::from_file("/nonexistent/logger.json").unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
