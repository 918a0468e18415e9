//! Log entry structure

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::record::{
    CALLER_FIELD, CONTEXT_FIELD, ERROR_FIELD, LEVEL_FIELD, MESSAGE_FIELD, MODE_FIELD,
    TIMESTAMP_FIELD,
};
use super::timestamp::TimeFieldFormat;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fmt;

/// One event on its way to the appenders
///
/// Built by the [`Logger`](super::Logger) front-end and encoded into a JSON
/// record with [`to_record`](LogEntry::to_record).
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub context: Option<String>,
    pub mode: Option<String>,
    pub error: Option<String>,
    pub caller: Option<String>,
    pub fields: Map<String, Value>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
            context: None,
            mode: None,
            error: None,
            caller: None,
            fields: Map::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_error(mut self, error: impl fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_caller(mut self, file: &str, line: u32) -> Self {
        self.caller = Some(format!("{}:{}", file, line));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Encode as one JSON object
    ///
    /// Reserved keys (level, timestamp, message and the optional context,
    /// mode, error, caller) replace user fields of the same name.
    pub fn to_record(&self, time_field_format: &TimeFieldFormat) -> Result<Vec<u8>> {
        let mut map = self.fields.clone();

        map.insert(TIMESTAMP_FIELD.into(), time_field_format.encode(&self.timestamp)?);
        map.insert(LEVEL_FIELD.into(), Value::from(self.level.to_str()));
        map.insert(MESSAGE_FIELD.into(), Value::from(self.message.as_str()));

        let optional = [
            (CONTEXT_FIELD, &self.context),
            (MODE_FIELD, &self.mode),
            (ERROR_FIELD, &self.error),
            (CALLER_FIELD, &self.caller),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                map.insert(name.into(), Value::from(value.as_str()));
            }
        }

        serde_json::to_vec(&map).map_err(|e| LoggerError::marshal(e.to_string()))
    }
}
