//! Decoded structured log record
//!
//! A [`Record`] is one JSON object decoded into a field map. Numbers keep
//! their original textual token (serde_json is built with
//! `arbitrary_precision`), so nanosecond epochs and large counters render
//! exactly as they were encoded.

use super::error::{LoggerError, Result};
use serde_json::{Map, Value};

pub const TIMESTAMP_FIELD: &str = "timestamp";
pub const LEVEL_FIELD: &str = "level";
pub const MESSAGE_FIELD: &str = "message";
pub const CALLER_FIELD: &str = "caller";
pub const CONTEXT_FIELD: &str = "context";
pub const MODE_FIELD: &str = "mode";
pub const ERROR_FIELD: &str = "error";

/// Fields that never render as `name=value` entries
pub const RESERVED_FIELDS: [&str; 6] = [
    LEVEL_FIELD,
    TIMESTAMP_FIELD,
    MESSAGE_FIELD,
    CALLER_FIELD,
    CONTEXT_FIELD,
    MODE_FIELD,
];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_FIELDS.iter().any(|reserved| *reserved == name)
}

static NULL: Value = Value::Null;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Decode exactly one JSON object from `raw`
    ///
    /// Trailing whitespace (such as the newline a JSON encoder appends) is
    /// accepted; anything else after the object, or a non-object top level
    /// value, is a [`LoggerError::Decode`].
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let fields: Map<String, Value> = serde_json::from_slice(raw).map_err(LoggerError::Decode)?;
        Ok(Self { fields })
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Value for `name`, with an absent key reading as JSON null
    pub fn get_or_null(&self, name: &str) -> &Value {
        self.fields.get(name).unwrap_or(&NULL)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
