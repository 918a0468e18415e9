//! Timestamp encoding and display
//!
//! Two separate concerns live here:
//! - [`TimeFieldFormat`] is how a record *encodes* its timestamp field
//!   (a reference string layout or a unix number in a fixed unit).
//! - [`TimestampFormat`] is how the console *displays* a decoded instant.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Write as _};

/// Encoding of the timestamp field inside a record
///
/// String encodings are parsed with their layout; numeric encodings fix the
/// unit of a numeric timestamp token. String encodings read numbers as
/// seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFieldFormat {
    /// RFC 3339 string: `2025-01-08T10:30:45.123+02:00`
    #[default]
    Rfc3339,

    /// Custom strftime layout string
    ///
    /// Layouts without an offset are read in local time.
    Custom(String),

    /// Unix seconds number
    Unix,

    /// Unix milliseconds number
    UnixMs,

    /// Unix microseconds number
    UnixMicro,

    /// Unix nanoseconds number
    UnixNano,
}

impl TimeFieldFormat {
    /// Reject a custom layout chrono cannot render
    pub fn validate(&self) -> Result<()> {
        match self {
            TimeFieldFormat::Custom(layout) => validate_pattern("TimeFieldFormat", layout),
            _ => Ok(()),
        }
    }

    /// Encode an instant as the JSON value a record would carry
    pub fn encode<Tz>(&self, datetime: &DateTime<Tz>) -> Result<Value>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let value = match self {
            TimeFieldFormat::Rfc3339 => Value::String(datetime.to_rfc3339()),
            TimeFieldFormat::Custom(layout) => {
                let text = render_pattern(datetime, layout).ok_or_else(|| {
                    LoggerError::config(
                        "TimeFieldFormat",
                        format!("cannot render time with layout {:?}", layout),
                    )
                })?;
                Value::String(text)
            }
            TimeFieldFormat::Unix => Value::from(datetime.timestamp()),
            TimeFieldFormat::UnixMs => Value::from(datetime.timestamp_millis()),
            TimeFieldFormat::UnixMicro => Value::from(datetime.timestamp_micros()),
            TimeFieldFormat::UnixNano => datetime
                .timestamp_nanos_opt()
                .map(Value::from)
                .unwrap_or_else(|| Value::from(datetime.timestamp_micros())),
        };
        Ok(value)
    }

    /// Parse a string timestamp with this encoding's layout
    ///
    /// Numeric encodings have no string layout and always return `None`.
    pub fn parse_str(&self, s: &str) -> Option<DateTime<Local>> {
        match self {
            TimeFieldFormat::Rfc3339 => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Local)),
            TimeFieldFormat::Custom(layout) => DateTime::parse_from_str(s, layout)
                .ok()
                .map(|dt| dt.with_timezone(&Local))
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, layout)
                        .ok()
                        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
                }),
            _ => None,
        }
    }

    /// Interpret an integer epoch in this encoding's unit
    pub fn from_epoch(&self, value: i64) -> Option<DateTime<Utc>> {
        let (secs, nanos) = match self {
            TimeFieldFormat::UnixNano => split(value, 1_000_000_000, 1),
            TimeFieldFormat::UnixMicro => split(value, 1_000_000, 1_000),
            TimeFieldFormat::UnixMs => split(value, 1_000, 1_000_000),
            _ => (value, 0),
        };
        DateTime::from_timestamp(secs, nanos)
    }
}

fn split(value: i64, per_sec: i64, nanos_per_unit: i64) -> (i64, u32) {
    let secs = value.div_euclid(per_sec);
    let nanos = value.rem_euclid(per_sec) * nanos_per_unit;
    (secs, nanos as u32)
}

/// Check a strftime pattern without rendering it
///
/// Empty patterns and unknown directives such as `%Q` are rejected.
pub fn validate_pattern(component: &str, pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        return Err(LoggerError::config(component, "empty time pattern"));
    }
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(LoggerError::config(
            component,
            format!("invalid time pattern {:?}", pattern),
        ));
    }
    Ok(())
}

/// Render `pattern`, or `None` when chrono reports a formatting error
fn render_pattern<Tz>(datetime: &DateTime<Tz>, pattern: &str) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", datetime.format(pattern)).ok()?;
    Some(out)
}

/// Display pattern for rendered timestamps
///
/// # Examples
///
/// ```
/// use rust_console_logger::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let dt = Utc.with_ymd_and_hms(2025, 1, 8, 15, 4, 5).unwrap();
/// assert_eq!(TimestampFormat::Kitchen.format(&dt).as_deref(), Some("3:04PM"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Short time of day: `3:04PM`
    ///
    /// This is the default console format.
    #[default]
    Kitchen,

    /// 24-hour time of day: `15:04:05`
    TimeOnly,

    /// ISO 8601 with milliseconds and offset: `2025-01-08T10:30:45.123+00:00`
    Iso8601,

    /// ISO 8601 with microseconds and offset: `2025-01-08T10:30:45.123456+00:00`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Unix timestamp in microseconds: `1736332245123456`
    UnixMicros,

    /// Custom strftime format
    ///
    /// ```
    /// use rust_console_logger::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format an instant according to this pattern
    ///
    /// `None` only when a custom pattern fails to render.
    #[must_use]
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> Option<String>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let text = match self {
            TimestampFormat::Kitchen => datetime.format("%-I:%M%p").to_string(),
            TimestampFormat::TimeOnly => datetime.format("%H:%M:%S").to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string(),
            TimestampFormat::Iso8601Micros => {
                datetime.format("%Y-%m-%dT%H:%M:%S%.6f%:z").to_string()
            }
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().to_string(),
            TimestampFormat::Custom(format_str) => return render_pattern(datetime, format_str),
        };
        Some(text)
    }

    /// Reject a custom pattern chrono cannot render
    pub fn validate(&self) -> Result<()> {
        match self {
            TimestampFormat::Custom(pattern) => validate_pattern("TimestampFormat", pattern),
            _ => Ok(()),
        }
    }
}
