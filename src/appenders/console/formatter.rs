//! Pluggable formatters and their built-in defaults
//!
//! Every semantic slot of a console line has one [`Formatter`]. Callers
//! override any of them through [`FormatterRegistry`]; whatever stays unset
//! resolves to the built-ins below when the writer is built.

use crate::core::color::{colorize, colorize_nested, ColorCode};
use crate::core::error::{BoxError, LoggerError, Result};
use crate::core::log_level::LogLevel;
use crate::core::record::Record;
use crate::core::timestamp::{TimeFieldFormat, TimestampFormat};
use chrono::Local;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::sync::Arc;

/// Converts one decoded value into display text
pub type Formatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Turns a structured field value (object, array, bool, null) into text
pub type Marshaller = Arc<dyn Fn(&Value) -> Result<String> + Send + Sync>;

/// Appends trailing content to a rendered line before its terminator
pub type ExtensionHook =
    Arc<dyn Fn(&Record, &mut Vec<u8>) -> std::result::Result<(), BoxError> + Send + Sync>;

/// Text a null context renders as
pub const CONTEXT_DEFAULT: &str = "core";

/// Width the context tag is padded to
pub const CONTEXT_WIDTH: usize = 6;

/// Width of the level column
pub const LEVEL_WIDTH: usize = 3;

/// Slots a formatter can be installed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatterSlot {
    Timestamp,
    Level,
    Message,
    Context,
    Mode,
    FieldName,
    FieldValue,
    ErrorFieldName,
    ErrorFieldValue,
}

/// Formatter overrides collected while configuring a writer
#[derive(Clone, Default)]
pub struct FormatterRegistry {
    overrides: HashMap<FormatterSlot, Formatter>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, slot: FormatterSlot, formatter: Formatter) {
        self.overrides.insert(slot, formatter);
    }

    pub fn get(&self, slot: FormatterSlot) -> Option<&Formatter> {
        self.overrides.get(&slot)
    }

    pub fn is_overridden(&self, slot: FormatterSlot) -> bool {
        self.overrides.contains_key(&slot)
    }

    /// Fill every unset slot with its built-in default
    pub fn resolve(&self, settings: &DefaultSettings) -> Formatters {
        let pick = |slot: FormatterSlot, default: fn(&DefaultSettings) -> Formatter| {
            self.overrides
                .get(&slot)
                .cloned()
                .unwrap_or_else(|| default(settings))
        };

        Formatters {
            timestamp: pick(FormatterSlot::Timestamp, default_timestamp),
            level: pick(FormatterSlot::Level, default_level),
            message: pick(FormatterSlot::Message, default_message),
            context: pick(FormatterSlot::Context, default_context),
            mode: pick(FormatterSlot::Mode, default_mode),
            field_name: pick(FormatterSlot::FieldName, default_field_name),
            field_value: pick(FormatterSlot::FieldValue, default_field_value),
            error_field_name: pick(FormatterSlot::ErrorFieldName, default_error_field_name),
            error_field_value: pick(FormatterSlot::ErrorFieldValue, default_error_field_value),
        }
    }
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("overrides", &self.overrides.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Inputs the built-in formatters are parameterized by
#[derive(Debug, Clone, Default)]
pub struct DefaultSettings {
    pub no_color: bool,
    pub time_format: TimestampFormat,
    pub time_field_format: TimeFieldFormat,
}

/// The resolved formatter for every slot
#[derive(Clone)]
pub struct Formatters {
    pub timestamp: Formatter,
    pub level: Formatter,
    pub message: Formatter,
    pub context: Formatter,
    pub mode: Formatter,
    pub field_name: Formatter,
    pub field_value: Formatter,
    pub error_field_name: Formatter,
    pub error_field_value: Formatter,
}

impl fmt::Debug for Formatters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Formatters { .. }")
    }
}

/// The default marshaller: compact JSON
pub fn json_marshaller() -> Marshaller {
    Arc::new(|value| serde_json::to_string(value).map_err(|e| LoggerError::marshal(e.to_string())))
}

/// Raw display text of a value: strings unquoted, null empty, anything else
/// as its JSON token
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

/// Escape line breaks and tabs so one record stays on one line
pub fn sanitize(text: &str) -> Cow<'_, str> {
    if text.contains(['\n', '\r', '\t']) {
        Cow::Owned(
            text.replace('\n', "\\n")
                .replace('\r', "\\r")
                .replace('\t', "\\t"),
        )
    } else {
        Cow::Borrowed(text)
    }
}

/// Whether a string field value must be quoted
///
/// Anything outside printable ASCII, plus space, backslash and double quote.
pub fn needs_quote(s: &str) -> bool {
    s.bytes()
        .any(|b| b < 0x20 || b > 0x7e || b == b' ' || b == b'\\' || b == b'"')
}

/// Quote and escape a string field value
///
/// Control bytes use the short C escapes where one exists and `\xNN`
/// otherwise. Other control characters become `\uNNNN` or `\UNNNNNNNN`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0b' => out.push_str("\\v"),
            c if (c as u32) < 0x20 || c == '\x7f' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if c.is_control() && (c as u32) < 0x10000 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\U{:08x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn default_timestamp(settings: &DefaultSettings) -> Formatter {
    let DefaultSettings {
        no_color,
        time_format,
        time_field_format,
    } = settings.clone();

    Arc::new(move |value| {
        let text = match value {
            Value::String(s) => time_field_format
                .parse_str(s)
                .and_then(|datetime| time_format.format(&datetime))
                .unwrap_or_else(|| s.clone()),
            Value::Number(n) => n
                .as_i64()
                .and_then(|i| time_field_format.from_epoch(i))
                .and_then(|datetime| time_format.format(&datetime.with_timezone(&Local)))
                .unwrap_or_else(|| n.to_string()),
            _ => "<nil>".to_string(),
        };
        colorize(sanitize(&text), ColorCode::DarkGray, no_color)
    })
}

fn fit_level(text: &str) -> String {
    let upper = sanitize(text).to_uppercase();
    format!("{:<width$.width$}", upper, width = LEVEL_WIDTH)
}

fn default_level(settings: &DefaultSettings) -> Formatter {
    let no_color = settings.no_color;

    Arc::new(move |value| match value {
        Value::String(s) => match LogLevel::from_token(s) {
            Some(level) if level.is_bold() => colorize_nested(
                level.abbreviation(),
                level.color_code(),
                ColorCode::Bold,
                no_color,
            ),
            Some(level) => colorize(level.abbreviation(), level.color_code(), no_color),
            None => colorize(fit_level(s), ColorCode::Bold, no_color),
        },
        Value::Null => colorize("???", ColorCode::Bold, no_color),
        other => fit_level(&other.to_string()),
    })
}

fn default_context(settings: &DefaultSettings) -> Formatter {
    let no_color = settings.no_color;

    Arc::new(move |value| {
        let text = match value {
            Value::Null => Cow::Borrowed(CONTEXT_DEFAULT),
            other => value_text(other),
        };
        colorize(
            format!("{:<width$}", sanitize(&text), width = CONTEXT_WIDTH),
            ColorCode::Bold,
            no_color,
        )
    })
}

fn default_mode(settings: &DefaultSettings) -> Formatter {
    let no_color = settings.no_color;

    Arc::new(move |value| match value {
        Value::Null => String::new(),
        other => colorize(
            format!("{}: ", sanitize(&value_text(other))),
            ColorCode::Red,
            no_color,
        ),
    })
}

fn default_message(_: &DefaultSettings) -> Formatter {
    Arc::new(|value| sanitize(&value_text(value)).into_owned())
}

fn default_field_name(settings: &DefaultSettings) -> Formatter {
    let no_color = settings.no_color;
    Arc::new(move |name| {
        colorize(
            format!("{}=", sanitize(&value_text(name))),
            ColorCode::Cyan,
            no_color,
        )
    })
}

fn default_field_value(_: &DefaultSettings) -> Formatter {
    Arc::new(|value| sanitize(&value_text(value)).into_owned())
}

fn default_error_field_name(settings: &DefaultSettings) -> Formatter {
    default_field_name(settings)
}

fn default_error_field_value(settings: &DefaultSettings) -> Formatter {
    let no_color = settings.no_color;
    Arc::new(move |value| colorize(sanitize(&value_text(value)), ColorCode::Red, no_color))
}
