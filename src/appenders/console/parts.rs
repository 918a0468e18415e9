//! Fixed-order prefix of a console line

use super::ConsoleWriter;
use crate::core::record::{
    Record, CONTEXT_FIELD, LEVEL_FIELD, MESSAGE_FIELD, MODE_FIELD, TIMESTAMP_FIELD,
};

/// The recognized part slots
///
/// This set is closed. A part name outside it still renders, through the
/// generic field-value formatter applied to the record's raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Timestamp,
    Level,
    Context,
    Mode,
    Message,
}

impl Slot {
    pub const ALL: [Slot; 5] = [
        Slot::Timestamp,
        Slot::Level,
        Slot::Context,
        Slot::Mode,
        Slot::Message,
    ];

    pub fn field_name(self) -> &'static str {
        match self {
            Slot::Timestamp => TIMESTAMP_FIELD,
            Slot::Level => LEVEL_FIELD,
            Slot::Context => CONTEXT_FIELD,
            Slot::Mode => MODE_FIELD,
            Slot::Message => MESSAGE_FIELD,
        }
    }

    pub fn from_field(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.field_name() == name)
    }
}

/// timestamp, level, context, mode, message
pub fn default_parts_order() -> Vec<String> {
    Slot::ALL.iter().map(|slot| slot.field_name().to_string()).collect()
}

impl ConsoleWriter {
    pub(super) fn write_parts(&self, buf: &mut Vec<u8>, record: &Record) {
        for part in &self.parts_order {
            if self.parts_exclude.contains(part) {
                continue;
            }

            let formatter = match Slot::from_field(part) {
                Some(Slot::Timestamp) => &self.formatters.timestamp,
                Some(Slot::Level) => &self.formatters.level,
                Some(Slot::Context) => &self.formatters.context,
                Some(Slot::Mode) => &self.formatters.mode,
                Some(Slot::Message) => &self.formatters.message,
                None => &self.formatters.field_value,
            };

            let text = formatter(record.get_or_null(part));
            if text.is_empty() {
                continue;
            }
            if !buf.is_empty() {
                buf.push(b' ');
            }
            buf.extend_from_slice(text.as_bytes());
        }
    }
}
