//! Sorted `name=value` block of a console line

use super::formatter::{needs_quote, quote};
use super::ConsoleWriter;
use crate::core::color::{colorize, ColorCode};
use crate::core::record::{is_reserved, Record, ERROR_FIELD};
use serde_json::Value;

/// Move `error` to the front of an already sorted list
///
/// Everything else keeps its relative order.
fn promote_error(fields: &mut [&str]) {
    if let Ok(idx) = fields.binary_search(&ERROR_FIELD) {
        fields[..=idx].rotate_right(1);
    }
}

impl ConsoleWriter {
    /// Field names in render order: byte-wise ascending, `error` first
    pub fn field_order<'r>(&self, record: &'r Record) -> Vec<&'r str> {
        let mut fields: Vec<&str> = record
            .keys()
            .filter(|name| !is_reserved(name) && !self.fields_exclude.contains(*name))
            .collect();
        fields.sort_unstable();
        promote_error(&mut fields);
        fields
    }

    pub(super) fn write_fields(&self, buf: &mut Vec<u8>, record: &Record) {
        let fields = self.field_order(record);
        if fields.is_empty() {
            return;
        }

        if !buf.is_empty() {
            buf.extend_from_slice(b"  ");
        }

        for (i, name) in fields.iter().enumerate() {
            if i > 0 {
                buf.push(b' ');
            }
            self.write_field(buf, name, record.get_or_null(name));
        }
    }

    fn write_field(&self, buf: &mut Vec<u8>, name: &str, value: &Value) {
        let (format_name, format_value) = if name == ERROR_FIELD {
            (
                &self.formatters.error_field_name,
                &self.formatters.error_field_value,
            )
        } else {
            (&self.formatters.field_name, &self.formatters.field_value)
        };

        buf.extend_from_slice(format_name(&Value::String(name.to_string())).as_bytes());

        let text = match value {
            Value::String(s) if needs_quote(s) => format_value(&Value::String(quote(s))),
            Value::String(_) | Value::Number(_) => format_value(value),
            other => match (self.marshaller)(other) {
                Ok(marshalled) => format_value(&Value::String(marshalled)),
                Err(err) => {
                    self.metrics.record_marshal_recovery();
                    colorize(format!("[error: {}]", err), ColorCode::Red, self.no_color)
                }
            },
        };
        buf.extend_from_slice(text.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;

    fn plain() -> ConsoleWriter {
        ConsoleWriter::builder()
            .no_color(true)
            .sink(std::io::sink())
            .build()
            .unwrap()
    }

    fn fields(writer: &ConsoleWriter, raw: &str) -> String {
        let record = Record::decode(raw.as_bytes()).unwrap();
        let mut buf = Vec::new();
        writer.write_fields(&mut buf, &record);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_promote_error_is_stable() {
        let mut names = vec!["a", "b", "error", "x", "z"];
        promote_error(&mut names);
        assert_eq!(names, vec!["error", "a", "b", "x", "z"]);

        let mut names = vec!["a", "b"];
        promote_error(&mut names);
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_sorted_fields() {
        assert_eq!(fields(&plain(), r#"{"b":"1","a":"2"}"#), "a=2 b=1");
    }

    #[test]
    fn test_error_first() {
        assert_eq!(fields(&plain(), r#"{"error":"boom","a":"1","z":"2"}"#), "error=boom a=1 z=2");
    }

    #[test]
    fn test_byte_order_puts_uppercase_first() {
        assert_eq!(fields(&plain(), r#"{"b":1,"B":2,"_":3}"#), "B=2 _=3 b=1");
    }

    #[test]
    fn test_reserved_and_excluded_fields_skipped() {
        let writer = ConsoleWriter::builder()
            .no_color(true)
            .sink(std::io::sink())
            .fields_exclude(["secret"])
            .build()
            .unwrap();
        let out = fields(
            &writer,
            r#"{"level":"info","timestamp":1,"message":"m","caller":"c","context":"x","mode":"y","secret":"s","keep":"k"}"#,
        );
        assert_eq!(out, "keep=k");
    }

    #[test]
    fn test_two_space_separator_after_parts() {
        let writer = plain();
        let record = Record::decode(br#"{"a":"1"}"#).unwrap();
        let mut buf = b"INF hi".to_vec();
        writer.write_fields(&mut buf, &record);
        assert_eq!(buf, b"INF hi  a=1");

        let record = Record::decode(br#"{"level":"info"}"#).unwrap();
        let mut buf = b"INF".to_vec();
        writer.write_fields(&mut buf, &record);
        assert_eq!(buf, b"INF");
    }

    #[test]
    fn test_value_shapes() {
        let out = fields(
            &plain(),
            r#"{"s":"two words","n":123456789012345678,"f":1.50,"b":true,"o":{"k":[1,2]},"z":null}"#,
        );
        assert_eq!(
            out,
            r#"b=true f=1.50 n=123456789012345678 o={"k":[1,2]} s="two words" z=null"#
        );
    }

    #[test]
    fn test_quoted_value_escapes() {
        assert_eq!(fields(&plain(), r#"{"q":"say \"hi\""}"#), r#"q="say \"hi\"""#);
        assert_eq!(fields(&plain(), r#"{"p":"a\\b"}"#), r#"p="a\\b""#);
        assert_eq!(fields(&plain(), r#"{"c":"\u0001x"}"#), r#"c="\x01x""#);
    }

    #[test]
    fn test_marshal_failure_is_inline() {
        let writer = ConsoleWriter::builder()
            .no_color(true)
            .sink(std::io::sink())
            .marshaller(|_| Err(LoggerError::marshal("unsupported")))
            .build()
            .unwrap();
        assert_eq!(
            fields(&writer, r#"{"a":"1","obj":{"k":1},"z":"2"}"#),
            "a=1 obj=[error: unsupported] z=2"
        );
        assert_eq!(writer.metrics().marshal_recoveries(), 1);
    }

    #[test]
    fn test_marshal_failure_colored() {
        let writer = ConsoleWriter::builder()
            .sink(std::io::sink())
            .marshaller(|_| Err(LoggerError::marshal("nope")))
            .build()
            .unwrap();
        let out = fields(&writer, r#"{"o":[1]}"#);
        assert!(out.ends_with("\x1b[31m[error: nope]\x1b[0m"), "got {:?}", out);
    }

    #[test]
    fn test_error_formatters_apply_only_to_error() {
        let writer = ConsoleWriter::builder()
            .no_color(true)
            .sink(std::io::sink())
            .format_error_field_name(|_| "E:".to_string())
            .format_field_name(|name| format!("{}:", crate::appenders::console::formatter::value_text(name)))
            .build()
            .unwrap();
        assert_eq!(fields(&writer, r#"{"error":"x","a":"1"}"#), "E:x a:1");
    }
}
