//! Property-based tests for rust_console_logger using proptest

use proptest::prelude::*;
use rust_console_logger::prelude::*;
use serde_json::{Map, Value};

fn plain_writer() -> ConsoleWriter {
    ConsoleWriter::builder()
        .no_color(true)
        .sink(std::io::sink())
        .build()
        .unwrap()
}

fn fields_only_writer() -> ConsoleWriter {
    ConsoleWriter::builder()
        .no_color(true)
        .sink(std::io::sink())
        .parts_order(Vec::<String>::new())
        .build()
        .unwrap()
}

fn any_level() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        prop::sample::select(LogLevel::ALL.to_vec()).prop_map(|l| Value::from(l.to_str())),
        "[a-zA-Z]{0,8}".prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
    ]
}

fn any_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        ".{0,24}".prop_map(Value::from),
    ]
}

fn any_value() -> impl Strategy<Value = Value> {
    any_scalar().prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn any_record() -> impl Strategy<Value = Map<String, Value>> {
    (
        any_level(),
        any_scalar(),
        any_scalar(),
        any_scalar(),
        prop::collection::btree_map("[a-zA-Z_]{1,8}", any_value(), 0..8),
    )
        .prop_map(|(level, message, context, mode, fields)| {
            let mut map: Map<String, Value> = fields.into_iter().collect();
            map.insert("level".into(), level);
            map.insert("message".into(), message);
            map.insert("context".into(), context);
            map.insert("mode".into(), mode);
            map
        })
}

fn encode(map: &Map<String, Value>) -> Vec<u8> {
    serde_json::to_vec(map).unwrap()
}

proptest! {
    /// Every well-formed record renders to exactly one terminated line
    #[test]
    fn test_exactly_one_terminator(record in any_record()) {
        let line = plain_writer().render_to_string(&encode(&record)).unwrap();
        prop_assert!(line.ends_with('\n'));
        prop_assert_eq!(line.matches('\n').count(), 1);
    }

    /// Disabled color never emits an escape byte
    #[test]
    fn test_no_escape_without_color(record in any_record()) {
        let line = plain_writer().render_to_string(&encode(&record)).unwrap();
        prop_assert!(!line.contains('\x1b'));
    }

    /// Field names come out byte-wise ascending with `error` first
    #[test]
    fn test_field_order(
        names in prop::collection::btree_set("[a-z]{1,6}", 0..10),
        with_error in any::<bool>(),
    ) {
        let mut map = Map::new();
        for name in &names {
            map.insert(name.clone(), Value::from("v"));
        }
        if with_error {
            map.insert("error".into(), Value::from("v"));
        }

        let writer = fields_only_writer();
        let record = Record::from_map(map);
        let order = writer.field_order(&record);

        if with_error || names.contains("error") {
            prop_assert_eq!(order.first().copied(), Some("error"));
        }
        let rest: Vec<&str> = order.iter().copied().filter(|n| *n != "error").collect();
        let mut sorted = rest.clone();
        sorted.sort_unstable();
        prop_assert_eq!(rest, sorted);
    }

    /// Integer tokens render byte-for-byte
    #[test]
    fn test_integer_tokens_preserved(n in any::<i64>(), big in any::<u64>()) {
        let raw = format!(r#"{{"n":{},"big":{}}}"#, n, big);
        let line = fields_only_writer().render_to_string(raw.as_bytes()).unwrap();
        prop_assert_eq!(line, format!("big={} n={}\n", big, n));
    }

    /// A null mode renders the same as no mode at all
    #[test]
    fn test_null_mode_is_absent(mut record in any_record()) {
        let writer = plain_writer();
        record.insert("mode".into(), Value::Null);
        let with_null = writer.render_to_string(&encode(&record)).unwrap();
        record.remove("mode");
        let absent = writer.render_to_string(&encode(&record)).unwrap();
        prop_assert_eq!(with_null, absent);
    }

    /// Anything that is not a JSON object fails to decode
    #[test]
    fn test_scalars_rejected(value in any_scalar()) {
        let raw = serde_json::to_vec(&value).unwrap();
        let err = plain_writer().render(&raw).unwrap_err();
        prop_assert!(matches!(err, LoggerError::Decode(_)));
    }

    /// LogLevel string conversions roundtrip
    #[test]
    fn test_log_level_str_roundtrip(level in prop::sample::select(LogLevel::ALL.to_vec())) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
        prop_assert_eq!(LogLevel::from_name_or_info(level.to_str()), level);
    }

    /// Unknown level names fall back to info
    #[test]
    fn test_unknown_level_is_info(name in "[0-9]{1,6}") {
        prop_assert_eq!(LogLevel::from_name_or_info(&name), LogLevel::Info);
    }
}
