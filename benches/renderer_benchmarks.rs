//! Criterion benchmarks for rust_console_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_console_logger::prelude::*;
use std::io;

const SIMPLE: &[u8] = br#"{"timestamp":"2025-01-08T10:30:45Z","level":"info","message":"request served"}"#;

const WIDE: &[u8] = br#"{"timestamp":1736332245123456789,"level":"error","context":"http","mode":"tls","message":"upstream failed","error":"connection reset by peer","method":"GET","path":"/api/v1/users","status":502,"latency_ms":1250.5,"retry":{"attempt":3,"max":5},"tags":["edge","eu-west"],"user":"alice smith"}"#;

// ============================================================================
// Renderer Benchmarks
// ============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.throughput(Throughput::Elements(1));

    let colored = ConsoleWriter::builder().sink(io::sink()).build().unwrap();
    let plain = ConsoleWriter::builder()
        .no_color(true)
        .sink(io::sink())
        .build()
        .unwrap();
    let nanos = ConsoleWriter::builder()
        .sink(io::sink())
        .time_field_format(TimeFieldFormat::UnixNano)
        .build()
        .unwrap();

    group.bench_function("simple_colored", |b| {
        b.iter(|| colored.render(black_box(SIMPLE)).unwrap());
    });

    group.bench_function("simple_plain", |b| {
        b.iter(|| plain.render(black_box(SIMPLE)).unwrap());
    });

    group.bench_function("wide_record", |b| {
        b.iter(|| nanos.render(black_box(WIDE)).unwrap());
    });

    group.bench_function("decode_failure", |b| {
        b.iter(|| plain.render(black_box(b"{\"level\":")).is_err());
    });

    group.finish();
}

// ============================================================================
// Front-end Benchmarks
// ============================================================================

fn bench_logger(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger");
    group.throughput(Throughput::Elements(1));

    let writer = ConsoleWriter::builder()
        .no_color(true)
        .sink(io::sink())
        .build()
        .unwrap();
    let logger = Logger::builder()
        .min_level(LogLevel::Info)
        .appender(writer)
        .build()
        .unwrap();

    group.bench_function("info", |b| {
        b.iter(|| logger.info(black_box("benchmark message")));
    });

    group.bench_function("filtered_debug", |b| {
        b.iter(|| logger.debug(black_box("filtered")));
    });

    group.bench_function("entry_with_fields", |b| {
        b.iter(|| {
            logger.log_entry(
                LogEntry::new(LogLevel::Warn, "slow query")
                    .with_context("db")
                    .with_field("ms", 1250)
                    .with_field("table", "users"),
            )
        });
    });

    group.finish();
}

criterion_group!(benches, bench_render, bench_logger);
criterion_main!(benches);
