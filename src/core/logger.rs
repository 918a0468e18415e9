//! Structured logging front-end
//!
//! [`Logger`] filters by an explicit minimum level, encodes each event as a
//! JSON record and hands it to every appender. The level lives on the
//! instance, so tests and embedders can run several loggers side by side.

use super::{
    appender::Appender,
    config::LoggerConfig,
    error::Result,
    log_entry::LogEntry,
    log_level::LogLevel,
    timestamp::TimeFieldFormat,
};
use crate::appenders::console::ConsoleWriter;
use parking_lot::RwLock;
use std::any::Any;
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub struct Logger {
    min_level: Arc<RwLock<LogLevel>>,
    appenders: Arc<RwLock<Vec<Box<dyn Appender>>>>,
    time_field_format: TimeFieldFormat,
    logged: AtomicU64,
    dropped: AtomicU64,
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_level: Arc::new(RwLock::new(LogLevel::Info)),
            appenders: Arc::new(RwLock::new(Vec::new())),
            time_field_format: TimeFieldFormat::default(),
            logged: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Build a logger that renders to stderr
    ///
    /// The console writer and the record encoder share the configured
    /// timestamp encoding.
    pub fn init(config: &LoggerConfig) -> Result<Self> {
        Self::init_with_sink(config, io::stderr())
    }

    /// Same as [`init`](Logger::init) with an explicit destination
    pub fn init_with_sink<W>(config: &LoggerConfig, sink: W) -> Result<Self>
    where
        W: io::Write + Send + 'static,
    {
        let writer = ConsoleWriter::builder()
            .from_config(config.console.clone())
            .sink(sink)
            .build()?;

        Logger::builder()
            .min_level(config.level)
            .time_field_format(config.console.time_field_format.clone())
            .appender(writer)
            .build()
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.appenders.write().push(appender);
    }

    pub fn appender_names(&self) -> Vec<String> {
        self.appenders.read().iter().map(|a| a.name().to_string()).collect()
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn level(&self) -> LogLevel {
        *self.min_level.read()
    }

    /// Whether an event at `level` would reach the appenders
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }

    pub fn time_field_format(&self) -> &TimeFieldFormat {
        &self.time_field_format
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.enabled(level) {
            return;
        }
        self.dispatch(&LogEntry::new(level, message));
    }

    /// Log an entry carrying context, mode, error or extra fields
    pub fn log_entry(&self, entry: LogEntry) {
        if !self.enabled(entry.level) {
            return;
        }
        self.dispatch(&entry);
    }

    fn dispatch(&self, entry: &LogEntry) {
        let record = match entry.to_record(&self.time_field_format) {
            Ok(record) => record,
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to encode log entry: {}", e);
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        let mut appenders = self.appenders.write();
        if Self::process_sync(&mut appenders, &record) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        } else {
            self.logged.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Hand one record to every appender, isolating panics per appender
    ///
    /// Returns true when any appender failed.
    fn process_sync(appenders: &mut [Box<dyn Appender>], record: &[u8]) -> bool {
        let mut has_error = false;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(record)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Appender #{} ({}) failed: {}", idx, appender.name(), e);
                    has_error = true;
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} panicked: {}. \
                         Other appenders continue to function.",
                        idx,
                        panic_message(&*panic_info)
                    );
                    has_error = true;
                }
            }
        }

        has_error
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Log at fatal level
    ///
    /// Only the level is recorded; the process keeps running.
    #[inline]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }

    /// Log every line read from `reader` at `level`
    ///
    /// Useful for forwarding a child process's output. Returns the number of
    /// lines read, including those filtered out by the minimum level.
    pub fn sink_lines<R: BufRead>(&self, reader: R, level: LogLevel) -> io::Result<usize> {
        let mut count = 0;
        for line in reader.lines() {
            self.log(level, line?);
            count += 1;
        }
        Ok(count)
    }

    pub fn debug_sink<R: BufRead>(&self, reader: R) -> io::Result<usize> {
        self.sink_lines(reader, LogLevel::Debug)
    }

    pub fn warn_sink<R: BufRead>(&self, reader: R) -> io::Result<usize> {
        self.sink_lines(reader, LogLevel::Warn)
    }

    pub fn error_sink<R: BufRead>(&self, reader: R) -> io::Result<usize> {
        self.sink_lines(reader, LogLevel::Error)
    }

    /// Records every appender accepted
    pub fn logged_count(&self) -> u64 {
        self.logged.load(Ordering::Relaxed)
    }

    /// Records that failed to encode or that some appender rejected
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.write();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }

    /// Flush every appender; call before the process exits
    pub fn shutdown(&self) -> Result<()> {
        self.flush()
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let dropped = self.dropped_count();
        if dropped > 0 {
            eprintln!("[LOGGER WARNING] Logger shutting down with {} dropped logs", dropped);
        }
    }
}

pub struct LoggerBuilder {
    min_level: LogLevel,
    appenders: Vec<Box<dyn Appender>>,
    time_field_format: TimeFieldFormat,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            appenders: Vec::new(),
            time_field_format: TimeFieldFormat::default(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Timestamp encoding of produced records
    #[must_use = "builder methods return a new value"]
    pub fn time_field_format(mut self, format: TimeFieldFormat) -> Self {
        self.time_field_format = format;
        self
    }

    /// Validate the timestamp encoding and build the logger
    pub fn build(self) -> Result<Logger> {
        self.time_field_format.validate()?;

        let mut logger = Logger::new();
        logger.time_field_format = self.time_field_format;
        logger.set_level(self.min_level);
        for appender in self.appenders {
            logger.add_appender(appender);
        }
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
