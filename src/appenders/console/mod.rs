//! Console renderer for encoded log records
//!
//! [`ConsoleWriter`] takes one JSON-encoded record per call and writes it as
//! a single colorized line:
//!
//! ```text
//! 3:04PM INF core   listening  addr=0.0.0.0:8080 tls=false
//! ```
//!
//! The line is built in order: decode, parts (timestamp, level, context,
//! mode, message), sorted fields with `error` first, the optional extension
//! hook, then one flush of the whole line to the sink.

mod fields;
pub mod formatter;
mod parts;

pub use formatter::{
    json_marshaller, DefaultSettings, ExtensionHook, Formatter, FormatterRegistry, FormatterSlot,
    Formatters, Marshaller,
};
pub use parts::{default_parts_order, Slot};

use crate::core::buffer_pool::{BufferPool, DEFAULT_MAX_IDLE};
use crate::core::error::{BoxError, LoggerError, Result};
use crate::core::metrics::RenderMetrics;
use crate::core::record::Record;
use crate::core::timestamp::{TimeFieldFormat, TimestampFormat};
use crate::core::Appender;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// Data-only console settings, loadable from a config file
///
/// # Example
///
/// ```
/// use rust_console_logger::appenders::console::ConsoleConfig;
///
/// let config: ConsoleConfig =
///     serde_json::from_str(r#"{"no_color":true,"fields_exclude":["pid"]}"#).unwrap();
/// assert!(config.no_color);
/// assert_eq!(config.parts_order.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub no_color: bool,
    pub time_format: TimestampFormat,
    pub time_field_format: TimeFieldFormat,
    pub parts_order: Vec<String>,
    pub parts_exclude: Vec<String>,
    pub fields_exclude: Vec<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            time_format: TimestampFormat::default(),
            time_field_format: TimeFieldFormat::default(),
            parts_order: default_parts_order(),
            parts_exclude: Vec::new(),
            fields_exclude: Vec::new(),
        }
    }
}

/// Renders encoded records as human-readable lines
///
/// Configuration is fixed at build time; `render` takes `&self`, so one
/// writer can be shared across threads. Each call renders into its own
/// pooled buffer and reaches the sink in a single `write_all`.
pub struct ConsoleWriter {
    sink: Mutex<Box<dyn Write + Send>>,
    no_color: bool,
    parts_order: Vec<String>,
    parts_exclude: HashSet<String>,
    fields_exclude: HashSet<String>,
    formatters: Formatters,
    marshaller: Marshaller,
    extension: Option<ExtensionHook>,
    pool: BufferPool,
    metrics: Arc<RenderMetrics>,
}

impl ConsoleWriter {
    /// A writer with every default, rendering to stderr
    pub fn new() -> Self {
        Self::from_parts(ConsoleWriterBuilder::new())
    }

    pub fn builder() -> ConsoleWriterBuilder {
        ConsoleWriterBuilder::new()
    }

    /// Render one encoded record and write it to the sink
    ///
    /// Returns the number of input bytes consumed. On a decode or extension
    /// failure nothing is written; a sink failure is returned as is.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_console_logger::ConsoleWriter;
    ///
    /// let writer = ConsoleWriter::builder()
    ///     .no_color(true)
    ///     .sink(std::io::sink())
    ///     .build()
    ///     .unwrap();
    ///
    /// let raw = br#"{"level":"info","message":"ready"}"#;
    /// assert_eq!(writer.render(raw).unwrap(), raw.len());
    /// assert!(writer.render(b"not json").is_err());
    /// ```
    pub fn render(&self, raw: &[u8]) -> Result<usize> {
        let record = Record::decode(raw).inspect_err(|_| {
            self.metrics.record_decode_failure();
        })?;

        let mut buf = self.pool.acquire();
        self.render_into(&record, &mut buf)?;

        if let Err(e) = self.sink.lock().write_all(&buf) {
            self.metrics.record_sink_failure();
            return Err(LoggerError::SinkWrite(e));
        }

        self.metrics.record_written();
        Ok(raw.len())
    }

    /// Render one encoded record to a string without touching the sink
    pub fn render_to_string(&self, raw: &[u8]) -> Result<String> {
        let record = Record::decode(raw)?;
        let mut buf = Vec::new();
        self.render_into(&record, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Render a decoded record, including the line terminator, into `buf`
    pub fn render_into(&self, record: &Record, buf: &mut Vec<u8>) -> Result<()> {
        self.write_parts(buf, record);
        self.write_fields(buf, record);

        if let Some(hook) = &self.extension {
            if let Err(e) = hook(record, buf) {
                self.metrics.record_extension_failure();
                return Err(LoggerError::Extension(e));
            }
        }

        buf.push(b'\n');
        Ok(())
    }

    /// Flush the underlying sink
    pub fn flush_sink(&self) -> Result<()> {
        self.sink.lock().flush().map_err(LoggerError::SinkWrite)
    }

    /// Shared handle to this writer's counters
    pub fn metrics(&self) -> Arc<RenderMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn no_color(&self) -> bool {
        self.no_color
    }

    pub fn parts_order(&self) -> &[String] {
        &self.parts_order
    }

    /// Scratch buffers currently parked in the pool
    pub fn idle_buffers(&self) -> usize {
        self.pool.idle()
    }

    fn from_parts(builder: ConsoleWriterBuilder) -> Self {
        let ConsoleWriterBuilder {
            config,
            sink,
            registry,
            marshaller,
            extension,
            max_idle_buffers,
        } = builder;

        let formatters = registry.resolve(&DefaultSettings {
            no_color: config.no_color,
            time_format: config.time_format,
            time_field_format: config.time_field_format,
        });

        Self {
            sink: Mutex::new(sink.unwrap_or_else(|| Box::new(io::stderr()))),
            no_color: config.no_color,
            parts_order: config.parts_order,
            parts_exclude: config.parts_exclude.into_iter().collect(),
            fields_exclude: config.fields_exclude.into_iter().collect(),
            formatters,
            marshaller: marshaller.unwrap_or_else(json_marshaller),
            extension,
            pool: BufferPool::with_max_idle(max_idle_buffers),
            metrics: Arc::new(RenderMetrics::new()),
        }
    }
}

impl Default for ConsoleWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConsoleWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleWriter")
            .field("no_color", &self.no_color)
            .field("parts_order", &self.parts_order)
            .field("parts_exclude", &self.parts_exclude)
            .field("fields_exclude", &self.fields_exclude)
            .field("extension", &self.extension.is_some())
            .field("idle_buffers", &self.pool.idle())
            .finish()
    }
}

impl Write for &ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.render(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.lock().flush()
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.render(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.get_mut().flush()
    }
}

impl Appender for ConsoleWriter {
    fn append(&mut self, record: &[u8]) -> Result<()> {
        self.render(record).map(|_| ())
    }

    fn flush(&mut self) -> Result<()> {
        self.flush_sink()
    }

    fn name(&self) -> &str {
        "console"
    }
}

impl Appender for Arc<ConsoleWriter> {
    fn append(&mut self, record: &[u8]) -> Result<()> {
        self.render(record).map(|_| ())
    }

    fn flush(&mut self) -> Result<()> {
        self.flush_sink()
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Builder for [`ConsoleWriter`]
///
/// # Example
///
/// ```
/// use rust_console_logger::appenders::console::ConsoleWriter;
/// use rust_console_logger::core::TimestampFormat;
///
/// let writer = ConsoleWriter::builder()
///     .sink(Vec::new())
///     .time_format(TimestampFormat::TimeOnly)
///     .fields_exclude(["pid", "host"])
///     .format_message(|v| v.as_str().unwrap_or_default().to_uppercase())
///     .build()
///     .unwrap();
/// ```
pub struct ConsoleWriterBuilder {
    config: ConsoleConfig,
    sink: Option<Box<dyn Write + Send>>,
    registry: FormatterRegistry,
    marshaller: Option<Marshaller>,
    extension: Option<ExtensionHook>,
    max_idle_buffers: usize,
}

impl ConsoleWriterBuilder {
    pub fn new() -> Self {
        Self {
            config: ConsoleConfig::default(),
            sink: None,
            registry: FormatterRegistry::new(),
            marshaller: None,
            extension: None,
            max_idle_buffers: DEFAULT_MAX_IDLE,
        }
    }

    /// Start from a loaded [`ConsoleConfig`]
    #[must_use = "builder methods return a new value"]
    pub fn from_config(mut self, config: ConsoleConfig) -> Self {
        self.config = config;
        self
    }

    /// Destination of rendered lines (default: stderr)
    #[must_use = "builder methods return a new value"]
    pub fn sink<W: Write + Send + 'static>(mut self, sink: W) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn no_color(mut self, no_color: bool) -> Self {
        self.config.no_color = no_color;
        self
    }

    /// Display pattern for the timestamp part
    #[must_use = "builder methods return a new value"]
    pub fn time_format(mut self, format: TimestampFormat) -> Self {
        self.config.time_format = format;
        self
    }

    /// Display the timestamp with a strftime-compatible pattern
    #[must_use = "builder methods return a new value"]
    pub fn custom_time_format(mut self, format_str: &str) -> Self {
        self.config.time_format = TimestampFormat::Custom(format_str.to_string());
        self
    }

    /// How records encode their timestamp field
    #[must_use = "builder methods return a new value"]
    pub fn time_field_format(mut self, format: TimeFieldFormat) -> Self {
        self.config.time_field_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn parts_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.parts_order = order.into_iter().map(Into::into).collect();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn parts_exclude<I, S>(mut self, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.parts_exclude = parts.into_iter().map(Into::into).collect();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn fields_exclude<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.fields_exclude = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Install a formatter for any slot
    #[must_use = "builder methods return a new value"]
    pub fn formatter<F>(mut self, slot: FormatterSlot, formatter: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.registry.set(slot, Arc::new(formatter));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format_timestamp<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter(FormatterSlot::Timestamp, f)
    }

    #[must_use = "builder methods return a new value"]
    pub fn format_level<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter(FormatterSlot::Level, f)
    }

    #[must_use = "builder methods return a new value"]
    pub fn format_message<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter(FormatterSlot::Message, f)
    }

    #[must_use = "builder methods return a new value"]
    pub fn format_context<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter(FormatterSlot::Context, f)
    }

    #[must_use = "builder methods return a new value"]
    pub fn format_mode<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter(FormatterSlot::Mode, f)
    }

    #[must_use = "builder methods return a new value"]
    pub fn format_field_name<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter(FormatterSlot::FieldName, f)
    }

    #[must_use = "builder methods return a new value"]
    pub fn format_field_value<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter(FormatterSlot::FieldValue, f)
    }

    #[must_use = "builder methods return a new value"]
    pub fn format_error_field_name<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter(FormatterSlot::ErrorFieldName, f)
    }

    #[must_use = "builder methods return a new value"]
    pub fn format_error_field_value<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter(FormatterSlot::ErrorFieldValue, f)
    }

    /// Serializer for object, array, bool and null field values
    #[must_use = "builder methods return a new value"]
    pub fn marshaller<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<String> + Send + Sync + 'static,
    {
        self.marshaller = Some(Arc::new(f));
        self
    }

    /// Hook that may append to the line before its terminator
    ///
    /// # Example
    ///
    /// ```
    /// use rust_console_logger::ConsoleWriter;
    ///
    /// let writer = ConsoleWriter::builder()
    ///     .sink(std::io::sink())
    ///     .extension(|record, buf| {
    ///         if let Some(stack) = record.get("stack").and_then(|v| v.as_str()) {
    ///             buf.extend_from_slice(b"\n");
    ///             buf.extend_from_slice(stack.as_bytes());
    ///         }
    ///         Ok(())
    ///     })
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn extension<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Record, &mut Vec<u8>) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.extension = Some(Arc::new(hook));
        self
    }

    /// Idle scratch buffers kept between calls
    #[must_use = "builder methods return a new value"]
    pub fn max_idle_buffers(mut self, max_idle: usize) -> Self {
        self.max_idle_buffers = max_idle;
        self
    }

    /// Validate the configuration and build the writer
    pub fn build(self) -> Result<ConsoleWriter> {
        self.config.time_format.validate()?;
        self.config.time_field_format.validate()?;
        if self.config.parts_order.iter().any(String::is_empty) {
            return Err(LoggerError::config("ConsoleWriter", "empty part name in parts order"));
        }
        Ok(ConsoleWriter::from_parts(self))
    }
}

impl Default for ConsoleWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
