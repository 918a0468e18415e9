//! # Rust Console Logger
//!
//! Human-readable console rendering for structured JSON log records, with a
//! small structured-logging front-end that produces them.
//!
//! ## Features
//!
//! - **One line per record**: timestamp, level, context, mode and message,
//!   then `name=value` fields sorted with `error` first
//! - **Pluggable formatting**: every part and field slot takes a custom
//!   formatter; unset slots use colorized defaults
//! - **Lossless numbers**: numeric tokens render exactly as encoded
//! - **Thread safe**: one writer can be shared; each record reaches the
//!   destination in a single write
//!
//! ## Example
//!
//! ```
//! use rust_console_logger::prelude::*;
//!
//! let writer = ConsoleWriter::builder()
//!     .no_color(true)
//!     .sink(Vec::new())
//!     .parts_order(["level", "message"])
//!     .build()
//!     .unwrap();
//!
//! let line = writer
//!     .render_to_string(br#"{"level":"info","message":"ready","port":8080}"#)
//!     .unwrap();
//! assert_eq!(line, "INF ready  port=8080\n");
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleConfig, ConsoleWriter, ConsoleWriterBuilder};
    pub use crate::core::{
        Appender, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, Record,
        RenderMetrics, Result, TimeFieldFormat, TimestampFormat,
    };
}

pub use appenders::console::{FormatterSlot, Formatters};
pub use appenders::{ConsoleConfig, ConsoleWriter, ConsoleWriterBuilder};
pub use core::{
    Appender, BoxError, ColorCode, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, Record, RenderMetrics, Result, TimeFieldFormat, TimestampFormat,
};
