//! Core logger types and traits

pub mod appender;
pub mod buffer_pool;
pub mod color;
pub mod config;
pub mod error;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod timestamp;

pub use appender::Appender;
pub use buffer_pool::{BufferPool, PooledBuffer};
pub use color::{colorize, colorize_nested, strip_ansi, ColorCode};
pub use config::LoggerConfig;
pub use error::{BoxError, LoggerError, Result};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::RenderMetrics;
pub use record::Record;
pub use timestamp::{TimeFieldFormat, TimestampFormat};
