//! Appender implementations

pub mod console;

pub use console::{ConsoleConfig, ConsoleWriter, ConsoleWriterBuilder};

pub use crate::core::Appender;
