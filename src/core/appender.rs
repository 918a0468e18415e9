//! Appender trait for log output destinations

use super::error::Result;

/// Destination for encoded records
///
/// `record` is exactly one JSON object, as produced by
/// [`LogEntry::to_record`](super::LogEntry::to_record).
pub trait Appender: Send + Sync {
    fn append(&mut self, record: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
