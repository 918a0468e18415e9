//! Renderer metrics for observability
//!
//! Counters for how many lines a console writer emitted and why the
//! others were not.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a console writer
///
/// # Example
///
/// ```
/// use rust_console_logger::RenderMetrics;
///
/// let metrics = RenderMetrics::new();
/// metrics.record_written();
/// metrics.record_decode_failure();
///
/// assert_eq!(metrics.lines_written(), 1);
/// assert_eq!(metrics.failed_count(), 1);
/// ```
#[derive(Debug)]
pub struct RenderMetrics {
    /// Lines fully rendered and flushed to the sink
    lines_written: AtomicU64,

    /// Inputs that were not a single well-formed object
    decode_failures: AtomicU64,

    /// Lines aborted by the extension hook
    extension_failures: AtomicU64,

    /// Final writes the sink rejected
    sink_failures: AtomicU64,

    /// Field values rendered as an inline marshal diagnostic
    marshal_recoveries: AtomicU64,
}

impl RenderMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            lines_written: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            extension_failures: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            marshal_recoveries: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn lines_written(&self) -> u64 {
        self.lines_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn decode_failures(&self) -> u64 {
        self.decode_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn extension_failures(&self) -> u64 {
        self.extension_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn marshal_recoveries(&self) -> u64 {
        self.marshal_recoveries.load(Ordering::Relaxed)
    }

    /// Records that produced no line, for any reason
    pub fn failed_count(&self) -> u64 {
        self.decode_failures() + self.extension_failures() + self.sink_failures()
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.lines_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_decode_failure(&self) -> u64 {
        self.decode_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_extension_failure(&self) -> u64 {
        self.extension_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_marshal_recovery(&self) -> u64 {
        self.marshal_recoveries.fetch_add(1, Ordering::Relaxed)
    }

    /// Get failure rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no records have been processed.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed_count() as f64;
        let total = self.lines_written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.lines_written.store(0, Ordering::Relaxed);
        self.decode_failures.store(0, Ordering::Relaxed);
        self.extension_failures.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.marshal_recoveries.store(0, Ordering::Relaxed);
    }
}

impl Default for RenderMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RenderMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            lines_written: AtomicU64::new(self.lines_written()),
            decode_failures: AtomicU64::new(self.decode_failures()),
            extension_failures: AtomicU64::new(self.extension_failures()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            marshal_recoveries: AtomicU64::new(self.marshal_recoveries()),
        }
    }
}
