//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Boxed error returned by extension hooks
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Input was not exactly one well-formed JSON object
    #[error("cannot decode event: {0}")]
    Decode(#[source] serde_json::Error),

    /// A field value could not be turned into text
    ///
    /// The field renderer recovers from this in place; it only escapes
    /// to callers that invoke a marshaller directly.
    #[error("{message}")]
    Marshal { message: String },

    /// The extension hook failed; the line was not emitted
    #[error("extension hook failed: {0}")]
    Extension(#[source] BoxError),

    /// Writing the rendered line to the destination failed
    #[error("IO error while writing log line: {0}")]
    SinkWrite(#[source] std::io::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create a marshal error
    pub fn marshal(message: impl Into<String>) -> Self {
        LoggerError::Marshal {
            message: message.into(),
        }
    }

    /// Wrap an extension hook failure
    pub fn extension(source: impl Into<BoxError>) -> Self {
        LoggerError::Extension(source.into())
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Whether the failure happened before anything reached the sink
    ///
    /// Decode and extension failures never touch the destination.
    #[must_use]
    pub fn is_pre_flush(&self) -> bool {
        matches!(self, LoggerError::Decode(_) | LoggerError::Extension(_))
    }
}

impl From<LoggerError> for std::io::Error {
    fn from(err: LoggerError) -> Self {
        match err {
            LoggerError::SinkWrite(io) => io,
            LoggerError::Decode(_) => std::io::Error::new(std::io::ErrorKind::InvalidData, err),
            other => std::io::Error::other(other),
        }
    }
}
