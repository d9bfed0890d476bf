//! Error types for the toolkit

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Sink write error with target
    #[error("Sink error for '{target}': {message}")]
    Sink { target: String, message: String },

    /// Log file rotation error
    #[error("File rotation failed for '{path}': {message}")]
    Rotation { path: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    Writer(String),
}

impl Error {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink(target: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Sink {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a rotation error
    pub fn rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Rotation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        Error::Writer(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("file sink", "invalid path");
        assert!(matches!(err, Error::InvalidConfiguration { .. }));

        let err = Error::sink("console", "stream closed");
        assert!(matches!(err, Error::Sink { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = Error::rotation("/var/log/app.log", "disk full");
        assert_eq!(
            err.to_string(),
            "File rotation failed for '/var/log/app.log': disk full"
        );

        let err = Error::config("logger", "log filepath (\"..\") invalid");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for logger: log filepath (\"..\") invalid"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::io_operation("creating log directory", "cannot create directory", io_err);

        assert!(matches!(err, Error::IoOperation { .. }));
        assert!(err.to_string().contains("creating log directory"));
    }
}
