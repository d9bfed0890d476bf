//! Formatting macros for ergonomic log calls
//!
//! The logger methods take a pre-rendered message; these macros add
//! printf-style substitution on top, like `println!`:
//!
//! ```
//! use opskit::prelude::*;
//! use opskit::info;
//!
//! let logger = opskit::default_logger();
//! let port = 8080;
//! info!(logger, "listening on port {}", port);
//! ```

/// Log a message at an explicit level with automatic formatting.
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message with automatic formatting.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message with automatic formatting.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a warning-level message with automatic formatting.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

/// Log an error-level message with automatic formatting.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::level::Level;
    use crate::core::logger::Logger;
    use crate::sinks::{ConsoleSink, FileSink};
    use std::sync::Arc;

    fn quiet_logger() -> Logger {
        Logger::from_sinks(
            Arc::new(ConsoleSink::disabled()),
            Arc::new(FileSink::disabled()),
        )
    }

    #[test]
    fn test_log_macro() {
        let logger = quiet_logger();
        log!(logger, Level::Info, "plain message");
        log!(logger, Level::Error, "code: {}", 500);
    }

    #[test]
    fn test_level_macros() {
        let logger = quiet_logger();
        debug!(logger, "value: {}", 10);
        info!(logger, "items: {}", 100);
        warn!(logger, "retry {} of {}", 1, 3);
        error!(logger, "failed: {}", "disk full");
    }
}
