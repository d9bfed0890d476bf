//! Output destinations
//!
//! A sink is one independent structured-log destination. Each carries its own
//! enable flag, level threshold, and time rendering policy; the dispatcher
//! runs the full enrichment pipeline separately for every sink it targets so
//! that sinks never share mutable state.

pub mod console;
pub mod file;
pub mod rolling;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use rolling::{RollingFile, RotationConfig};

use crate::core::config::DEFAULT_TIME_FORMAT;
use crate::core::error::Result;
use crate::core::level::Level;
use crate::core::record::Record;
use chrono::{DateTime, Local, Utc};

/// Per-sink settings: enablement, threshold, and timestamp rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    pub enabled: bool,
    pub min_level: Level,
    /// strftime format applied to record timestamps.
    pub time_format: String,
    /// Render timestamps in UTC instead of local time.
    pub utc: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_level: Level::Info,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            utc: false,
        }
    }
}

impl SinkConfig {
    /// Render a record timestamp according to this sink's policy.
    pub fn format_timestamp(&self, timestamp: DateTime<Utc>) -> String {
        if self.utc {
            timestamp.format(&self.time_format).to_string()
        } else {
            timestamp
                .with_timezone(&Local)
                .format(&self.time_format)
                .to_string()
        }
    }
}

pub trait Sink: Send + Sync {
    fn name(&self) -> &str;

    fn enabled(&self) -> bool;

    fn min_level(&self) -> Level;

    /// Write a fully assembled record to the underlying medium.
    fn emit(&self, record: &Record) -> Result<()>;

    /// Threshold check performed before any formatting work.
    fn accepts(&self, level: Level) -> bool {
        self.enabled() && level >= self.min_level()
    }
}
