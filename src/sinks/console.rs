//! Console sink with colorized columnar output

use super::{Sink, SinkConfig};
use crate::core::error::{Error, Result};
use crate::core::level::Level;
use crate::core::record::Record;
use colored::Colorize;
use parking_lot::Mutex;
use std::io::Write;

/// Human-readable sink writing to stdout (or an injected writer).
///
/// Output is one line per record: timestamp, padded colored level, message,
/// `key=value` fields in order, then the caller when requested.
pub struct ConsoleSink {
    config: SinkConfig,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn new(config: SinkConfig) -> Self {
        Self::with_writer(config, Box::new(std::io::stdout()))
    }

    /// Use a custom output stream (stderr, a capture buffer in tests, ...).
    pub fn with_writer(config: SinkConfig, writer: Box<dyn Write + Send>) -> Self {
        Self {
            config,
            writer: Mutex::new(writer),
        }
    }

    /// A sink that accepts nothing and writes nowhere.
    pub fn disabled() -> Self {
        Self::with_writer(SinkConfig::default(), Box::new(std::io::sink()))
    }

    fn format_record(&self, record: &Record) -> String {
        let level = format!("{:5}", record.level().as_str().to_uppercase())
            .color(record.level().color_code())
            .to_string();

        let mut line = String::new();
        if let Some(ts) = record.timestamp() {
            line.push_str(&self.config.format_timestamp(ts));
            line.push(' ');
        }
        line.push_str(&level);

        if !record.message().is_empty() {
            line.push(' ');
            line.push_str(record.message());
        }

        for (key, value) in record.fields() {
            line.push(' ');
            line.push_str(key);
            line.push('=');
            line.push_str(&value.to_string());
        }

        if let Some(caller) = record.caller() {
            line.push_str(" caller=");
            line.push_str(&caller.to_string());
        }

        line
    }
}

impl Sink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn enabled(&self) -> bool {
        self.config.enabled
    }

    fn min_level(&self) -> Level {
        self.config.min_level
    }

    fn emit(&self, record: &Record) -> Result<()> {
        let line = self.format_record(record);
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line)
            .and_then(|()| writer.flush())
            .map_err(|e| Error::sink("console", format!("failed to write record: {}", e)))
    }
}
