//! Logger configuration and bootstrap
//!
//! One flat record configures both process-wide logger instances: the
//! application logger and the access logger share level, time format, and
//! rotation settings; the access variant gets its own file path and enable
//! flags. [`Config::init`] validates everything first and only swaps the
//! global instances in when both loggers could be built.

use super::error::{Error, Result};
use super::level::Level;
use super::logger::Logger;
use crate::fsutil;
use crate::global;
use crate::sinks::{RotationConfig, SinkConfig};
use serde::{Deserialize, Serialize};

/// Fallback strftime format, millisecond-precision ISO-like local time.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum level name; unknown names fall back to `info`.
    pub level: String,
    /// strftime timestamp format; empty falls back to [`DEFAULT_TIME_FORMAT`].
    pub time_format: String,
    pub file_path: String,
    pub access_file_path: String,
    pub max_size_mb: u64,
    pub max_age_days: u64,
    pub max_backups: usize,
    pub compress: bool,
    pub utc_time: bool,
    pub enable_file: bool,
    pub enable_console: bool,
    pub enable_access_file: bool,
    pub enable_access_console: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            file_path: String::new(),
            access_file_path: String::new(),
            max_size_mb: 0,
            max_age_days: 0,
            max_backups: 0,
            compress: false,
            utc_time: false,
            enable_file: false,
            enable_console: true,
            enable_access_file: false,
            enable_access_console: false,
        }
    }
}

impl Config {
    /// Check that every enabled file sink has a usable path.
    pub fn validate(&self) -> Result<()> {
        if self.enable_file && !fsutil::is_file_path_valid(&self.file_path) {
            return Err(Error::config(
                "logger",
                format!("log filepath ({:?}) invalid", self.file_path),
            ));
        }
        if self.enable_access_file && !fsutil::is_file_path_valid(&self.access_file_path) {
            return Err(Error::config(
                "logger",
                format!("access log filepath ({:?}) invalid", self.access_file_path),
            ));
        }
        Ok(())
    }

    /// Build the application and access loggers and install them as the
    /// process-wide instances. Nothing is swapped in on failure.
    pub fn init(&self) -> Result<()> {
        self.validate()?;

        let app = Logger::new(self)?;
        let access = Logger::new(&self.access_variant())?;
        global::install(app, access);
        Ok(())
    }

    /// The same settings pointed at the access log path and enable flags.
    pub fn access_variant(&self) -> Config {
        let mut config = self.clone();
        config.file_path = self.access_file_path.clone();
        config.enable_file = self.enable_access_file;
        config.enable_console = self.enable_access_console;
        config
    }

    pub fn effective_time_format(&self) -> &str {
        if self.time_format.is_empty() {
            DEFAULT_TIME_FORMAT
        } else {
            &self.time_format
        }
    }

    pub fn console_sink_config(&self) -> SinkConfig {
        SinkConfig {
            enabled: self.enable_console,
            min_level: Level::parse(&self.level),
            time_format: self.effective_time_format().to_string(),
            utc: self.utc_time,
        }
    }

    pub fn file_sink_config(&self) -> SinkConfig {
        SinkConfig {
            enabled: self.enable_file,
            min_level: Level::parse(&self.level),
            time_format: self.effective_time_format().to_string(),
            utc: self.utc_time,
        }
    }

    pub fn rotation(&self) -> RotationConfig {
        RotationConfig {
            max_size_mb: self.max_size_mb,
            max_age_days: self.max_age_days,
            max_backups: self.max_backups,
            compress: self.compress,
        }
    }
}
