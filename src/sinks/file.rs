//! File sink emitting line-delimited JSON records

use super::rolling::{RollingFile, RotationConfig};
use super::{Sink, SinkConfig};
use crate::core::error::{Error, Result};
use crate::core::level::Level;
use crate::core::record::Record;
use crate::fsutil;
use parking_lot::Mutex;
use std::path::Path;

/// Structured sink writing one JSON object per record through a
/// [`RollingFile`]. Rotation is entirely the rolling writer's concern; this
/// sink only forwards the configuration.
#[derive(Debug)]
pub struct FileSink {
    config: SinkConfig,
    writer: Option<Mutex<RollingFile>>,
}

impl FileSink {
    /// Open the sink, creating the log directory when needed.
    ///
    /// A disabled configuration produces a no-op sink without touching the
    /// filesystem. An enabled one requires a valid file path.
    pub fn new(
        config: SinkConfig,
        path: impl AsRef<Path>,
        rotation: RotationConfig,
    ) -> Result<Self> {
        if !config.enabled {
            return Ok(Self {
                config,
                writer: None,
            });
        }

        let path = path.as_ref();
        let display = path.display().to_string();
        if !fsutil::is_file_path_valid(&display) {
            return Err(Error::config(
                "file sink",
                format!("log filepath ({:?}) invalid", display),
            ));
        }
        fsutil::ensure_dir_exists(fsutil::dir(path))?;

        let writer = RollingFile::open(path, rotation)?;
        Ok(Self {
            config,
            writer: Some(Mutex::new(writer)),
        })
    }

    /// A sink that accepts nothing and owns no file.
    pub fn disabled() -> Self {
        Self {
            config: SinkConfig::default(),
            writer: None,
        }
    }

    pub fn flush(&self) -> Result<()> {
        if let Some(ref writer) = self.writer {
            writer.lock().flush()?;
        }
        Ok(())
    }

    fn render(&self, record: &Record) -> String {
        let mut map = serde_json::Map::new();
        map.insert(
            "level".to_string(),
            serde_json::Value::String(record.level().as_str().to_string()),
        );
        if let Some(ts) = record.timestamp() {
            map.insert(
                "time".to_string(),
                serde_json::Value::String(self.config.format_timestamp(ts)),
            );
        }
        if !record.message().is_empty() {
            map.insert(
                "message".to_string(),
                serde_json::Value::String(record.message().to_string()),
            );
        }
        for (key, value) in record.fields() {
            map.insert(key.clone(), value.to_json_value());
        }
        if let Some(caller) = record.caller() {
            map.insert(
                "caller".to_string(),
                serde_json::Value::String(caller.to_string()),
            );
        }
        serde_json::Value::Object(map).to_string()
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn enabled(&self) -> bool {
        self.config.enabled && self.writer.is_some()
    }

    fn min_level(&self) -> Level {
        self.config.min_level
    }

    fn emit(&self, record: &Record) -> Result<()> {
        let writer = self
            .writer
            .as_ref()
            .ok_or_else(|| Error::writer("file sink has no writer"))?;
        let line = self.render(record);
        writer.lock().write_line(&line)
    }
}
