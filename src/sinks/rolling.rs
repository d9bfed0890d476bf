//! Rolling file writer
//!
//! The file sink delegates every rotation concern to this writer: it appends
//! line-delimited records, rotates the file once it would exceed the
//! configured size, shifts numbered backups (`app.log.1`, `app.log.2`, ...),
//! prunes backups by count and age, and optionally gzips rotated files.

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Size used when the configuration leaves `max_size_mb` at zero.
const DEFAULT_MAX_SIZE_MB: u64 = 100;

/// Rotation settings supplied by the logger configuration.
///
/// Zero values mean "unlimited": no age pruning for `max_age_days`, keep
/// every backup for `max_backups`, and the default size for `max_size_mb`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RotationConfig {
    pub max_size_mb: u64,
    pub max_age_days: u64,
    pub max_backups: usize,
    pub compress: bool,
}

impl RotationConfig {
    fn max_bytes(&self) -> u64 {
        let mb = if self.max_size_mb == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            self.max_size_mb
        };
        mb * 1024 * 1024
    }
}

#[derive(Debug)]
pub struct RollingFile {
    path: PathBuf,
    rotation: RotationConfig,
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

impl RollingFile {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl Into<PathBuf>, rotation: RotationConfig) -> Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        let current_size = file
            .metadata()
            .map_err(|e| {
                Error::io_operation(
                    "reading log file metadata",
                    format!("cannot stat '{}'", path.display()),
                    e,
                )
            })?
            .len();

        Ok(Self {
            path,
            rotation,
            writer: Some(BufWriter::new(file)),
            current_size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Append one record line, rotating first when the write would push the
    /// file past its size limit.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let incoming = line.len() as u64 + 1;
        if self.current_size > 0 && self.current_size + incoming > self.rotation.max_bytes() {
            if let Err(err) = self.rotate() {
                // Keep logging into the current file rather than losing records.
                eprintln!("[WARN] log rotation failed: {}. Continuing with current file.", err);
                if self.writer.is_none() {
                    self.reopen()?;
                }
                self.current_size = 0;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| Error::writer("rolling file writer not initialized"))?;
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.write_all(b"\n"))
            .map_err(|e| {
                Error::sink(
                    self.path.display().to_string(),
                    format!("failed to write record: {}", e),
                )
            })?;
        self.current_size += incoming;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                Error::sink(
                    self.path.display().to_string(),
                    format!("failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                Error::rotation(
                    self.path.display().to_string(),
                    format!("failed to flush before rotation: {}", e),
                )
            })?;
            // writer dropped here, releasing the file handle
        }

        self.shift_backups()?;

        if self.path.exists() {
            let backup = self.backup_path(1);
            rename_backup(&self.path, &backup)?;
            if self.rotation.compress {
                compress_file(&backup)?;
            }
        }

        self.prune_old_backups();
        self.reopen()?;
        self.current_size = 0;
        Ok(())
    }

    fn reopen(&mut self) -> Result<()> {
        let file = open_append(&self.path)?;
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    /// Move every retained backup one index up, discarding the ones that
    /// would overflow the retention count.
    fn shift_backups(&self) -> Result<()> {
        let mut highest = self.highest_backup_index();
        let limit = self.rotation.max_backups;

        if limit > 0 {
            while highest >= limit {
                self.remove_backup(highest);
                highest -= 1;
            }
        }

        for idx in (1..=highest).rev() {
            for (old, new) in [
                (self.backup_path(idx), self.backup_path(idx + 1)),
                (gz_path(&self.backup_path(idx)), gz_path(&self.backup_path(idx + 1))),
            ] {
                if old.exists() {
                    rename_backup(&old, &new)?;
                }
            }
        }
        Ok(())
    }

    fn prune_old_backups(&self) {
        if self.rotation.max_age_days == 0 {
            return;
        }
        let cutoff = SystemTime::now() - Duration::from_secs(self.rotation.max_age_days * 86_400);
        for idx in 1..=self.highest_backup_index() {
            for path in [self.backup_path(idx), gz_path(&self.backup_path(idx))] {
                let expired = path
                    .metadata()
                    .and_then(|m| m.modified())
                    .map(|modified| modified < cutoff)
                    .unwrap_or(false);
                if expired {
                    // best effort, a stale backup is not worth failing a write
                    let _ = fs::remove_file(&path);
                }
            }
        }
    }

    fn highest_backup_index(&self) -> usize {
        let mut idx = 0;
        loop {
            let next = self.backup_path(idx + 1);
            if next.exists() || gz_path(&next).exists() {
                idx += 1;
            } else {
                return idx;
            }
        }
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log");
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    fn remove_backup(&self, index: usize) {
        for path in [self.backup_path(index), gz_path(&self.backup_path(index))] {
            if path.exists() {
                if let Err(err) = fs::remove_file(&path) {
                    eprintln!(
                        "[WARN] failed to remove old backup {}: {}",
                        path.display(),
                        err
                    );
                }
            }
        }
    }
}

impl Drop for RollingFile {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            Error::sink(
                path.display().to_string(),
                format!("failed to open: {}", e),
            )
        })
}

fn gz_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".gz");
    PathBuf::from(os)
}

fn rename_backup(old: &Path, new: &Path) -> Result<()> {
    match fs::rename(old, new) {
        Ok(()) => Ok(()),
        Err(_) => {
            // Some platforms refuse to rename onto an existing file.
            if new.exists() {
                let _ = fs::remove_file(new);
            }
            fs::rename(old, new).map_err(|e| {
                Error::rotation(
                    old.display().to_string(),
                    format!("failed to rotate backup: {}", e),
                )
            })
        }
    }
}

/// Gzip `path` into `path.gz`, removing the original only after the
/// compressed file is complete.
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, Read};

    let target = gz_path(path);
    let temp = gz_path(&PathBuf::from(format!("{}.tmp", path.display())));

    let input = File::open(path).map_err(|e| {
        Error::io_operation(
            "compressing rotated log",
            format!("cannot open '{}'", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp).map_err(|e| {
        Error::io_operation(
            "compressing rotated log",
            format!("cannot create '{}'", temp.display()),
            e,
        )
    })?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_file(&temp);
                return Err(Error::io_operation(
                    "compressing rotated log",
                    format!("cannot read '{}'", path.display()),
                    e,
                ));
            }
        };
        if let Err(e) = encoder.write_all(&buffer[..read]) {
            let _ = fs::remove_file(&temp);
            return Err(Error::io_operation(
                "compressing rotated log",
                "cannot write compressed chunk".to_string(),
                e,
            ));
        }
    }

    if let Err(e) = encoder.finish() {
        let _ = fs::remove_file(&temp);
        return Err(Error::io_operation(
            "compressing rotated log",
            "cannot finish compression".to_string(),
            e,
        ));
    }

    fs::rename(&temp, &target).map_err(|e| {
        let _ = fs::remove_file(&temp);
        Error::io_operation(
            "compressing rotated log",
            format!("cannot rename to '{}'", target.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        // Both versions remaining is harmless, the next rotation cleans up.
        eprintln!(
            "[WARN] compressed {} but failed to remove the original: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn small_rotation(max_backups: usize) -> RotationConfig {
        RotationConfig {
            max_size_mb: 1,
            max_age_days: 0,
            max_backups,
            compress: false,
        }
    }

    #[test]
    fn test_open_and_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        let mut rolling = RollingFile::open(&path, RotationConfig::default()).unwrap();
        rolling.write_line("hello").unwrap();
        rolling.write_line("world").unwrap();
        rolling.flush().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "hello\nworld\n");
        assert_eq!(rolling.current_size(), 12);
    }

    #[test]
    fn test_size_rotation_creates_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        let mut rolling = RollingFile::open(&path, small_rotation(3)).unwrap();
        let chunk = "x".repeat(600 * 1024);
        rolling.write_line(&chunk).unwrap();
        rolling.write_line(&chunk).unwrap();
        rolling.flush().unwrap();

        assert!(dir.path().join("app.log.1").exists());
        let current = fs::metadata(&path).unwrap().len();
        assert_eq!(current, chunk.len() as u64 + 1);
    }

    #[test]
    fn test_backup_count_bounded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        let mut rolling = RollingFile::open(&path, small_rotation(2)).unwrap();
        let chunk = "y".repeat(700 * 1024);
        for _ in 0..5 {
            rolling.write_line(&chunk).unwrap();
        }
        rolling.flush().unwrap();

        assert!(dir.path().join("app.log.1").exists());
        assert!(dir.path().join("app.log.2").exists());
        assert!(!dir.path().join("app.log.3").exists());
    }

    #[test]
    fn test_compressed_rotation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        let config = RotationConfig {
            max_size_mb: 1,
            max_age_days: 0,
            max_backups: 3,
            compress: true,
        };
        let mut rolling = RollingFile::open(&path, config).unwrap();
        let chunk = "z".repeat(600 * 1024);
        rolling.write_line(&chunk).unwrap();
        rolling.write_line(&chunk).unwrap();
        rolling.flush().unwrap();

        assert!(dir.path().join("app.log.1.gz").exists());
        assert!(!dir.path().join("app.log.1").exists());
    }

    #[test]
    fn test_zero_max_size_uses_default() {
        let config = RotationConfig::default();
        assert_eq!(config.max_bytes(), 100 * 1024 * 1024);

        let config = RotationConfig {
            max_size_mb: 5,
            ..RotationConfig::default()
        };
        assert_eq!(config.max_bytes(), 5 * 1024 * 1024);
    }
}
