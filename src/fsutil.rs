//! Filesystem helpers used when wiring file sinks
//!
//! Path validity here is lexical: a candidate log path must still name a file
//! after cleaning, so empty paths, `.`/`..` and bare filesystem roots are
//! rejected before any sink touches the disk.

use crate::core::error::{Error, Result};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Absolute form of `path` against the current working directory.
pub fn abs(path: impl AsRef<Path>) -> io::Result<PathBuf> {
    std::path::absolute(path)
}

/// All but the last element of `path`, or `.` when nothing remains.
pub fn dir(path: impl AsRef<Path>) -> PathBuf {
    let parent = path.as_ref().parent().unwrap_or_else(|| Path::new(""));
    if parent.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        parent.to_path_buf()
    }
}

/// Whether `path` can name a log file: non-empty after cleaning, not a
/// current/parent-directory marker, not a filesystem root.
pub fn is_file_path_valid(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    let cleaned = clean(path);
    if cleaned == Path::new(".") || cleaned == Path::new("..") {
        return false;
    }
    if cleaned
        .components()
        .all(|c| matches!(c, Component::ParentDir))
    {
        return false;
    }
    // a bare root has no parent and cannot be a file
    cleaned.parent().is_some()
}

/// Whether `name` refers to an existing regular file.
pub fn file_exists(name: impl AsRef<Path>) -> bool {
    let name = name.as_ref();
    if name.as_os_str().is_empty() {
        return false;
    }
    name.metadata().map(|m| m.is_file()).unwrap_or(false)
}

/// Create `path` and any missing ancestors unless it already exists.
pub fn ensure_dir_exists(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match path.metadata() {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            std::fs::create_dir_all(path).map_err(|e| {
                Error::io_operation(
                    "creating log directory",
                    format!("cannot create '{}'", path.display()),
                    e,
                )
            })
        }
        Err(err) => Err(Error::io_operation(
            "checking log directory",
            format!("cannot stat '{}'", path.display()),
            err,
        )),
    }
}

/// Lexical clean: resolve `.` and `..` without touching the filesystem.
fn clean(path: &str) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in Path::new(path).components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
