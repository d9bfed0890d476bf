//! Process-wide logger instances and package-level convenience functions
//!
//! Two named instances exist for the whole process: the application logger
//! and the access logger. [`crate::core::config::Config::init`] swaps both in
//! atomically; until then every accessor hands out a stderr-only console
//! logger so early log calls are never lost silently.
//!
//! The free functions below mirror the instance API on the default
//! application logger. The accessor applies the one-shot auto skip
//! adjustment and chaining wrappers compensate with `-1`, keeping the skip
//! ledger balanced across the extra indirection layer.

use crate::core::config::DEFAULT_TIME_FORMAT;
use crate::core::field::FieldValue;
use crate::core::hook::Hook;
use crate::core::level::Level;
use crate::core::logger::Logger;
use crate::core::record::Record;
use crate::sinks::{ConsoleSink, FileSink, SinkConfig};
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

struct Instances {
    app: Logger,
    access: Logger,
}

static INSTANCES: RwLock<Option<Instances>> = RwLock::new(None);

/// Replace both process-wide instances. Called by `Config::init` only after
/// both loggers were built successfully.
pub(crate) fn install(app: Logger, access: Logger) {
    *INSTANCES.write() = Some(Instances { app, access });
}

/// The not-yet-initialized fallback: console-only, stderr, info level.
fn fallback() -> Logger {
    static FALLBACK: OnceLock<Logger> = OnceLock::new();
    FALLBACK
        .get_or_init(|| {
            let config = SinkConfig {
                enabled: true,
                min_level: Level::Info,
                time_format: DEFAULT_TIME_FORMAT.to_string(),
                utc: false,
            };
            Logger::from_sinks(
                Arc::new(ConsoleSink::with_writer(config, Box::new(std::io::stderr()))),
                Arc::new(FileSink::disabled()),
            )
        })
        .clone()
}

/// The default application logger, with the accessor's one-shot skip
/// adjustment applied.
pub fn default_logger() -> Logger {
    let logger = INSTANCES.read().as_ref().map(|i| i.app.clone());
    logger.unwrap_or_else(fallback).auto_skip_frame_count()
}

/// The access logger instance.
pub fn access_logger() -> Logger {
    let logger = INSTANCES.read().as_ref().map(|i| i.access.clone());
    logger.unwrap_or_else(fallback)
}

pub fn with(key: impl Into<String>, value: impl Into<FieldValue>) -> Logger {
    with_skip_frame_count(-1).with(key, value)
}

pub fn with_sender(sender: impl Into<String>) -> Logger {
    with_skip_frame_count(-1).with_sender(sender)
}

pub fn with_request_id(id: impl Into<String>) -> Logger {
    with_skip_frame_count(-1).with_request_id(id)
}

pub fn with_caller() -> Logger {
    with_skip_frame_count(-1).with_caller()
}

pub fn auto_skip_frame_count() -> Logger {
    with_skip_frame_count(-1).auto_skip_frame_count()
}

pub fn with_skip_frame_count(skip: i32) -> Logger {
    default_logger().with_skip_frame_count(skip)
}

pub fn with_hook(hook: impl Hook + 'static) -> Logger {
    with_skip_frame_count(-1).with_hook(hook)
}

pub fn with_hook_fn<F>(hook: F) -> Logger
where
    F: Fn(&mut Record, Level, &str) + Send + Sync + 'static,
{
    with_skip_frame_count(-1).with_hook_fn(hook)
}

#[track_caller]
pub fn debug(message: impl Into<String>) {
    default_logger().debug(message);
}

#[track_caller]
pub fn info(message: impl Into<String>) {
    default_logger().info(message);
}

#[track_caller]
pub fn warn(message: impl Into<String>) {
    default_logger().warn(message);
}

#[track_caller]
pub fn error(message: impl Into<String>) {
    default_logger().error(message);
}

#[track_caller]
pub fn debug_to_file(message: impl Into<String>) {
    default_logger().debug_to_file(message);
}

#[track_caller]
pub fn info_to_file(message: impl Into<String>) {
    default_logger().info_to_file(message);
}

#[track_caller]
pub fn warn_to_file(message: impl Into<String>) {
    default_logger().warn_to_file(message);
}

#[track_caller]
pub fn error_to_file(message: impl Into<String>) {
    default_logger().error_to_file(message);
}

#[track_caller]
pub fn debug_to_console(message: impl Into<String>) {
    default_logger().debug_to_console(message);
}

#[track_caller]
pub fn info_to_console(message: impl Into<String>) {
    default_logger().info_to_console(message);
}

#[track_caller]
pub fn warn_to_console(message: impl Into<String>) {
    default_logger().warn_to_console(message);
}

#[track_caller]
pub fn error_to_console(message: impl Into<String>) {
    default_logger().error_to_console(message);
}
