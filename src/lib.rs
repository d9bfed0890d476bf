//! # opskit
//!
//! Operational support toolkit: a structured, dual-sink logger plus a
//! dependency health-check registry.
//!
//! ## Features
//!
//! - **Dual Sinks**: independently configured console and rolling-file
//!   outputs sharing one call-site API
//! - **Typed Fields**: exact-type field encoding with a structural fallback
//!   that never fails a record
//! - **Chainable Context**: immutable builder chains; divergent chains from
//!   a shared base never interfere
//! - **Caller Attribution**: records report the original user call site
//!   through any number of convenience wrappers
//! - **Health Registry**: named dependency probers aggregated into one
//!   up/down report
//!
//! ## Quick start
//!
//! ```no_run
//! use opskit::Config;
//!
//! let config = Config {
//!     level: "debug".to_string(),
//!     file_path: "log/app.log".to_string(),
//!     enable_file: true,
//!     enable_console: true,
//!     ..Config::default()
//! };
//! config.init().expect("logger init");
//!
//! opskit::info("service starting");
//! opskit::with("port", 8080u16).with_caller().info("listening");
//! ```

pub mod core;
pub mod fsutil;
pub mod global;
pub mod health;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        CallSite, Config, Error, FieldValue, Hook, HookFn, Level, Logger, Record, Result,
        DEFAULT_TIME_FORMAT,
    };
    pub use crate::global::{access_logger, default_logger};
    pub use crate::sinks::{ConsoleSink, FileSink, RollingFile, RotationConfig, Sink, SinkConfig};
}

pub use self::core::{
    CallSite, Config, Error, FieldValue, Hook, HookFn, Level, Logger, Record, Result,
    DEFAULT_TIME_FORMAT,
};
pub use self::global::{
    access_logger, auto_skip_frame_count, debug, debug_to_console, debug_to_file, default_logger,
    error, error_to_console, error_to_file, info, info_to_console, info_to_file, warn,
    warn_to_console, warn_to_file, with, with_caller, with_hook, with_hook_fn, with_request_id,
    with_sender, with_skip_frame_count,
};
pub use self::sinks::{ConsoleSink, FileSink, RollingFile, RotationConfig, Sink, SinkConfig};
