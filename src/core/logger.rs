//! Contextual logger: immutable chain builder plus dual-sink dispatcher
//!
//! A [`Logger`] is a value. Every `with_*` operation clones it, appends one
//! mutation, and returns the copy, so divergent chains built from a shared
//! base never interfere. Emission runs the full enrichment pipeline once per
//! targeted sink: the sinks have independent configuration and lifecycles and
//! must not share partially applied state.

use super::config::Config;
use super::field::FieldValue;
use super::hook::{Hook, HookFn};
use super::level::Level;
use super::record::{CallSite, Record};
use crate::sinks::{ConsoleSink, FileSink, Sink};
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Once};

/// One-shot skip adjustment shared by every clone derived from one root.
///
/// The bump must live behind a reference: the whole point of the adjustment
/// is that all values cloned from the same root observe it, and that it
/// happens exactly once even when several threads race on first use.
#[derive(Debug)]
struct AutoSkip {
    once: Once,
    bump: AtomicI32,
}

impl AutoSkip {
    fn new() -> Self {
        Self {
            once: Once::new(),
            bump: AtomicI32::new(0),
        }
    }

    fn fire(&self) {
        self.once.call_once(|| {
            self.bump.store(1, Ordering::Release);
        });
    }

    fn value(&self) -> i32 {
        self.bump.load(Ordering::Acquire)
    }
}

#[derive(Clone, Copy)]
enum Target {
    Both,
    File,
    Console,
}

#[derive(Clone)]
pub struct Logger {
    skip: i32,
    auto_skip: Arc<AutoSkip>,
    include_caller: bool,
    fields: Vec<(String, FieldValue)>,
    hooks: Vec<Arc<dyn Hook>>,
    console: Arc<ConsoleSink>,
    file: Arc<FileSink>,
}

impl Logger {
    /// Build a logger from a validated configuration.
    ///
    /// The file sink's directory is created when missing; a disabled file
    /// sink leaves the filesystem untouched.
    pub fn new(config: &Config) -> crate::core::error::Result<Self> {
        let console = ConsoleSink::new(config.console_sink_config());
        let file = FileSink::new(
            config.file_sink_config(),
            Path::new(&config.file_path),
            config.rotation(),
        )?;
        Ok(Self::from_sinks(Arc::new(console), Arc::new(file)))
    }

    /// Compose a logger from explicitly constructed sinks.
    pub fn from_sinks(console: Arc<ConsoleSink>, file: Arc<FileSink>) -> Self {
        Self {
            skip: 0,
            auto_skip: Arc::new(AutoSkip::new()),
            include_caller: false,
            fields: Vec::new(),
            hooks: Vec::new(),
            console,
            file,
        }
    }

    /// Append a context field using the typed encoding table.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Logger {
        let mut next = self.clone();
        next.fields.push((key.into(), value.into()));
        next
    }

    /// Append a field via the structural fallback encoding.
    ///
    /// A value that cannot be serialized drops this field only; the chain
    /// and every other field are unaffected.
    #[must_use]
    pub fn with_any<T: Serialize + ?Sized>(&self, key: impl Into<String>, value: &T) -> Logger {
        match FieldValue::serialize(value) {
            Some(encoded) => self.with(key, encoded),
            None => self.clone(),
        }
    }

    /// Append a field via its string conversion.
    #[must_use]
    pub fn with_display<T: fmt::Display + ?Sized>(
        &self,
        key: impl Into<String>,
        value: &T,
    ) -> Logger {
        self.with(key, FieldValue::display(value))
    }

    /// Append an error field encoded as its message.
    #[must_use]
    pub fn with_error(&self, key: impl Into<String>, err: &(dyn std::error::Error + 'static)) -> Logger {
        self.with(key, FieldValue::error(err))
    }

    #[must_use]
    pub fn with_sender(&self, sender: impl Into<String>) -> Logger {
        self.with("sender", sender.into())
    }

    #[must_use]
    pub fn with_request_id(&self, id: impl Into<String>) -> Logger {
        self.with("request_id", id.into())
    }

    /// Include the source call site of the emitting call in the record.
    #[must_use]
    pub fn with_caller(&self) -> Logger {
        let mut next = self.clone();
        next.include_caller = true;
        next
    }

    /// Adjust the caller-skip ledger by `skip` (negative deltas compensate
    /// wrapper indirection).
    #[must_use]
    pub fn with_skip_frame_count(&self, skip: i32) -> Logger {
        let mut next = self.clone();
        next.skip += skip;
        next
    }

    /// One-time `+1` skip adjustment for the default-instance accessor.
    ///
    /// Fires at most once across all clones sharing this logger's control
    /// block, no matter how many threads call it concurrently.
    #[must_use]
    pub fn auto_skip_frame_count(&self) -> Logger {
        self.auto_skip.fire();
        self.clone()
    }

    /// Current skip depth, including the shared one-shot adjustment.
    pub fn skip_frames(&self) -> i32 {
        self.skip + self.auto_skip.value()
    }

    /// Register a hook, applied to both sinks.
    #[must_use]
    pub fn with_hook(&self, hook: impl Hook + 'static) -> Logger {
        let mut next = self.clone();
        next.hooks.push(Arc::new(hook));
        next
    }

    /// Register a closure as a hook, applied to both sinks.
    #[must_use]
    pub fn with_hook_fn<F>(&self, hook: F) -> Logger
    where
        F: Fn(&mut Record, Level, &str) + Send + Sync + 'static,
    {
        self.with_hook(HookFn(hook))
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.dispatch(level, message.into(), Target::Both, Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.dispatch(Level::Debug, message.into(), Target::Both, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.dispatch(Level::Info, message.into(), Target::Both, Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.dispatch(Level::Warn, message.into(), Target::Both, Location::caller());
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.dispatch(Level::Error, message.into(), Target::Both, Location::caller());
    }

    #[track_caller]
    pub fn debug_to_file(&self, message: impl Into<String>) {
        self.dispatch(Level::Debug, message.into(), Target::File, Location::caller());
    }

    #[track_caller]
    pub fn info_to_file(&self, message: impl Into<String>) {
        self.dispatch(Level::Info, message.into(), Target::File, Location::caller());
    }

    #[track_caller]
    pub fn warn_to_file(&self, message: impl Into<String>) {
        self.dispatch(Level::Warn, message.into(), Target::File, Location::caller());
    }

    #[track_caller]
    pub fn error_to_file(&self, message: impl Into<String>) {
        self.dispatch(Level::Error, message.into(), Target::File, Location::caller());
    }

    #[track_caller]
    pub fn debug_to_console(&self, message: impl Into<String>) {
        self.dispatch(Level::Debug, message.into(), Target::Console, Location::caller());
    }

    #[track_caller]
    pub fn info_to_console(&self, message: impl Into<String>) {
        self.dispatch(Level::Info, message.into(), Target::Console, Location::caller());
    }

    #[track_caller]
    pub fn warn_to_console(&self, message: impl Into<String>) {
        self.dispatch(Level::Warn, message.into(), Target::Console, Location::caller());
    }

    #[track_caller]
    pub fn error_to_console(&self, message: impl Into<String>) {
        self.dispatch(Level::Error, message.into(), Target::Console, Location::caller());
    }

    /// Flush the file sink's buffered writer.
    pub fn flush(&self) -> crate::core::error::Result<()> {
        self.file.flush()
    }

    fn dispatch(
        &self,
        level: Level,
        message: String,
        target: Target,
        site: &'static Location<'static>,
    ) {
        match target {
            Target::Both => {
                self.emit_to(self.file.as_ref(), level, &message, site);
                self.emit_to(self.console.as_ref(), level, &message, site);
            }
            Target::File => self.emit_to(self.file.as_ref(), level, &message, site),
            Target::Console => self.emit_to(self.console.as_ref(), level, &message, site),
        }
    }

    /// Run the full enrichment pipeline for one sink: threshold, context
    /// fields, hooks in order, timestamp, caller, emit.
    fn emit_to(&self, sink: &dyn Sink, level: Level, message: &str, site: &'static Location<'static>) {
        if !sink.accepts(level) {
            return;
        }

        let mut record = Record::new(level, message.to_string());
        for (key, value) in &self.fields {
            record.push(key.clone(), value.clone());
        }
        for hook in &self.hooks {
            hook.run(&mut record, level, message);
        }
        record.set_timestamp(Utc::now());
        if self.include_caller {
            record.set_caller(CallSite::from(site));
        }

        if let Err(err) = sink.emit(&record) {
            eprintln!("[LOGGER ERROR] {} sink failed: {}", sink.name(), err);
        }
    }
}
