//! Record-in-progress handed to hooks and sinks

use super::field::FieldValue;
use super::level::Level;
use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::Location;

/// Source location of the user call that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    file: &'static str,
    line: u32,
}

impl CallSite {
    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A log record being assembled for one sink emission.
///
/// Fields keep their append order; hooks run against this before the sink
/// serializes it.
#[derive(Debug, Clone)]
pub struct Record {
    level: Level,
    message: String,
    fields: Vec<(String, FieldValue)>,
    timestamp: Option<DateTime<Utc>>,
    caller: Option<CallSite>,
}

impl Record {
    pub fn new(level: Level, message: String) -> Self {
        Self {
            level,
            message: sanitize_message(&message),
            fields: Vec::new(),
            timestamp: None,
            caller: None,
        }
    }

    /// Append a field using the typed encoding table.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.push((key.into(), value.into()));
    }

    /// Append an error under the conventional `error` key.
    pub fn push_error(&mut self, err: &(dyn std::error::Error + 'static)) {
        self.fields.push(("error".to_string(), FieldValue::error(err)));
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn caller(&self) -> Option<CallSite> {
        self.caller
    }

    pub(crate) fn set_timestamp(&mut self, timestamp: DateTime<Utc>) {
        self.timestamp = Some(timestamp);
    }

    pub(crate) fn set_caller(&mut self, caller: CallSite) {
        self.caller = Some(caller);
    }
}

/// Escape newlines and tabs so one call cannot forge extra log lines.
fn sanitize_message(message: &str) -> String {
    if !message.contains(['\n', '\r', '\t']) {
        return message.to_string();
    }
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_keep_append_order() {
        let mut record = Record::new(Level::Info, "msg".to_string());
        record.push("b", 2);
        record.push("a", 1);
        record.push("c", 3);

        let keys: Vec<&str> = record.fields().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn test_push_error_uses_error_key() {
        let mut record = Record::new(Level::Error, "failed".to_string());
        let err = std::io::Error::new(std::io::ErrorKind::Other, "hook error");
        record.push_error(&err);

        assert_eq!(record.fields().len(), 1);
        assert_eq!(record.fields()[0].0, "error");
        assert_eq!(record.fields()[0].1, FieldValue::Str("hook error".to_string()));
    }

    #[test]
    fn test_message_sanitized() {
        let record = Record::new(Level::Info, "a\nb\tc".to_string());
        assert_eq!(record.message(), "a\\nb\\tc");
    }

    #[test]
    fn test_call_site_from_location() {
        #[track_caller]
        fn capture() -> CallSite {
            CallSite::from(Location::caller())
        }

        let expected = line!() + 1;
        let site = capture();
        assert_eq!(site.line(), expected);
        assert!(site.file().ends_with("record.rs"));
    }
}
