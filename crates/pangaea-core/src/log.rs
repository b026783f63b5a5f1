//! Ordered diagnostic log handed back to exporter callers.
//!
//! Each record serializes as a single-key object, `{"ERROR": "..."}` or
//! `{"SUCCESS": "..."}`. Records are also forwarded to `tracing`.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Error,
    Success,
}

impl LogLevel {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Success => "SUCCESS",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    #[must_use]
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }
}

impl Serialize for LogEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.level.as_str(), &self.message)?;
        map.end()
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)
    }
}

/// Append-only list of [`LogEntry`] records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExportLog {
    entries: Vec<LogEntry>,
}

impl ExportLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure or a refusal.
    pub fn error(&mut self, message: impl Into<String>) {
        let entry = LogEntry::new(LogLevel::Error, message);
        error!("{}", entry.message);
        self.entries.push(entry);
    }

    /// Records a completed stage.
    pub fn success(&mut self, message: impl Into<String>) {
        let entry = LogEntry::new(LogLevel::Success, message);
        info!("{}", entry.message);
        self.entries.push(entry);
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn errors(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|entry| entry.is_error())
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_serialize_as_level_keyed_objects() {
        let mut log = ExportLog::new();
        log.error("Dataset is protected");
        log.success("done");

        assert_eq!(
            log.to_json().unwrap(),
            r#"[{"ERROR":"Dataset is protected"},{"SUCCESS":"done"}]"#
        );
    }

    #[test]
    fn test_append_order_and_error_filter() {
        let mut log = ExportLog::new();
        assert!(log.is_empty());

        log.success("first");
        log.error("second");
        log.error("third");

        assert_eq!(log.len(), 3);
        assert!(log.has_errors());
        let errors: Vec<&str> = log.errors().map(|e| e.message.as_str()).collect();
        assert_eq!(errors, vec!["second", "third"]);
        assert_eq!(log.last().unwrap().to_string(), "ERROR: third");
    }
}
