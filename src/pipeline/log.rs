// Processing log: timestamped entries with severity, plus live sinks

use std::sync::Mutex;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

impl Severity {
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Info => "ℹ️",
            Severity::Warning => "⚠️",
            Severity::Error => "❌",
            Severity::Success => "✅",
        }
    }
}

/// A single immutable log entry, stamped at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            timestamp: Local::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    /// `"{icon} [HH:MM:SS] {message}"`
    pub fn formatted(&self) -> String {
        format!(
            "{} [{}] {}",
            self.severity.icon(),
            self.timestamp.format("%H:%M:%S"),
            self.message
        )
    }
}

/// Receives log entries as they are emitted, possibly from several workers
/// at once. Implementations synchronize internally.
pub trait LogSink: Send + Sync {
    fn record(&self, entry: &LogEntry);
}

/// Collects entries in memory; readable at any time through [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries received so far, in arrival order.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemoryLogSink {
    fn record(&self, entry: &LogEntry) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push(entry.clone());
    }
}

/// Prints each entry's formatted form to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLogSink;

impl LogSink for ConsoleLogSink {
    fn record(&self, entry: &LogEntry) {
        eprintln!("{}", entry.formatted());
    }
}

/// Worker-local log. Entries stay owned by the worker and are also forwarded
/// to `tracing` and the optional live sink at emission time.
pub struct PageLog<'a> {
    entries: Vec<LogEntry>,
    sink: Option<&'a dyn LogSink>,
}

impl<'a> PageLog<'a> {
    pub fn new(sink: Option<&'a dyn LogSink>) -> Self {
        Self {
            entries: Vec::new(),
            sink,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        match entry.severity {
            Severity::Info | Severity::Success => {
                info!(severity = ?entry.severity, "{}", entry.message)
            }
            Severity::Warning => warn!("{}", entry.message),
            Severity::Error => error!("{}", entry.message),
        }
        if let Some(sink) = self.sink {
            sink.record(&entry);
        }
        self.entries.push(entry);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogEntry::info(message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(LogEntry::warning(message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogEntry::error(message));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(LogEntry::success(message));
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}
