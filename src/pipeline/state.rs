use std::fmt;

use serde::Serialize;

use super::log::{LogEntry, Severity};

/// Overall result of one document run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Success,
    CompletedWithErrors,
    Failed,
    Skipped,
    Cancelled,
}

impl Verdict {
    /// Whether the run produced an output document worth writing.
    pub fn has_output(&self) -> bool {
        matches!(self, Verdict::Success | Verdict::CompletedWithErrors)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Success => "success",
            Verdict::CompletedWithErrors => "completed with errors",
            Verdict::Failed => "failed",
            Verdict::Skipped => "skipped (empty input)",
            Verdict::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Aggregated outcome of one run, assembled by the orchestrator after all
/// page workers have been joined.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingState {
    pub log: Vec<LogEntry>,
    /// Pages that were attempted (successful or failed).
    pub processed_pages: usize,
    pub succeeded_pages: usize,
    pub verdict: Verdict,
}

impl ProcessingState {
    /// Log entries sorted by emission time. Ties keep their merge order.
    pub fn chronological(&self) -> Vec<LogEntry> {
        let mut entries = self.log.clone();
        entries.sort_by_key(|e| e.timestamp);
        entries
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.log.iter().filter(|e| e.severity == severity).count()
    }
}
