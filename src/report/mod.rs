//! Per-file outcomes and the accumulated run report

use std::fmt;
use std::path::{Path, PathBuf};
use serde::Serialize;

pub mod progress;

pub use progress::*;

/// Hint shown at the end of every run
pub const REMEDIATION_HINT: &str = "If files were skipped, close them in any open spreadsheet \
     application and retry with ASCII-only folder and file names.";

/// Why a single conversion failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FailureReason {
    /// The converter exited cleanly but no PDF exists
    OutputMissing,
    /// The converter could not be started or exited non-zero
    Invocation(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutputMissing => write!(f, "output not generated"),
            Self::Invocation(message) => write!(f, "{message}"),
        }
    }
}

/// Result of converting one workbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Success,
    Failure(FailureReason),
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// One line of the run log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub file: PathBuf,
    pub outcome: ConversionOutcome,
}

impl LogEntry {
    pub fn new<P: Into<PathBuf>>(file: P, outcome: ConversionOutcome) -> Self {
        Self {
            file: file.into(),
            outcome,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.file.display();
        match &self.outcome {
            ConversionOutcome::Success => write!(f, "Success: {file}"),
            ConversionOutcome::Failure(FailureReason::OutputMissing) => {
                write!(f, "Failed (output not generated): {file}")
            }
            ConversionOutcome::Failure(reason) => write!(f, "Failed: {file} ({reason})"),
        }
    }
}

/// Position within an active run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunProgress {
    pub completed: usize,
    pub total: usize,
}

impl RunProgress {
    /// Completion as `completed / total * 100`
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.completed as f64 / self.total as f64;
        ratio * 100.0
    }
}

/// Log and counters accumulated over one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    entries: Vec<LogEntry>,
    success: usize,
    failed: usize,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the log and zero both counters
    pub fn reset(&mut self) {
        self.entries.clear();
        self.success = 0;
        self.failed = 0;
    }

    /// Append one outcome and bump the matching counter
    pub fn record(&mut self, file: &Path, outcome: ConversionOutcome) -> &LogEntry {
        if outcome.is_success() {
            self.success += 1;
        } else {
            self.failed += 1;
        }
        self.entries.push(LogEntry::new(file, outcome));
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Log rendered as text, one line per file
    pub fn log_lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total: self.entries.len(),
            success: self.success,
            failed: self.failed,
        }
    }
}

/// Aggregate counts shown once a run ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Headline sentence of the summary
    pub fn headline(&self) -> String {
        format!(
            "{} of {} files converted, {} failed",
            self.success, self.total, self.failed
        )
    }
}
