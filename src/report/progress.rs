//! Live progress display for a conversion run

use std::time::Instant;
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::info;

use crate::report::{ConversionOutcome, LogEntry, RunProgress, RunSummary, REMEDIATION_HINT};

/// Where a session is in the run cycle.
///
/// A full run moves `Idle → Scanning → ConfirmedNonEmpty → Running →
/// Summarized → Idle`; an empty or failed scan goes `Scanning → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Scanning,
    ConfirmedNonEmpty,
    Running,
    Summarized,
}

/// Receives run events in order: `begin`, one `file_finished` per file, `finish`
pub trait ProgressSink {
    /// The session moved to `phase`
    fn phase_changed(&mut self, _phase: RunPhase) {}

    /// The run is about to start; show the indicator at 0%
    fn begin(&mut self, total: usize);

    /// One file is done; `entry` is its log line
    fn file_finished(&mut self, entry: &LogEntry, progress: &RunProgress);

    /// All files are done; hide the indicator and present the summary
    fn finish(&mut self, summary: &RunSummary);
}

/// Terminal reporter: progress bar, scrolling log above it, summary after
pub struct ConsoleReporter {
    bar: Option<ProgressBar>,
    draw_target: fn() -> ProgressDrawTarget,
    started: Option<Instant>,
}

impl ConsoleReporter {
    /// Create a reporter drawing to stderr
    pub fn new() -> Self {
        Self {
            bar: None,
            draw_target: ProgressDrawTarget::stderr,
            started: None,
        }
    }

    /// Create a reporter whose bar is never drawn
    pub fn hidden() -> Self {
        Self {
            draw_target: ProgressDrawTarget::hidden,
            ..Self::new()
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {percent:>3}% {pos}/{len} {msg}",
        )
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn styled_line(entry: &LogEntry) -> String {
        match entry.outcome {
            ConversionOutcome::Success => format!("{}", style(entry).green()),
            ConversionOutcome::Failure(_) => format!("{}", style(entry).red()),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleReporter {
    fn begin(&mut self, total: usize) {
        let bar = ProgressBar::with_draw_target(Some(total as u64), (self.draw_target)());
        bar.set_style(Self::bar_style());
        bar.set_position(0);
        bar.tick();

        self.bar = Some(bar);
        self.started = Some(Instant::now());
    }

    fn file_finished(&mut self, entry: &LogEntry, progress: &RunProgress) {
        let line = Self::styled_line(entry);
        match &self.bar {
            Some(bar) => {
                bar.suspend(|| println!("{line}"));
                bar.set_position(progress.completed as u64);
                if let Some(name) = entry.file.file_name() {
                    bar.set_message(name.to_string_lossy().into_owned());
                }
                bar.tick();
            }
            None => println!("{line}"),
        }
    }

    fn finish(&mut self, summary: &RunSummary) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }

        let elapsed = self.started.take().map(|t| t.elapsed()).unwrap_or_default();
        info!("Run finished: {} in {:.2}s", summary.headline(), elapsed.as_secs_f64());

        println!();
        println!("{}", style("Conversion Summary:").bold());
        println!("  {}: {}", style("Total").bold(), summary.total);
        println!("  {}: {}", style("Converted").green(), summary.success);
        if summary.failed > 0 {
            println!("  {}: {}", style("Failed").red(), summary.failed);
        } else {
            println!("  {}: {}", style("Failed").dim(), summary.failed);
        }
        println!("  {}: {:.2}s", style("Duration").blue(), elapsed.as_secs_f64());
        println!();
        println!("{} {}", style("Note:").yellow().bold(), REMEDIATION_HINT);
    }
}

/// Reporter that draws nothing; the caller renders the result itself
#[derive(Debug, Default)]
pub struct SilentReporter;

impl ProgressSink for SilentReporter {
    fn begin(&mut self, _total: usize) {}

    fn file_finished(&mut self, _entry: &LogEntry, _progress: &RunProgress) {}

    fn finish(&mut self, _summary: &RunSummary) {}
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::report::FailureReason;

    /// Sink that keeps every event for later inspection
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) began_with: Option<usize>,
        pub(crate) lines: Vec<String>,
        pub(crate) percents: Vec<f64>,
        pub(crate) summary: Option<RunSummary>,
        pub(crate) phases: Vec<RunPhase>,
    }

    impl ProgressSink for RecordingSink {
        fn phase_changed(&mut self, phase: RunPhase) {
            self.phases.push(phase);
        }

        fn begin(&mut self, total: usize) {
            self.began_with = Some(total);
        }

        fn file_finished(&mut self, entry: &LogEntry, progress: &RunProgress) {
            self.lines.push(entry.to_string());
            self.percents.push(progress.percent());
        }

        fn finish(&mut self, summary: &RunSummary) {
            self.summary = Some(*summary);
        }
    }

    #[test]
    fn test_console_reporter_lifecycle() {
        let mut reporter = ConsoleReporter::hidden();
        reporter.begin(2);
        assert!(reporter.bar.is_some());

        reporter.file_finished(
            &LogEntry::new("/a.xlsx", ConversionOutcome::Success),
            &RunProgress { completed: 1, total: 2 },
        );
        assert_eq!(reporter.bar.as_ref().map(ProgressBar::position), Some(1));

        reporter.file_finished(
            &LogEntry::new("/b.xlsx", ConversionOutcome::Failure(FailureReason::OutputMissing)),
            &RunProgress { completed: 2, total: 2 },
        );
        assert_eq!(reporter.bar.as_ref().map(ProgressBar::position), Some(2));

        reporter.finish(&RunSummary { total: 2, success: 1, failed: 1 });
        assert!(reporter.bar.is_none());
    }

    #[test]
    fn test_styled_line_keeps_text() {
        let entry = LogEntry::new("/a.xlsx", ConversionOutcome::Success);
        let line = console::strip_ansi_codes(&ConsoleReporter::styled_line(&entry)).into_owned();
        assert_eq!(line, "Success: /a.xlsx");
    }
}
