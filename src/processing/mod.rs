//! Core conversion loop

use std::path::PathBuf;
use tracing::{debug, info};

use crate::report::{ConversionOutcome, ProgressSink, RunProgress, RunReport, RunSummary};

pub mod command;
pub mod runner;
pub mod scan;

pub use command::*;
pub use runner::*;
pub use scan::*;

/// Runs every file of a list through the converter, strictly in order
pub struct BatchConverter<'a> {
    runner: ConversionRunner<'a>,
}

impl<'a> BatchConverter<'a> {
    pub fn new(runner: ConversionRunner<'a>) -> Self {
        Self { runner }
    }

    /// Convert all `files`, recording one log entry per file.
    ///
    /// The report is reset first. A failing file never stops the loop, so at
    /// the end `report` holds exactly `files.len()` entries.
    pub fn run(
        &self,
        files: &[PathBuf],
        report: &mut RunReport,
        sink: &mut dyn ProgressSink,
    ) -> RunSummary {
        let total = files.len();
        report.reset();
        sink.begin(total);
        info!("Converting {} files", total);

        for (index, file) in files.iter().enumerate() {
            debug!("[{}/{}] {:?}", index + 1, total, file);

            let outcome = self.runner.convert(file);
            if let ConversionOutcome::Failure(reason) = &outcome {
                debug!("Failed to convert {}: {}", file.display(), reason);
            }

            let entry = report.record(file, outcome);
            sink.file_finished(entry, &RunProgress { completed: index + 1, total });
        }

        let summary = report.summary();
        sink.finish(&summary);
        summary
    }
}
