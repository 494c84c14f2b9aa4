//! Application state for one converter session

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Result, Sheet2PdfError};
use crate::processing::{scan_directory, BatchConverter, ConversionRunner, Launcher};
use crate::report::{ProgressSink, RunPhase, RunReport, RunSummary};

/// How a start request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// The folder held no workbooks; nothing was converted
    NothingToConvert,
    /// Every workbook was attempted
    Completed(RunSummary),
}

/// Chosen folder, configuration and the log of the latest run
pub struct Session {
    config: Config,
    folder: Option<PathBuf>,
    report: RunReport,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            folder: None,
            report: RunReport::new(),
        }
    }

    /// Remember the folder the next run will scan
    pub fn select_folder<P: Into<PathBuf>>(&mut self, folder: P) {
        let folder = folder.into();
        debug!("Selected folder {:?}", folder);
        self.folder = Some(folder);
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Log of the most recent run
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    fn checked_folder(&self) -> Result<&Path> {
        let folder = self.folder.as_deref().ok_or(Sheet2PdfError::NoFolderSelected)?;
        if !folder.is_dir() {
            return Err(Sheet2PdfError::folder_missing(folder));
        }
        Ok(folder)
    }

    /// List the workbooks a run would convert, without converting anything
    pub fn scan_only(&self) -> Result<Vec<PathBuf>> {
        scan_directory(self.checked_folder()?)
    }

    /// Scan the selected folder and convert every workbook in it.
    ///
    /// Input errors are returned before any scan happens. Once conversion
    /// starts the run always reaches the summary. Every phase the session
    /// passes through is reported to `sink`.
    pub fn start(
        &mut self,
        launcher: &dyn Launcher,
        sink: &mut dyn ProgressSink,
    ) -> Result<StartOutcome> {
        let folder = self.checked_folder()?.to_path_buf();

        enter(sink, RunPhase::Scanning);
        let files = match scan_directory(&folder) {
            Ok(files) => files,
            Err(e) => {
                enter(sink, RunPhase::Idle);
                return Err(e);
            }
        };

        if files.is_empty() {
            info!("No .xlsx files under {:?}", folder);
            enter(sink, RunPhase::Idle);
            return Ok(StartOutcome::NothingToConvert);
        }
        enter(sink, RunPhase::ConfirmedNonEmpty);

        enter(sink, RunPhase::Running);
        let runner = ConversionRunner::new(&self.config.converter.soffice_path, launcher);
        let summary = BatchConverter::new(runner).run(&files, &mut self.report, sink);

        enter(sink, RunPhase::Summarized);
        info!("{}", summary.headline());
        enter(sink, RunPhase::Idle);

        Ok(StartOutcome::Completed(summary))
    }
}

fn enter(sink: &mut dyn ProgressSink, phase: RunPhase) {
    debug!("Session phase: {:?}", phase);
    sink.phase_changed(phase);
}
