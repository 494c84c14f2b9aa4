//! Running the external converter for one workbook

use std::fmt;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

use crate::error::{ErrorContext, Result};
use crate::processing::command::{ConversionCommand, ShellFlavor};
use crate::report::{ConversionOutcome, FailureReason};

/// How a finished converter process exited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitSummary {
    pub success: bool,
    pub code: Option<i32>,
}

impl ExitSummary {
    /// A clean zero exit
    pub fn ok() -> Self {
        Self { success: true, code: Some(0) }
    }

    /// A non-zero exit with the given code
    pub fn failed(code: i32) -> Self {
        Self { success: false, code: Some(code) }
    }
}

impl From<ExitStatus> for ExitSummary {
    fn from(status: ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

impl fmt::Display for ExitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {code}"),
            None => write!(f, "termination by signal"),
        }
    }
}

/// Process boundary: start the converter and wait for it to exit
pub trait Launcher {
    fn launch(&self, command: &ConversionCommand) -> Result<ExitSummary>;
}

/// Runs the quoted command line through the host shell
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellLauncher;

impl ShellLauncher {
    #[cfg(unix)]
    fn shell_command(line: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(line);
        cmd
    }

    #[cfg(windows)]
    fn shell_command(line: &str) -> Command {
        use std::os::windows::process::CommandExt;

        // /S keeps cmd from stripping quotes inside the outer pair
        let mut cmd = Command::new("cmd");
        cmd.args(["/S", "/C"]).raw_arg(format!("\"{line}\""));
        cmd
    }
}

impl Launcher for ShellLauncher {
    fn launch(&self, command: &ConversionCommand) -> Result<ExitSummary> {
        let line = command.to_shell_string(ShellFlavor::host());
        debug!("Running: {}", line);

        let status = Self::shell_command(&line)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;

        Ok(status.into())
    }
}

/// Converts workbooks one at a time with a fixed converter executable
pub struct ConversionRunner<'a> {
    program: &'a Path,
    launcher: &'a dyn Launcher,
}

impl<'a> ConversionRunner<'a> {
    pub fn new(program: &'a Path, launcher: &'a dyn Launcher) -> Self {
        Self { program, launcher }
    }

    /// Convert one workbook and decide the outcome.
    ///
    /// Blocks until the converter exits. An existing PDF from an earlier run
    /// never skips the invocation; the check happens after the process ends.
    pub fn convert(&self, source: &Path) -> ConversionOutcome {
        let command = match ConversionCommand::for_source(self.program, source) {
            Ok(command) => command,
            Err(e) => return ConversionOutcome::Failure(FailureReason::Invocation(e.user_message())),
        };

        let status = match self
            .launcher
            .launch(&command)
            .with_file_context(source.to_path_buf())
        {
            Ok(status) => status,
            Err(e) => return ConversionOutcome::Failure(FailureReason::Invocation(e.user_message())),
        };

        if !status.success {
            return ConversionOutcome::Failure(FailureReason::Invocation(format!(
                "converter exited with {status}"
            )));
        }

        let expected = command.expected_output();
        if expected.is_file() {
            debug!("Output present: {:?}", expected);
            ConversionOutcome::Success
        } else {
            ConversionOutcome::Failure(FailureReason::OutputMissing)
        }
    }
}
