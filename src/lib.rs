//! sheet2pdf - Batch spreadsheet to PDF converter
//!
//! Walks a folder tree, finds every `.xlsx` workbook and converts each one
//! to PDF by running LibreOffice in headless mode. The PDF lands next to its
//! source. Files are converted one after another; a failing file is logged
//! and the batch moves on.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sheet2pdf::{Config, ConsoleReporter, Session, ShellLauncher, StartOutcome};
//!
//! let mut session = Session::new(Config::default());
//! session.select_folder("/data/reports");
//!
//! match session.start(&ShellLauncher, &mut ConsoleReporter::new())? {
//!     StartOutcome::NothingToConvert => println!("nothing to convert"),
//!     StartOutcome::Completed(summary) => println!("{}", summary.headline()),
//! }
//! # Ok::<(), sheet2pdf::Sheet2PdfError>(())
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod processing;
pub mod report;
pub mod session;

// Re-export commonly used types
pub use config::{Config, ConverterConfig, LoggingConfig};
pub use error::{Result, Sheet2PdfError};
pub use processing::{BatchConverter, ConversionCommand, ConversionRunner, Launcher, ShellLauncher};
pub use report::{
    ConsoleReporter, ConversionOutcome, FailureReason, ProgressSink, RunPhase, RunSummary, SilentReporter,
};
pub use session::{Session, StartOutcome};

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the `RUST_LOG` filter (default `info`)
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    install_subscriber(filter, false)
}

/// Initialize logging from the `[logging]` section of a configuration
pub fn init_with_config(config: &Config) -> Result<()> {
    install_subscriber(EnvFilter::new(&config.logging.level), config.logging.json_format)
}

fn install_subscriber(filter: EnvFilter, json: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if json {
        tracing::subscriber::set_global_default(builder.json().finish()).is_ok()
    } else {
        tracing::subscriber::set_global_default(builder.finish()).is_ok()
    };

    if installed {
        info!("sheet2pdf v{} initialized", VERSION);
    }

    Ok(())
}
