//! sheet2pdf CLI - Batch spreadsheet to PDF converter
//!
//! Converts every `.xlsx` workbook under a folder to PDF with headless
//! LibreOffice, printing one log line per file and a summary at the end.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use serde::Serialize;
use tracing::{error, info};

use sheet2pdf::report::LogEntry;
use sheet2pdf::report::REMEDIATION_HINT;
use sheet2pdf::{
    init_with_config, Config, ConsoleReporter, ProgressSink, RunSummary, Session, Sheet2PdfError,
    ShellLauncher, SilentReporter, StartOutcome,
};

/// sheet2pdf - Batch .xlsx to PDF converter
#[derive(Parser)]
#[command(
    name = "sheet2pdf",
    version,
    args_conflicts_with_subcommands = true,
    about = "Convert every .xlsx file in a folder tree to PDF with headless LibreOffice",
    long_about = "sheet2pdf walks a folder recursively, finds every .xlsx workbook and asks \
                  LibreOffice to convert it to PDF. Each PDF is written next to its source file. \
                  Files are converted one at a time; failures are logged and the batch continues."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Folder that contains the .xlsx files
    #[arg(value_name = "FOLDER")]
    folder: Option<PathBuf>,

    /// Path to the LibreOffice executable (overrides the config file)
    #[arg(long, value_name = "PATH")]
    soffice: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show what would be converted without running the converter
    #[arg(long)]
    dry_run: bool,

    /// Print the run result as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Validate configuration file
    Config {
        /// Configuration file to validate
        file: PathBuf,
    },
    /// Generate example configuration file
    ExampleConfig {
        /// Output file path (.toml or .yaml)
        #[arg(short, long, default_value = "sheet2pdf.toml")]
        output: PathBuf,
    },
    /// Show version and converter information
    Info {
        /// Configuration file to read the converter path from
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

/// Result of one run in machine-readable form
#[derive(Serialize)]
struct JsonReport<'a> {
    folder: &'a Path,
    summary: RunSummary,
    entries: &'a [LogEntry],
}

fn main() {
    let mut cli = Cli::parse();

    // Handle subcommands
    if let Some(command) = cli.command.take() {
        if let Err(e) = handle_subcommand(command) {
            eprintln!("{}: {:#}", style("Error").red().bold(), e);
            process::exit(1);
        }
        return;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", style("Error").red().bold(), e);
            process::exit(1);
        }
    };

    if let Err(e) = init_with_config(&config) {
        eprintln!("{}: Failed to initialize logging: {}", style("Error").red().bold(), e);
        process::exit(1);
    }

    let mut session = Session::new(config);
    if let Some(folder) = &cli.folder {
        session.select_folder(folder);
    }

    let code = if cli.dry_run {
        run_dry(&session)
    } else {
        run_conversion(&cli, &mut session)
    };
    process::exit(code);
}

/// Build the effective configuration: defaults, then file, then flags
fn load_config(cli: &Cli) -> sheet2pdf::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(soffice) = &cli.soffice {
        config = config.with_soffice_path(soffice);
    }

    if cli.quiet {
        config.logging.level = "error".to_string();
    } else if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    config.validate()?;
    Ok(config)
}

/// Tell the user why the run cannot start
fn report_input_error(e: &Sheet2PdfError) -> i32 {
    error!("{}", e);
    eprintln!("{}: {}", style("Error").red().bold(), e.user_message());
    1
}

fn nothing_to_convert(session: &Session) {
    let folder = session.folder().unwrap_or_else(|| Path::new(""));
    println!(
        "{}: No .xlsx files to convert in {}",
        style("Result").blue().bold(),
        folder.display()
    );
}

/// List the files a run would convert
fn run_dry(session: &Session) -> i32 {
    match session.scan_only() {
        Ok(files) if files.is_empty() => {
            nothing_to_convert(session);
            0
        }
        Ok(files) => {
            println!("{} files would be converted:", style(files.len()).bold());
            for file in &files {
                println!("  {}", file.display());
            }
            0
        }
        Err(e) => report_input_error(&e),
    }
}

/// Run the batch and print the outcome
fn run_conversion(cli: &Cli, session: &mut Session) -> i32 {
    let mut console_reporter;
    let mut silent_reporter;
    let sink: &mut dyn ProgressSink = if cli.json || cli.quiet {
        silent_reporter = SilentReporter;
        &mut silent_reporter
    } else {
        console_reporter = ConsoleReporter::new();
        &mut console_reporter
    };

    info!(
        "Using converter {}",
        session.config().converter.soffice_path.display()
    );

    match session.start(&ShellLauncher, sink) {
        Ok(StartOutcome::NothingToConvert) => {
            if cli.json {
                print_json(session, RunSummary::default());
            } else {
                nothing_to_convert(session);
            }
            0
        }
        Ok(StartOutcome::Completed(summary)) => {
            if cli.json {
                print_json(session, summary);
            } else if cli.quiet {
                println!("{}", summary.headline());
                if summary.failed > 0 {
                    println!("{REMEDIATION_HINT}");
                }
            }
            0
        }
        Err(e) => report_input_error(&e),
    }
}

fn print_json(session: &Session, summary: RunSummary) {
    let report = JsonReport {
        folder: session.folder().unwrap_or_else(|| Path::new("")),
        summary,
        entries: session.report().entries(),
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("Failed to serialize report: {}", e),
    }
}

/// Handle subcommands
fn handle_subcommand(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Config { file } => validate_config_file(&file),
        Commands::ExampleConfig { output } => generate_example_config(&output),
        Commands::Info { config } => show_info(config.as_deref()),
    }
}

/// Validate configuration file
fn validate_config_file(file_path: &Path) -> anyhow::Result<()> {
    let config = Config::from_file(file_path)
        .with_context(|| format!("cannot load {}", file_path.display()))?;
    config.validate()?;

    println!("{}: Configuration file is valid", style("Success").green().bold());
    println!("Converter: {}", config.converter.soffice_path.display());
    println!("Log level: {}", config.logging.level);

    Ok(())
}

/// Generate example configuration file
fn generate_example_config(output_path: &Path) -> anyhow::Result<()> {
    Config::default()
        .to_file(output_path)
        .with_context(|| format!("cannot write {}", output_path.display()))?;

    println!(
        "{}: Generated example configuration: {}",
        style("Success").green().bold(),
        output_path.display()
    );

    Ok(())
}

/// Show version and converter information
fn show_info(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("cannot load {}", path.display()))?,
        None => Config::default(),
    };
    let soffice = &config.converter.soffice_path;

    println!("{}", style("sheet2pdf Information").bold());
    println!();
    println!("{}: {}", style("Version").bold(), sheet2pdf::VERSION);
    println!("{}: {}", style("Converter").bold(), soffice.display());
    if soffice.is_file() {
        println!("  {}", style("✓ found").green());
    } else {
        println!("  {}", style("✗ not found").red());
    }
    println!("{}: .xlsx -> .pdf", style("Conversion").bold());

    Ok(())
}
