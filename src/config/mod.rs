//! Configuration management for sheet2pdf

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::{Result, Sheet2PdfError};

/// Default LibreOffice executable for the host platform
#[cfg(windows)]
pub const DEFAULT_SOFFICE_PATH: &str = r"C:\Program Files\LibreOffice\program\soffice.exe";

/// Default LibreOffice executable for the host platform
#[cfg(target_os = "macos")]
pub const DEFAULT_SOFFICE_PATH: &str = "/Applications/LibreOffice.app/Contents/MacOS/soffice";

/// Default LibreOffice executable for the host platform
#[cfg(all(unix, not(target_os = "macos")))]
pub const DEFAULT_SOFFICE_PATH: &str = "/usr/bin/soffice";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External converter settings
    pub converter: ConverterConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// External converter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Absolute path to the office-suite executable
    pub soffice_path: PathBuf,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            soffice_path: PathBuf::from(DEFAULT_SOFFICE_PATH),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Sheet2PdfError::config(
                format!("Failed to read config file {:?}: {}", path.as_ref(), e)
            ))?;

        match config_extension(path.as_ref()).as_str() {
            "toml" => toml::from_str(&content).map_err(Into::into),
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(Into::into),
            _ => Err(Sheet2PdfError::config(
                "Unsupported config file format. Use .toml or .yaml"
            )),
        }
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = match config_extension(path.as_ref()).as_str() {
            "toml" => toml::to_string_pretty(self)
                .map_err(|e| Sheet2PdfError::config(format!("TOML serialization failed: {e}")))?,
            "yaml" | "yml" => serde_yaml::to_string(self)
                .map_err(|e| Sheet2PdfError::config(format!("YAML serialization failed: {e}")))?,
            _ => return Err(Sheet2PdfError::config(
                "Unsupported config file format. Use .toml or .yaml"
            )),
        };

        std::fs::write(&path, content)
            .map_err(|e| Sheet2PdfError::config(
                format!("Failed to write config file {:?}: {}", path.as_ref(), e)
            ))?;

        Ok(())
    }

    /// Override the converter path
    #[must_use]
    pub fn with_soffice_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.converter.soffice_path = path.into();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let soffice = &self.converter.soffice_path;
        if soffice.as_os_str().is_empty() {
            return Err(Sheet2PdfError::config("Converter path must not be empty"));
        }
        if !soffice.is_absolute() {
            return Err(Sheet2PdfError::config(
                format!("Converter path must be absolute: {}", soffice.display())
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Sheet2PdfError::config(
                format!("Unknown log level '{}'. Use one of {:?}", self.logging.level, LOG_LEVELS)
            ));
        }

        Ok(())
    }
}

fn config_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}
