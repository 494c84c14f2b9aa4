//! Converter command line construction and shell quoting

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::{Result, Sheet2PdfError};
use crate::processing::scan::is_matching_file;

/// Format handed to `--convert-to`
pub const TARGET_FORMAT: &str = "pdf";

/// Characters the POSIX shell treats specially outside quotes
const POSIX_METACHARACTERS: &[char] = &[
    '(', ')', '<', '>', '&', '|', ';', '$', '`', '\\', '"', '\'', '*', '?', '[', ']', '{',
    '}', '#', '~', '!', '%', '=',
];

/// Characters `cmd.exe` treats specially outside quotes
const CMD_METACHARACTERS: &[char] = &['(', ')', '<', '>', '&', '|', '^', '%', '!', '"', ';', ','];

/// Shell dialect used to run the joined command string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFlavor {
    /// `sh -c`
    Posix,
    /// `cmd /C`
    Cmd,
}

impl ShellFlavor {
    /// Dialect of the platform this binary was built for
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Cmd
        } else {
            Self::Posix
        }
    }

    fn metacharacters(self) -> &'static [char] {
        match self {
            Self::Posix => POSIX_METACHARACTERS,
            Self::Cmd => CMD_METACHARACTERS,
        }
    }
}

/// Whether a token has to be wrapped in quotes before it reaches the shell
pub fn needs_quoting(token: &str, flavor: ShellFlavor) -> bool {
    token.is_empty()
        || token
            .chars()
            .any(|c| c.is_whitespace() || !c.is_ascii() || flavor.metacharacters().contains(&c))
}

/// Quote a single token for the given shell, leaving plain tokens untouched
pub fn quote_token(token: &str, flavor: ShellFlavor) -> String {
    if !needs_quoting(token, flavor) {
        return token.to_string();
    }

    match flavor {
        ShellFlavor::Posix => format!("'{}'", token.replace('\'', r"'\''")),
        // Windows file names cannot contain a double quote
        ShellFlavor::Cmd => format!("\"{token}\""),
    }
}

/// One headless conversion of a single workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionCommand {
    source: PathBuf,
    output_dir: PathBuf,
    tokens: Vec<String>,
}

impl ConversionCommand {
    /// Build the converter invocation for `source`, writing next to it.
    ///
    /// Tokens in order: program, `--headless`, `--convert-to pdf`,
    /// `--outdir <parent of source>`, source.
    pub fn for_source<P: AsRef<Path>, S: AsRef<Path>>(program: P, source: S) -> Result<Self> {
        let program = program.as_ref();
        let source = source.as_ref();

        let output_dir = source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                Sheet2PdfError::conversion(
                    "source has no containing directory",
                    Some(source.to_path_buf()),
                )
            })?
            .to_path_buf();

        let tokens = vec![
            path_token(program)?,
            "--headless".to_string(),
            "--convert-to".to_string(),
            TARGET_FORMAT.to_string(),
            "--outdir".to_string(),
            path_token(&output_dir)?,
            path_token(source)?,
        ];

        Ok(Self {
            source: source.to_path_buf(),
            output_dir,
            tokens,
        })
    }

    /// The workbook being converted
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Directory the converter is told to write into
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Raw argument tokens, program first
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Path the PDF is expected at once the converter exits
    pub fn expected_output(&self) -> PathBuf {
        // `Path` sees `.xlsx` as a stem without extension; the converter writes `.pdf`
        let stem = if self.source.extension().is_none() && is_matching_file(&self.source) {
            OsStr::new("")
        } else {
            self.source.file_stem().unwrap_or_default()
        };
        let mut name = stem.to_os_string();
        name.push(".");
        name.push(TARGET_FORMAT);
        self.output_dir.join(name)
    }

    /// Join the tokens into a single shell command line
    pub fn to_shell_string(&self, flavor: ShellFlavor) -> String {
        self.tokens
            .iter()
            .map(|token| quote_token(token, flavor))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn path_token(path: &Path) -> Result<String> {
    path.to_str().map(str::to_string).ok_or_else(|| {
        Sheet2PdfError::conversion("path is not valid UTF-8", Some(path.to_path_buf()))
    })
}
