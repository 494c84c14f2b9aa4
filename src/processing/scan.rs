//! Recursive discovery of spreadsheet files

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, Sheet2PdfError};

/// The one spreadsheet extension the converter accepts
pub const SOURCE_EXTENSION: &str = "xlsx";

/// Check whether a file name ends with `.xlsx`, ignoring case.
///
/// A file named exactly `.xlsx` matches too.
pub fn is_matching_file<P: AsRef<Path>>(path: P) -> bool {
    let Some(name) = path.as_ref().file_name() else {
        return false;
    };
    let name = name.to_string_lossy().to_lowercase();
    let suffix = format!(".{SOURCE_EXTENSION}");
    name.ends_with(&suffix)
}

/// Collect every matching file under `root`, in traversal order.
///
/// The root must be an existing, readable directory. Entries below it that
/// cannot be read are logged and skipped. Links to files are listed under
/// the link's own path; links to directories are not descended into.
pub fn scan_directory<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(Sheet2PdfError::folder_missing(root));
    }
    let root = std::path::absolute(root)?;

    debug!("Scanning {:?} for .{} files", root, SOURCE_EXTENSION);

    let mut files = Vec::new();
    for entry in WalkDir::new(&root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.path().is_file() && is_matching_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    debug!("Found {} matching files", files.len());
    Ok(files)
}
