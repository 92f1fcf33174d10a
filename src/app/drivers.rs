//! Discovery of driver packages in the drivers folder.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension a file must end with to be offered to the install tool.
pub const INF_SUFFIX: &str = ".inf";

/// Name of the optional translation table kept alongside the drivers.
pub const TRANSLATION_FILE: &str = "driver_name.json";

/// Why a drivers folder yielded nothing to install.
#[derive(Debug)]
pub enum ScanError {
    MissingDirectory(PathBuf),
    NoDrivers(PathBuf),
    Unreadable(PathBuf, io::Error),
}

impl ScanError {
    /// Translation key of the message shown for this condition.
    pub fn message_key(&self) -> &'static str {
        match self {
            ScanError::MissingDirectory(_) => "drivers_dir_not_found",
            ScanError::NoDrivers(_) => "no_inf_files",
            ScanError::Unreadable(..) => "unexpected_error",
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::MissingDirectory(dir) => {
                write!(f, "drivers folder {} does not exist", dir.display())
            }
            ScanError::NoDrivers(dir) => write!(f, "no .inf files in {}", dir.display()),
            ScanError::Unreadable(dir, e) => write!(f, "cannot list {}: {}", dir.display(), e),
        }
    }
}

impl std::error::Error for ScanError {}

/// Lists the `.inf` entries directly inside `dir`, in directory order.
///
/// The suffix match is case-sensitive and subfolders are not searched.
pub fn find_inf_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.exists() {
        return Err(ScanError::MissingDirectory(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|e| ScanError::Unreadable(dir.to_path_buf(), e))?;

    let mut found = Vec::new();
    for entry in entries.flatten() {
        // Names that are not valid UTF-8 still carry an intact ASCII suffix.
        if entry.file_name().to_string_lossy().ends_with(INF_SUFFIX) {
            found.push(entry.path());
        }
    }

    if found.is_empty() {
        return Err(ScanError::NoDrivers(dir.to_path_buf()));
    }
    log::debug!("Found {} driver package(s) in {}", found.len(), dir.display());
    Ok(found)
}
