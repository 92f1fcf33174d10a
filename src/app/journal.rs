//! Plain-text record of every install attempt.

use super::installer::Outcome;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const LOG_FILE_NAME: &str = "driver_installation.log";

/// Append-only log file, one line per attempt. Never read back.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Journal { path: path.into() }
    }

    /// The shared log in the system temp directory.
    pub fn in_temp_dir() -> Self {
        Journal::new(std::env::temp_dir().join(LOG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends the line describing `outcome` for `inf`.
    pub fn record(&self, inf: &Path, outcome: &Outcome) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", entry_line(inf, outcome))
    }
}

fn entry_line(inf: &Path, outcome: &Outcome) -> String {
    let path = inf.display();
    match outcome {
        Outcome::Installed => format!("SUCCESS: {}", path),
        Outcome::AlreadyInstalled => format!("ALREADY INSTALLED: {}", path),
        Outcome::Failed(detail) => match detail {
            Some(text) => format!("ERROR: {}: {}", path, single_line(text)),
            None => format!("ERROR: {}", path),
        },
        Outcome::Error(text) => format!("ERROR: {}: {}", path, single_line(text)),
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
