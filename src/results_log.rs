//! Append-only log of successful exchanges.
//!
//! One `"<expression> = <result>"` line per exchange. The file is opened in
//! append mode for every entry and never truncated.

use crate::error::{AppError, AppResult};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ResultsLog {
    path: PathBuf,
}

impl ResultsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one exchange line, creating the file if needed.
    pub fn append(&self, entry: &str) -> AppResult<()> {
        let to_log_error = |source| AppError::ResultsLog {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(to_log_error)?;
        writeln!(file, "{entry}").map_err(to_log_error)
    }
}
