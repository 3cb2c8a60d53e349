//! # Rule Source Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / csv::Error / bad cell                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RulesError (this module) ← Adds file name and line number             │
//! │       │                                                                 │
//! │       ├──► estimate-api startup: fatal, process exits                  │
//! │       ├──► estimate-api reload: logged, old catalog kept               │
//! │       └──► rules-check: printed, non-zero exit                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use inkquote_core::CatalogError;
use thiserror::Error;

/// Failures while reading the rule tables.
#[derive(Debug, Error)]
pub enum RulesError {
    /// A required table is not in the rule directory.
    #[error("Rule file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// The file exists but could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV itself is malformed (bad quoting, ragged rows, bad header).
    #[error("{file}:{line}: {message}")]
    Csv {
        file: String,
        line: u64,
        message: String,
    },

    /// A row parsed as CSV but a cell value is invalid.
    #[error("{file}:{line}: {reason}")]
    InvalidRow {
        file: String,
        line: u64,
        reason: String,
    },

    /// The tables parsed but are not consistent with each other.
    #[error("Rule catalog rejected: {0}")]
    Catalog(#[from] CatalogError),
}

impl RulesError {
    /// Creates an InvalidRow error.
    pub fn invalid_row(file: impl Into<String>, line: u64, reason: impl Into<String>) -> Self {
        RulesError::InvalidRow {
            file: file.into(),
            line,
            reason: reason.into(),
        }
    }
}

/// Result type for rule loading.
pub type RulesResult<T> = Result<T, RulesError>;
