//! Fatal error taxonomy
//!
//! Every variant aborts the current operation and carries a message meant
//! for the user. Per-line problems during ingestion are not errors; they
//! are recorded as [`crate::models::RejectReason`] in the review ledger.

use std::path::PathBuf;
use thiserror::Error;

/// Anticipated, user-facing failures that stop a run
#[derive(Error, Debug)]
pub enum TsrwError {
    #[error("Cannot open file: {0}")]
    InputFileNotFound(String),

    #[error("Cannot create folder '{}': {message}", path.display())]
    OutputFolder { path: PathBuf, message: String },

    #[error("Invalid top_x value: {0}. Must be a non-negative integer.")]
    InvalidTopX(i64),

    #[error("Input CSV is empty")]
    EmptyFile,

    #[error("Header must have exactly 3 columns")]
    HeaderColumnCount(usize),

    #[error("Header does not match 'Test case;Duration;Status'")]
    HeaderFormat,

    #[error("No data lines found after header.")]
    NoDataLines,

    #[error("No valid lines in CSV")]
    NoValidLines,

    #[error("Failed to write CSV file: {0}")]
    Export(#[source] std::io::Error),

    #[error("Invalid sort key '{0}'. Must be one of ['Requirement', 'Test Case', 'Duration', 'Status', 'none'].")]
    InvalidSortKey(String),
}

pub type Result<T> = std::result::Result<T, TsrwError>;
