/// Readers for the external tool outputs.
///
/// - `hfreq`     — HydraNL/Riskeer frequency line text files.
/// - `viewer`    — viewer export tables for longitudinal profiles.
/// - `discovery` — computation directory walking and name parsing.
/// - `fixtures`  (test only) — representative file contents.
///
/// Every reader returns a typed `IngestError` rather than panicking; the
/// flows log it, record it in the batch report and move on to the next input.

use std::path::PathBuf;

use thiserror::Error;

pub mod discovery;
pub mod hfreq;
pub mod viewer;

#[cfg(test)]
pub(crate) mod fixtures;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} contains no data rows", path.display())]
    NoData { path: PathBuf },
    #[error("{} has {found} column(s), at least 2 are required", path.display())]
    TooFewColumns { path: PathBuf, found: usize },
    #[error("{} line {line}: expected {expected} columns, found {found}", path.display())]
    RaggedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("{} line {line}: '{token}' is not a number", path.display())]
    InvalidNumber {
        path: PathBuf,
        line: usize,
        token: String,
    },
    #[error("{} line {line}: frequency {value} must be positive", path.display())]
    NonPositiveFrequency { path: PathBuf, line: usize, value: f64 },
    #[error("{} has no column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },
    #[error("failed to parse {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl IngestError {
    /// The input the error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            IngestError::Io { path, .. }
            | IngestError::NoData { path }
            | IngestError::TooFewColumns { path, .. }
            | IngestError::RaggedRow { path, .. }
            | IngestError::InvalidNumber { path, .. }
            | IngestError::NonPositiveFrequency { path, .. }
            | IngestError::MissingColumn { path, .. }
            | IngestError::Csv { path, .. } => path,
        }
    }
}
