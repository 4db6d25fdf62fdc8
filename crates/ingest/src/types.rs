use serde::{Deserialize, Serialize};
use std::io;

/// What to do with a pageload row that fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Stop at the first malformed row.
    #[default]
    Abort,
    /// Record an issue and keep going.
    Skip,
}

/// Ingest summary returned after reading one dataset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestStats {
    pub rows_read: usize,
    pub rows_logged: usize,
    pub rows_skipped: usize,
    pub issues: Vec<IngestIssue>,
}

/// Non-fatal issues encountered during ingest.
#[derive(Debug, Clone, Serialize)]
pub struct IngestIssue {
    pub line: Option<u64>,
    pub message: String,
}

/// Errors emitted while building the pageload and issuance indices.
#[derive(Debug)]
pub enum IngestError {
    MissingField { field: &'static str },
    MissingDate { line: Option<u64> },
    InvalidNumber { field: &'static str, value: String },
    Csv(csv::Error),
    Io(io::Error),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "record is missing field `{}`", field),
            Self::MissingDate { line: Some(line) } => {
                write!(f, "row at line {} has no date", line)
            }
            Self::MissingDate { line: None } => write!(f, "row has no date"),
            Self::InvalidNumber { field, value } => {
                write!(f, "field `{}` is not a number: {:?}", field, value)
            }
            Self::Csv(err) => write!(f, "csv error: {}", err),
            Self::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for IngestError {}

impl From<io::Error> for IngestError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
