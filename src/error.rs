//! Error types for table storage and ledger operations
//!
//! Nothing in this crate is fatal to the process. Malformed cells degrade to
//! defaults at read time and never show up here; these errors cover the cases
//! where an operation must be refused as a whole:
//!
//! - **`StoreError`** - the backing file couldn't be read or written, or a row
//!   position doesn't exist
//! - **`ValidationError`** - a submission was rejected before anything was
//!   written
//! - **`LedgerError`** - either of the above, plus unknown equipment codes

use std::path::PathBuf;

/// Table storage errors
#[derive(Debug)]
pub enum StoreError {
    /// Reading, creating or renaming the backing file failed
    Io { path: PathBuf, source: std::io::Error },
    /// The CSV layer failed on the header or while writing
    Csv { path: PathBuf, source: csv::Error },
    /// Edit/delete referenced a row position that isn't in the table
    RowNotFound { position: usize, len: usize },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            StoreError::Csv { path, source } => {
                write!(f, "CSV error on {}: {}", path.display(), source)
            }
            StoreError::RowNotFound { position, len } => {
                write!(
                    f,
                    "Row {} does not exist (table has {} row(s))",
                    position, len
                )
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Csv { source, .. } => Some(source),
            StoreError::RowNotFound { .. } => None,
        }
    }
}

/// A rejected submission. Nothing has been written when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The equipment code was empty after trimming
    EmptyCode,
    /// A required date was missing or unparsable
    InvalidDate { field: &'static str, value: String },
    /// The end of a period precedes its start
    EndBeforeStart { start: String, end: String },
    /// A decimal field could not be read as a number
    InvalidDecimal { field: &'static str, value: String },
    /// A value outside an enumerated set
    UnknownOption { field: &'static str, value: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyCode => write!(f, "Equipment code must not be empty"),
            ValidationError::InvalidDate { field, value } => {
                write!(f, "Invalid date for {}: '{}' (expected YYYY-MM-DD)", field, value)
            }
            ValidationError::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
            ValidationError::InvalidDecimal { field, value } => {
                write!(f, "Invalid number for {}: '{}'", field, value)
            }
            ValidationError::UnknownOption { field, value } => {
                write!(f, "Unknown value for {}: '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Ledger operation errors
#[derive(Debug)]
pub enum LedgerError {
    /// Storage failed or the row position was out of range
    Store(StoreError),
    /// The submission was rejected
    Validation(ValidationError),
    /// No record exists for the given equipment code
    UnknownCode(String),
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::Store(e) => write!(f, "Storage error: {}", e),
            LedgerError::Validation(e) => write!(f, "Rejected: {}", e),
            LedgerError::UnknownCode(code) => write!(f, "No record for code '{}'", code),
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerError::Store(e) => Some(e),
            LedgerError::Validation(e) => Some(e),
            LedgerError::UnknownCode(_) => None,
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(error: StoreError) -> Self {
        LedgerError::Store(error)
    }
}

impl From<ValidationError> for LedgerError {
    fn from(error: ValidationError) -> Self {
        LedgerError::Validation(error)
    }
}
