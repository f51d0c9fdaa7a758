//! Error types for report generation.
//!
//! File contention (the workbook being open in another program) is not an
//! error here: [`write_with_retry`](crate::write_with_retry) absorbs it.

use thiserror::Error;

/// Errors that can occur while building or saving a report workbook.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The existing workbook could not be read, or the new one serialized.
    #[error("workbook error: {0}")]
    Workbook(String),

    /// A worksheet could not be added or removed.
    #[error("worksheet error: {0}")]
    Sheet(String),

    /// File I/O failure other than contention.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results with [`ReportError`].
pub type Result<T> = std::result::Result<T, ReportError>;
