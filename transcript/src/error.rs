//! Error types for transcript loading and parsing.
//!
//! Every variant except [`Io`](TranscriptError::Io) means the transcript is
//! malformed or empty; all of them abort a run.

use thiserror::Error;
use tty_fault_core::DatasetError;

/// Errors that can occur while loading or parsing a transcript.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// A required section-boundary phrase is absent.
    #[error("the string '{marker}' was not found in the transcript")]
    MarkerNotFound { marker: String },

    /// The description segment produced no usable fault entries.
    #[error("no fault description data could be parsed from the transcript")]
    NoDescriptionData,

    /// The table segment produced no relay operation entries.
    #[error("no relay fault data could be parsed from the transcript")]
    NoTableData,

    /// A fault table block's sequences differ in length (strict policy only).
    #[error(
        "fault table block '{fault_line}' lists {faults} fault(s) but {pairs} time pair(s) and {measurements} measurement(s)"
    )]
    BlockLengthMismatch {
        fault_line: String,
        faults: usize,
        pairs: usize,
        measurements: usize,
    },

    /// An impedance token is not a number.
    #[error("invalid impedance value '{token}' in line '{line}'")]
    InvalidMeasurement { token: String, line: String },

    /// Joined records do not match the report variant.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// Transcript file read/write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results with [`TranscriptError`].
pub type Result<T> = std::result::Result<T, TranscriptError>;
