//! Relay-protection TTY transcript parsing.
//!
//! This crate turns the text of a relay-analysis tool's TTY window into
//! structured fault records. A transcript holds a *fault description*
//! segment followed by a *fault table* segment (starting at the literal
//! heading `"Fault  1 "`). Parsing runs in fixed stages:
//!
//! 1. [`truncate_to_last_marker`] keeps only the last simulation run.
//! 2. [`split_segments`] separates the two segments into non-blank lines.
//! 3. [`parse_fault_descriptions`] and [`parse_fault_table`] parse each
//!    segment.
//! 4. [`merge_records`](tty_fault_core::merge_records) joins the results on
//!    the fault number.
//!
//! # Main entry points
//!
//! - [`parse_transcript`]: pure, in-memory parse of transcript text.
//! - [`process_transcript_file`]: truncates the transcript file in place,
//!   then parses it.
//!
//! # Example
//!
//! ```
//! use tty_fault_core::CurveType;
//! use tty_fault_transcript::{ParseOptions, parse_transcript};
//!
//! let text = "\
//! Fault description:
//! 1. Bus Fault on: BUS1 230.0 kV 1LG
//! 2. Interm. Fault on: BUS1 230.0 kV - BUS2 230.0 kV 1L 1LG (45%)
//!
//! Fault  1    Fault  2
//! ================
//! BUS1 G1 T1 Z1: 0.020  Z2: 0.350
//! 4.210@81.0  9.870@79.5
//! ";
//!
//! let parsed = parse_transcript(text, Some(CurveType::Distance), &ParseOptions::default()).unwrap();
//! assert_eq!(parsed.dataset.len(), 2);
//! assert_eq!(parsed.dataset.records[0].relay, "BUS1 G1 T1");
//! ```

pub mod description;
pub mod error;
pub mod loader;
pub mod table;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;
use tty_fault_core::{CurveType, FaultDataset, FaultDescription, FaultTableEntry, merge_records};

pub use description::parse_fault_descriptions;
pub use error::{Result, TranscriptError};
pub use loader::{
    DEFAULT_MARKERS, Segments, TABLE_ANCHOR, split_segments, truncate_to_last_marker,
    truncate_transcript_file,
};
pub use table::{BlockPolicy, detect_curve_type, parse_fault_table};

/// Settings that control how a transcript is sectioned and parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Marker phrases opening the last run (searched in reverse order).
    pub markers: Vec<String>,
    /// Literal heading that starts the fault table.
    pub table_anchor: String,
    /// Handling of table blocks with mismatched sequence lengths.
    pub block_policy: BlockPolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            markers: DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect(),
            table_anchor: TABLE_ANCHOR.to_string(),
            block_policy: BlockPolicy::default(),
        }
    }
}

/// Output of a full transcript parse.
#[derive(Debug, Clone)]
pub struct ParsedTranscript {
    /// Transcript text starting at the last marker.
    pub truncated: String,
    pub descriptions: Vec<FaultDescription>,
    pub entries: Vec<FaultTableEntry>,
    /// Inner join of `descriptions` and `entries`.
    pub dataset: FaultDataset,
}

/// Parses transcript text without touching the filesystem.
///
/// `curve` selects the report variant; `None` detects it from the table
/// segment with [`detect_curve_type`].
///
/// # Errors
///
/// Propagates [`TranscriptError::MarkerNotFound`],
/// [`TranscriptError::NoDescriptionData`], [`TranscriptError::NoTableData`]
/// and the table parser's block errors.
pub fn parse_transcript(
    text: &str,
    curve: Option<CurveType>,
    options: &ParseOptions,
) -> Result<ParsedTranscript> {
    let truncated = truncate_to_last_marker(text, &options.markers)?;
    parse_truncated(truncated, curve, options)
}

/// Truncates the transcript file in place, then parses it.
///
/// The file is rewritten exactly once, before any parsing; a parse failure
/// leaves the truncated file behind.
///
/// # Errors
///
/// As [`parse_transcript`], plus [`TranscriptError::Io`] for file access.
pub fn process_transcript_file(
    path: &Path,
    curve: Option<CurveType>,
    options: &ParseOptions,
) -> Result<ParsedTranscript> {
    let truncated = truncate_transcript_file(path, &options.markers)?;
    parse_truncated(&truncated, curve, options)
}

fn parse_truncated(
    truncated: &str,
    curve: Option<CurveType>,
    options: &ParseOptions,
) -> Result<ParsedTranscript> {
    let segments = split_segments(truncated, &options.table_anchor);
    let curve = curve.unwrap_or_else(|| {
        let detected = detect_curve_type(&segments.table);
        info!(curve = %detected, "Detected report variant");
        detected
    });

    let descriptions = parse_fault_descriptions(&segments.description)?;
    info!(count = descriptions.len(), "Fault descriptions found");

    let entries = parse_fault_table(&segments.table, curve, options.block_policy)?;
    info!(count = entries.len(), "Fault table entries found");

    let dataset = merge_records(curve, &descriptions, &entries)?;
    Ok(ParsedTranscript {
        truncated: truncated.to_string(),
        descriptions,
        entries,
        dataset,
    })
}
