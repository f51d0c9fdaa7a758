//! Transcript loading: truncation to the last run and segment splitting.
//!
//! A TTY transcript accumulates the output of every simulation run. Only the
//! last run matters, so [`truncate_to_last_marker`] drops everything before
//! the final marker phrase. [`truncate_transcript_file`] applies the same
//! truncation to the file on disk, overwriting it.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Result, TranscriptError};

/// Marker phrases that open the section of the last simulation run.
pub const DEFAULT_MARKERS: &[&str] = &["Fault description:"];

/// Literal heading of fault #1 in the fault table.
pub const TABLE_ANCHOR: &str = "Fault  1 ";

/// The two segments of a truncated transcript, as non-blank lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments<'a> {
    /// Lines before the table anchor.
    pub description: Vec<&'a str>,
    /// Lines from the table anchor onward.
    pub table: Vec<&'a str>,
}

/// Returns `text` starting at the last occurrence of the marker phrase.
///
/// Markers are searched in reverse list order, each across the whole text;
/// the position of the last one searched (the first in the list) wins. An
/// empty marker list leaves the text unchanged.
///
/// # Errors
///
/// Returns [`TranscriptError::MarkerNotFound`] for the first marker (in
/// search order) that does not occur in `text`.
///
/// # Examples
///
/// ```
/// use tty_fault_transcript::truncate_to_last_marker;
///
/// let text = "Fault description:\nold run\nFault description:\nnew run\n";
/// let truncated = truncate_to_last_marker(text, &["Fault description:"]).unwrap();
/// assert_eq!(truncated, "Fault description:\nnew run\n");
/// ```
pub fn truncate_to_last_marker<'a, S: AsRef<str>>(text: &'a str, markers: &[S]) -> Result<&'a str> {
    let mut start = 0;
    for marker in markers.iter().rev() {
        let marker = marker.as_ref();
        start = text
            .rfind(marker)
            .ok_or_else(|| TranscriptError::MarkerNotFound {
                marker: marker.to_string(),
            })?;
    }
    Ok(&text[start..])
}

/// Truncates the transcript file in place and returns the truncated text.
///
/// This is a destructive operation: the file is overwritten with the text
/// starting at the last marker. Running it again on the result is a no-op.
///
/// # Errors
///
/// Returns [`TranscriptError::Io`] if the file cannot be read or written,
/// or [`TranscriptError::MarkerNotFound`] if a marker is missing (the file
/// is left untouched in that case).
pub fn truncate_transcript_file<S: AsRef<str>>(path: &Path, markers: &[S]) -> Result<String> {
    let content = fs::read_to_string(path)?;
    let truncated = truncate_to_last_marker(&content, markers)?.to_string();
    fs::write(path, &truncated)?;
    info!(
        path = %path.display(),
        removed_bytes = content.len() - truncated.len(),
        "Transcript truncated to last run"
    );
    Ok(truncated)
}

/// Splits truncated text at the first table anchor.
///
/// Everything before the anchor is the description segment; the anchor and
/// everything after it is the table segment. Without an anchor the whole
/// text is the description segment and the table segment is empty.
pub fn split_segments<'a>(text: &'a str, anchor: &str) -> Segments<'a> {
    let (description, table) = match text.find(anchor) {
        Some(pos) => text.split_at(pos),
        None => (text, ""),
    };
    let segments = Segments {
        description: non_blank_lines(description),
        table: non_blank_lines(table),
    };
    debug!(
        description_lines = segments.description.len(),
        table_lines = segments.table.len(),
        "Split transcript segments"
    );
    segments
}

fn non_blank_lines(segment: &str) -> Vec<&str> {
    segment
        .trim()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect()
}
