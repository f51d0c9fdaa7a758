//! Fault table segment parser.
//!
//! The table is a sequence of four-line blocks, one per relay:
//!
//! ```text
//! Fault  1   Fault  2                     <- fault numbers
//! ...                                     <- unused
//! BUS1 G1 T1 Z1: 0.020  Z2: 0.350          <- relay name + zone/time pairs
//! 4.210@81.0  9.870@79.5                  <- impedance (distance) or times (overcurrent)
//! ```
//!
//! Sequences parsed from one block are matched up positionally. When their
//! lengths differ, [`BlockPolicy`] decides whether to truncate to the
//! shortest or fail.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, warn};
use tty_fault_core::{CurveType, FaultTableEntry, Measurement};

use crate::error::{Result, TranscriptError};

/// Lines per relay block.
pub const BLOCK_LINES: usize = 4;

static FAULT_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Fault\s+(\d+)").expect("static regex must compile")
});

/// Handling of blocks whose parsed sequences differ in length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum BlockPolicy {
    /// Zip to the shortest sequence and log a warning.
    #[default]
    Truncate,
    /// Fail with [`TranscriptError::BlockLengthMismatch`].
    Strict,
}

/// One four-line block of the fault table.
#[derive(Debug, Clone, Copy)]
struct Block<'a> {
    fault_line: &'a str,
    relay_line: &'a str,
    measurement_line: &'a str,
}

impl<'a> Block<'a> {
    fn new(lines: &[&'a str]) -> Self {
        Self {
            fault_line: lines[0],
            relay_line: lines[2],
            measurement_line: lines[3],
        }
    }

    fn fault_numbers(&self) -> Vec<u32> {
        FAULT_NUMBER
            .captures_iter(self.fault_line)
            .filter_map(|caps| caps[1].parse().ok())
            .collect()
    }

    /// Relay name: the first field of the relay line minus its last token.
    fn relay_name(&self, separator: char) -> String {
        let head = self.relay_line.split(separator).next().unwrap_or_default();
        let tokens: Vec<&str> = head.split_whitespace().collect();
        tokens[..tokens.len().saturating_sub(1)].join(" ")
    }

    /// `(zone, time)` pairs of a distance relay line.
    ///
    /// The last three characters before the first colon are the first zone
    /// label; the remaining colon-separated pieces are concatenated after it
    /// and read two tokens at a time.
    fn zone_time_pairs(&self) -> Vec<(String, String)> {
        let mut pieces = self.relay_line.split(':');
        let head = pieces.next().unwrap_or_default();
        let cut = head
            .char_indices()
            .rev()
            .nth(2)
            .map_or(0, |(idx, _)| idx);
        // Pieces are joined without a separator, as printed.
        let mut stream = head[cut..].to_string();
        stream.extend(pieces);
        let tokens: Vec<&str> = stream.split_whitespace().collect();
        tokens
            .chunks_exact(2)
            .map(|c| (c[0].to_string(), c[1].to_string()))
            .collect()
    }

    /// `(magnitude, angle)` token pairs of a distance measurement line.
    fn impedance_pairs(&self) -> Vec<(&'a str, &'a str)> {
        let tokens: Vec<&str> = self
            .measurement_line
            .split(|c: char| c == '@' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();
        tokens.chunks_exact(2).map(|c| (c[0], c[1])).collect()
    }
}

/// Parses the table segment into fault table entries.
///
/// A trailing partial block (fewer than four lines) is ignored.
///
/// # Errors
///
/// - [`TranscriptError::NoTableData`] if no entry results.
/// - [`TranscriptError::BlockLengthMismatch`] under [`BlockPolicy::Strict`].
/// - [`TranscriptError::InvalidMeasurement`] if an impedance value is not a
///   number.
///
/// # Examples
///
/// ```
/// use tty_fault_core::CurveType;
/// use tty_fault_transcript::{BlockPolicy, parse_fault_table};
///
/// let lines = [
///     "Fault  1    Fault  2",
///     "----",
///     "NEVADA G1 OC 1520.3A 980.4A",
///     "0.350 0.610",
/// ];
/// let entries = parse_fault_table(&lines, CurveType::Overcurrent, BlockPolicy::Truncate).unwrap();
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[1].fault_number, 2);
/// assert_eq!(entries[1].operate_time, "0.610");
/// assert_eq!(entries[1].relay, "NEVADA G1 OC");
/// ```
pub fn parse_fault_table(
    lines: &[&str],
    curve: CurveType,
    policy: BlockPolicy,
) -> Result<Vec<FaultTableEntry>> {
    let chunks = lines.chunks_exact(BLOCK_LINES);
    if !chunks.remainder().is_empty() {
        debug!(
            dropped_lines = chunks.remainder().len(),
            "Ignoring partial fault table block"
        );
    }

    let mut entries = Vec::new();
    for chunk in chunks {
        let block = Block::new(chunk);
        match curve {
            CurveType::Distance => parse_distance_block(&block, policy, &mut entries)?,
            CurveType::Overcurrent => parse_overcurrent_block(&block, policy, &mut entries)?,
        }
    }

    debug!(
        curve = %curve,
        blocks = lines.len() / BLOCK_LINES,
        entries = entries.len(),
        "Parsed fault table"
    );

    if entries.is_empty() {
        return Err(TranscriptError::NoTableData);
    }
    Ok(entries)
}

/// Guesses the report variant from the table segment.
///
/// Distance tables print impedances as `magnitude@angle`; any `@` in a
/// block's measurement line selects [`CurveType::Distance`].
pub fn detect_curve_type(lines: &[&str]) -> CurveType {
    let distance = lines
        .chunks_exact(BLOCK_LINES)
        .any(|chunk| chunk[3].contains('@'));
    CurveType::from_flag(distance)
}

fn parse_distance_block(
    block: &Block<'_>,
    policy: BlockPolicy,
    out: &mut Vec<FaultTableEntry>,
) -> Result<()> {
    let relay = block.relay_name(':');
    let faults = block.fault_numbers();
    let times = block.zone_time_pairs();
    let impedances = block.impedance_pairs();
    check_lengths(block, policy, faults.len(), times.len(), impedances.len())?;

    for ((fault, (zone, time)), (magnitude, angle)) in
        faults.into_iter().zip(times).zip(impedances)
    {
        out.push(FaultTableEntry {
            relay: relay.clone(),
            fault_number: fault,
            operate_time: time,
            measurement: Measurement::Impedance {
                operate_zone: zone,
                impedance_magnitude: parse_number(magnitude, block.measurement_line)?,
                impedance_angle: parse_number(angle, block.measurement_line)?,
            },
        });
    }
    Ok(())
}

fn parse_overcurrent_block(
    block: &Block<'_>,
    policy: BlockPolicy,
    out: &mut Vec<FaultTableEntry>,
) -> Result<()> {
    let relay = block.relay_name('.');
    let faults = block.fault_numbers();
    let times: Vec<&str> = block.measurement_line.split_whitespace().collect();
    let currents: Vec<&str> = block
        .relay_line
        .split_whitespace()
        .filter(|token| token.contains('.'))
        .collect();
    check_lengths(block, policy, faults.len(), times.len(), currents.len())?;

    for ((fault, time), current) in faults.into_iter().zip(times).zip(currents) {
        out.push(FaultTableEntry {
            relay: relay.clone(),
            fault_number: fault,
            operate_time: time.to_string(),
            measurement: Measurement::Current {
                fault_current: current.to_string(),
            },
        });
    }
    Ok(())
}

fn check_lengths(
    block: &Block<'_>,
    policy: BlockPolicy,
    faults: usize,
    pairs: usize,
    measurements: usize,
) -> Result<()> {
    if faults == pairs && pairs == measurements {
        return Ok(());
    }
    match policy {
        BlockPolicy::Strict => Err(TranscriptError::BlockLengthMismatch {
            fault_line: block.fault_line.trim().to_string(),
            faults,
            pairs,
            measurements,
        }),
        BlockPolicy::Truncate => {
            warn!(
                fault_line = block.fault_line.trim(),
                faults, pairs, measurements, "Fault table block lengths differ; truncating"
            );
            Ok(())
        }
    }
}

fn parse_number(token: &str, line: &str) -> Result<f64> {
    token
        .parse()
        .map_err(|_| TranscriptError::InvalidMeasurement {
            token: token.to_string(),
            line: line.trim().to_string(),
        })
}
