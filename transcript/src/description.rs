//! Fault description segment parser.
//!
//! Each fault entry starts at a line containing `on:` (case-insensitive),
//! e.g. `1. Interm. Fault on: BUS1 230.0 kV 1LG (45%)`. The following one or
//! two lines may carry a `with end opened` flag and/or a branch-outage
//! contingency line. Fields are pulled out of the fault line by position
//! and pattern; entries missing any required field are dropped.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use tty_fault_core::FaultDescription;

use crate::error::{Result, TranscriptError};

const END_OPENED: &str = "with end opened";

static PATTERNS: LazyLock<DescriptionPatterns> = LazyLock::new(DescriptionPatterns::new);

struct DescriptionPatterns {
    // "12. " at a word boundary; candidates followed by "kV" are rejected in code
    fault_number: Regex,
    // ". <label>:" up to the first colon
    simulation: Regex,
    // Fault type markers
    line_ground: Regex,
    kv_line_line: Regex,
    id_line_line: Regex,
    // "LL" marker removal from the faulted line
    line_line_strip: Regex,
}

impl DescriptionPatterns {
    fn new() -> Self {
        // All regexes here are compile-time constants. An expect() failure indicates
        // a programmer error in the pattern, not a runtime condition.
        Self {
            fault_number: Regex::new(r"\b(\d+)\.\s").expect("static regex must compile"),
            simulation: Regex::new(r"\.\s(.*?):").expect("static regex must compile"),
            line_ground: Regex::new(r"\dLG").expect("static regex must compile"),
            kv_line_line: Regex::new(r"kV\s+LL").expect("static regex must compile"),
            id_line_line: Regex::new(r"L\s+LL").expect("static regex must compile"),
            line_line_strip: Regex::new(r"\s+LL\s*").expect("static regex must compile"),
        }
    }
}

/// Raw lines of one fault entry before field extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EntryLines<'a> {
    fault: &'a str,
    outage: Option<&'a str>,
    end_opened: bool,
}

/// Parses the description segment into fault descriptions.
///
/// # Errors
///
/// Returns [`TranscriptError::NoDescriptionData`] if no entry yields all of
/// fault number, simulation descriptor, faulted line and fault type.
///
/// # Examples
///
/// ```
/// use tty_fault_transcript::parse_fault_descriptions;
///
/// let lines = [
///     "1. Interm. Fault on: BUS1 230.0 kV 1LG (45%)",
///     "   with end opened",
///     "   Branch outage: BUS1 230.0 kV - BUS2 230.0 kV 1L",
/// ];
/// let faults = parse_fault_descriptions(&lines).unwrap();
/// assert_eq!(faults[0].simulation_descriptor, "Interm. Fault with end opened 45%");
/// assert_eq!(faults[0].branch_outage, "BUS1 230.0 kV - BUS2 230.0 kV 1L");
/// ```
pub fn parse_fault_descriptions(lines: &[&str]) -> Result<Vec<FaultDescription>> {
    let entries = collect_entries(lines);
    let descriptions: Vec<FaultDescription> = entries.iter().filter_map(parse_entry).collect();

    debug!(
        candidates = entries.len(),
        parsed = descriptions.len(),
        "Parsed fault descriptions"
    );

    if descriptions.is_empty() {
        return Err(TranscriptError::NoDescriptionData);
    }
    Ok(descriptions)
}

fn collect_entries<'a>(lines: &[&'a str]) -> Vec<EntryLines<'a>> {
    let mut entries = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if !contains_ignore_case(line, "on:") {
            continue;
        }
        let next = lines.get(idx + 1).copied().unwrap_or_default();
        let (outage, end_opened) = if is_outage_line(next) {
            (Some(next), false)
        } else if contains_ignore_case(next, END_OPENED) {
            let after = lines.get(idx + 2).copied().unwrap_or_default();
            (is_outage_line(after).then_some(after), true)
        } else {
            (None, false)
        };
        entries.push(EntryLines {
            fault: line.trim(),
            outage,
            end_opened,
        });
    }
    entries
}

fn parse_entry(entry: &EntryLines<'_>) -> Option<FaultDescription> {
    let line = entry.fault;
    let fault_number = fault_number(line)?;
    let label = simulation_label(line)?;
    let percent = if contains_ignore_case(&label, "interm.") {
        percent_marker(line)
    } else {
        None
    };

    let mut simulation = label;
    if entry.end_opened {
        simulation.push(' ');
        simulation.push_str(END_OPENED);
    }
    if let Some(percent) = percent {
        simulation.push(' ');
        simulation.push_str(&percent);
    }

    let faulted_line = faulted_line(line);
    let fault_type = fault_type(line);
    if faulted_line.is_empty() || fault_type.is_empty() {
        return None;
    }

    let outage = entry.outage.map(contingency).unwrap_or_default();
    Some(
        FaultDescription::new(fault_number, simulation, faulted_line, fault_type)
            .with_branch_outage(outage),
    )
}

fn fault_number(line: &str) -> Option<u32> {
    PATTERNS
        .fault_number
        .captures_iter(line)
        .find(|caps| {
            let end = caps.get(0).map_or(0, |m| m.end());
            !line[end..].starts_with("kV")
        })
        .and_then(|caps| caps[1].parse().ok())
}

/// Text between the first `". "` and the next `':'`, without the trailing
/// `on` of `"... Fault on:"`.
fn simulation_label(line: &str) -> Option<String> {
    let caps = PATTERNS.simulation.captures(line)?;
    let inner = caps[1].trim_end();
    let inner = if inner.to_ascii_lowercase().ends_with(" on") {
        &inner[..inner.len() - 3]
    } else {
        inner
    };
    let label = inner.trim();
    (!label.is_empty()).then(|| label.to_string())
}

/// Percentage-along-line token, e.g. `"45%"` from `"(45%)"`.
fn percent_marker(line: &str) -> Option<String> {
    let joined: String = line
        .split_whitespace()
        .filter(|token| token.contains('%'))
        .collect();
    joined
        .split(['(', ')'])
        .filter(|part| part.contains('%'))
        .last()
        .map(str::to_string)
}

/// Span from just after the last `on:` to six bytes past the last `"kV "`.
fn faulted_line_span(line: &str) -> &str {
    let lower = line.to_ascii_lowercase();
    let (Some(on), Some(kv)) = (lower.rfind("on:"), line.rfind("kV ")) else {
        return "";
    };
    let start = on + 3;
    let end = floor_char_boundary(line, kv + 6);
    if end <= start {
        return "";
    }
    &line[start..end]
}

fn faulted_line(line: &str) -> String {
    let span = faulted_line_span(line);
    let trimmed = span.trim();
    if PATTERNS.line_ground.is_match(span) {
        PATTERNS
            .line_ground
            .replace_all(trimmed, "")
            .trim()
            .to_string()
    } else if PATTERNS.kv_line_line.is_match(span) {
        PATTERNS
            .line_line_strip
            .replace_all(trimmed, "")
            .trim()
            .to_string()
    } else {
        trimmed.to_string()
    }
}

fn fault_type(line: &str) -> String {
    if let Some(m) = PATTERNS.line_ground.find(line) {
        return m.as_str().to_string();
    }
    [&PATTERNS.kv_line_line, &PATTERNS.id_line_line]
        .into_iter()
        .find_map(|re| re.find(line))
        .and_then(|m| m.as_str().split_whitespace().nth(1))
        .map(str::to_string)
        .unwrap_or_default()
}

/// Text after the last `outage:`; the whole line when that label is absent.
fn contingency(line: &str) -> String {
    let lower = line.to_ascii_lowercase();
    match lower.rfind("outage:") {
        Some(pos) => line[pos + "outage:".len()..].trim().to_string(),
        None => line.trim().to_string(),
    }
}

fn is_outage_line(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.contains("branch") && lower.contains("outage")
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_lowercase().contains(needle)
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}
