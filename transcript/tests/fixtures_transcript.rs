use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tty_fault_core::{CurveType, FaultRecord, Measurement};
use tty_fault_transcript::{
    BlockPolicy, ParseOptions, TranscriptError, parse_transcript, process_transcript_file,
};

fn fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).unwrap()
}

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn copy_to(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::copy(fixture_path(name), &path).unwrap();
    path
}

fn magnitudes(records: &[FaultRecord]) -> Vec<(u32, &str, f64)> {
    records
        .iter()
        .map(|r| {
            (
                r.fault_number(),
                r.relay.as_str(),
                r.measurement.impedance_magnitude().unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_distance_transcript_parses_last_run() {
    let text = fixture("distance-tty.txt");
    let parsed =
        parse_transcript(&text, Some(CurveType::Distance), &ParseOptions::default()).unwrap();

    assert!(parsed.truncated.starts_with("Fault description:\n1. Bus Fault on:  NEVADA"));
    assert!(!parsed.truncated.contains("OLDBUS"));

    assert_eq!(parsed.descriptions.len(), 5);
    assert_eq!(parsed.entries.len(), 6);
    assert_eq!(
        magnitudes(&parsed.dataset.records),
        vec![
            (1, "NEVADA G1 T1", 4.21),
            (1, "CLAYTOR G2", 3.5),
            (2, "NEVADA G1 T1", 9.87),
            (3, "NEVADA G1 T1", 6.1),
            (4, "CLAYTOR G2", 15.25),
        ]
    );
}

#[test]
fn test_distance_description_fields() {
    let text = fixture("distance-tty.txt");
    let parsed = parse_transcript(&text, None, &ParseOptions::default()).unwrap();
    let by_number = |n: u32| {
        parsed
            .descriptions
            .iter()
            .find(|d| d.fault_number == n)
            .unwrap()
    };

    let close_in = by_number(2);
    assert_eq!(close_in.simulation_descriptor, "Close-In Fault with end opened");
    assert_eq!(close_in.fault_type, "LL");
    assert_eq!(close_in.faulted_line, "NEVADA 132.0 kV - CLAYTOR 132.0 kV 1L");
    assert_eq!(close_in.branch_outage, "NEVADA 132.0 kV - OHIO 132.0 kV 1L");

    let interm = by_number(3);
    assert_eq!(
        interm.simulation_descriptor,
        "Interm. Fault with end opened 50.00%"
    );
    assert_eq!(interm.fault_type, "1LG");
    assert!(interm.branch_outage.is_empty());

    let line_end = by_number(4);
    assert_eq!(line_end.faulted_line, "CLAYTOR 132.0 kV");
    assert_eq!(
        line_end.branch_outage,
        "CLAYTOR 132.0 kV - TENNESSEE 132.0 kV 1L"
    );
}

#[test]
fn test_detects_variant_when_not_given() {
    let distance = parse_transcript(&fixture("distance-tty.txt"), None, &ParseOptions::default())
        .unwrap();
    assert_eq!(distance.dataset.curve, CurveType::Distance);

    let overcurrent =
        parse_transcript(&fixture("overcurrent-tty.txt"), None, &ParseOptions::default())
            .unwrap();
    assert_eq!(overcurrent.dataset.curve, CurveType::Overcurrent);
}

#[test]
fn test_distance_statistics() {
    let parsed = parse_transcript(
        &fixture("distance-tty.txt"),
        Some(CurveType::Distance),
        &ParseOptions::default(),
    )
    .unwrap();
    let stats = parsed.dataset.statistics().unwrap();
    assert_eq!(stats.overall_max, 15.25);
    assert_eq!(stats.overall_min, 3.5);
    assert_eq!(stats.max_by_relay["NEVADA G1 T1"], 9.87);
    assert_eq!(stats.min_by_relay["NEVADA G1 T1"], 4.21);
    assert_eq!(stats.max_by_relay["CLAYTOR G2"], 15.25);
    assert_eq!(stats.min_by_relay["CLAYTOR G2"], 3.5);
    assert_eq!(stats.max_by_relay.len(), 2);
}

#[test]
fn test_overcurrent_transcript() {
    let parsed = parse_transcript(
        &fixture("overcurrent-tty.txt"),
        Some(CurveType::Overcurrent),
        &ParseOptions::default(),
    )
    .unwrap();

    assert_eq!(parsed.dataset.len(), 3);
    assert!(parsed.dataset.statistics().is_none());

    let second = &parsed.dataset.records[1];
    assert_eq!(second.relay, "BUS A OC1 TOC");
    assert_eq!(second.operate_time, "0.642");
    assert_eq!(second.description.fault_type, "LL");
    assert_eq!(second.description.faulted_line, "BUS B 69.0 kV");
    assert_eq!(
        second.measurement,
        Measurement::Current {
            fault_current: "880.0A".to_string()
        }
    );

    let third = &parsed.dataset.records[2];
    assert_eq!(third.description.simulation_descriptor, "Interm. Fault 25.00%");
    assert_eq!(third.description.branch_outage, "BUS A 69.0 kV - BUS C 69.0 kV 1L");
}

#[test]
fn test_merge_is_inner_join() {
    let parsed = parse_transcript(
        &fixture("distance-tty.txt"),
        Some(CurveType::Distance),
        &ParseOptions::default(),
    )
    .unwrap();

    let described: HashSet<u32> = parsed.descriptions.iter().map(|d| d.fault_number).collect();
    let tabled: HashSet<u32> = parsed.entries.iter().map(|e| e.fault_number).collect();
    let expected_rows = parsed
        .entries
        .iter()
        .filter(|e| described.contains(&e.fault_number))
        .count();

    assert_eq!(parsed.dataset.len(), expected_rows);
    for record in &parsed.dataset.records {
        assert!(described.contains(&record.fault_number()));
        assert!(tabled.contains(&record.fault_number()));
    }
    // Fault 5 has no table entry, fault 6 has no description.
    assert!(parsed.dataset.records.iter().all(|r| r.fault_number() != 5));
    assert!(parsed.dataset.records.iter().all(|r| r.fault_number() != 6));
}

#[test]
fn test_process_file_truncates_once_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = copy_to(dir.path(), "distance-tty.txt");
    let options = ParseOptions::default();

    let first = process_transcript_file(&path, Some(CurveType::Distance), &options).unwrap();
    let on_disk = fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk, first.truncated);
    assert!(on_disk.starts_with("Fault description:"));

    let second = process_transcript_file(&path, Some(CurveType::Distance), &options).unwrap();
    assert_eq!(second.truncated, first.truncated);
    assert_eq!(fs::read_to_string(&path).unwrap(), on_disk);
    assert_eq!(second.dataset, first.dataset);
}

#[test]
fn test_missing_marker_is_reported() {
    let options = ParseOptions {
        markers: vec!["Relay summary:".to_string()],
        ..ParseOptions::default()
    };
    let err = parse_transcript(&fixture("overcurrent-tty.txt"), None, &options).unwrap_err();
    assert!(matches!(
        err,
        TranscriptError::MarkerNotFound { ref marker } if marker == "Relay summary:"
    ));
}

#[test]
fn test_transcript_without_faults_has_no_description_data() {
    let err = parse_transcript(
        &fixture("no-faults-tty.txt"),
        Some(CurveType::Distance),
        &ParseOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, TranscriptError::NoDescriptionData));
}

#[test]
fn test_strict_policy_accepts_consistent_blocks() {
    let options = ParseOptions {
        block_policy: BlockPolicy::Strict,
        ..ParseOptions::default()
    };
    let parsed = parse_transcript(&fixture("distance-tty.txt"), None, &options).unwrap();
    assert_eq!(parsed.entries.len(), 6);
}
