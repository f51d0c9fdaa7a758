//! Inner join of fault descriptions and fault table entries.
//!
//! [`merge_records`] joins the two parser outputs on the fault number. A
//! fault reported for several relays yields several rows that share the
//! same description fields; fault numbers present on only one side are
//! dropped.
//!
//! # Example
//!
//! ```
//! use tty_fault_core::*;
//!
//! let descriptions = vec![
//!     FaultDescription::new(1, "Bus Fault", "BUS1 230.0 kV", "1LG"),
//!     FaultDescription::new(2, "Bus Fault", "BUS2 230.0 kV", "LL"),
//! ];
//! let entries = vec![FaultTableEntry {
//!     relay: "BUS1 R1".into(),
//!     fault_number: 1,
//!     operate_time: "0.300".into(),
//!     measurement: Measurement::Current { fault_current: "912.0".into() },
//! }];
//!
//! let dataset = merge_records(CurveType::Overcurrent, &descriptions, &entries).unwrap();
//! assert_eq!(dataset.len(), 1);
//! assert_eq!(dataset.records[0].description.faulted_line, "BUS1 230.0 kV");
//! ```

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::{CurveType, DatasetError, FaultDataset, FaultDescription, FaultRecord, FaultTableEntry};

/// Joins descriptions and table entries on `fault_number`.
///
/// Row order follows the description order; within one fault, entries keep
/// their table order.
///
/// # Errors
///
/// Returns [`DatasetError::MixedVariant`] if an entry's measurement does
/// not belong to `curve`.
pub fn merge_records(
    curve: CurveType,
    descriptions: &[FaultDescription],
    entries: &[FaultTableEntry],
) -> Result<FaultDataset, DatasetError> {
    let mut by_fault: HashMap<u32, Vec<&FaultTableEntry>> = HashMap::new();
    for entry in entries {
        by_fault.entry(entry.fault_number).or_default().push(entry);
    }

    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for desc in descriptions {
        if !seen.insert(desc.fault_number) {
            warn!(fault = desc.fault_number, "Duplicate fault description");
        }
        let Some(matches) = by_fault.get(&desc.fault_number) else {
            continue;
        };
        for entry in matches {
            records.push(FaultRecord {
                description: desc.clone(),
                relay: entry.relay.clone(),
                operate_time: entry.operate_time.clone(),
                measurement: entry.measurement.clone(),
            });
        }
    }

    let unmatched = by_fault.keys().filter(|n| !seen.contains(*n)).count();
    debug!(
        descriptions = descriptions.len(),
        entries = entries.len(),
        rows = records.len(),
        unmatched_table_faults = unmatched,
        "Merged fault records"
    );

    FaultDataset::new(curve, records)
}
