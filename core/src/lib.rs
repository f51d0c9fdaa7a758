//! Core record types for relay-protection fault transcripts.
//!
//! This crate defines the data model shared by the transcript parser and
//! the spreadsheet report:
//!
//! - [`FaultDescription`]: metadata of one simulated fault (number,
//!   simulation label, faulted line, fault type, branch outage).
//! - [`FaultTableEntry`]: one relay operation for one fault, carrying a
//!   [`Measurement`] that depends on the report's [`CurveType`].
//! - [`FaultRecord`] / [`FaultDataset`]: the joined rows.
//!
//! Merging ([`merge_records`]) inner-joins descriptions and table entries on
//! the fault number. Statistics ([`ImpedanceStatistics`]) compute overall
//! and per-relay impedance extremes for distance-curve datasets.
//!
//! # Example
//!
//! ```
//! use tty_fault_core::*;
//!
//! let descriptions = vec![FaultDescription::new(1, "Bus Fault", "BUS1 230.0 kV", "1LG")];
//! let entries = vec![FaultTableEntry {
//!     relay: "BUS1 G1".into(),
//!     fault_number: 1,
//!     operate_time: "0.020".into(),
//!     measurement: Measurement::Impedance {
//!         operate_zone: "Z1".into(),
//!         impedance_magnitude: 4.2,
//!         impedance_angle: 81.0,
//!     },
//! }];
//!
//! let dataset = merge_records(CurveType::Distance, &descriptions, &entries).unwrap();
//! assert_eq!(dataset.len(), 1);
//! assert_eq!(dataset.statistics().unwrap().overall_max, 4.2);
//! ```

mod merge;
mod stats;
mod types;

pub use merge::merge_records;
pub use stats::ImpedanceStatistics;
pub use types::*;
