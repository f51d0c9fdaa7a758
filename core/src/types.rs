//! Record type definitions for parsed relay-protection transcripts.
//!
//! This module defines the data model produced by the transcript parsers:
//! one [`FaultDescription`] per simulated fault, one [`FaultTableEntry`] per
//! (fault, relay) operation, and the joined [`FaultRecord`]. All types
//! serialize with [`serde`] so datasets can be emitted as JSON or YAML.

use serde::{Deserialize, Serialize};

/// Column headers for the distance-curve (impedance) variant, in dataset
/// field order.
pub const DISTANCE_COLUMNS: [&str; 10] = [
    "Fault #",
    "Fault Sim",
    "Faulted Line",
    "Fault Type",
    "Branch Outage",
    "Relay",
    "Operate Time",
    "Operate Zone",
    "Impedance (Magnitude)",
    "Impedance (Angle)",
];

/// Column headers for the overcurrent-curve variant, in dataset field order.
pub const OVERCURRENT_COLUMNS: [&str; 8] = [
    "Fault #",
    "Fault Sim",
    "Faulted Line",
    "Fault Type",
    "Branch Outage",
    "Relay",
    "Operate Time",
    "Fault Current",
];

/// Report variant of a transcript.
///
/// The variant is fixed for a whole transcript and decides which
/// measurement fields the fault table carries.
///
/// # Examples
///
/// ```
/// use tty_fault_core::CurveType;
///
/// assert_eq!(CurveType::from_flag(true), CurveType::Distance);
/// assert_eq!(CurveType::Overcurrent.columns().last(), Some(&"Fault Current"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CurveType {
    /// Distance relay curve: operate zone plus impedance magnitude/angle.
    #[default]
    Distance,
    /// Overcurrent relay curve: fault current.
    Overcurrent,
}

impl CurveType {
    /// Maps the upstream boolean flag (`true` = distance) to a variant.
    pub fn from_flag(distance: bool) -> Self {
        if distance {
            Self::Distance
        } else {
            Self::Overcurrent
        }
    }

    pub fn is_distance(self) -> bool {
        matches!(self, Self::Distance)
    }

    /// Dataset column headers for this variant.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Distance => &DISTANCE_COLUMNS,
            Self::Overcurrent => &OVERCURRENT_COLUMNS,
        }
    }

    /// Returns `true` if `measurement` belongs to this variant.
    pub fn accepts(self, measurement: &Measurement) -> bool {
        measurement.curve_type() == self
    }
}

impl std::fmt::Display for CurveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Distance => write!(f, "distance"),
            Self::Overcurrent => write!(f, "overcurrent"),
        }
    }
}

/// Descriptive metadata for one simulated fault.
///
/// # Examples
///
/// ```
/// use tty_fault_core::FaultDescription;
///
/// let desc = FaultDescription::new(1, "Bus Fault", "BUS1 230.0 kV", "1LG");
/// assert!(desc.branch_outage.is_empty());
///
/// let desc = desc.with_branch_outage("BUS1 - BUS2 1L");
/// assert_eq!(desc.branch_outage, "BUS1 - BUS2 1L");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultDescription {
    /// Fault number, unique within one transcript.
    pub fault_number: u32,
    /// Simulation label, e.g. `"Interm. Fault with end opened 45%"`.
    pub simulation_descriptor: String,
    /// Bus/line identifier including its voltage class.
    pub faulted_line: String,
    /// Fault classification code (`"1LG"`, `"LL"`, ...).
    pub fault_type: String,
    /// Branch-outage contingency; empty when none applies.
    pub branch_outage: String,
}

impl FaultDescription {
    pub fn new(
        fault_number: u32,
        simulation_descriptor: impl Into<String>,
        faulted_line: impl Into<String>,
        fault_type: impl Into<String>,
    ) -> Self {
        Self {
            fault_number,
            simulation_descriptor: simulation_descriptor.into(),
            faulted_line: faulted_line.into(),
            fault_type: fault_type.into(),
            branch_outage: String::new(),
        }
    }

    pub fn with_branch_outage(mut self, outage: impl Into<String>) -> Self {
        self.branch_outage = outage.into();
        self
    }
}

/// Variant-specific measurement of one relay operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measurement {
    /// Distance variant.
    Impedance {
        operate_zone: String,
        impedance_magnitude: f64,
        impedance_angle: f64,
    },
    /// Overcurrent variant. Kept as the transcript's text.
    Current { fault_current: String },
}

impl Measurement {
    pub fn impedance_magnitude(&self) -> Option<f64> {
        match self {
            Self::Impedance {
                impedance_magnitude,
                ..
            } => Some(*impedance_magnitude),
            Self::Current { .. } => None,
        }
    }

    /// Variant that reports this kind of measurement.
    pub fn curve_type(&self) -> CurveType {
        match self {
            Self::Impedance { .. } => CurveType::Distance,
            Self::Current { .. } => CurveType::Overcurrent,
        }
    }
}

/// One relay's operation for one fault, as reported in the fault table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultTableEntry {
    pub relay: String,
    pub fault_number: u32,
    /// Operate time as printed (numeric text, no unit).
    pub operate_time: String,
    #[serde(flatten)]
    pub measurement: Measurement,
}

/// A single spreadsheet/output cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A joined description + table row.
///
/// # Examples
///
/// ```
/// use tty_fault_core::*;
///
/// let record = FaultRecord {
///     description: FaultDescription::new(3, "Bus Fault", "BUS3 115.0 kV", "LL"),
///     relay: "BUS3 R1".into(),
///     operate_time: "0.250".into(),
///     measurement: Measurement::Current { fault_current: "1523.4".into() },
/// };
/// let values = record.values();
/// assert_eq!(values.len(), CurveType::Overcurrent.columns().len());
/// assert_eq!(values[0], FieldValue::Number(3.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultRecord {
    #[serde(flatten)]
    pub description: FaultDescription,
    pub relay: String,
    pub operate_time: String,
    #[serde(flatten)]
    pub measurement: Measurement,
}

impl FaultRecord {
    pub fn fault_number(&self) -> u32 {
        self.description.fault_number
    }

    /// Cell values in column order of [`CurveType::columns`].
    pub fn values(&self) -> Vec<FieldValue> {
        let desc = &self.description;
        let mut values = vec![
            FieldValue::Number(f64::from(desc.fault_number)),
            FieldValue::Text(desc.simulation_descriptor.clone()),
            FieldValue::Text(desc.faulted_line.clone()),
            FieldValue::Text(desc.fault_type.clone()),
            FieldValue::Text(desc.branch_outage.clone()),
            FieldValue::Text(self.relay.clone()),
            FieldValue::Text(self.operate_time.clone()),
        ];
        match &self.measurement {
            Measurement::Impedance {
                operate_zone,
                impedance_magnitude,
                impedance_angle,
            } => {
                values.push(FieldValue::Text(operate_zone.clone()));
                values.push(FieldValue::Number(*impedance_magnitude));
                values.push(FieldValue::Number(*impedance_angle));
            }
            Measurement::Current { fault_current } => {
                values.push(FieldValue::Text(fault_current.clone()));
            }
        }
        values
    }
}

/// The unified fault dataset for one transcript.
///
/// Constructed through [`merge_records`](crate::merge_records) or
/// [`FaultDataset::new`], both of which reject mixed variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultDataset {
    pub curve: CurveType,
    pub records: Vec<FaultRecord>,
}

impl FaultDataset {
    /// Builds a dataset, checking that every record matches `curve`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::MixedVariant`] for the first record whose
    /// measurement belongs to the other variant.
    pub fn new(curve: CurveType, records: Vec<FaultRecord>) -> Result<Self, DatasetError> {
        if let Some(bad) = records.iter().find(|r| !curve.accepts(&r.measurement)) {
            return Err(DatasetError::MixedVariant {
                expected: curve,
                fault_number: bad.fault_number(),
                relay: bad.relay.clone(),
            });
        }
        Ok(Self { curve, records })
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.curve.columns()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the dataset carries impedance-magnitude fields.
    pub fn has_impedance(&self) -> bool {
        self.curve.is_distance()
    }

    /// Row values for every record, in column order.
    pub fn rows(&self) -> Vec<Vec<FieldValue>> {
        self.records.iter().map(FaultRecord::values).collect()
    }
}

/// Errors raised while assembling a [`FaultDataset`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    /// A record's measurement does not match the transcript variant.
    #[error("fault {fault_number} relay '{relay}' does not carry {expected} measurements")]
    MixedVariant {
        expected: CurveType,
        fault_number: u32,
        relay: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impedance_record(fault: u32, relay: &str, magnitude: f64) -> FaultRecord {
        FaultRecord {
            description: FaultDescription::new(fault, "Bus Fault", "BUS1 230.0 kV", "1LG"),
            relay: relay.to_string(),
            operate_time: "0.020".to_string(),
            measurement: Measurement::Impedance {
                operate_zone: "Z1".to_string(),
                impedance_magnitude: magnitude,
                impedance_angle: 80.0,
            },
        }
    }

    #[test]
    fn test_distance_values_follow_column_order() {
        let record = impedance_record(7, "RLY A", 12.5);
        let values = record.values();
        assert_eq!(values.len(), DISTANCE_COLUMNS.len());
        assert_eq!(values[0], FieldValue::Number(7.0));
        assert_eq!(values[5], FieldValue::Text("RLY A".to_string()));
        assert_eq!(values[7], FieldValue::Text("Z1".to_string()));
        assert_eq!(values[8], FieldValue::Number(12.5));
        assert_eq!(values[9], FieldValue::Number(80.0));
    }

    #[test]
    fn test_dataset_rejects_mixed_variants() {
        let mut current = impedance_record(2, "RLY B", 1.0);
        current.measurement = Measurement::Current {
            fault_current: "800.0".to_string(),
        };
        let err = FaultDataset::new(
            CurveType::Distance,
            vec![impedance_record(1, "RLY A", 3.0), current],
        )
        .unwrap_err();
        assert_eq!(
            err,
            DatasetError::MixedVariant {
                expected: CurveType::Distance,
                fault_number: 2,
                relay: "RLY B".to_string(),
            }
        );
    }

    #[test]
    fn test_record_serializes_flat() {
        let json = serde_json::to_value(impedance_record(1, "RLY A", 4.5)).unwrap();
        assert_eq!(json["fault_number"], 1);
        assert_eq!(json["relay"], "RLY A");
        assert_eq!(json["operate_zone"], "Z1");
        assert_eq!(json["impedance_magnitude"], 4.5);
    }

    #[test]
    fn test_curve_type_display() {
        assert_eq!(CurveType::Distance.to_string(), "distance");
        assert_eq!(CurveType::Overcurrent.to_string(), "overcurrent");
        assert_eq!(CurveType::from_flag(false), CurveType::Overcurrent);
    }

    #[test]
    fn test_measurement_selects_variant() {
        let impedance = Measurement::Impedance {
            operate_zone: "Z2".to_string(),
            impedance_magnitude: 7.5,
            impedance_angle: 78.0,
        };
        let current = Measurement::Current {
            fault_current: "880.0A".to_string(),
        };
        assert_eq!(impedance.curve_type(), CurveType::Distance);
        assert_eq!(current.curve_type(), CurveType::Overcurrent);
        assert!(CurveType::Distance.accepts(&impedance));
        assert!(!CurveType::Distance.accepts(&current));
        assert!(CurveType::Overcurrent.accepts(&current));
    }
}
