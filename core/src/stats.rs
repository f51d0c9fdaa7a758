//! Maximum/minimum impedance statistics for distance-curve datasets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{FaultDataset, FaultRecord};

/// Overall and per-relay impedance-magnitude extremes.
///
/// Relays are keyed in sorted order, which is also the row order of the
/// report's side tables.
///
/// # Examples
///
/// ```
/// use tty_fault_core::ImpedanceStatistics;
///
/// let stats = ImpedanceStatistics::from_magnitudes([("A", 3.1), ("A", 5.2), ("B", 9.9)]).unwrap();
/// assert_eq!(stats.overall_max, 9.9);
/// assert_eq!(stats.min_by_relay["A"], 3.1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpedanceStatistics {
    pub overall_max: f64,
    pub overall_min: f64,
    pub max_by_relay: BTreeMap<String, f64>,
    pub min_by_relay: BTreeMap<String, f64>,
}

impl ImpedanceStatistics {
    /// Computes statistics from `(relay, magnitude)` pairs.
    ///
    /// Returns `None` when `values` is empty.
    pub fn from_magnitudes<'a>(values: impl IntoIterator<Item = (&'a str, f64)>) -> Option<Self> {
        let mut stats: Option<Self> = None;
        for (relay, magnitude) in values {
            let s = stats.get_or_insert_with(|| Self {
                overall_max: magnitude,
                overall_min: magnitude,
                max_by_relay: BTreeMap::new(),
                min_by_relay: BTreeMap::new(),
            });
            s.overall_max = s.overall_max.max(magnitude);
            s.overall_min = s.overall_min.min(magnitude);
            s.max_by_relay
                .entry(relay.to_string())
                .and_modify(|v| *v = v.max(magnitude))
                .or_insert(magnitude);
            s.min_by_relay
                .entry(relay.to_string())
                .and_modify(|v| *v = v.min(magnitude))
                .or_insert(magnitude);
        }
        stats
    }

    /// Computes statistics over every record that carries an impedance.
    pub fn from_records(records: &[FaultRecord]) -> Option<Self> {
        Self::from_magnitudes(records.iter().filter_map(|r| {
            r.measurement
                .impedance_magnitude()
                .map(|m| (r.relay.as_str(), m))
        }))
    }

    /// Relay names in side-table order.
    pub fn relays(&self) -> impl Iterator<Item = &str> {
        self.max_by_relay.keys().map(String::as_str)
    }
}

impl FaultDataset {
    /// Impedance statistics; `None` for overcurrent datasets or empty ones.
    pub fn statistics(&self) -> Option<ImpedanceStatistics> {
        if !self.has_impedance() {
            return None;
        }
        ImpedanceStatistics::from_records(&self.records)
    }
}
