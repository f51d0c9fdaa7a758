//! Declarative sheet layout.
//!
//! [`SheetLayout::build`] places every value of a [`FaultDataset`] on a grid
//! and tags each cell with a [`CellRole`]. Styling is decided later from the
//! role alone, so this module has no dependency on the spreadsheet library.
//!
//! Layout of the "Fault Summary" sheet:
//!
//! - Main table: header in row 1, one row per record from row 2, columns in
//!   dataset order.
//! - Distance datasets only: a "Max Impedance by Relay" side table two
//!   empty columns to the right of the main table, then a "Min Impedance by
//!   Relay" side table two empty columns to the right of that. Each lists
//!   one relay per row from row 2, and an overall value two rows below the
//!   last relay.

use serde::Serialize;
use std::collections::BTreeMap;
use tty_fault_core::{FaultDataset, FieldValue, ImpedanceStatistics};

/// First data row (row 1 holds headers).
pub const FIRST_DATA_ROW: u32 = 2;

/// Empty columns between adjacent tables.
pub const TABLE_GAP: u32 = 2;

/// Presentation role of a placed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellRole {
    /// Main table column header.
    TableHeader,
    /// Main table data cell.
    TableData,
    /// Side table title, merged across the table's two columns.
    SideHeader,
    /// Relay name or value in a side table.
    SideEntry,
    /// "Overall ..." label below a side table.
    SummaryHeader,
    /// Overall value next to its label.
    SummaryValue,
}

/// A value at a 1-based `(col, row)` position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedCell {
    pub col: u32,
    pub row: u32,
    pub value: FieldValue,
    pub role: CellRole,
    /// Alternating light-gray band.
    pub banded: bool,
}

/// A horizontal merge within one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeRange {
    pub row: u32,
    pub first_col: u32,
    pub last_col: u32,
}

impl MergeRange {
    /// A1-style reference, e.g. `"M1:N1"`.
    pub fn to_a1(&self) -> String {
        format!(
            "{}{}:{}{}",
            column_letter(self.first_col),
            self.row,
            column_letter(self.last_col),
            self.row
        )
    }
}

/// Every cell and merge of the summary sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SheetLayout {
    pub cells: Vec<PlacedCell>,
    pub merges: Vec<MergeRange>,
}

impl SheetLayout {
    /// Lays out the main table and, for impedance datasets, both side tables.
    ///
    /// # Examples
    ///
    /// ```
    /// use tty_fault_core::{CurveType, FaultDataset};
    /// use tty_fault_report::{CellRole, SheetLayout};
    ///
    /// let dataset = FaultDataset::new(CurveType::Overcurrent, Vec::new()).unwrap();
    /// let layout = SheetLayout::build(&dataset);
    /// assert_eq!(layout.cells.len(), 8);
    /// assert!(layout.cells.iter().all(|c| c.role == CellRole::TableHeader));
    /// ```
    pub fn build(dataset: &FaultDataset) -> Self {
        let mut layout = Self::default();
        let columns = dataset.columns();

        for (col, name) in (1..).zip(columns) {
            layout.place(col, 1, FieldValue::Text(name.to_string()), CellRole::TableHeader, false);
        }
        for (row, values) in (FIRST_DATA_ROW..).zip(dataset.rows()) {
            let banded = row % 2 == 0;
            for (col, value) in (1..).zip(values) {
                layout.place(col, row, value, CellRole::TableData, banded);
            }
        }

        if let Some(stats) = dataset.statistics() {
            layout.place_statistics(columns.len() as u32, &stats);
        }
        layout
    }

    /// Last used column, or 0 for an empty layout.
    pub fn max_col(&self) -> u32 {
        self.cells.iter().map(|c| c.col).max().unwrap_or(0)
    }

    pub fn cell(&self, col: u32, row: u32) -> Option<&PlacedCell> {
        self.cells.iter().find(|c| c.col == col && c.row == row)
    }

    fn place_statistics(&mut self, main_width: u32, stats: &ImpedanceStatistics) {
        let max_col = main_width + TABLE_GAP + 1;
        self.place_side_table(
            max_col,
            "Max Impedance by Relay",
            &stats.max_by_relay,
            "Overall Maximum Impedance",
            stats.overall_max,
        );
        let min_col = self.max_col() + TABLE_GAP + 1;
        self.place_side_table(
            min_col,
            "Min Impedance by Relay",
            &stats.min_by_relay,
            "Overall Minimum Impedance",
            stats.overall_min,
        );
    }

    fn place_side_table(
        &mut self,
        col: u32,
        title: &str,
        by_relay: &BTreeMap<String, f64>,
        overall_label: &str,
        overall: f64,
    ) {
        self.place(col, 1, FieldValue::Text(title.to_string()), CellRole::SideHeader, false);
        self.merges.push(MergeRange {
            row: 1,
            first_col: col,
            last_col: col + 1,
        });

        for (row, (relay, value)) in (FIRST_DATA_ROW..).zip(by_relay) {
            let banded = row % 2 == 1;
            self.place(col, row, FieldValue::Text(relay.clone()), CellRole::SideEntry, banded);
            self.place(col + 1, row, FieldValue::Number(*value), CellRole::SideEntry, banded);
        }

        let summary_row = FIRST_DATA_ROW + by_relay.len() as u32 + 2;
        self.place(
            col,
            summary_row,
            FieldValue::Text(overall_label.to_string()),
            CellRole::SummaryHeader,
            false,
        );
        self.place(
            col + 1,
            summary_row,
            FieldValue::Number(overall),
            CellRole::SummaryValue,
            true,
        );
    }

    fn place(&mut self, col: u32, row: u32, value: FieldValue, role: CellRole, banded: bool) {
        self.cells.push(PlacedCell {
            col,
            row,
            value,
            role,
            banded,
        });
    }
}

/// Spreadsheet column letters for a 1-based index (`1` → `A`, `27` → `AA`).
pub fn column_letter(mut col: u32) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        col = (col - 1) / 26;
    }
    letters.iter().rev().collect()
}
