//! Styled spreadsheet summaries of relay fault datasets.
//!
//! A report is produced in two steps. [`SheetLayout::build`] decides where
//! each value goes and which role it plays (header, data, summary); the
//! workbook renderer then maps roles to styles and writes the xlsx file.
//! Saving goes through [`write_with_retry`], which keeps retrying while the
//! target workbook is open in another program.

pub mod error;
pub mod layout;
pub mod retry;
pub mod style;
pub mod workbook;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;
use tty_fault_core::FaultDataset;

pub use error::{ReportError, Result};
pub use layout::{CellRole, MergeRange, PlacedCell, SheetLayout, column_letter};
pub use retry::{ContentionNotice, TerminalNotice, is_contention, write_with_retry};
pub use style::CellStyle;
pub use workbook::render_workbook;

/// File name of the report, created next to the transcript.
pub const DEFAULT_REPORT_FILE_NAME: &str = "Fault Summary - TTY Window.xlsx";

/// Sheet that is (re)written on every run.
pub const DEFAULT_SHEET_NAME: &str = "Fault Summary";

/// Where and under which sheet name the report is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub file_name: String,
    pub sheet_name: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_REPORT_FILE_NAME.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

/// Replaces the transcript's file name with `file_name`.
///
/// ```
/// use std::path::Path;
/// use tty_fault_report::report_path;
///
/// let path = report_path(Path::new("runs/tty.txt"), "summary.xlsx");
/// assert_eq!(path, Path::new("runs/summary.xlsx"));
/// ```
pub fn report_path(transcript: &Path, file_name: &str) -> PathBuf {
    transcript.with_file_name(file_name)
}

/// Writes the dataset's summary sheet next to the transcript.
///
/// An existing workbook keeps all its other sheets. Returns the path of the
/// saved workbook.
///
/// # Errors
///
/// See [`render_workbook`]; I/O failures other than contention are
/// returned as [`ReportError::Io`].
pub fn write_report(
    transcript: &Path,
    dataset: &FaultDataset,
    options: &ReportOptions,
    notice: &mut dyn ContentionNotice,
) -> Result<PathBuf> {
    let target = report_path(transcript, &options.file_name);
    let layout = SheetLayout::build(dataset);

    let existing = target.is_file().then_some(target.as_path());
    let bytes = render_workbook(existing, &options.sheet_name, &layout)?;
    write_with_retry(&target, notice, |path| fs::write(path, &bytes))?;

    info!(
        path = %target.display(),
        rows = dataset.len(),
        updated = existing.is_some(),
        "Report saved"
    );
    Ok(target)
}
