//! Renders a [`SheetLayout`] into xlsx bytes.

use std::io::Cursor;
use std::path::Path;

use tracing::debug;
use tty_fault_core::FieldValue;
use umya_spreadsheet::{Spreadsheet, Worksheet, reader, writer};

use crate::error::{ReportError, Result};
use crate::layout::SheetLayout;
use crate::style::CellStyle;

/// Builds the workbook and serializes it to memory.
///
/// When `existing` is given, that workbook is loaded and only `sheet_name`
/// is replaced, keeping its position; every other sheet is carried over
/// untouched. Otherwise a new workbook holding the single sheet is created.
///
/// # Errors
///
/// [`ReportError::Workbook`] when the existing file is not a readable xlsx
/// workbook or serialization fails, [`ReportError::Sheet`] when the sheet
/// cannot be replaced.
pub fn render_workbook(
    existing: Option<&Path>,
    sheet_name: &str,
    layout: &SheetLayout,
) -> Result<Vec<u8>> {
    let (mut book, trailing) = match existing {
        Some(path) => {
            let mut book = reader::xlsx::read(path).map_err(|err| {
                ReportError::Workbook(format!("failed to read {}: {err}", path.display()))
            })?;
            let trailing = detach_from(&mut book, sheet_name)?;
            (book, trailing)
        }
        None => (umya_spreadsheet::new_file_empty_worksheet(), Vec::new()),
    };

    let sheet = book
        .new_sheet(sheet_name)
        .map_err(|err| ReportError::Sheet(format!("{sheet_name}: {err}")))?;
    fill_sheet(sheet, layout);

    // Sheets that followed the replaced one go back after it.
    for worksheet in trailing {
        let name = worksheet.get_name().to_string();
        book.add_sheet(worksheet)
            .map_err(|err| ReportError::Sheet(format!("{name}: {err}")))?;
    }

    serialize(&book)
}

/// Removes `sheet_name` and every sheet after it.
///
/// Returns the later sheets in workbook order so the caller can append them
/// again once the replacement sheet is in place. A workbook without the
/// sheet is left untouched.
fn detach_from(book: &mut Spreadsheet, sheet_name: &str) -> Result<Vec<Worksheet>> {
    let sheets = book.get_sheet_collection();
    let Some(index) = sheets.iter().position(|s| s.get_name() == sheet_name) else {
        return Ok(Vec::new());
    };
    let trailing: Vec<Worksheet> = sheets[index + 1..].to_vec();
    debug!(
        sheet = sheet_name,
        index,
        following = trailing.len(),
        "Replacing existing sheet"
    );

    let names = std::iter::once(sheet_name.to_string())
        .chain(trailing.iter().map(|s| s.get_name().to_string()));
    for name in names {
        book.remove_sheet_by_name(&name)
            .map_err(|err| ReportError::Sheet(format!("{name}: {err}")))?;
    }
    Ok(trailing)
}

fn fill_sheet(sheet: &mut Worksheet, layout: &SheetLayout) {
    for placed in &layout.cells {
        let coordinate = (placed.col, placed.row);
        let cell = sheet.get_cell_mut(coordinate);
        match &placed.value {
            FieldValue::Number(n) => {
                cell.set_value_number(*n);
            }
            FieldValue::Text(s) => {
                cell.set_value(s.as_str());
            }
        }

        let style = CellStyle::for_cell(placed);
        if !style.is_plain() {
            style.apply(sheet.get_style_mut(coordinate));
        }
    }
    for merge in &layout.merges {
        sheet.add_merge_cells(merge.to_a1());
    }
    debug!(
        cells = layout.cells.len(),
        merges = layout.merges.len(),
        "Sheet filled"
    );
}

fn serialize(book: &Spreadsheet) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    writer::xlsx::write_writer(book, &mut buffer)
        .map_err(|err| ReportError::Workbook(format!("failed to serialize workbook: {err}")))?;
    Ok(buffer.into_inner())
}
