//! Load/save helpers for in-place workbook edits.

use std::path::Path;

use umya_spreadsheet::{Cell, Spreadsheet};

use crate::teraco::reports::error::Result;

/// Opens an `.xlsx` workbook for editing.
pub fn open(path: &Path) -> Result<Spreadsheet> {
    Ok(umya_spreadsheet::reader::xlsx::read(path)?)
}

/// Writes the workbook back to `path`.
pub fn save(book: &Spreadsheet, path: &Path) -> Result<()> {
    umya_spreadsheet::writer::xlsx::write(book, path)?;
    Ok(())
}

/// Names of the workbook's worksheets in tab order.
pub fn sheet_names(book: &Spreadsheet) -> Vec<String> {
    book.get_sheet_collection()
        .iter()
        .map(|sheet| sheet.get_name().to_string())
        .collect()
}

/// Text of a cell as displayed by its raw value; empty when absent.
pub fn cell_text(cell: Option<&Cell>) -> String {
    cell.map(|cell| cell.get_value().into_owned())
        .unwrap_or_default()
}

/// Returns the Excel serial when the cell holds a date-formatted number.
pub fn date_serial(cell: &Cell) -> Option<f64> {
    let serial = cell.get_value_number()?;
    let format = cell.get_style().get_number_format()?;
    is_date_format(format.get_format_code()).then_some(serial)
}

/// Whether a number format code renders dates.
pub fn is_date_format(code: &str) -> bool {
    let mut tokens = String::new();
    let mut chars = code.chars();
    let mut in_quotes = false;
    let mut in_brackets = false;
    while let Some(ch) = chars.next() {
        match ch {
            '"' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            '[' => in_brackets = true,
            ']' => in_brackets = false,
            _ if in_brackets => {}
            '\\' => {
                chars.next();
            }
            other => tokens.extend(other.to_lowercase()),
        }
    }

    let has_day_or_year = tokens.contains('d') || tokens.contains('y');
    let has_month = tokens.contains('m') && !tokens.contains('h') && !tokens.contains('s');
    has_day_or_year || has_month
}
