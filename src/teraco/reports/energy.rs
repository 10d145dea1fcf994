//! Removal of the trailing summary row from energy reports.

use std::path::Path;

use tracing::{info, instrument, warn};
use umya_spreadsheet::Worksheet;

use crate::teraco::reports::error::Result;
use crate::teraco::reports::io::fs::{has_extension, list_files};
use crate::teraco::reports::io::workbook;
use crate::teraco::reports::model::is_energy_file;

/// Column scanned for the last data-bearing row (column B).
pub const SCANNED_COLUMN: u32 = 2;

/// Row index (1-based) of the last non-empty cell in `column`.
pub fn find_last_row(sheet: &Worksheet, column: u32) -> Option<u32> {
    (1..=sheet.get_highest_row())
        .rev()
        .find(|row| !workbook::cell_text(sheet.get_cell((column, *row))).is_empty())
}

/// Deletes the last data row of the active worksheet. Returns the deleted
/// row, or `None` when the scanned column is empty.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn trim_last_row(path: &Path) -> Result<Option<u32>> {
    let mut book = workbook::open(path)?;
    let sheet = book.get_active_sheet_mut();
    let Some(row) = find_last_row(sheet, SCANNED_COLUMN) else {
        return Ok(None);
    };
    sheet.remove_row(&row, &1);
    workbook::save(&book, path)?;
    Ok(Some(row))
}

/// Trims every energy workbook below `root`. Per-file failures are logged
/// and skipped. Returns how many files were changed.
pub fn trim_energy_files(root: &Path) -> usize {
    let mut trimmed = 0;
    for path in list_files(root) {
        if !has_extension(&path, "xlsx") {
            continue;
        }
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !is_energy_file(&file) {
            continue;
        }
        match trim_last_row(&path) {
            Ok(Some(row)) => {
                info!(file = %file, row, "removed last row");
                trimmed += 1;
            }
            Ok(None) => {}
            Err(error) => warn!(file = %file, %error, "couldn't process file"),
        }
    }
    trimmed
}
