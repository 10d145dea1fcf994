//! Zero-filling of next-month columns in the consolidated water workbook.
//!
//! Each site tab carries one column per reporting month with the month label
//! in row 2. The column after the active reporting month holds the next
//! period and is pre-filled with zeros so downstream aggregation sees
//! numbers rather than blanks. Date-valued cells in that column are labels
//! and are preserved.

use std::path::Path;

use tracing::{debug, info, instrument};
use umya_spreadsheet::Worksheet;

use crate::teraco::reports::error::Result;
use crate::teraco::reports::io::workbook;
use crate::teraco::reports::months::{ReportingMonth, month_from_excel_serial};

/// Worksheet tabs expected in the water workbook, in processing order.
pub const WATER_FILE_TABS: [&str; 9] = [
    "JB1E",
    "JB1W",
    "JB2",
    "JB3",
    "JB4",
    "CT1",
    "CT2",
    "DB1",
    "Consumption Calcs",
];

/// Row holding the month headers.
pub const HEADER_ROW: u32 = 2;
/// First data row below the headers.
pub const FIRST_DATA_ROW: u32 = 3;

/// Summary of a zero-fill pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZeroFill {
    /// Label of the zero-filled month, e.g. `Apr-25`.
    pub next_month: String,
    /// Tabs in which a column was zero-filled.
    pub tabs: Vec<String>,
    /// Number of cells set to zero.
    pub cells_zeroed: usize,
}

/// Finds the 1-based column whose header in row 2 matches `labels`
/// (lowercase). The first match from the left wins.
pub fn find_month_column(sheet: &Worksheet, labels: &[String]) -> Option<u32> {
    (1..=sheet.get_highest_column()).find(|col| {
        let Some(cell) = sheet.get_cell((*col, HEADER_ROW)) else {
            return false;
        };
        let text = match workbook::date_serial(cell).and_then(month_from_excel_serial) {
            Some(month) => month.label(),
            None => cell.get_value().trim().to_string(),
        };
        let text = text.to_lowercase();
        !text.is_empty() && labels.iter().any(|label| *label == text)
    })
}

/// Sets every non-date cell of `column` from row 3 down to zero. Returns
/// how many cells were written.
pub fn zero_column(sheet: &mut Worksheet, column: u32) -> usize {
    let mut changed = 0;
    for row in FIRST_DATA_ROW..=sheet.get_highest_row() {
        let is_date = sheet
            .get_cell((column, row))
            .and_then(workbook::date_serial)
            .is_some();
        if !is_date {
            sheet.get_cell_mut((column, row)).set_value_number(0);
            changed += 1;
        }
    }
    changed
}

/// Zero-fills the month after `reporting_month` in every expected tab of the
/// water workbook. The file is only written when a cell changed.
#[instrument(level = "info", skip_all, fields(path = %path.display(), reporting_month = %reporting_month))]
pub fn zero_out_next_month(path: &Path, reporting_month: &str) -> Result<ZeroFill> {
    let current: ReportingMonth = reporting_month.parse()?;
    let mut summary = ZeroFill {
        next_month: current.next().label(),
        ..ZeroFill::default()
    };

    let labels = vec![
        reporting_month.trim().to_lowercase(),
        current.label().to_lowercase(),
    ];

    let mut book = workbook::open(path)?;
    for tab in WATER_FILE_TABS {
        let Some(sheet) = book.get_sheet_by_name_mut(tab) else {
            debug!(tab, "tab not present");
            continue;
        };
        let Some(column) = find_month_column(sheet, &labels) else {
            debug!(tab, "reporting month column not found");
            continue;
        };
        let next_column = column + 1;
        if next_column > sheet.get_highest_column() {
            debug!(tab, column, "no column after the reporting month");
            continue;
        }

        let changed = zero_column(sheet, next_column);
        if changed > 0 {
            summary.tabs.push(tab.to_string());
            summary.cells_zeroed += changed;
        }
    }

    if summary.cells_zeroed > 0 {
        workbook::save(&book, path)?;
        info!(
            next_month = %summary.next_month,
            tabs = summary.tabs.len(),
            cells = summary.cells_zeroed,
            "zero-filled next month"
        );
    }
    Ok(summary)
}
