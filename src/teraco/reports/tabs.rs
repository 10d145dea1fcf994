//! Worksheet renaming and duplication for the car-rental workbook.

use std::path::Path;

use tracing::{info, instrument, warn};

use crate::teraco::reports::error::{Result, ReportError};
use crate::teraco::reports::io::workbook;
use crate::teraco::reports::model::{CanonicalFile, ReportCategory};

/// Label given to the first worksheet of the consolidated car-rental file.
pub const CAR_RENTAL_SHEET: &str = "CarRental_Consolidated";
/// Prefix of the date-range worksheet that is duplicated.
pub const DATE_TAB_PREFIX: &str = "01 Jan -";
/// Name of the duplicated worksheet.
pub const PBI_TAB: &str = "PBI";

/// Outcome of [`copy_date_tab`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabCopy {
    /// The named worksheet was duplicated as [`PBI_TAB`].
    Copied { source: String },
    /// No worksheet name starts with [`DATE_TAB_PREFIX`].
    NoSourceTab,
    /// The file is not the consolidated car-rental workbook.
    NotApplicable,
}

/// Renames the first worksheet to `new_name`. Returns `false` when it
/// already has that name or the workbook has no worksheets.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), new_name = %new_name))]
pub fn rename_first_sheet(path: &Path, new_name: &str) -> Result<bool> {
    let mut book = workbook::open(path)?;
    let names = workbook::sheet_names(&book);
    let Some(current) = names.first() else {
        return Ok(false);
    };
    if current == new_name {
        return Ok(false);
    }
    if names.iter().skip(1).any(|name| name == new_name) {
        return Err(ReportError::Workbook(format!(
            "worksheet '{new_name}' already exists"
        )));
    }

    if let Some(sheet) = book.get_sheet_collection_mut().first_mut() {
        sheet.set_name(new_name);
    }
    workbook::save(&book, path)?;
    Ok(true)
}

/// Duplicates the worksheet whose name starts with [`DATE_TAB_PREFIX`] and
/// names the copy [`PBI_TAB`].
///
/// Re-running on a workbook that already has a `PBI` worksheet is not
/// skipped: the copy is attempted again and fails on the duplicate name.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn copy_date_tab(path: &Path) -> Result<TabCopy> {
    if CanonicalFile::from_path(path).category != Some(ReportCategory::CarRental) {
        return Ok(TabCopy::NotApplicable);
    }

    let mut book = workbook::open(path)?;
    let Some(source) = book
        .get_sheet_collection()
        .iter()
        .find(|sheet| sheet.get_name().starts_with(DATE_TAB_PREFIX))
    else {
        return Ok(TabCopy::NoSourceTab);
    };

    let source_name = source.get_name().to_string();
    if workbook::sheet_names(&book).iter().any(|name| name == PBI_TAB) {
        return Err(ReportError::Workbook(format!(
            "worksheet '{PBI_TAB}' already exists"
        )));
    }
    let mut copy = source.clone();
    copy.set_name(PBI_TAB);
    book.add_sheet(copy)
        .map_err(|reason| ReportError::Workbook(format!("couldn't add '{PBI_TAB}': {reason}")))?;
    workbook::save(&book, path)?;

    Ok(TabCopy::Copied {
        source: source_name,
    })
}

/// Applies both car-rental tab edits, logging rather than failing.
pub fn prepare_car_rental(path: &Path) {
    let file = display_name(path);

    if let Err(error) = rename_first_sheet(path, CAR_RENTAL_SHEET) {
        warn!(file = %file, %error, "couldn't rename worksheet");
    }

    match copy_date_tab(path) {
        Ok(TabCopy::Copied { source }) => {
            info!(file = %file, source = %source, alias = PBI_TAB, "copied date tab");
        }
        Ok(TabCopy::NoSourceTab) => {
            warn!(file = %file, prefix = DATE_TAB_PREFIX, "no date tab found");
        }
        Ok(TabCopy::NotApplicable) => {}
        Err(error) => warn!(file = %file, %error, "couldn't copy date tab"),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
