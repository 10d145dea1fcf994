//! Conversion of legacy `.xls` and `.csv` exports into `.xlsx` workbooks.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{DataType, Reader, Xls, open_workbook};
use rust_xlsxwriter::{Format, Workbook};
use tracing::{debug, info, instrument, warn};

use crate::teraco::reports::error::{Result, ReportError};

/// Extension of the canonical container format.
pub const XLSX_EXTENSION: &str = "xlsx";

/// Worksheet name given to converted tables.
pub const CONVERTED_SHEET: &str = "Sheet1";

const DATE_FORMAT: &str = "yyyy-mm-dd";

/// Tabular formats that are converted before renaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyFormat {
    /// Binary Excel 97-2003 workbook.
    Xls,
    /// Comma-separated text.
    Csv,
}

impl LegacyFormat {
    /// Detects a legacy format from the file extension.
    pub fn detect(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("xls") {
            Some(Self::Xls)
        } else if extension.eq_ignore_ascii_case("csv") {
            Some(Self::Csv)
        } else {
            None
        }
    }
}

/// A single typed cell of a converted table.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel date serial.
    Date(f64),
}

/// Rows of cells loaded from a legacy file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<Vec<CellValue>>,
}

/// Converts `path` to `.xlsx` when it is a legacy format, removing the
/// source file. Returns the new path, or `None` when nothing was converted.
/// Conversion failures are logged and leave the source in place.
pub fn convert_to_xlsx(path: &Path) -> Option<PathBuf> {
    let format = LegacyFormat::detect(path)?;
    match try_convert(path, format) {
        Ok(output) => Some(output),
        Err(error) => {
            warn!(path = %path.display(), %error, "couldn't convert file");
            None
        }
    }
}

/// Converts `path` as `format` and deletes the source on success.
#[instrument(level = "info", skip_all, fields(input = %path.display(), ?format))]
pub fn try_convert(path: &Path, format: LegacyFormat) -> Result<PathBuf> {
    let table = match format {
        LegacyFormat::Xls => read_xls(path)?,
        LegacyFormat::Csv => read_csv(path)?,
    };
    debug!(row_count = table.rows.len(), "loaded legacy table");

    let output = path.with_extension(XLSX_EXTENSION);
    write_table(&output, &table)?;
    fs::remove_file(path)?;
    info!(output = %output.display(), "converted to xlsx");
    Ok(output)
}

/// Loads the first worksheet of a legacy `.xls` workbook.
pub fn read_xls(path: &Path) -> Result<Table> {
    let mut workbook: Xls<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::Conversion {
            path: path.to_path_buf(),
            reason: "workbook has no worksheets".into(),
        })??;

    let (row_offset, col_offset) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for (row_idx, row) in range.rows().enumerate() {
        let mut cells = vec![CellValue::Empty; col_offset];
        cells.extend(row.iter().map(to_cell_value));
        let absolute = row_offset + row_idx;
        if rows.len() <= absolute {
            rows.resize(absolute + 1, Vec::new());
        }
        rows[absolute] = cells;
    }

    Ok(Table { rows })
}

/// Loads a comma-separated file, keeping its header line as the first row.
pub fn read_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| {
                if index == 0 {
                    text_cell(field)
                } else {
                    parse_field(field)
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(Table { rows })
}

/// Writes the table to a single-sheet `.xlsx` workbook.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(CONVERTED_SHEET)?;

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = u32::try_from(row_idx)
            .map_err(|_| ReportError::Workbook(format!("row {row_idx} out of range")))?;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = u16::try_from(col_idx)
                .map_err(|_| ReportError::Workbook(format!("column {col_idx} out of range")))?;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(value) => {
                    worksheet.write_string(row_num, col_num, value)?;
                }
                CellValue::Number(value) => {
                    worksheet.write_number(row_num, col_num, *value)?;
                }
                CellValue::Bool(value) => {
                    worksheet.write_boolean(row_num, col_num, *value)?;
                }
                CellValue::Date(serial) => {
                    worksheet.write_number_with_format(row_num, col_num, *serial, &date_format)?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn to_cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::Empty => CellValue::Empty,
        DataType::String(value) => text_cell(value),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Bool(*value),
        DataType::DateTime(serial) => CellValue::Date(*serial),
        other => text_cell(&other.to_string()),
    }
}

fn text_cell(value: &str) -> CellValue {
    if value.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(value.to_string())
    }
}

fn parse_field(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => CellValue::Number(number),
        _ => CellValue::Text(field.to_string()),
    }
}
