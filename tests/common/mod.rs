#![allow(dead_code)]

use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

/// 2025-03-01 and 2025-04-01 as Excel serials.
pub const MAR_25: f64 = 45717.0;
pub const APR_25: f64 = 45748.0;

/// Cell content used to author fixture workbooks.
#[derive(Debug, Clone)]
pub enum Fixture {
    Text(&'static str),
    Number(f64),
    Date(f64),
}

pub fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Option<Fixture>>]) {
    let date_format = Format::new().set_num_format("mmm-yy");
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let (row_num, col_num) = (row_idx as u32, col_idx as u16);
            match cell {
                Some(Fixture::Text(value)) => {
                    worksheet.write_string(row_num, col_num, *value).expect("string written");
                }
                Some(Fixture::Number(value)) => {
                    worksheet.write_number(row_num, col_num, *value).expect("number written");
                }
                Some(Fixture::Date(serial)) => {
                    worksheet
                        .write_number_with_format(row_num, col_num, *serial, &date_format)
                        .expect("date written");
                }
                None => {}
            }
        }
    }
}

/// Writes a workbook with the given `(sheet name, rows)` pairs.
pub fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<Option<Fixture>>>)]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).expect("sheet named");
        write_rows(worksheet, rows);
    }
    workbook.save(path).expect("workbook saved");
}

/// A simple energy export: header, three readings, and a trailing total.
pub fn energy_rows() -> Vec<Vec<Option<Fixture>>> {
    vec![
        vec![Some(Fixture::Text("Date")), Some(Fixture::Text("kWh"))],
        vec![Some(Fixture::Text("01/03")), Some(Fixture::Number(10.0))],
        vec![Some(Fixture::Text("02/03")), Some(Fixture::Number(12.5))],
        vec![Some(Fixture::Text("03/03")), Some(Fixture::Number(11.0))],
        vec![Some(Fixture::Text("Total")), Some(Fixture::Number(33.5))],
    ]
}

/// A water site tab with months Feb-25 (text), Mar-25 and Apr-25 (dates).
pub fn water_rows() -> Vec<Vec<Option<Fixture>>> {
    vec![
        vec![Some(Fixture::Text("Water usage"))],
        vec![
            Some(Fixture::Text("Meter")),
            Some(Fixture::Text("Feb-25")),
            Some(Fixture::Date(MAR_25)),
            Some(Fixture::Date(APR_25)),
        ],
        vec![
            Some(Fixture::Text("Main")),
            Some(Fixture::Number(4.0)),
            Some(Fixture::Number(5.0)),
            Some(Fixture::Number(7.0)),
        ],
        vec![
            Some(Fixture::Text("Irrigation")),
            Some(Fixture::Number(1.0)),
            Some(Fixture::Number(2.0)),
            None,
        ],
        vec![
            Some(Fixture::Text("Period start")),
            None,
            None,
            Some(Fixture::Date(APR_25)),
        ],
    ]
}

pub fn sheet_names(path: &Path) -> Vec<String> {
    let workbook: Xlsx<_> = open_workbook(path).expect("workbook opened");
    workbook.sheet_names().to_vec()
}

pub fn read_sheet(path: &Path, name: &str) -> Range<DataType> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("workbook opened");
    workbook
        .worksheet_range(name)
        .expect("sheet present")
        .expect("sheet read")
}

/// Cell at zero-based `(row, col)`.
pub fn cell(range: &Range<DataType>, row: u32, col: u32) -> DataType {
    range.get_value((row, col)).cloned().unwrap_or(DataType::Empty)
}

pub fn number(range: &Range<DataType>, row: u32, col: u32) -> Option<f64> {
    match cell(range, row, col) {
        DataType::Float(value) | DataType::DateTime(value) => Some(value),
        DataType::Int(value) => Some(value as f64),
        _ => None,
    }
}

pub fn text(range: &Range<DataType>, row: u32, col: u32) -> String {
    match cell(range, row, col) {
        DataType::String(value) => value,
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Index one past the last row that holds any value.
pub fn used_rows(range: &Range<DataType>) -> u32 {
    range.end().map(|(row, _)| row + 1).unwrap_or(0)
}
