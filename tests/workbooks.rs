mod common;

use std::fs;
use std::path::Path;

use calamine::DataType;
use common::{
    APR_25, Fixture, MAR_25, cell, energy_rows, number, read_sheet, sheet_names, text,
    water_rows, write_workbook,
};
use teraco_reports::ReportError;
use teraco_reports::energy::{trim_energy_files, trim_last_row};
use teraco_reports::io::convert::{CONVERTED_SHEET, convert_to_xlsx};
use teraco_reports::io::workbook;
use teraco_reports::tabs::{self, CAR_RENTAL_SHEET, PBI_TAB, TabCopy};
use teraco_reports::water::zero_out_next_month;
use tempfile::tempdir;

#[test]
fn trimming_removes_only_the_last_data_row() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("IT_CT1.xlsx");
    write_workbook(&path, &[("Sheet1", energy_rows())]);

    let removed = trim_last_row(&path).expect("trimmed");
    assert_eq!(removed, Some(5));

    let range = read_sheet(&path, "Sheet1");
    assert_eq!(text(&range, 0, 1), "kWh");
    assert_eq!(number(&range, 1, 1), Some(10.0));
    assert_eq!(number(&range, 2, 1), Some(12.5));
    assert_eq!(number(&range, 3, 1), Some(11.0));
    assert_eq!(text(&range, 3, 0), "03/03");
    assert_eq!(text(&range, 4, 0), "");
    assert_eq!(number(&range, 4, 1), None);
}

#[test]
fn each_trim_removes_one_more_row() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("PUE_CT1.xlsx");
    write_workbook(&path, &[("Sheet1", energy_rows())]);

    assert_eq!(trim_last_row(&path).expect("first trim"), Some(5));
    assert_eq!(trim_last_row(&path).expect("second trim"), Some(4));

    let range = read_sheet(&path, "Sheet1");
    assert_eq!(text(&range, 0, 1), "kWh");
    assert_eq!(number(&range, 1, 1), Some(10.0));
    assert_eq!(number(&range, 2, 1), Some(12.5));
    assert_eq!(text(&range, 2, 0), "02/03");
    assert_eq!(text(&range, 3, 0), "");
    assert_eq!(number(&range, 3, 1), None);
}

#[test]
fn trimming_leaves_files_without_data_untouched() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("Diesel_CT2.xlsx");
    write_workbook(
        &path,
        &[(
            "Sheet1",
            vec![
                vec![Some(Fixture::Text("Only column A"))],
                vec![Some(Fixture::Text("still A"))],
            ],
        )],
    );
    let before = fs::read(&path).expect("fixture read");

    assert_eq!(trim_last_row(&path).expect("scanned"), None);
    assert_eq!(fs::read(&path).expect("file read"), before);
}

#[test]
fn only_energy_workbooks_are_trimmed() {
    let temp_dir = tempdir().expect("temporary directory");
    let energy = temp_dir.path().join("Solar_JB2.xlsx");
    let refrigerant = temp_dir.path().join("Refrigerants_JB2.xlsx");
    write_workbook(&energy, &[("Sheet1", energy_rows())]);
    write_workbook(&refrigerant, &[("Sheet1", energy_rows())]);
    fs::write(temp_dir.path().join("PUE_JB2.txt"), "not a workbook").expect("text written");
    fs::write(temp_dir.path().join("PUE_JB3.xlsx"), "corrupt").expect("corrupt written");

    assert_eq!(trim_energy_files(temp_dir.path()), 1);

    let trimmed = read_sheet(&energy, "Sheet1");
    assert_eq!(number(&trimmed, 4, 1), None);
    let untouched = read_sheet(&refrigerant, "Sheet1");
    assert_eq!(number(&untouched, 4, 1), Some(33.5));
}

#[test]
fn names_sharing_letters_with_energy_prefixes_are_not_trimmed() {
    let temp_dir = tempdir().expect("temporary directory");
    let names = ["Itinerary.xlsx", "Solarwinds licences.xlsx", "Pueblo.xlsx", "Diesel report.xlsx"];
    let mut before = Vec::new();
    for name in names {
        let path = temp_dir.path().join(name);
        write_workbook(&path, &[("Sheet1", energy_rows())]);
        before.push(fs::read(&path).expect("fixture read"));
    }

    assert_eq!(trim_energy_files(temp_dir.path()), 0);

    for (name, bytes) in names.iter().zip(before) {
        let after = fs::read(temp_dir.path().join(name)).expect("file read");
        assert_eq!(after, bytes, "{name} rewritten");
    }
}

#[test]
fn next_month_column_is_zero_filled_except_dates() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("Water_Consolidated.xlsx");

    let mut text_headers = water_rows();
    text_headers[1][2] = Some(Fixture::Text(" mar-25 "));
    let mut no_next_column = water_rows();
    for row in &mut no_next_column {
        row.truncate(3);
    }
    write_workbook(
        &path,
        &[
            ("JB2", water_rows()),
            ("CT1", text_headers),
            ("Consumption Calcs", no_next_column),
            ("Notes", water_rows()),
        ],
    );

    let fill = zero_out_next_month(&path, "Mar-25").expect("zero-filled");
    assert_eq!(fill.next_month, "Apr-25");
    assert_eq!(fill.tabs, vec!["JB2".to_string(), "CT1".to_string()]);
    assert_eq!(fill.cells_zeroed, 4);

    for tab in ["JB2", "CT1"] {
        let range = read_sheet(&path, tab);
        assert_eq!(number(&range, 1, 3), Some(APR_25), "{tab} header kept");
        assert_eq!(number(&range, 2, 3), Some(0.0), "{tab} value zeroed");
        assert_eq!(number(&range, 3, 3), Some(0.0), "{tab} blank zeroed");
        assert_eq!(number(&range, 4, 3), Some(APR_25), "{tab} date kept");
        assert_eq!(number(&range, 2, 2), Some(5.0), "{tab} current month kept");
    }

    let notes = read_sheet(&path, "Notes");
    assert_eq!(number(&notes, 2, 3), Some(7.0));
    let calcs = read_sheet(&path, "Consumption Calcs");
    assert_eq!(number(&calcs, 2, 2), Some(5.0));
}

#[test]
fn water_file_is_not_rewritten_when_nothing_matches() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("Water_Consolidated.xlsx");
    write_workbook(&path, &[("JB3", water_rows())]);
    let before = fs::read(&path).expect("fixture read");

    let fill = zero_out_next_month(&path, "Jun-25").expect("scanned");
    assert_eq!(fill.next_month, "Jul-25");
    assert_eq!(fill.cells_zeroed, 0);
    assert!(fill.tabs.is_empty());
    assert_eq!(fs::read(&path).expect("file read"), before);
}

#[test]
fn malformed_reporting_month_is_rejected_before_editing() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("Water_Consolidated.xlsx");
    write_workbook(&path, &[("JB2", water_rows())]);
    let before = fs::read(&path).expect("fixture read");

    let result = zero_out_next_month(&path, "Foo-25");
    assert!(matches!(result, Err(ReportError::InvalidMonth { .. })));
    assert_eq!(fs::read(&path).expect("file read"), before);
}

#[test]
fn car_rental_tabs_are_renamed_and_copied() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("CarRental_Consolidated.xlsx");
    write_workbook(
        &path,
        &[
            ("MIS", vec![vec![Some(Fixture::Text("Summary"))]]),
            (
                "01 Jan - 31 Mar",
                vec![
                    vec![Some(Fixture::Text("Vehicle")), Some(Fixture::Text("Days"))],
                    vec![Some(Fixture::Text("Polo")), Some(Fixture::Number(3.0))],
                ],
            ),
        ],
    );

    assert!(tabs::rename_first_sheet(&path, CAR_RENTAL_SHEET).expect("renamed"));
    assert!(!tabs::rename_first_sheet(&path, CAR_RENTAL_SHEET).expect("already named"));

    let copied = tabs::copy_date_tab(&path).expect("copied");
    assert_eq!(
        copied,
        TabCopy::Copied {
            source: "01 Jan - 31 Mar".to_string()
        }
    );
    assert_eq!(
        sheet_names(&path),
        vec![CAR_RENTAL_SHEET, "01 Jan - 31 Mar", PBI_TAB]
    );
    let pbi = read_sheet(&path, PBI_TAB);
    assert_eq!(text(&pbi, 1, 0), "Polo");
    assert_eq!(number(&pbi, 1, 1), Some(3.0));

    // A second run is not skipped and fails on the existing alias.
    assert!(matches!(
        tabs::copy_date_tab(&path),
        Err(ReportError::Workbook(_))
    ));
    assert_eq!(sheet_names(&path).len(), 3);
}

#[test]
fn date_tab_copy_only_applies_to_car_rental_workbooks() {
    let temp_dir = tempdir().expect("temporary directory");
    let other = temp_dir.path().join("IT_CT1.xlsx");
    write_workbook(&other, &[("01 Jan - 31 Mar", energy_rows())]);
    assert_eq!(tabs::copy_date_tab(&other).expect("checked"), TabCopy::NotApplicable);

    let missing = temp_dir.path().join("CarRental_Consolidated.xlsx");
    write_workbook(&missing, &[("Sheet1", energy_rows())]);
    assert_eq!(tabs::copy_date_tab(&missing).expect("checked"), TabCopy::NoSourceTab);
    assert_eq!(sheet_names(&missing), vec!["Sheet1"]);
}

#[test]
fn csv_conversion_preserves_cells_and_removes_source() {
    let temp_dir = tempdir().expect("temporary directory");
    let source = temp_dir.path().join("export.csv");
    fs::write(&source, "Site,Load,Note\nCT1,12.5,\nCT2,7,peak\n").expect("csv written");

    let output = convert_to_xlsx(&source).expect("converted");
    assert_eq!(output, temp_dir.path().join("export.xlsx"));
    assert!(!source.exists());

    let range = read_sheet(&output, CONVERTED_SHEET);
    assert_eq!(text(&range, 0, 0), "Site");
    assert_eq!(text(&range, 0, 2), "Note");
    assert_eq!(text(&range, 1, 0), "CT1");
    assert_eq!(number(&range, 1, 1), Some(12.5));
    assert_eq!(text(&range, 1, 2), "");
    assert_eq!(number(&range, 2, 1), Some(7.0));
    assert_eq!(text(&range, 2, 2), "peak");
}

#[test]
fn legacy_xls_conversion_keeps_types_and_positions() {
    let temp_dir = tempdir().expect("temporary directory");
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/legacy_loads.xls");
    let source = temp_dir.path().join("CT IT loads.xls");
    fs::copy(&fixture, &source).expect("fixture copied");

    let output = convert_to_xlsx(&source).expect("converted");
    assert_eq!(output, temp_dir.path().join("CT IT loads.xlsx"));
    assert!(!source.exists());
    assert_eq!(sheet_names(&output), vec![CONVERTED_SHEET]);

    // The legacy sheet starts at B2; nothing may shift into column A or row 1.
    let range = read_sheet(&output, CONVERTED_SHEET);
    assert_eq!(cell(&range, 0, 0), DataType::Empty);
    assert_eq!(cell(&range, 1, 0), DataType::Empty);
    assert_eq!(text(&range, 1, 1), "Date");
    assert_eq!(text(&range, 1, 2), "kWh");
    assert_eq!(text(&range, 1, 3), "Meter note");
    assert_eq!(cell(&range, 2, 1), DataType::DateTime(MAR_25));
    assert_eq!(cell(&range, 3, 1), DataType::DateTime(MAR_25 + 1.0));
    assert_eq!(cell(&range, 2, 2), DataType::Float(10.5));
    assert_eq!(number(&range, 3, 2), Some(12.0));
    assert_eq!(cell(&range, 2, 3), DataType::Bool(true));
    assert_eq!(cell(&range, 3, 3), DataType::Bool(false));
}

#[test]
fn failed_conversion_keeps_the_source() {
    let temp_dir = tempdir().expect("temporary directory");
    let source = temp_dir.path().join("CT IT loads.xls");
    fs::write(&source, "definitely not a workbook").expect("fixture written");

    assert_eq!(convert_to_xlsx(&source), None);
    assert!(source.exists());
    assert!(!temp_dir.path().join("CT IT loads.xlsx").exists());

    let untouched = temp_dir.path().join("CT1 IT.xlsx");
    fs::write(&untouched, "anything").expect("fixture written");
    assert_eq!(convert_to_xlsx(&untouched), None);
    assert!(untouched.exists());
}

#[test]
fn unreadable_workbook_reports_a_read_error() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("PUE_JB3.xlsx");
    fs::write(&path, "corrupt").expect("corrupt written");

    assert!(matches!(
        workbook::open(&path),
        Err(ReportError::WorkbookRead(_))
    ));
    assert!(matches!(
        trim_last_row(&path),
        Err(ReportError::WorkbookRead(_))
    ));
}
