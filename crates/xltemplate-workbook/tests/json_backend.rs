use xltemplate_workbook::{
    FileFormat, Grid, GridWorkbook, IoError, JsonAdapter, LiteralValue, MemorySheet,
    MemoryWorkbook, open_workbook,
};

const DOC: &str = r#"{
  "version": 1,
  "sheets": [
    {
      "name": "Invoice",
      "cells": [
        {"row": 1, "col": 1, "value": {"type": "Text", "value": "%CUSTOMER%"}},
        {"row": 2, "col": 1, "value": {"type": "Text", "value": "%LOOP ITEMS%"}},
        {"row": 3, "col": 2, "value": {"type": "Number", "value": 2.5}},
        {"row": 3, "col": 3, "value": {"type": "Date", "value": "2024-03-01"}},
        {"row": 4, "col": 1}
      ],
      "merged_cells": ["B3:C3"]
    },
    {"name": "Notes"}
  ]
}"#;

#[test]
fn json_open_reads_cells_and_merges() {
    let mut adapter = JsonAdapter::open_bytes(DOC.as_bytes()).unwrap();
    assert_eq!(adapter.sheet_names(), vec!["Invoice", "Notes"]);
    assert_eq!(adapter.sheet_count(), 2);

    let sheet = adapter.sheet_mut(0).unwrap();
    assert_eq!(sheet.cell_value(1, 1), LiteralValue::Text("%CUSTOMER%".into()));
    assert_eq!(sheet.cell_value(3, 2), LiteralValue::Number(2.5));
    assert_eq!(
        sheet.cell_value(3, 3),
        LiteralValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    );
    // A cell with no value still exists.
    assert_eq!(sheet.existing_columns(4), vec![1]);
    assert_eq!(sheet.merge_range_at(3, 3).map(|r| r.to_string()), Some("B3:C3".into()));
}

#[test]
fn json_save_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.json");
    std::fs::write(&path, DOC).unwrap();

    let mut wb = open_workbook(&path).unwrap();
    assert_eq!(wb.format(), FileFormat::Json);
    wb.sheet_mut(0)
        .unwrap()
        .set_cell_value(1, 1, LiteralValue::Text("ACME".into()));
    wb.save().unwrap();

    let reopened = JsonAdapter::open_path(&path).unwrap();
    let sheet = reopened.workbook().sheet_by_name("Invoice").unwrap();
    assert_eq!(sheet.cell_value(1, 1), LiteralValue::Text("ACME".into()));
    assert_eq!(sheet.merged_ranges().len(), 1);
}

#[test]
fn json_bytes_output_is_loadable() {
    let book = MemoryWorkbook::new().with_sheet(
        "Sheet1",
        MemorySheet::from_rows(vec![vec![LiteralValue::Int(1), LiteralValue::Boolean(false)]]),
    );
    let mut adapter = JsonAdapter::from_workbook(book.clone());
    let bytes = adapter.save_to_bytes().unwrap();
    assert_eq!(FileFormat::sniff(&bytes), Some(FileFormat::Json));

    let back = JsonAdapter::open_bytes(&bytes).unwrap();
    assert_eq!(back.workbook(), &book);
}

#[test]
fn json_in_place_save_needs_a_path() {
    let mut adapter = JsonAdapter::new();
    assert!(matches!(adapter.save(), Err(IoError::Unsupported(_))));
}

#[test]
fn json_malformed_document_is_an_error() {
    let err = JsonAdapter::open_bytes(b"{\"sheets\": [").unwrap_err();
    assert!(matches!(err, IoError::Json(_)));
}
