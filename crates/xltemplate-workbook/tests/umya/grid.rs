use crate::common::{build_workbook, fill_rows};
use xltemplate_workbook::{CellRange, Grid, GridWorkbook, LiteralValue, UmyaAdapter};

fn open(rows: &[&[&str]], merges: &[&str]) -> UmyaAdapter {
    let merges: Vec<String> = merges.iter().map(|m| m.to_string()).collect();
    let path = build_workbook(|book| {
        fill_rows(book, rows);
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        for m in &merges {
            sh.add_merge_cells(m.as_str());
        }
    });
    UmyaAdapter::open_path(&path).unwrap()
}

#[test]
fn umya_reports_existing_cells_per_row() {
    let mut adapter = open(&[&["a", "", "c"], &["", "x"]], &[]);
    let sheet = adapter.sheet_mut(0).unwrap();
    assert_eq!(sheet.highest_row(), 2);
    assert_eq!(sheet.highest_column(), 3);
    assert_eq!(sheet.existing_columns(1), vec![1, 3]);
    assert_eq!(sheet.existing_columns(2), vec![2]);
    assert_eq!(sheet.row_columns(2, false), vec![1, 2, 3]);
    assert_eq!(sheet.cell_value(1, 1), LiteralValue::Text("a".into()));
    assert_eq!(sheet.cell_value(1, 2), LiteralValue::Empty);
}

#[test]
fn umya_writes_typed_values() {
    let mut adapter = open(&[&["seed"]], &[]);
    let sheet = adapter.sheet_mut(0).unwrap();
    sheet.set_cell_value(2, 1, LiteralValue::Int(7));
    sheet.set_cell_value(2, 2, LiteralValue::Boolean(true));
    sheet.set_cell_value(2, 3, LiteralValue::Text("Widget".into()));
    sheet.set_cell_value(1, 1, LiteralValue::empty_text());

    assert_eq!(sheet.cell_value(2, 1), LiteralValue::Number(7.0));
    assert_eq!(sheet.cell_value(2, 2), LiteralValue::Boolean(true));
    assert_eq!(sheet.cell_value(2, 3), LiteralValue::Text("Widget".into()));
    assert!(sheet.cell_value(1, 1).is_blank());
}

#[test]
fn umya_insert_and_remove_rows_shift_content() {
    let mut adapter = open(&[&["h"], &["t"], &["f"]], &[]);
    let sheet = adapter.sheet_mut(0).unwrap();

    sheet.insert_rows_before(3, 2);
    assert_eq!(sheet.cell_value(2, 1), LiteralValue::Text("t".into()));
    assert_eq!(sheet.cell_value(3, 1), LiteralValue::Empty);
    assert_eq!(sheet.cell_value(5, 1), LiteralValue::Text("f".into()));

    sheet.remove_rows(1, 1);
    assert_eq!(sheet.cell_value(1, 1), LiteralValue::Text("t".into()));
    assert_eq!(sheet.cell_value(4, 1), LiteralValue::Text("f".into()));
    assert_eq!(sheet.highest_row(), 4);
}

#[test]
fn umya_merge_lookup_and_add() {
    let mut adapter = open(&[&["a", "b", "c"]], &["B1:C1"]);
    let sheet = adapter.sheet_mut(0).unwrap();
    let range = CellRange::from_a1("B1:C1").unwrap();
    assert_eq!(sheet.merge_range_at(1, 3), Some(range));
    assert_eq!(sheet.merge_range_at(1, 1), None);

    sheet.merge_cells(range.shape().at_row(4));
    sheet.merge_cells(range.shape().at_row(4));
    let merges: Vec<String> = sheet.merged_ranges().iter().map(|r| r.to_string()).collect();
    assert_eq!(merges, vec!["B1:C1", "B4:C4"]);
}

#[test]
fn umya_existing_columns_skip_gaps_and_rows_past_the_end() {
    let mut adapter = open(&[&["a", "", "", "d"], &["", "", "", "", "", "f"]], &[]);
    let sheet = adapter.sheet_mut(0).unwrap();
    assert_eq!(sheet.highest_column(), 6);
    assert_eq!(sheet.existing_columns(1), vec![1, 4]);
    assert_eq!(sheet.existing_columns(2), vec![6]);
    assert!(sheet.existing_columns(3).is_empty());
}
