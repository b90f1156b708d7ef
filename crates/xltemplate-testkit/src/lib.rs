//! Fixture helpers shared by the xlsx integration tests.

use std::path::PathBuf;
use umya_spreadsheet::Spreadsheet;

/// Build a one-sheet (`Sheet1`) xlsx file in a fresh temp directory.
///
/// The directory is kept on disk so the returned path outlives the call.
pub fn build_workbook<F: FnOnce(&mut Spreadsheet)>(f: F) -> PathBuf {
    build_named_workbook("fixture.xlsx", f)
}

pub fn build_named_workbook<F: FnOnce(&mut Spreadsheet)>(file_name: &str, f: F) -> PathBuf {
    let dir = tempfile::tempdir().expect("create temp dir").into_path();
    let path = dir.join(file_name);
    let mut book = umya_spreadsheet::new_file();
    f(&mut book);
    umya_spreadsheet::writer::xlsx::write(&book, &path).expect("write fixture workbook");
    path
}

/// Write string values into `Sheet1`, row-major from `A1`. Empty strings
/// leave the cell untouched so it does not exist in the saved file.
pub fn fill_rows(book: &mut Spreadsheet, rows: &[&[&str]]) {
    let sheet = book
        .get_sheet_by_name_mut("Sheet1")
        .expect("new_file creates Sheet1");
    for (r, row) in rows.iter().enumerate() {
        for (c, text) in row.iter().enumerate() {
            if !text.is_empty() {
                sheet
                    .get_cell_mut((c as u32 + 1, r as u32 + 1))
                    .set_value_string(*text);
            }
        }
    }
}

/// Read the displayed values of `Sheet1` as text, `rows` x `cols` from `A1`.
pub fn read_text_grid(path: &std::path::Path, rows: u32, cols: u32) -> Vec<Vec<String>> {
    let book = umya_spreadsheet::reader::xlsx::read(path).expect("read workbook");
    let sheet = book.get_sheet(&0).expect("first sheet");
    (1..=rows)
        .map(|r| {
            (1..=cols)
                .map(|c| sheet.get_value((c, r)))
                .collect::<Vec<String>>()
        })
        .collect()
}

/// Merge ranges of the first sheet, sorted.
pub fn read_merges(path: &std::path::Path) -> Vec<String> {
    let book = umya_spreadsheet::reader::xlsx::read(path).expect("read workbook");
    let sheet = book.get_sheet(&0).expect("first sheet");
    let mut merges: Vec<String> = sheet
        .get_merge_cells()
        .iter()
        .map(|range| range.get_range())
        .collect();
    merges.sort();
    merges
}
