use crate::common::{build_workbook, fill_rows, read_text_grid};
use std::io::Cursor;
use xltemplate_workbook::{
    FileFormat, GridWorkbook, LiteralValue, SaveDestination, UmyaAdapter, open_workbook,
};

#[test]
fn umya_save_in_place_and_bytes() {
    let path = build_workbook(|book| fill_rows(book, &[&["before"]]));

    let mut adapter = UmyaAdapter::open_path(&path).unwrap();
    adapter
        .sheet_mut(0)
        .unwrap()
        .set_cell_value(1, 1, LiteralValue::Text("after".into()));
    adapter.save().unwrap();
    assert_eq!(read_text_grid(&path, 1, 1), vec![vec!["after".to_string()]]);

    let bytes = adapter.save_to_bytes().unwrap();
    assert!(bytes.len() > 100, "Expected non-trivial XLSX byte output");
    assert_eq!(FileFormat::sniff(&bytes), Some(FileFormat::Xlsx));
}

#[test]
fn umya_open_bytes_and_reader() {
    let path = build_workbook(|book| fill_rows(book, &[&["%TITLE%"]]));
    let bytes = std::fs::read(&path).unwrap();

    let mut from_bytes = UmyaAdapter::open_bytes(bytes.clone()).unwrap();
    assert_eq!(from_bytes.sheet_names(), vec!["Sheet1".to_string()]);
    assert_eq!(
        from_bytes.sheet_mut(0).unwrap().cell_value(1, 1),
        LiteralValue::Text("%TITLE%".into())
    );

    let mut from_reader = UmyaAdapter::open_reader(Cursor::new(bytes)).unwrap();
    assert!(from_reader.sheet_mut(0).is_some());
    assert!(from_reader.sheet_mut(1).is_none());
    assert!(from_reader.save().is_err(), "no original path to save in place");
}

#[test]
fn umya_save_to_path_and_writer() {
    let path = build_workbook(|book| fill_rows(book, &[&["x", "y"]]));
    let mut adapter = UmyaAdapter::open_path(&path).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("copy.xlsx");
    adapter.save_to_path(&out).unwrap();
    assert_eq!(
        read_text_grid(&out, 1, 2),
        vec![vec!["x".to_string(), "y".to_string()]]
    );

    let mut buf: Vec<u8> = Vec::new();
    adapter.save_to(SaveDestination::Writer(&mut buf)).unwrap();
    assert!(buf.starts_with(b"PK\x03\x04"));
}

#[test]
fn loader_opens_xlsx_by_content() {
    let path = build_workbook(|book| fill_rows(book, &[&["hello"]]));
    let renamed = path.with_extension("bin");
    std::fs::rename(&path, &renamed).unwrap();

    let mut wb = open_workbook(&renamed).unwrap();
    assert_eq!(wb.format(), FileFormat::Xlsx);
    assert_eq!(
        wb.sheet_mut(0).unwrap().cell_value(1, 1),
        LiteralValue::Text("hello".into())
    );
}
