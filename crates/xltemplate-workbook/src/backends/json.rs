use crate::IoError;
use crate::error::with_cell_context;
use crate::loader::FileFormat;
use crate::traits::{Grid, GridWorkbook, SaveDestination};
use crate::workbook::MemoryWorkbook;
use crate::worksheet::MemorySheet;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use xltemplate_common::{CellRange, LiteralValue};

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
struct JsonWorkbook {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    sheets: Vec<JsonSheet>,
}

fn default_version() -> u32 {
    1
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
struct JsonSheet {
    name: String,
    #[serde(default)]
    cells: Vec<JsonCell>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    merged_cells: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct JsonCell {
    row: u32,
    col: u32,
    #[serde(default)]
    value: Option<JsonValue>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", content = "value")]
enum JsonValue {
    Int(i64),
    Number(f64),
    Text(String),
    Boolean(bool),
    Empty,
    Date(String),
    DateTime(String),
}

/// JSON workbook document backend.
///
/// ```json
/// {"version": 1, "sheets": [{"name": "Sheet1",
///   "cells": [{"row": 1, "col": 1, "value": {"type": "Text", "value": "%TITLE%"}}],
///   "merged_cells": ["A1:C1"]}]}
/// ```
#[derive(Debug, Default)]
pub struct JsonAdapter {
    book: MemoryWorkbook,
    path: Option<PathBuf>,
}

impl JsonAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an in-memory workbook so it can be rendered and serialized.
    pub fn from_workbook(book: MemoryWorkbook) -> Self {
        Self { book, path: None }
    }

    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, IoError> {
        let file = File::open(path.as_ref())?;
        let mut adapter = Self::open_reader(BufReader::new(file))?;
        adapter.path = Some(path.as_ref().to_path_buf());
        Ok(adapter)
    }

    pub fn open_reader<R: Read>(reader: R) -> Result<Self, IoError> {
        let data: JsonWorkbook = serde_json::from_reader(reader)?;
        Ok(Self::from_workbook(decode_workbook(data)?))
    }

    pub fn open_bytes(bytes: &[u8]) -> Result<Self, IoError> {
        let data: JsonWorkbook = serde_json::from_slice(bytes)?;
        Ok(Self::from_workbook(decode_workbook(data)?))
    }

    pub fn workbook(&self) -> &MemoryWorkbook {
        &self.book
    }

    pub fn into_workbook(self) -> MemoryWorkbook {
        self.book
    }

    pub fn to_json_string(&self) -> Result<String, IoError> {
        Ok(serde_json::to_string_pretty(&encode_workbook(&self.book))?)
    }
}

impl GridWorkbook for JsonAdapter {
    fn format(&self) -> FileFormat {
        FileFormat::Json
    }

    fn sheet_names(&self) -> Vec<String> {
        self.book.sheet_names()
    }

    fn sheet_mut(&mut self, index: usize) -> Option<&mut dyn Grid> {
        self.book
            .sheet_mut(index)
            .map(|sheet| sheet as &mut dyn Grid)
    }

    fn save_to(&mut self, dest: SaveDestination<'_>) -> Result<Option<Vec<u8>>, IoError> {
        let data = encode_workbook(&self.book);
        match dest {
            SaveDestination::InPlace => {
                let path = self.path.clone().ok_or_else(|| {
                    IoError::Unsupported("InPlace save unavailable: no original path".to_string())
                })?;
                write_json_file(&path, &data)?;
                Ok(None)
            }
            SaveDestination::Path(path) => {
                write_json_file(path, &data)?;
                self.path = Some(path.to_path_buf());
                Ok(None)
            }
            SaveDestination::Writer(writer) => {
                serde_json::to_writer_pretty(&mut *writer, &data)?;
                writer.flush()?;
                Ok(None)
            }
            SaveDestination::Bytes => Ok(Some(serde_json::to_vec_pretty(&data)?)),
        }
    }
}

fn write_json_file(path: &Path, data: &JsonWorkbook) -> Result<(), IoError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.flush()?;
    Ok(())
}

fn decode_workbook(data: JsonWorkbook) -> Result<MemoryWorkbook, IoError> {
    let mut book = MemoryWorkbook::new();
    for js in data.sheets {
        let mut sheet = MemorySheet::new();
        for cell in js.cells {
            if cell.row == 0 || cell.col == 0 {
                return Err(with_cell_context(
                    "cell coordinates are 1-based",
                    cell.row,
                    cell.col,
                ));
            }
            let value = match &cell.value {
                Some(v) => json_to_literal(v)
                    .map_err(|e| with_cell_context(e, cell.row, cell.col))?,
                None => LiteralValue::Empty,
            };
            sheet.set_cell_value(cell.row, cell.col, value);
        }
        for merged in &js.merged_cells {
            sheet.merge_cells(CellRange::from_a1(merged)?);
        }
        book.add_sheet(js.name, sheet);
    }
    Ok(book)
}

fn encode_workbook(book: &MemoryWorkbook) -> JsonWorkbook {
    let sheets = book
        .iter()
        .map(|(name, sheet)| JsonSheet {
            name: name.to_string(),
            cells: sheet
                .cells()
                .map(|(&(row, col), value)| JsonCell {
                    row,
                    col,
                    value: Some(literal_to_json(value)),
                })
                .collect(),
            merged_cells: sheet
                .merged_ranges()
                .iter()
                .map(ToString::to_string)
                .collect(),
        })
        .collect();
    JsonWorkbook {
        version: default_version(),
        sheets,
    }
}

fn literal_to_json(v: &LiteralValue) -> JsonValue {
    use LiteralValue as L;
    match v {
        L::Int(i) => JsonValue::Int(*i),
        L::Number(n) => JsonValue::Number(*n),
        L::Text(s) => JsonValue::Text(s.clone()),
        L::Boolean(b) => JsonValue::Boolean(*b),
        L::Empty => JsonValue::Empty,
        L::Date(d) => JsonValue::Date(d.to_string()),
        L::DateTime(dt) => JsonValue::DateTime(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
    }
}

fn json_to_literal(v: &JsonValue) -> Result<LiteralValue, chrono::ParseError> {
    use LiteralValue as L;
    Ok(match v {
        JsonValue::Int(i) => L::Int(*i),
        JsonValue::Number(n) => L::Number(*n),
        JsonValue::Text(s) => L::Text(s.clone()),
        JsonValue::Boolean(b) => L::Boolean(*b),
        JsonValue::Empty => L::Empty,
        JsonValue::Date(s) => L::Date(chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")?),
        JsonValue::DateTime(s) => L::DateTime(
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))?,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_zero_based_cells() {
        let err = JsonAdapter::open_bytes(
            br#"{"sheets":[{"name":"S","cells":[{"row":0,"col":1,"value":{"type":"Int","value":1}}]}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("1-based"), "{err}");
    }

    #[test]
    fn decode_rejects_bad_dates_with_location() {
        let err = JsonAdapter::open_bytes(
            br#"{"sheets":[{"name":"S","cells":[{"row":2,"col":3,"value":{"type":"Date","value":"soon"}}]}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().ends_with("at C2"), "{err}");
    }
}
