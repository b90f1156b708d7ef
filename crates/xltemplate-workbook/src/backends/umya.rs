#![cfg(feature = "umya")]

use crate::IoError;
use crate::loader::FileFormat;
use crate::traits::{Grid, GridWorkbook, SaveDestination};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use umya_spreadsheet::{CellRawValue, CellValue, Spreadsheet, Worksheet, reader::xlsx};
use xltemplate_common::{CellRange, LiteralValue};

/// xlsx backend on top of `umya-spreadsheet`.
pub struct UmyaAdapter {
    workbook: Spreadsheet,
    original_path: Option<PathBuf>,
}

impl UmyaAdapter {
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, IoError> {
        // Full read (not lazy) so every sheet is deserialized before we mutate or save it.
        let workbook =
            xlsx::read(path.as_ref()).map_err(|e| IoError::from_backend("umya", e))?;
        Ok(Self {
            workbook,
            original_path: Some(path.as_ref().to_path_buf()),
        })
    }

    pub fn open_reader<R: Read>(mut reader: R) -> Result<Self, IoError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::open_bytes(data)
    }

    pub fn open_bytes(data: Vec<u8>) -> Result<Self, IoError> {
        let workbook = xlsx::read_reader(Cursor::new(data), true)
            .map_err(|e| IoError::from_backend("umya", e))?;
        Ok(Self {
            workbook,
            original_path: None,
        })
    }

    pub fn from_spreadsheet(workbook: Spreadsheet) -> Self {
        Self {
            workbook,
            original_path: None,
        }
    }

    pub fn spreadsheet(&self) -> &Spreadsheet {
        &self.workbook
    }

    pub fn into_spreadsheet(self) -> Spreadsheet {
        self.workbook
    }

    fn ensure_sheets_read(&mut self) {
        let count = self.workbook.get_sheet_count();
        for i in 0..count {
            self.workbook.read_sheet(i);
        }
    }
}

impl GridWorkbook for UmyaAdapter {
    fn format(&self) -> FileFormat {
        FileFormat::Xlsx
    }

    fn sheet_names(&self) -> Vec<String> {
        self.workbook
            .get_sheet_collection()
            .iter()
            .map(|s| s.get_name().to_string())
            .collect()
    }

    fn sheet_count(&self) -> usize {
        self.workbook.get_sheet_count()
    }

    fn sheet_mut(&mut self, index: usize) -> Option<&mut dyn Grid> {
        self.workbook.read_sheet(index);
        self.workbook
            .get_sheet_mut(&index)
            .map(|ws| ws as &mut dyn Grid)
    }

    fn save_to(&mut self, dest: SaveDestination<'_>) -> Result<Option<Vec<u8>>, IoError> {
        self.ensure_sheets_read();
        match dest {
            SaveDestination::InPlace => {
                let path = self.original_path.as_ref().ok_or_else(|| {
                    IoError::Unsupported("InPlace save unavailable: no original path".to_string())
                })?;
                umya_spreadsheet::writer::xlsx::write(&self.workbook, path)
                    .map_err(|e| IoError::from_backend("umya", e))?;
                Ok(None)
            }
            SaveDestination::Path(p) => {
                umya_spreadsheet::writer::xlsx::write(&self.workbook, p)
                    .map_err(|e| IoError::from_backend("umya", e))?;
                self.original_path = Some(p.to_path_buf());
                Ok(None)
            }
            SaveDestination::Writer(w) => {
                let mut buf: Vec<u8> = Vec::new();
                umya_spreadsheet::writer::xlsx::write_writer(&self.workbook, &mut buf)
                    .map_err(|e| IoError::from_backend("umya", e))?;
                w.write_all(&buf)?;
                w.flush()?;
                Ok(None)
            }
            SaveDestination::Bytes => {
                let mut buf: Vec<u8> = Vec::new();
                umya_spreadsheet::writer::xlsx::write_writer(&self.workbook, &mut buf)
                    .map_err(|e| IoError::from_backend("umya", e))?;
                Ok(Some(buf))
            }
        }
    }
}

fn convert_cell_value(cv: &CellValue) -> LiteralValue {
    match cv.get_raw_value() {
        CellRawValue::Numeric(n) => LiteralValue::Number(*n),
        CellRawValue::Bool(b) => LiteralValue::Boolean(*b),
        CellRawValue::String(s) => LiteralValue::Text(s.to_string()),
        CellRawValue::RichText(rt) => LiteralValue::Text(rt.get_text().to_string()),
        CellRawValue::Lazy(s) => {
            let txt = s.as_ref();
            if let Ok(n) = txt.parse::<f64>() {
                LiteralValue::Number(n)
            } else if txt.eq_ignore_ascii_case("TRUE") {
                LiteralValue::Boolean(true)
            } else if txt.eq_ignore_ascii_case("FALSE") {
                LiteralValue::Boolean(false)
            } else {
                LiteralValue::Text(txt.to_string())
            }
        }
        CellRawValue::Error(_) => LiteralValue::Text(cv.get_value().to_string()),
        CellRawValue::Empty => LiteralValue::Empty,
    }
}

// umya addresses cells as (col, row).
impl Grid for Worksheet {
    fn highest_row(&self) -> u32 {
        self.get_highest_row()
    }

    fn highest_column(&self) -> u32 {
        self.get_highest_column()
    }

    // One keyed lookup per column of the used range.
    fn existing_columns(&self, row: u32) -> Vec<u32> {
        if row > self.get_highest_row() {
            return Vec::new();
        }
        (1..=self.get_highest_column())
            .filter(|col| self.get_cell((*col, row)).is_some())
            .collect()
    }

    fn cell_value(&self, row: u32, col: u32) -> LiteralValue {
        self.get_cell((col, row))
            .map(|cell| convert_cell_value(cell.get_cell_value()))
            .unwrap_or(LiteralValue::Empty)
    }

    fn set_cell_value(&mut self, row: u32, col: u32, value: LiteralValue) {
        let cell = self.get_cell_mut((col, row));
        match value {
            LiteralValue::Int(i) => {
                cell.set_value_number(i as f64);
            }
            LiteralValue::Number(n) => {
                cell.set_value_number(n);
            }
            LiteralValue::Boolean(b) => {
                cell.set_value_bool(b);
            }
            LiteralValue::Text(s) => {
                cell.set_value_string(s);
            }
            LiteralValue::Date(d) => {
                cell.set_value_string(d.to_string());
            }
            LiteralValue::DateTime(dt) => {
                cell.set_value_string(dt.format("%Y-%m-%d %H:%M:%S").to_string());
            }
            LiteralValue::Empty => {
                cell.set_blank();
            }
        }
    }

    fn insert_rows_before(&mut self, row: u32, count: u32) {
        if count > 0 {
            self.insert_new_row(&row, &count);
        }
    }

    fn remove_rows(&mut self, row: u32, count: u32) {
        if count > 0 {
            self.remove_row(&row, &count);
        }
    }

    fn merged_ranges(&self) -> Vec<CellRange> {
        self.get_merge_cells()
            .iter()
            .filter_map(|range| CellRange::from_a1(&range.get_range()).ok())
            .collect()
    }

    fn merge_cells(&mut self, range: CellRange) {
        let exists = Grid::merged_ranges(self).contains(&range);
        if !exists {
            self.add_merge_cells(range.to_string());
        }
    }
}
