use crate::error::IoError;
use crate::loader::FileFormat;
use std::io::Write;
use std::path::Path;
use xltemplate_common::{CellRange, LiteralValue};

/// A mutable sheet of cells addressed by 1-based (row, column).
///
/// This is the whole surface the template renderer needs from a spreadsheet
/// engine. Structural edits (`insert_rows_before`, `remove_rows`) shift the
/// cells and merge ranges below the edit, so callers must re-read
/// [`Grid::highest_row`] after every one of them.
pub trait Grid {
    /// Highest row holding a cell, or 0 for an empty sheet.
    fn highest_row(&self) -> u32;

    /// Highest column holding a cell, or 0 for an empty sheet.
    fn highest_column(&self) -> u32;

    /// Columns of `row` that hold a cell, ascending.
    fn existing_columns(&self, row: u32) -> Vec<u32>;

    /// Columns of `row` to visit, ascending: only existing cells, or every
    /// column up to the sheet's highest column.
    fn row_columns(&self, row: u32, only_existing: bool) -> Vec<u32> {
        if only_existing {
            self.existing_columns(row)
        } else {
            (1..=self.highest_column()).collect()
        }
    }

    /// Value of a cell; absent cells read as [`LiteralValue::Empty`].
    fn cell_value(&self, row: u32, col: u32) -> LiteralValue;

    fn set_cell_value(&mut self, row: u32, col: u32, value: LiteralValue);

    /// Insert `count` blank rows so that the first new row has index `row`.
    fn insert_rows_before(&mut self, row: u32, count: u32);

    /// Delete `count` rows starting at `row`, shifting later rows up.
    fn remove_rows(&mut self, row: u32, count: u32);

    fn merged_ranges(&self) -> Vec<CellRange>;

    /// The merge range covering a cell, if any.
    fn merge_range_at(&self, row: u32, col: u32) -> Option<CellRange> {
        self.merged_ranges()
            .into_iter()
            .find(|range| range.contains(row, col))
    }

    fn merge_cells(&mut self, range: CellRange);
}

/// Where [`GridWorkbook::save_to`] sends the serialized workbook.
pub enum SaveDestination<'a> {
    /// Overwrite the file the workbook was opened from.
    InPlace,
    Path(&'a Path),
    Writer(&'a mut dyn Write),
    /// Return the serialized bytes.
    Bytes,
}

/// A loaded workbook whose sheets can be rendered and written back out.
pub trait GridWorkbook {
    fn format(&self) -> FileFormat;

    fn sheet_names(&self) -> Vec<String>;

    fn sheet_count(&self) -> usize {
        self.sheet_names().len()
    }

    /// Mutable sheet by 0-based index.
    fn sheet_mut(&mut self, index: usize) -> Option<&mut dyn Grid>;

    fn save_to(&mut self, dest: SaveDestination<'_>) -> Result<Option<Vec<u8>>, IoError>;

    fn save(&mut self) -> Result<(), IoError> {
        self.save_to(SaveDestination::InPlace).map(|_| ())
    }

    fn save_to_path(&mut self, path: &Path) -> Result<(), IoError> {
        self.save_to(SaveDestination::Path(path)).map(|_| ())
    }

    fn save_to_bytes(&mut self) -> Result<Vec<u8>, IoError> {
        self.save_to(SaveDestination::Bytes)?
            .ok_or_else(|| IoError::Unsupported("backend returned no bytes".to_string()))
    }
}
