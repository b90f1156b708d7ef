use crate::traits::Grid;
use std::collections::BTreeMap;
use xltemplate_common::{AddressError, CellRange, LiteralValue};

/// In-memory sheet backing the JSON backend and the test suites.
///
/// Cells are sparse: a position is "existing" once a value has been written
/// to it, even if that value is the empty string.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemorySheet {
    cells: BTreeMap<(u32, u32), LiteralValue>,
    merges: Vec<CellRange>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sheet from row-major values starting at `A1`.
    /// [`LiteralValue::Empty`] entries leave the position without a cell.
    pub fn from_rows<I, R, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<LiteralValue>,
    {
        let mut sheet = Self::new();
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                let value = value.into();
                if value != LiteralValue::Empty {
                    sheet.cells.insert((r as u32 + 1, c as u32 + 1), value);
                }
            }
        }
        sheet
    }

    /// Builder-style merge, parsing an A1 range such as `B2:C2`.
    pub fn with_merge(mut self, range: &str) -> Result<Self, AddressError> {
        self.merges.push(CellRange::from_a1(range)?);
        Ok(self)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&(u32, u32), &LiteralValue)> {
        self.cells.iter()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn contains_cell(&self, row: u32, col: u32) -> bool {
        self.cells.contains_key(&(row, col))
    }

    pub fn clear_cell(&mut self, row: u32, col: u32) {
        self.cells.remove(&(row, col));
    }

    /// Values of one row from column `A` through the sheet's highest column.
    pub fn row_values(&self, row: u32) -> Vec<LiteralValue> {
        (1..=self.highest_column())
            .map(|col| self.cell_value(row, col))
            .collect()
    }

    /// Every row rendered as display text, for compact assertions.
    pub fn to_text_rows(&self) -> Vec<Vec<String>> {
        (1..=self.highest_row())
            .map(|row| {
                self.row_values(row)
                    .iter()
                    .map(ToString::to_string)
                    .collect()
            })
            .collect()
    }
}

impl Grid for MemorySheet {
    fn highest_row(&self) -> u32 {
        self.cells.keys().map(|(r, _)| *r).max().unwrap_or(0)
    }

    fn highest_column(&self) -> u32 {
        self.cells.keys().map(|(_, c)| *c).max().unwrap_or(0)
    }

    fn existing_columns(&self, row: u32) -> Vec<u32> {
        self.cells
            .range((row, 0)..=(row, u32::MAX))
            .map(|((_, c), _)| *c)
            .collect()
    }

    fn cell_value(&self, row: u32, col: u32) -> LiteralValue {
        self.cells
            .get(&(row, col))
            .cloned()
            .unwrap_or(LiteralValue::Empty)
    }

    fn set_cell_value(&mut self, row: u32, col: u32, value: LiteralValue) {
        self.cells.insert((row, col), value);
    }

    fn insert_rows_before(&mut self, row: u32, count: u32) {
        if count == 0 {
            return;
        }
        let moved = self.cells.split_off(&(row, 0));
        for ((r, c), value) in moved {
            self.cells.insert((r + count, c), value);
        }
        for range in &mut self.merges {
            if range.start_row >= row {
                range.start_row += count;
                range.end_row += count;
            } else if range.end_row >= row {
                // The insertion point falls inside the merge; it grows.
                range.end_row += count;
            }
        }
    }

    fn remove_rows(&mut self, row: u32, count: u32) {
        if count == 0 || row == 0 {
            return;
        }
        let last = row + count - 1;
        let tail = self.cells.split_off(&(row, 0));
        for ((r, c), value) in tail {
            if r > last {
                self.cells.insert((r - count, c), value);
            }
        }

        let map_start = |r: u32| match r {
            r if r < row => r,
            r if r <= last => row,
            r => r - count,
        };
        let map_end = |r: u32| match r {
            r if r < row => r,
            r if r <= last => row - 1,
            r => r - count,
        };
        self.merges = self
            .merges
            .iter()
            .filter_map(|range| {
                let start_row = map_start(range.start_row);
                let end_row = map_end(range.end_row);
                if end_row < start_row || end_row == 0 {
                    return None;
                }
                let shifted = CellRange {
                    start_row,
                    end_row,
                    ..*range
                };
                (shifted.width() > 1 || shifted.height() > 1).then_some(shifted)
            })
            .collect();
    }

    fn merged_ranges(&self) -> Vec<CellRange> {
        self.merges.clone()
    }

    fn merge_cells(&mut self, range: CellRange) {
        if !self.merges.contains(&range) {
            self.merges.push(range);
        }
    }
}
