use crate::coord::{CellRef, column_to_letters};
use crate::error::AddressError;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inclusive rectangular cell range, 1-based.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl CellRange {
    pub fn new(
        start_row: u32,
        start_col: u32,
        end_row: u32,
        end_col: u32,
    ) -> Result<Self, AddressError> {
        if start_row == 0 || start_col == 0 || end_row == 0 || end_col == 0 {
            return Err(AddressError::ZeroIndex);
        }
        if start_row > end_row || start_col > end_col {
            return Err(AddressError::RangeOrder);
        }
        Ok(Self {
            start_row,
            start_col,
            end_row,
            end_col,
        })
    }

    /// Parse `A1:C2`. A single cell (`B4`) yields a 1x1 range.
    pub fn from_a1(text: &str) -> Result<Self, AddressError> {
        let (start, end) = match text.split_once(':') {
            Some((a, b)) => (a, b),
            None => (text, text),
        };
        let start =
            CellRef::from_a1(start).map_err(|_| AddressError::InvalidRange(text.to_string()))?;
        let end =
            CellRef::from_a1(end).map_err(|_| AddressError::InvalidRange(text.to_string()))?;
        Self::new(start.row, start.col, end.row, end.col)
    }

    pub fn width(&self) -> u32 {
        self.end_col - self.start_col + 1
    }

    pub fn height(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }

    pub fn start(&self) -> CellRef {
        CellRef::new(self.start_row, self.start_col)
    }

    pub fn end(&self) -> CellRef {
        CellRef::new(self.end_row, self.end_col)
    }

    /// The row-agnostic shape of this range.
    pub fn shape(&self) -> MergeShape {
        MergeShape {
            start_col: self.start_col,
            end_col: self.end_col,
        }
    }

    /// Shift the range by `delta` rows. Rows never move above row 1.
    pub fn offset_rows(&self, delta: i64) -> Self {
        let shift = |r: u32| (r as i64 + delta).max(1) as u32;
        Self {
            start_row: shift(self.start_row),
            start_col: self.start_col,
            end_row: shift(self.end_row),
            end_col: self.end_col,
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start(), self.end())
    }
}

impl FromStr for CellRange {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRange::from_a1(s)
    }
}

/// A merge range with its row numbers abstracted out.
///
/// Only the column span survives; re-applying the shape on a row yields a
/// single-row range on that row. Every row number of the source range is
/// replaced by the target row, so a merge spanning several template rows
/// collapses onto the one target row.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MergeShape {
    pub start_col: u32,
    pub end_col: u32,
}

impl MergeShape {
    pub fn at_row(&self, row: u32) -> CellRange {
        CellRange {
            start_row: row,
            start_col: self.start_col,
            end_row: row,
            end_col: self.end_col,
        }
    }
}

impl fmt::Display for MergeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#:{}#",
            column_to_letters(self.start_col),
            column_to_letters(self.end_col)
        )
    }
}
