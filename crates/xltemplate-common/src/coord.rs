//! A1-style coordinates and column-letter helpers.
//!
//! Rows and columns are 1-based everywhere in this crate: `A1` is
//! `CellRef { row: 1, col: 1 }` and column `AA` is 27.

use core::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::AddressError;

/// Largest column index a worksheet can address (`XFD`).
pub const MAX_COL: u32 = 16_384;
/// Largest row index a worksheet can address.
pub const MAX_ROW: u32 = 1_048_576;

/// Absolute cell position, 1-based.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Fallible constructor that rejects zero and out-of-sheet indices.
    pub fn try_new(row: u32, col: u32) -> Result<Self, AddressError> {
        if row == 0 || col == 0 {
            return Err(AddressError::ZeroIndex);
        }
        if row > MAX_ROW {
            return Err(AddressError::InvalidCell(format!("row {row}")));
        }
        if col > MAX_COL {
            return Err(AddressError::InvalidColumn(format!("{col}")));
        }
        Ok(Self { row, col })
    }

    /// Parse `B7`, `$B$7` or `b7`-style text. Anchors are accepted and ignored.
    pub fn from_a1(text: &str) -> Result<Self, AddressError> {
        let cleaned: String = text
            .trim()
            .chars()
            .filter(|c| *c != '$')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        let split = cleaned
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| AddressError::InvalidCell(text.to_string()))?;
        let (letters, digits) = cleaned.split_at(split);
        let col = letters_to_column(letters)
            .ok_or_else(|| AddressError::InvalidCell(text.to_string()))?;
        let row: u32 = digits
            .parse()
            .map_err(|_| AddressError::InvalidCell(text.to_string()))?;
        Self::try_new(row, col)
    }

    /// Column letters of this coordinate (`A`, `AB`, ...).
    pub fn column_letters(&self) -> String {
        column_to_letters(self.col)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_to_letters(self.col), self.row)
    }
}

impl FromStr for CellRef {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRef::from_a1(s)
    }
}

/// Rightmost-column limit for a template scan, e.g. `C`.
///
/// Only one or two uppercase letters are accepted; the bound is exclusive, so
/// `C` lets columns `A` and `B` through.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ColumnBound {
    letters: String,
    col: u32,
}

impl ColumnBound {
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        let valid = (1..=2).contains(&text.len()) && text.bytes().all(|b| b.is_ascii_uppercase());
        if !valid {
            return Err(AddressError::InvalidColumn(text.to_string()));
        }
        let col =
            letters_to_column(text).ok_or_else(|| AddressError::InvalidColumn(text.to_string()))?;
        Ok(Self {
            letters: text.to_string(),
            col,
        })
    }

    pub fn letters(&self) -> &str {
        &self.letters
    }

    /// 1-based index of the bounding column.
    pub fn column(&self) -> u32 {
        self.col
    }

    /// True when `col` lies at or beyond the bound.
    #[inline]
    pub fn stops_at(&self, col: u32) -> bool {
        col >= self.col
    }
}

impl fmt::Display for ColumnBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters)
    }
}

impl FromStr for ColumnBound {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnBound::parse(s)
    }
}

impl TryFrom<String> for ColumnBound {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ColumnBound::parse(&value)
    }
}

impl From<ColumnBound> for String {
    fn from(value: ColumnBound) -> Self {
        value.letters
    }
}

/// Convert a 1-based column index to letters (`1 -> A`, `27 -> AA`).
/// Index 0 yields an empty string.
pub fn column_to_letters(col: u32) -> String {
    let mut buf = Vec::new();
    let mut n = col;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        buf.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    buf.reverse();
    buf.into_iter().map(char::from).collect()
}

/// Convert uppercase column letters to a 1-based index (`A -> 1`).
pub fn letters_to_column(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for ch in s.bytes() {
        if !ch.is_ascii_uppercase() {
            return None;
        }
        col = col.checked_mul(26)?.checked_add((ch - b'A') as u32 + 1)?;
    }
    if col > MAX_COL { None } else { Some(col) }
}
