//! Errors raised while parsing or constructing cell addresses.

use std::{error::Error, fmt};

/// Errors that can occur while building coordinates, ranges, and column bounds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AddressError {
    /// Encountered a 0 where a 1-based row or column index was required.
    ZeroIndex,
    /// Start/end coordinates were not ordered (start <= end).
    RangeOrder,
    /// Column letters were empty, lowercase, or overflowed.
    InvalidColumn(String),
    /// Text did not parse as an A1-style cell reference.
    InvalidCell(String),
    /// Text did not parse as an A1-style range (`A1:B2`).
    InvalidRange(String),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::ZeroIndex => {
                write!(f, "row and column indices must be 1-based (>= 1)")
            }
            AddressError::RangeOrder => {
                write!(
                    f,
                    "range must be ordered so the start is above/left of the end"
                )
            }
            AddressError::InvalidColumn(text) => write!(f, "invalid column letters `{text}`"),
            AddressError::InvalidCell(text) => write!(f, "invalid cell reference `{text}`"),
            AddressError::InvalidRange(text) => write!(f, "invalid range reference `{text}`"),
        }
    }
}

impl Error for AddressError {}
