use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A scalar cell value as seen by the templating engine.
///
/// Templates only ever inspect the `Text` variant for placeholder syntax;
/// every other variant is passed through as literal content.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LiteralValue {
    Int(i64),
    Number(f64),
    Text(String),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    #[default]
    Empty,
}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(i) => write!(f, "{i}"),
            LiteralValue::Number(n) => write!(f, "{n}"),
            LiteralValue::Text(s) => write!(f, "{s}"),
            LiteralValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            LiteralValue::Date(d) => write!(f, "{d}"),
            LiteralValue::DateTime(dt) => write!(f, "{dt}"),
            LiteralValue::Empty => Ok(()),
        }
    }
}

impl LiteralValue {
    /// The empty string, which is what a cleared placeholder cell holds.
    pub fn empty_text() -> Self {
        LiteralValue::Text(String::new())
    }

    /// Borrow the text payload, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            LiteralValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// True for `Empty` and for the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            LiteralValue::Empty => true,
            LiteralValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::Int(value)
    }
}

impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        LiteralValue::Int(value as i64)
    }
}

impl From<u32> for LiteralValue {
    fn from(value: u32) -> Self {
        LiteralValue::Int(value as i64)
    }
}

impl From<usize> for LiteralValue {
    fn from(value: usize) -> Self {
        LiteralValue::Int(value as i64)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Number(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Boolean(value)
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::Text(value)
    }
}

impl<'a> From<&'a str> for LiteralValue {
    fn from(value: &'a str) -> Self {
        LiteralValue::Text(value.to_string())
    }
}

impl From<NaiveDate> for LiteralValue {
    fn from(value: NaiveDate) -> Self {
        LiteralValue::Date(value)
    }
}

impl From<NaiveDateTime> for LiteralValue {
    fn from(value: NaiveDateTime) -> Self {
        LiteralValue::DateTime(value)
    }
}

impl<T: Into<LiteralValue>> From<Option<T>> for LiteralValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(LiteralValue::Empty)
    }
}
