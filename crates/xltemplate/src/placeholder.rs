//! Recognition of placeholder text inside template cells.
//!
//! A cell whose whole text is `%KEY%` is a scalar reference, `%LOOP KEY%`
//! marks the start of a repeated block, and anything else is literal content.
//! Matching is case-sensitive and anchored at both ends, so `x%KEY%` and
//! `%loop KEY%` stay literal.

use once_cell::sync::Lazy;
use regex::Regex;
use xltemplate_common::LiteralValue;

/// Reserved scalar key that expands to the 1-based record ordinal inside a loop.
pub const ROW_NUMBER: &str = "ROW_NUMBER";

static LOOP_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%LOOP ([A-Za-z0-9_]+)%$").expect("loop marker regex must compile"));

static SCALAR_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%([A-Za-z0-9_]+)%$").expect("placeholder regex must compile"));

/// Parsed form of a cell's raw content.
#[derive(Debug, Clone, PartialEq)]
pub enum Placeholder {
    Literal(LiteralValue),
    ScalarRef(String),
    LoopStart(String),
}

impl Placeholder {
    pub fn key(&self) -> Option<&str> {
        match self {
            Placeholder::ScalarRef(key) | Placeholder::LoopStart(key) => Some(key),
            Placeholder::Literal(_) => None,
        }
    }

    pub fn is_loop_start(&self) -> bool {
        matches!(self, Placeholder::LoopStart(_))
    }
}

/// Classify a piece of cell text. Loop markers win over scalar references.
pub fn classify(text: &str) -> Placeholder {
    if let Some(caps) = LOOP_START.captures(text) {
        return Placeholder::LoopStart(caps[1].to_string());
    }
    if let Some(caps) = SCALAR_REF.captures(text) {
        return Placeholder::ScalarRef(caps[1].to_string());
    }
    Placeholder::Literal(LiteralValue::Text(text.to_string()))
}

/// Classify a cell value; only text can carry placeholder syntax.
pub fn classify_value(value: &LiteralValue) -> Placeholder {
    match value {
        LiteralValue::Text(text) => classify(text),
        other => Placeholder::Literal(other.clone()),
    }
}

/// The key of a `%LOOP KEY%` marker.
pub fn loop_key(text: &str) -> Option<&str> {
    LOOP_START
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// The key of a `%KEY%` placeholder. Loop markers do not count.
pub fn scalar_key(text: &str) -> Option<&str> {
    if LOOP_START.is_match(text) {
        return None;
    }
    SCALAR_REF
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn is_row_number(key: &str) -> bool {
    key == ROW_NUMBER
}
