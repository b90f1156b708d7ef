use std::path::PathBuf;
use thiserror::Error;
use xltemplate_common::{AddressError, CellRef};

#[derive(Debug, Error)]
pub enum IoError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{backend} backend error: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },

    #[error("could not identify the spreadsheet format of `{}`", path.display())]
    UnknownFormat { path: PathBuf },

    #[error("{format} files require the `{feature}` feature")]
    FeatureDisabled {
        format: &'static str,
        feature: &'static str,
    },

    #[error("sheet index {index} out of range (workbook has {count} sheets)")]
    SheetIndex { index: usize, count: usize },

    #[error("invalid address: {0}")]
    Address(#[from] AddressError),

    #[error("{message} at {cell}")]
    Cell { cell: CellRef, message: String },

    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl IoError {
    pub fn from_backend<E: std::fmt::Display>(backend: &'static str, err: E) -> Self {
        IoError::Backend {
            backend,
            message: err.to_string(),
        }
    }
}

/// Attach a cell location to any displayable error.
pub fn with_cell_context<E: std::fmt::Display>(err: E, row: u32, col: u32) -> IoError {
    IoError::Cell {
        cell: CellRef::new(row, col),
        message: err.to_string(),
    }
}
