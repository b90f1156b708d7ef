use crate::error::IoError;
use crate::traits::GridWorkbook;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";

/// Spreadsheet file formats the loader can construct a backend for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Office Open XML workbook (`.xlsx`, `.xlsm`).
    Xlsx,
    /// JSON workbook document (see `backends::json`).
    Json,
}

impl FileFormat {
    /// Identify a file by its leading bytes, falling back to the extension.
    pub fn identify(path: &Path) -> Result<Self, IoError> {
        let mut head = [0u8; 64];
        let read = File::open(path)?.read(&mut head)?;
        if let Some(format) = Self::sniff(&head[..read]) {
            return Ok(format);
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| IoError::UnknownFormat {
                path: path.to_path_buf(),
            })
    }

    /// Classify raw leading bytes, if they are conclusive.
    pub fn sniff(head: &[u8]) -> Option<Self> {
        if head.starts_with(ZIP_MAGIC) {
            return Some(FileFormat::Xlsx);
        }
        let first = head
            .iter()
            .copied()
            .find(|b| !b.is_ascii_whitespace() && *b != 0xEF && *b != 0xBB && *b != 0xBF)?;
        (first == b'{').then_some(FileFormat::Json)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" | "xlsm" => Some(FileFormat::Xlsx),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Xlsx => "xlsx",
            FileFormat::Json => "json",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Xlsx => f.write_str("xlsx"),
            FileFormat::Json => f.write_str("json"),
        }
    }
}

/// Identify `path` and open it with the matching backend.
pub fn open_workbook(path: &Path) -> Result<Box<dyn GridWorkbook>, IoError> {
    let format = FileFormat::identify(path)?;
    #[cfg(feature = "tracing")]
    tracing::debug!(path = %path.display(), %format, "opening workbook");
    match format {
        FileFormat::Json => open_json(path),
        FileFormat::Xlsx => open_xlsx(path),
    }
}

#[cfg(feature = "json")]
fn open_json(path: &Path) -> Result<Box<dyn GridWorkbook>, IoError> {
    Ok(Box::new(crate::backends::JsonAdapter::open_path(path)?))
}

#[cfg(not(feature = "json"))]
fn open_json(_path: &Path) -> Result<Box<dyn GridWorkbook>, IoError> {
    Err(IoError::FeatureDisabled {
        format: "json",
        feature: "json",
    })
}

#[cfg(feature = "umya")]
fn open_xlsx(path: &Path) -> Result<Box<dyn GridWorkbook>, IoError> {
    Ok(Box::new(crate::backends::UmyaAdapter::open_path(path)?))
}

#[cfg(not(feature = "umya"))]
fn open_xlsx(_path: &Path) -> Result<Box<dyn GridWorkbook>, IoError> {
    Err(IoError::FeatureDisabled {
        format: "xlsx",
        feature: "umya",
    })
}
