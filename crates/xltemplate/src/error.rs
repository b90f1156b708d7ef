use std::path::PathBuf;
use thiserror::Error;
use xltemplate_common::AddressError;
use xltemplate_workbook::IoError;

/// Errors produced by the xltemplate facade and settings loaders.
///
/// Rendering itself never fails on data: unknown keys and loops degrade to
/// empty output. Everything here is a precondition, configuration, or I/O
/// problem surfaced before or after the render pass.
#[derive(Debug, Error)]
pub enum TemplatorError {
    #[error("template file `{}` is not readable", path.display())]
    TemplateNotReadable { path: PathBuf },

    #[error("output directory `{}` is not writable", path.display())]
    OutputDirNotWritable { path: PathBuf },

    #[error("output file name is not specified")]
    MissingOutputFileName,

    #[error("template settings are not set")]
    MissingSettings,

    #[error("sheet {index} does not exist (template has {count} sheets)")]
    SheetOutOfRange { index: usize, count: usize },

    #[error("error loading file `{name}`: {source}")]
    Load {
        name: String,
        #[source]
        source: IoError,
    },

    #[error("invalid right-bound column: {0}")]
    RightBound(#[from] AddressError),

    #[error("settings file `{}` must end in .json, .yaml or .yml", path.display())]
    SettingsFormat { path: PathBuf },

    #[error("failed to read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] IoError),
}
