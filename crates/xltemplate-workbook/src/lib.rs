//! Spreadsheet collaborators for the xltemplate renderer: the [`Grid`] sheet
//! abstraction, loaded [`GridWorkbook`]s, file-format identification, and the
//! in-memory, JSON, and xlsx backends.

pub mod backends;
pub mod error;
pub mod loader;
pub mod traits;
pub mod workbook;
pub mod worksheet;

#[cfg(feature = "json")]
pub use backends::JsonAdapter;
#[cfg(feature = "umya")]
pub use backends::UmyaAdapter;
pub use error::{IoError, with_cell_context};
pub use loader::{FileFormat, open_workbook};
pub use traits::{Grid, GridWorkbook, SaveDestination};
pub use workbook::MemoryWorkbook;
pub use worksheet::MemorySheet;

// Re-export for convenience
pub use xltemplate_common::{CellRange, LiteralValue, MergeShape};
