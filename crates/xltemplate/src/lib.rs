//! Spreadsheet templating: scalar placeholders and row loops.
//!
//! A template sheet holds cells such as `%TITLE%`, which are replaced by
//! scalar values, and `%LOOP ITEMS%` markers, whose following row is repeated
//! once per record of the `ITEMS` dataset. The engine works on any
//! [`xltemplate_workbook::Grid`]; [`Templator`] adds file loading, saving, and
//! download packaging on top.
//!
//! ```
//! use xltemplate::{FieldMap, LoopDataset, MapRecord, RenderConfig, Settings, render_sheet};
//! use xltemplate_workbook::MemorySheet;
//!
//! let settings = Settings::new().with_value("TITLE", "Invoice").with_loop(
//!     "ITEMS",
//!     LoopDataset::new(FieldMap::new().with("name", "ITEM_NAME"))
//!         .with_record(MapRecord::new().with("name", "Pen"))
//!         .with_record(MapRecord::new().with("name", "Book")),
//! );
//! let mut sheet = MemorySheet::from_rows(vec![
//!     vec!["%TITLE%"],
//!     vec!["%LOOP ITEMS%"],
//!     vec!["%ITEM_NAME%"],
//! ]);
//! render_sheet(&mut sheet, &settings, &RenderConfig::default());
//! assert_eq!(sheet.to_text_rows(), vec![vec!["Invoice"], vec!["Pen"], vec!["Book"]]);
//! ```

pub mod config;
pub mod error;
pub mod expander;
pub mod placeholder;
pub mod renderer;
pub mod resolver;
pub mod settings;
pub mod templator;

pub use config::RenderConfig;
pub use error::TemplatorError;
pub use expander::{Expansion, RowExpander};
pub use placeholder::{Placeholder, ROW_NUMBER, classify, classify_value};
pub use renderer::{RenderReport, SheetRenderer, render_sheet};
pub use resolver::{AttributeRecord, FieldMap, LoopDataset, MapRecord, Record, ValueResolver};
pub use settings::Settings;
pub use templator::{CONTENT_TYPE, Download, Templator};

pub use xltemplate_common::{ColumnBound, LiteralValue};
