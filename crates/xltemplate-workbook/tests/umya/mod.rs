// Integration tests for the umya backend; run with `--features umya`.
mod common {
    pub use xltemplate_testkit::{build_workbook, fill_rows, read_merges, read_text_grid};
}

mod grid;
mod save;
