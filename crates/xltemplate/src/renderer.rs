use crate::config::RenderConfig;
use crate::expander::{Expansion, RowExpander};
use crate::placeholder::{Placeholder, classify_value};
use crate::resolver::ValueResolver;
use std::collections::BTreeSet;
use std::fmt;
use xltemplate_common::LiteralValue;
use xltemplate_workbook::Grid;

/// Counters collected during one render pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Placeholder cells rewritten, in ordinary rows and loop rows alike.
    pub substitutions: usize,
    pub loops_expanded: usize,
    pub loops_skipped: usize,
    /// Rows actually added to the sheet; a marker on the last row adds none.
    pub rows_inserted: u32,
    pub rows_removed: u32,
    /// Scalar keys the resolver did not know, rendered as "".
    pub missing_scalars: BTreeSet<String>,
    /// Loop keys the resolver did not know, in encounter order.
    pub missing_loops: Vec<String>,
}

impl RenderReport {
    pub fn merge(&mut self, other: RenderReport) {
        self.substitutions += other.substitutions;
        self.loops_expanded += other.loops_expanded;
        self.loops_skipped += other.loops_skipped;
        self.rows_inserted += other.rows_inserted;
        self.rows_removed += other.rows_removed;
        self.missing_scalars.extend(other.missing_scalars);
        self.missing_loops.extend(other.missing_loops);
    }

    fn record_expansion(&mut self, key: String, expansion: Expansion) {
        match expansion {
            Expansion::Expanded {
                rows,
                substitutions,
            } => {
                self.loops_expanded += 1;
                self.rows_inserted += expansion.rows_inserted();
                self.substitutions += substitutions;
            }
            Expansion::Skipped => {
                self.loops_skipped += 1;
                self.missing_loops.push(key);
            }
        }
    }
}

impl fmt::Display for RenderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} substitutions, {} loops expanded, {} skipped, +{}/-{} rows",
            self.substitutions,
            self.loops_expanded,
            self.loops_skipped,
            self.rows_inserted,
            self.rows_removed
        )
    }
}

/// Single top-to-bottom pass over a sheet.
///
/// Scalar placeholders are replaced in place. A loop marker hands off to
/// [`RowExpander`], the marker row is deleted, and scanning resumes on the
/// first row after the expanded block. The row bound is re-read every
/// iteration because expansion changes it.
pub struct SheetRenderer<'a, R: ValueResolver + ?Sized> {
    resolver: &'a R,
    config: &'a RenderConfig,
}

impl<'a, R: ValueResolver + ?Sized> SheetRenderer<'a, R> {
    pub fn new(resolver: &'a R, config: &'a RenderConfig) -> Self {
        Self { resolver, config }
    }

    pub fn render(&self, grid: &mut dyn Grid) -> RenderReport {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("render_sheet", rows = grid.highest_row()).entered();

        let mut report = RenderReport::default();
        let mut row = 1;
        while row <= grid.highest_row() {
            row = self.render_row(grid, row, &mut report);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            substitutions = report.substitutions,
            loops = report.loops_expanded,
            skipped = report.loops_skipped,
            "sheet rendered"
        );
        report
    }

    /// Render one row and return the next row to visit.
    fn render_row(&self, grid: &mut dyn Grid, row: u32, report: &mut RenderReport) -> u32 {
        for col in grid.row_columns(row, self.config.ignore_empty_cells) {
            if self.config.stops_at(col) {
                break;
            }
            match classify_value(&grid.cell_value(row, col)) {
                Placeholder::LoopStart(key) => {
                    grid.set_cell_value(row, col, LiteralValue::empty_text());
                    let expansion = RowExpander::new(self.resolver).expand(grid, row, &key);
                    grid.remove_rows(row, 1);
                    report.rows_removed += 1;
                    report.record_expansion(key, expansion);
                    // Everything from `row` on is now the block itself. An empty
                    // block leaves the old template row to the ordinary scan.
                    return row + expansion.block_height();
                }
                Placeholder::ScalarRef(key) => {
                    let value = match self.resolver.resolve_scalar(&key) {
                        Some(value) => value,
                        None => {
                            report.missing_scalars.insert(key);
                            LiteralValue::empty_text()
                        }
                    };
                    grid.set_cell_value(row, col, value);
                    report.substitutions += 1;
                }
                Placeholder::Literal(_) => {}
            }
        }
        row + 1
    }
}

/// Render `grid` in place with a one-off [`SheetRenderer`].
pub fn render_sheet<R: ValueResolver + ?Sized>(
    grid: &mut dyn Grid,
    resolver: &R,
    config: &RenderConfig,
) -> RenderReport {
    SheetRenderer::new(resolver, config).render(grid)
}
