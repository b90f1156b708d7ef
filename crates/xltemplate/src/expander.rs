//! Materializes a `%LOOP KEY%` block: one output row per record.
//!
//! The row directly below the marker is the template row. Its existing cells
//! are captured once, `records - 1` blank rows are inserted beneath it, and
//! record `k` is written into physical row `template_row + k - 1`. Merge
//! ranges touching the template row are replayed, by column span only, on
//! every added row.

use crate::placeholder::{Placeholder, classify_value, is_row_number};
use crate::resolver::{FieldMap, Record, ValueResolver};
use xltemplate_common::{LiteralValue, MergeShape};
use xltemplate_workbook::Grid;

/// Outcome of expanding one loop marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expansion {
    /// The loop resolved; `rows` records were written starting at the
    /// template row. `rows` is 0 when there were no records or no template
    /// row to write them into; the grid is untouched in that case.
    Expanded { rows: u32, substitutions: usize },
    /// The loop key resolved to nothing and the grid was not touched.
    Skipped,
}

impl Expansion {
    /// Rows occupied by the block once the marker row is gone.
    ///
    /// An empty expansion occupies nothing, so the old template row is
    /// scanned as an ordinary row. A skipped loop keeps its template row as
    /// is.
    pub fn block_height(&self) -> u32 {
        match self {
            Expansion::Expanded { rows, .. } => *rows,
            Expansion::Skipped => 1,
        }
    }

    /// Rows added to the sheet by this expansion.
    pub fn rows_inserted(&self) -> u32 {
        match self {
            Expansion::Expanded { rows, .. } => rows.saturating_sub(1),
            Expansion::Skipped => 0,
        }
    }
}

pub struct RowExpander<'a, R: ValueResolver + ?Sized> {
    resolver: &'a R,
}

impl<'a, R: ValueResolver + ?Sized> RowExpander<'a, R> {
    pub fn new(resolver: &'a R) -> Self {
        Self { resolver }
    }

    /// Expand the loop `key` whose marker sits on `start_row`.
    ///
    /// The marker row itself is left for the caller to remove.
    pub fn expand(&self, grid: &mut dyn Grid, start_row: u32, key: &str) -> Expansion {
        let Some(data) = self.resolver.resolve_loop(key) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(key, start_row, "loop not found; block left unexpanded");
            return Expansion::Skipped;
        };

        let template_row = start_row + 1;
        if template_row > grid.highest_row() {
            #[cfg(feature = "tracing")]
            tracing::debug!(key, start_row, "loop marker on the last row; nothing to expand");
            return Expansion::Expanded {
                rows: 0,
                substitutions: 0,
            };
        }
        let template: Vec<(u32, LiteralValue)> = grid
            .existing_columns(template_row)
            .into_iter()
            .map(|col| (col, grid.cell_value(template_row, col)))
            .collect();

        let rows = u32::try_from(data.len()).unwrap_or(u32::MAX);
        if rows > 1 {
            grid.insert_rows_before(template_row + 1, rows - 1);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            key,
            template_row,
            records = rows,
            cells = template.len(),
            "expanding loop"
        );

        let map = data.field_map();
        let merges = grid.merged_ranges();
        let mut shapes: Vec<MergeShape> = Vec::new();
        let mut substitutions = 0;
        for (ordinal, record) in (1..=rows).zip(data.records()) {
            let row = template_row + ordinal - 1;
            if ordinal == 1 {
                for (col, _) in &template {
                    let covering = merges.iter().find(|range| range.contains(row, *col));
                    let Some(shape) = covering.map(|range| range.shape()) else {
                        continue;
                    };
                    // Vertical-only merges would collapse to a single cell.
                    if shape.end_col > shape.start_col && !shapes.contains(&shape) {
                        shapes.push(shape);
                    }
                }
            }

            for (col, raw) in &template {
                let Some((value, substituted)) = cell_output(raw, record, map, ordinal) else {
                    continue;
                };
                grid.set_cell_value(row, *col, value);
                substitutions += usize::from(substituted);
            }

            if ordinal > 1 {
                for shape in &shapes {
                    grid.merge_cells(shape.at_row(row));
                }
            }
        }

        Expansion::Expanded {
            rows,
            substitutions,
        }
    }
}

/// Value to write for one captured template cell, and whether it came from a
/// placeholder. `None` leaves the cell alone.
fn cell_output(
    raw: &LiteralValue,
    record: &dyn Record,
    map: &FieldMap,
    ordinal: u32,
) -> Option<(LiteralValue, bool)> {
    match classify_value(raw) {
        Placeholder::ScalarRef(key) if is_row_number(&key) => {
            Some((LiteralValue::Int(i64::from(ordinal)), true))
        }
        Placeholder::ScalarRef(key) => {
            // Unmapped keys and null fields clear to "" on every record row.
            let value = map
                .source_for(&key)
                .and_then(|source| record.field(source))
                .filter(|value| !matches!(value, LiteralValue::Empty))
                .unwrap_or_else(LiteralValue::empty_text);
            Some((value, true))
        }
        // A nested loop marker is not expanded; it is copied like text.
        Placeholder::LoopStart(_) => Some((raw.clone(), false)),
        Placeholder::Literal(value) if value.is_blank() => None,
        Placeholder::Literal(value) => Some((value, false)),
    }
}
