use serde::Deserialize;
use xltemplate_common::{AddressError, ColumnBound};

/// Options controlling which cells a render pass visits.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Visit only cells that exist in the grid instead of every column up to
    /// the sheet's highest column.
    pub ignore_empty_cells: bool,
    /// Exclusive rightmost column: scanning of a row stops at this column.
    pub right_bound_column: Option<ColumnBound>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ignore_empty_cells: true,
            right_bound_column: None,
        }
    }
}

impl RenderConfig {
    pub fn with_ignore_empty_cells(mut self, ignore: bool) -> Self {
        self.ignore_empty_cells = ignore;
        self
    }

    /// Set the right bound from column letters (`"C"`, `"AB"`).
    pub fn with_right_bound(mut self, letters: &str) -> Result<Self, AddressError> {
        self.right_bound_column = Some(ColumnBound::parse(letters)?);
        Ok(self)
    }

    /// True when scanning should stop before `col`.
    #[inline]
    pub fn stops_at(&self, col: u32) -> bool {
        self.right_bound_column
            .as_ref()
            .is_some_and(|bound| bound.stops_at(col))
    }
}
