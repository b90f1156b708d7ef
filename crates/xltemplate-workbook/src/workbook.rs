use crate::worksheet::MemorySheet;

/// Ordered collection of named in-memory sheets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, MemorySheet)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet, or replace the sheet that already has this name.
    pub fn add_sheet(&mut self, name: impl Into<String>, sheet: MemorySheet) {
        let name = name.into();
        match self.sheets.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = sheet,
            None => self.sheets.push((name, sheet)),
        }
    }

    pub fn with_sheet(mut self, name: impl Into<String>, sheet: MemorySheet) -> Self {
        self.add_sheet(name, sheet);
        self
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn sheet(&self, index: usize) -> Option<&MemorySheet> {
        self.sheets.get(index).map(|(_, s)| s)
    }

    pub fn sheet_mut(&mut self, index: usize) -> Option<&mut MemorySheet> {
        self.sheets.get_mut(index).map(|(_, s)| s)
    }

    pub fn sheet_by_name(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MemorySheet)> {
        self.sheets.iter().map(|(n, s)| (n.as_str(), s))
    }
}
