use fitchlist_types::ColumnDef;
use std::collections::HashSet;

/// Column configuration plus the user's hidden-column choices.
///
/// Visibility is presentation-only and never reaches the fetcher.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    columns: Vec<ColumnDef>,
    hidden: HashSet<String>,
}

impl ColumnSet {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        let hidden = columns
            .iter()
            .filter(|column| column.default_hidden)
            .map(|column| column.key.clone())
            .collect();
        Self { columns, hidden }
    }

    pub fn all(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn get(&self, key: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.key == key)
    }

    pub fn visible(&self) -> Vec<&ColumnDef> {
        self.columns
            .iter()
            .filter(|column| !self.hidden.contains(&column.key))
            .collect()
    }

    pub fn is_hidden(&self, key: &str) -> bool {
        self.hidden.contains(key)
    }

    /// Toggle a column. Unknown keys and hiding the last visible column are
    /// refused; returns the resulting hidden state when the toggle applied.
    pub fn toggle(&mut self, key: &str) -> Option<bool> {
        self.get(key)?;

        if self.hidden.remove(key) {
            return Some(false);
        }
        if self.visible().len() <= 1 {
            return None;
        }
        self.hidden.insert(key.to_string());
        Some(true)
    }

    pub fn show_all(&mut self) {
        self.hidden.clear();
    }

    pub fn sortable(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|column| column.sortable)
    }

    pub fn filterable(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|column| column.filterable)
    }
}
