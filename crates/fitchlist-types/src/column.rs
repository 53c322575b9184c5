use serde::{Deserialize, Serialize};

/// Declarative column configuration for a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Field name, also used as the sort/filter parameter name
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub default_hidden: bool,
    /// Allowed filter values. Empty means free-form input.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter_options: Vec<String>,
}

impl ColumnDef {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
            filterable: false,
            default_hidden: false,
            filter_options: Vec::new(),
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn filter_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filterable = true;
        self.filter_options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.default_hidden = true;
        self
    }
}
