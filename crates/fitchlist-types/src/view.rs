use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Default number of rows per page, matching the platform API default.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Column filters: column key -> selected values.
///
/// Ordered so that encoded queries are deterministic; the order carries no meaning.
pub type Filters = BTreeMap<String, Vec<String>>;

/// Sort direction for a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascend,
    Descend,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Ascend => SortOrder::Descend,
            SortOrder::Descend => SortOrder::Ascend,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascend => write!(f, "ascend"),
            SortOrder::Descend => write!(f, "descend"),
        }
    }
}

/// One entry of a multi-key sort
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    pub order: SortOrder,
}

impl SortField {
    pub fn ascend(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Ascend,
        }
    }

    pub fn descend(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Descend,
        }
    }
}

/// Pagination slice of the view state.
///
/// `current` is 1-based. `total` is only authoritative right after a
/// successful fetch; `current * page_size` is not required to match it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current: u64,
    pub page_size: u64,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }
}

impl Pagination {
    /// Number of pages implied by the last known total (at least 1).
    pub fn page_count(&self) -> u64 {
        if self.page_size == 0 {
            return 1;
        }
        self.total.div_ceil(self.page_size).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.current < self.page_count()
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }
}

/// Combined search/sort/filter/pagination configuration driving a list's remote fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub search_term: String,
    pub sort: Vec<SortField>,
    pub filters: Filters,
    pub pagination: Pagination,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.pagination.page_size = page_size;
        self
    }

    pub fn has_search(&self) -> bool {
        !self.search_term.is_empty()
    }

    pub fn has_sort(&self) -> bool {
        !self.sort.is_empty()
    }

    pub fn has_filters(&self) -> bool {
        self.filters.values().any(|values| !values.is_empty())
    }

    /// Snapshot of the slices worth remembering between sessions.
    pub fn to_persisted(&self) -> PersistedViewState {
        PersistedViewState {
            search_term: self.search_term.clone(),
            sort: self.sort.clone(),
            filters: self.filters.clone(),
            page_size: Some(self.pagination.page_size),
        }
    }

    /// Overlay a persisted snapshot. The page always restarts at 1.
    pub fn hydrate(&mut self, persisted: PersistedViewState) {
        self.search_term = persisted.search_term;
        self.sort = persisted.sort;
        self.filters = persisted
            .filters
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .collect();
        if let Some(page_size) = persisted.page_size.filter(|size| *size > 0) {
            self.pagination.page_size = page_size;
        }
        self.pagination.current = 1;
    }
}

/// Stored form of a list's last-used selections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedViewState {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub sort: Vec<SortField>,
    #[serde(default)]
    pub filters: Filters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
}
