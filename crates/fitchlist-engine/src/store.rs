use fitchlist_types::{Filters, Pagination, SortField, SortOrder, ViewState};

/// The part of the view state a fetch depends on.
///
/// Two equal keys produce the same request, so a change of key is what
/// triggers a re-fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchKey {
    pub search_term: String,
    pub sort: Vec<SortField>,
    pub filters: Filters,
    pub page: u64,
    pub page_size: u64,
}

/// What a "clear" affordance should do given the active slices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearAction {
    Search,
    Sort,
    Filters,
    /// Offered when more than one slice is active at once
    All,
}

impl ClearAction {
    pub fn label(&self) -> &'static str {
        match self {
            ClearAction::Search => "clear search",
            ClearAction::Sort => "clear sort",
            ClearAction::Filters => "clear filters",
            ClearAction::All => "clear all",
        }
    }
}

/// Single source of truth for a list's search, sort, filter and pagination state
#[derive(Debug, Clone, Default)]
pub struct ViewStateStore {
    state: ViewState,
    version: u64,
}

impl ViewStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: ViewState) -> Self {
        Self { state, version: 0 }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn search_term(&self) -> &str {
        &self.state.search_term
    }

    pub fn sort(&self) -> &[SortField] {
        &self.state.sort
    }

    pub fn filters(&self) -> &Filters {
        &self.state.filters
    }

    pub fn pagination(&self) -> Pagination {
        self.state.pagination
    }

    /// Bumped every time the fetch key changes.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn fetch_key(&self) -> FetchKey {
        FetchKey {
            search_term: self.state.search_term.clone(),
            sort: self.state.sort.clone(),
            filters: self.state.filters.clone(),
            page: self.state.pagination.current,
            page_size: self.state.pagination.page_size,
        }
    }

    // All setters return whether the fetch key changed.

    pub fn set_search_term(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        self.mutate(|state| {
            state.search_term = term;
            state.pagination.current = 1;
        })
    }

    pub fn set_sort(&mut self, sort: Vec<SortField>) -> bool {
        self.mutate(|state| {
            state.sort = sort;
            state.pagination.current = 1;
        })
    }

    /// Cycle a column through ascend -> descend -> unsorted.
    ///
    /// Without `additive` the column replaces the whole sort; with it the
    /// column is cycled in place (or appended) and other keys are kept.
    pub fn toggle_sort(&mut self, field: &str, additive: bool) -> bool {
        let current = self
            .state
            .sort
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.order);

        let next = match current {
            None => Some(SortOrder::Ascend),
            Some(SortOrder::Ascend) => Some(SortOrder::Descend),
            Some(SortOrder::Descend) => None,
        };

        let mut sort = if additive {
            self.state.sort.clone()
        } else {
            Vec::new()
        };

        match (additive, next) {
            (true, Some(order)) => match sort.iter_mut().find(|entry| entry.field == field) {
                Some(entry) => entry.order = order,
                None => sort.push(SortField {
                    field: field.to_string(),
                    order,
                }),
            },
            (true, None) => sort.retain(|entry| entry.field != field),
            (false, Some(order)) => sort.push(SortField {
                field: field.to_string(),
                order,
            }),
            (false, None) => {}
        }

        self.set_sort(sort)
    }

    pub fn set_filters(&mut self, filters: Filters) -> bool {
        let filters: Filters = filters
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .collect();
        self.mutate(|state| {
            state.filters = filters;
            state.pagination.current = 1;
        })
    }

    /// Replace one filter group. An empty value list removes the key.
    pub fn set_filter(&mut self, key: &str, values: Vec<String>) -> bool {
        self.mutate(|state| {
            if values.is_empty() {
                state.filters.remove(key);
            } else {
                state.filters.insert(key.to_string(), values);
            }
            state.pagination.current = 1;
        })
    }

    /// Change page and page size. Never resets itself.
    pub fn set_pagination(&mut self, current: u64, page_size: u64) -> bool {
        self.mutate(|state| {
            state.pagination.current = current.max(1);
            state.pagination.page_size = page_size.max(1);
        })
    }

    pub fn set_page(&mut self, current: u64) -> bool {
        let page_size = self.state.pagination.page_size;
        self.set_pagination(current, page_size)
    }

    pub fn set_page_size(&mut self, page_size: u64) -> bool {
        let current = self.state.pagination.current;
        self.set_pagination(current, page_size)
    }

    pub fn next_page(&mut self) -> bool {
        if !self.state.pagination.has_next() {
            return false;
        }
        self.set_page(self.state.pagination.current + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.state.pagination.has_previous() {
            return false;
        }
        self.set_page(self.state.pagination.current - 1)
    }

    pub fn clear_search(&mut self) -> bool {
        self.set_search_term(String::new())
    }

    pub fn clear_sort(&mut self) -> bool {
        self.set_sort(Vec::new())
    }

    pub fn clear_filters(&mut self) -> bool {
        self.set_filters(Filters::new())
    }

    /// Reset search, sort and filters in one step. Safe on an already-clear state.
    pub fn clear_all(&mut self) -> bool {
        self.mutate(|state| {
            state.search_term.clear();
            state.sort.clear();
            state.filters.clear();
            state.pagination.current = 1;
        })
    }

    /// The clear action the presentation should offer, if any slice is active.
    pub fn clear_affordance(&self) -> Option<ClearAction> {
        let slices = [
            (self.state.has_search(), ClearAction::Search),
            (self.state.has_sort(), ClearAction::Sort),
            (self.state.has_filters(), ClearAction::Filters),
        ];
        let mut active = slices.iter().filter(|(on, _)| *on).map(|(_, action)| *action);

        match (active.next(), active.next()) {
            (None, _) => None,
            (Some(single), None) => Some(single),
            (Some(_), Some(_)) => Some(ClearAction::All),
        }
    }

    pub fn clear(&mut self, action: ClearAction) -> bool {
        match action {
            ClearAction::Search => self.clear_search(),
            ClearAction::Sort => self.clear_sort(),
            ClearAction::Filters => self.clear_filters(),
            ClearAction::All => self.clear_all(),
        }
    }

    /// Record the total reported by the last applied fetch.
    pub fn apply_total(&mut self, total: u64) {
        self.state.pagination.total = total;
    }

    fn mutate(&mut self, f: impl FnOnce(&mut ViewState)) -> bool {
        let before = self.fetch_key();
        f(&mut self.state);
        let changed = self.fetch_key() != before;
        if changed {
            self.version += 1;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page(page: u64) -> ViewStateStore {
        let mut store = ViewStateStore::new();
        store.apply_total(1000);
        store.set_page(page);
        store
    }

    #[test]
    fn test_search_sort_filter_reset_to_first_page() {
        let mut store = on_page(5);
        store.set_search_term("lab");
        assert_eq!(store.pagination().current, 1);

        store.set_page(4);
        store.set_sort(vec![SortField::ascend("name")]);
        assert_eq!(store.pagination().current, 1);

        store.set_page(3);
        store.set_filter("pinned", vec!["true".to_string()]);
        assert_eq!(store.pagination().current, 1);

        store.set_page(6);
        store.set_filters(Filters::new());
        assert_eq!(store.pagination().current, 1);
    }

    #[test]
    fn test_same_search_term_still_resets_page() {
        let mut store = on_page(1);
        store.set_search_term("lab");
        store.set_page(3);

        assert!(store.set_search_term("lab"));
        assert_eq!(store.pagination().current, 1);
    }

    #[test]
    fn test_pagination_does_not_reset_itself() {
        let mut store = on_page(4);
        assert!(store.set_page_size(50));
        assert_eq!(store.pagination().current, 4);
        assert_eq!(store.pagination().page_size, 50);
    }

    #[test]
    fn test_pagination_clamps_to_one() {
        let mut store = ViewStateStore::new();
        store.set_pagination(0, 0);
        assert_eq!(store.pagination().current, 1);
        assert_eq!(store.pagination().page_size, 1);
    }

    #[test]
    fn test_next_and_previous_respect_bounds() {
        let mut store = ViewStateStore::new();
        store.apply_total(45);
        assert!(!store.previous_page());
        assert!(store.next_page());
        assert!(store.next_page());
        assert!(!store.next_page());
        assert_eq!(store.pagination().current, 3);
    }

    #[test]
    fn test_unchanged_state_reports_no_change() {
        let mut store = ViewStateStore::new();
        let version = store.version();
        assert!(!store.clear_all());
        assert!(!store.set_page(1));
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_toggle_sort_cycles_single_column() {
        let mut store = ViewStateStore::new();
        store.toggle_sort("name", false);
        assert_eq!(store.sort(), &[SortField::ascend("name")]);
        store.toggle_sort("name", false);
        assert_eq!(store.sort(), &[SortField::descend("name")]);
        store.toggle_sort("name", false);
        assert!(store.sort().is_empty());

        store.toggle_sort("name", false);
        store.toggle_sort("due_date", false);
        assert_eq!(store.sort(), &[SortField::ascend("due_date")]);
    }

    #[test]
    fn test_toggle_sort_additive_keeps_other_keys() {
        let mut store = ViewStateStore::new();
        store.toggle_sort("name", true);
        store.toggle_sort("due_date", true);
        store.toggle_sort("due_date", true);
        assert_eq!(
            store.sort(),
            &[SortField::ascend("name"), SortField::descend("due_date")]
        );

        store.toggle_sort("name", true);
        store.toggle_sort("name", true);
        assert_eq!(store.sort(), &[SortField::descend("due_date")]);
    }

    #[test]
    fn test_clear_all_is_idempotent() {
        let mut store = ViewStateStore::new();
        store.set_search_term("x");
        store.set_sort(vec![SortField::descend("created_at")]);
        store.set_filter("year", vec!["2025".to_string()]);

        for _ in 0..2 {
            store.clear(ClearAction::All);
            assert_eq!(store.search_term(), "");
            assert!(store.sort().is_empty());
            assert!(store.filters().is_empty());
        }
    }

    #[test]
    fn test_clear_affordance_consolidates() {
        let mut store = ViewStateStore::new();
        assert_eq!(store.clear_affordance(), None);

        store.set_search_term("x");
        assert_eq!(store.clear_affordance(), Some(ClearAction::Search));

        store.set_filter("year", vec!["2025".to_string()]);
        assert_eq!(store.clear_affordance(), Some(ClearAction::All));

        store.clear_search();
        assert_eq!(store.clear_affordance(), Some(ClearAction::Filters));
    }

    #[test]
    fn test_empty_filter_values_remove_key() {
        let mut store = ViewStateStore::new();
        store.set_filter("year", vec!["2025".to_string()]);
        store.set_filter("year", vec![]);
        assert!(store.filters().is_empty());
    }

    #[test]
    fn test_apply_total_is_not_a_fetch_change() {
        let mut store = ViewStateStore::new();
        let version = store.version();
        store.apply_total(99);
        assert_eq!(store.pagination().total, 99);
        assert_eq!(store.version(), version);
    }
}
