pub mod console;
pub mod renderers;
pub mod tui;

pub use console::ConsoleRenderer;
pub use renderers::{
    ListRenderer, PageView, RenderedLine, RenderedPage, Segment, Tone, renderer_for,
};

use fitchlist_core::encode_sort;
use fitchlist_types::{ColumnDef, Record, ViewState};

/// Columns for a resource configured without any: the scalar fields of the
/// first record.
pub fn inferred_columns(items: &[Record]) -> Vec<ColumnDef> {
    let Some(first) = items.first() else {
        return Vec::new();
    };
    first
        .fields
        .iter()
        .filter(|(_, value)| !value.is_object() && !value.is_array())
        .map(|(key, _)| ColumnDef::new(key.clone(), key.clone()))
        .collect()
}

/// `page 2/5 · 42 total`
pub fn page_summary(view: &ViewState) -> String {
    let pagination = view.pagination;
    format!(
        "page {}/{} · {} per page · {} total",
        pagination.current,
        pagination.page_count(),
        pagination.page_size,
        pagination.total
    )
}

/// Active search, sort and filters, one entry per slice.
pub fn query_summary(view: &ViewState) -> Vec<String> {
    let mut parts = Vec::new();
    if view.has_search() {
        parts.push(format!("search \"{}\"", view.search_term));
    }
    if view.has_sort() {
        parts.push(format!("sort {}", encode_sort(&view.sort)));
    }
    for (key, values) in view.filters.iter().filter(|(_, v)| !v.is_empty()) {
        parts.push(format!("{}={}", key, values.join(",")));
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitchlist_types::SortField;
    use serde_json::json;

    #[test]
    fn test_inferred_columns_skip_nested_values() {
        let items: Vec<Record> = Record::from_json(
            json!({"id": 4, "title": "Venue", "author": {"username": "u1"}, "tags": []}),
            "id",
        )
        .into_iter()
        .collect();
        let keys: Vec<String> = inferred_columns(&items).into_iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["id", "title"]);
        assert!(inferred_columns(&[]).is_empty());
    }

    #[test]
    fn test_summaries() {
        let mut view = ViewState::new().with_page_size(5);
        view.pagination.current = 2;
        view.pagination.total = 42;
        view.search_term = "lab".to_string();
        view.sort = vec![SortField::ascend("name"), SortField::descend("due_date")];
        view.filters
            .insert("year".to_string(), vec!["2024".to_string(), "2025".to_string()]);
        view.filters.insert("status".to_string(), Vec::new());

        insta::assert_snapshot!(page_summary(&view), @"page 2/9 · 5 per page · 42 total");
        assert_eq!(
            query_summary(&view),
            vec!["search \"lab\"", "sort name,-due_date", "year=2024,2025"]
        );
    }
}
