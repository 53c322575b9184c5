//! Selection, column visibility, persistence and actions as seen from
//! outside the controller.

use fitchlist_core::{KeyValueStore, SqliteStore};
use fitchlist_engine::{
    ActionContext, ActionDef, BoxError, ClearAction, Error, ListController, ListOptions,
    LoadOutcome,
};
use fitchlist_testing::{ScriptedFetcher, fixtures};
use fitchlist_types::{ColumnDef, Filters, Record, RowKey, SortField};
use std::sync::Arc;

fn module_records(count: usize) -> Vec<Record> {
    fixtures::modules(count)
        .into_iter()
        .filter_map(|value| Record::from_json(value, "id").ok())
        .collect()
}

fn module_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("code", "Code").sortable(),
        ColumnDef::new("year", "Year").sortable().filter_options(["2024", "2025"]),
        ColumnDef::new("description", "Description"),
        ColumnDef::new("credits", "Credits").hidden(),
    ]
}

fn controller(fetcher: &Arc<ScriptedFetcher<Record>>) -> ListController<Record> {
    ListController::with_fetcher(
        fetcher.clone(),
        ListOptions::new().columns(module_columns()).page_size(5),
    )
}

#[tokio::test]
async fn test_column_toggle_does_not_fetch() -> anyhow::Result<()> {
    let fetcher = Arc::new(ScriptedFetcher::paginating(module_records(12)));
    let controller = controller(&fetcher);
    let mut changes = controller.watch_changes();
    controller.load_current_page().await;

    assert_eq!(controller.toggle_column("description"), Some(true));
    assert_eq!(controller.toggle_column("credits"), Some(false));

    assert!(!changes.has_changed()?);
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(controller.view_state().pagination.total, 12);

    let visible: Vec<String> = controller
        .columns()
        .visible()
        .iter()
        .map(|c| c.key.clone())
        .collect();
    assert_eq!(visible, vec!["code", "year", "credits"]);
    Ok(())
}

#[tokio::test]
async fn test_selection_survives_view_changes() {
    let fetcher = Arc::new(ScriptedFetcher::paginating(module_records(12)));
    let controller = controller(&fetcher);
    controller.load_current_page().await;

    controller.toggle_page_selection();
    controller.select_row(RowKey::Number(11));
    assert_eq!(controller.selected_row_keys().len(), 6);

    controller.set_search_term("COS");
    controller.set_sort(vec![SortField::descend("year")]);
    let mut filters = Filters::new();
    filters.insert("year".to_string(), vec!["2025".to_string()]);
    controller.set_filters(filters);
    controller.next_page();
    controller.load_current_page().await;

    let handle = controller.handle();
    assert_eq!(handle.selected_row_keys().len(), 6);
    assert!(handle.selected_row_keys().contains(&RowKey::Number(11)));

    handle.clear_selection();
    assert!(controller.selected_row_keys().is_empty());
}

#[tokio::test]
async fn test_toggle_page_selection_round_trip() {
    let fetcher = Arc::new(ScriptedFetcher::paginating(module_records(3)));
    let controller = controller(&fetcher);
    controller.load_current_page().await;

    controller.toggle_page_selection();
    assert_eq!(controller.selected_row_keys().len(), 3);
    controller.toggle_page_selection();
    assert!(controller.selected_row_keys().is_empty());
}

#[tokio::test]
async fn test_clear_affordance_in_snapshot() {
    let fetcher = Arc::new(ScriptedFetcher::paginating(module_records(3)));
    let controller = controller(&fetcher);

    assert_eq!(controller.snapshot().clear_affordance, None);
    controller.set_search_term("COS10");
    assert_eq!(controller.snapshot().clear_affordance, Some(ClearAction::Search));
    controller.set_filter("year", vec!["2024".to_string()]);
    assert_eq!(controller.snapshot().clear_affordance, Some(ClearAction::All));

    assert!(controller.clear_all());
    assert!(!controller.clear_all());
    assert_eq!(controller.snapshot().clear_affordance, None);
}

#[tokio::test]
async fn test_view_state_survives_restart_in_sqlite() -> anyhow::Result<()> {
    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open_in_memory()?);
    let fetcher = Arc::new(ScriptedFetcher::paginating(module_records(12)));

    let options = || {
        ListOptions::new()
            .columns(module_columns())
            .persist(store.clone(), "modules:abc")
    };

    let first = ListController::with_fetcher(fetcher.clone(), options());
    first.set_filter("year", vec!["2024".to_string()]);
    first.set_page_size(50);
    drop(first);

    let second = ListController::with_fetcher(fetcher.clone(), options());
    let state = second.view_state();
    assert_eq!(state.filters.get("year"), Some(&vec!["2024".to_string()]));
    assert_eq!(state.pagination.page_size, 50);

    second.load_current_page().await;
    assert_eq!(fetcher.last_request().map(|r| r.per_page), Some(50));
    Ok(())
}

#[tokio::test]
async fn test_action_refreshes_and_clears_through_handle() -> anyhow::Result<()> {
    let fetcher = Arc::new(ScriptedFetcher::paginating(module_records(4)));
    let controller = controller(&fetcher);
    controller.load_current_page().await;
    controller.select_row(RowKey::Number(2));

    let archive = ActionDef::new("archive", "Archive", |ctx: ActionContext<Record>| async move {
        if ctx.selected.is_empty() {
            return Err::<(), BoxError>("nothing selected".into());
        }
        if let LoadOutcome::Failed(err) = ctx.handle.refresh().await {
            return Err(err.into());
        }
        ctx.handle.clear_selection();
        Ok(())
    })
    .primary();

    controller.run_action(&archive, None, false).await?;
    assert_eq!(fetcher.calls(), 2);
    assert!(controller.selected_row_keys().is_empty());

    let err = controller.run_action(&archive, None, false).await.unwrap_err();
    assert!(matches!(err, Error::Action { ref key, .. } if key == "archive"));
    assert_eq!(err.to_string(), "Action 'archive' failed: nothing selected");
    Ok(())
}
