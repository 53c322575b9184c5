use anyhow::{Context, Result};
use fitchlist_core::{SqliteStore, storage_key};
use fitchlist_engine::{
    ActionContext, ActionDef, BoxError, ListController, ListOptions, LoadOutcome,
};
use fitchlist_runtime::ResourceFetcher;
use fitchlist_types::{Record, RowKey};
use std::sync::Arc;

use crate::context::CliContext;
use crate::presentation::tui;
use crate::types::ViewMode;

pub fn handle(ctx: &CliContext, resource: &str, params: &[String], view: ViewMode) -> Result<()> {
    let (config, fetcher) = ctx.open_resource(resource, params)?;

    let store = SqliteStore::open(&ctx.db_path()).context("Failed to open view-state database")?;
    let key = storage_key(resource, fetcher.url().as_str());
    let mut options = ListOptions::new()
        .columns(config.columns.clone())
        .persist(Arc::new(store), key);
    if let Some(page_size) = config.page_size {
        options = options.page_size(page_size);
    }

    let fetcher = Arc::new(fetcher);
    let controller = ListController::with_fetcher(fetcher.clone(), options);
    let actions = vec![delete_action(fetcher)];

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    tui::run(&runtime, controller, actions, resource, view)
}

/// Delete the selected rows, or the row under the cursor when nothing is
/// selected, then clear the selection and reload the page.
///
/// Every target is attempted. The selection is cleared and the page reloaded
/// even when some deletes fail; the failed keys are reported afterwards.
pub(crate) fn delete_action(fetcher: Arc<ResourceFetcher>) -> ActionDef<Record> {
    ActionDef::new("delete", "Delete", move |ctx: ActionContext<Record>| {
        let fetcher = fetcher.clone();
        async move {
            let targets: Vec<RowKey> = if ctx.selected.is_empty() {
                ctx.row.iter().map(|row| row.key.clone()).collect()
            } else {
                ctx.selected.clone()
            };
            if targets.is_empty() {
                return Err::<(), BoxError>("nothing selected".into());
            }

            let mut failures = Vec::new();
            for key in &targets {
                if let Err(err) = fetcher.delete(key).await {
                    tracing::warn!(%key, error = %err, "delete failed");
                    failures.push(format!("{} ({})", key, err.message));
                }
            }
            tracing::info!(
                deleted = targets.len() - failures.len(),
                failed = failures.len(),
                "rows deleted"
            );

            ctx.handle.clear_selection();
            let reload = ctx.handle.refresh().await;

            if !failures.is_empty() {
                return Err::<(), BoxError>(
                    format!("could not delete {}", failures.join(", ")).into(),
                );
            }
            if let LoadOutcome::Failed(err) = reload {
                return Err(format!("deleted, but reload failed: {}", err.message).into());
            }
            Ok(())
        }
    })
    .primary()
    .confirm()
}
