use std::sync::{Arc, Mutex, MutexGuard};

use fitchlist_core::{KeyValueStore, load_view_state, save_view_state};
use fitchlist_types::{
    ColumnDef, DEFAULT_PAGE_SIZE, FetchError, FetchRequest, Filters, Keyed, PageResult, RowKey,
    SortField, ViewState,
};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::action::{ActionContext, ActionDef};
use crate::columns::ColumnSet;
use crate::error::{Error, Result};
use crate::fetcher::PageFetcher;
use crate::handle::ListHandle;
use crate::selection::Selection;
use crate::store::{ClearAction, ViewStateStore};

const EVENT_CAPACITY: usize = 64;

/// What happens to a response that resolves after a newer fetch was issued
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StalePolicy {
    /// Every response is applied in resolution order; the last one to
    /// resolve determines what is displayed, even if it was issued first.
    LastResolvedWins,
    /// Each fetch carries a sequence number and only the newest issued
    /// fetch may touch the displayed page.
    #[default]
    LatestIssuedWins,
}

/// Construction options for a [`ListController`]
#[derive(Clone)]
pub struct ListOptions {
    pub columns: Vec<ColumnDef>,
    pub page_size: u64,
    pub stale_policy: StalePolicy,
    persistence: Option<(Arc<dyn KeyValueStore>, String)>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            stale_policy: StalePolicy::default(),
            persistence: None,
        }
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: Vec<ColumnDef>) -> Self {
        self.columns = columns;
        self
    }

    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    /// Remember search/sort/filters/page size under `key` in `store`.
    pub fn persist(mut self, store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        self.persistence = Some((store, key.into()));
        self
    }
}

/// Notifications published by a controller
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    Loaded { seq: u64, total: u64, count: usize },
    FetchFailed { seq: u64, error: FetchError },
    StaleDiscarded { seq: u64 },
}

/// Result of one `load_current_page` call
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Applied { total: u64 },
    Failed(FetchError),
    Discarded,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone)]
pub struct ListSnapshot<T> {
    pub view: ViewState,
    pub items: Vec<T>,
    pub loading: bool,
    pub selection: Selection,
    pub columns: ColumnSet,
    pub last_error: Option<FetchError>,
    pub clear_affordance: Option<ClearAction>,
}

struct Inner<T> {
    view: ViewStateStore,
    columns: ColumnSet,
    selection: Selection,
    items: Vec<T>,
    in_flight: usize,
    issued_seq: u64,
    last_error: Option<FetchError>,
}

struct Shared<T> {
    fetcher: Arc<dyn PageFetcher<T>>,
    persistence: Option<(Arc<dyn KeyValueStore>, String)>,
    stale_policy: StalePolicy,
    inner: Mutex<Inner<T>>,
    changes: watch::Sender<u64>,
    events: broadcast::Sender<ListEvent>,
}

impl<T> Shared<T> {
    // The lock is never held across an await, so a poisoned mutex only
    // means a panic elsewhere; the state itself is still consistent.
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: ListEvent) {
        let _ = self.events.send(event);
    }
}

/// Decrements the in-flight counter if a fetch ends without settling
/// (future dropped or fetcher panicked).
struct InFlight<'a, T> {
    shared: &'a Shared<T>,
    armed: bool,
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            let mut inner = self.shared.lock();
            inner.in_flight = inner.in_flight.saturating_sub(1);
        }
    }
}

/// Keeps a list's view state in sync with a remote paginated source
pub struct ListController<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for ListController<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> ListController<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(fetcher: impl PageFetcher<T> + 'static, options: ListOptions) -> Self {
        Self::with_fetcher(Arc::new(fetcher), options)
    }

    pub fn with_fetcher(fetcher: Arc<dyn PageFetcher<T>>, options: ListOptions) -> Self {
        let mut state = ViewState::new().with_page_size(options.page_size);

        if let Some((store, key)) = &options.persistence {
            match load_view_state(store.as_ref(), key) {
                Ok(Some(persisted)) => state.hydrate(persisted),
                Ok(None) => {}
                Err(err) => tracing::warn!(key = %key, error = %err, "could not read persisted view state"),
            }
        }

        let view = ViewStateStore::from_state(state);
        let (changes, _) = watch::channel(view.version());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let inner = Inner {
            view,
            columns: ColumnSet::new(options.columns),
            selection: Selection::new(),
            items: Vec::new(),
            in_flight: 0,
            issued_seq: 0,
            last_error: None,
        };

        Self {
            shared: Arc::new(Shared {
                fetcher,
                persistence: options.persistence,
                stale_policy: options.stale_policy,
                inner: Mutex::new(inner),
                changes,
                events,
            }),
        }
    }

    /// Narrow control surface for code outside the list.
    pub fn handle(&self) -> ListHandle<T> {
        ListHandle::new(self.clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.shared.events.subscribe()
    }

    /// Receiver that wakes on every fetch-relevant view-state change.
    pub fn watch_changes(&self) -> watch::Receiver<u64> {
        self.shared.changes.subscribe()
    }

    pub fn stale_policy(&self) -> StalePolicy {
        self.shared.stale_policy
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    pub fn view_state(&self) -> ViewState {
        self.shared.lock().view.state().clone()
    }

    pub fn items(&self) -> Vec<T> {
        self.shared.lock().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.lock().in_flight > 0
    }

    pub fn last_error(&self) -> Option<FetchError> {
        self.shared.lock().last_error.clone()
    }

    pub fn columns(&self) -> ColumnSet {
        self.shared.lock().columns.clone()
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        let inner = self.shared.lock();
        ListSnapshot {
            view: inner.view.state().clone(),
            items: inner.items.clone(),
            loading: inner.in_flight > 0,
            selection: inner.selection.clone(),
            columns: inner.columns.clone(),
            last_error: inner.last_error.clone(),
            clear_affordance: inner.view.clear_affordance(),
        }
    }

    // ---------------------------------------------------------------------
    // View-state setters. Each returns whether a re-fetch was triggered.
    // ---------------------------------------------------------------------

    pub fn set_search_term(&self, term: impl Into<String>) -> bool {
        let term = term.into();
        self.update(|view| view.set_search_term(term))
    }

    pub fn set_sort(&self, sort: Vec<SortField>) -> bool {
        self.update(|view| view.set_sort(sort))
    }

    pub fn toggle_sort(&self, field: &str, additive: bool) -> bool {
        self.update(|view| view.toggle_sort(field, additive))
    }

    pub fn set_filters(&self, filters: Filters) -> bool {
        self.update(|view| view.set_filters(filters))
    }

    pub fn set_filter(&self, key: &str, values: Vec<String>) -> bool {
        self.update(|view| view.set_filter(key, values))
    }

    pub fn set_pagination(&self, current: u64, page_size: u64) -> bool {
        self.update(|view| view.set_pagination(current, page_size))
    }

    pub fn set_page(&self, current: u64) -> bool {
        self.update(|view| view.set_page(current))
    }

    pub fn set_page_size(&self, page_size: u64) -> bool {
        self.update(|view| view.set_page_size(page_size))
    }

    pub fn next_page(&self) -> bool {
        self.update(ViewStateStore::next_page)
    }

    pub fn previous_page(&self) -> bool {
        self.update(ViewStateStore::previous_page)
    }

    pub fn clear(&self, action: ClearAction) -> bool {
        self.update(|view| view.clear(action))
    }

    pub fn clear_all(&self) -> bool {
        self.clear(ClearAction::All)
    }

    fn update(&self, f: impl FnOnce(&mut ViewStateStore) -> bool) -> bool {
        let mut inner = self.shared.lock();
        if !f(&mut inner.view) {
            return false;
        }

        // Persisted under the lock: store writes follow the order setters applied.
        if let Some((store, key)) = &self.shared.persistence
            && let Err(err) = save_view_state(store.as_ref(), key, &inner.view.state().to_persisted())
        {
            tracing::warn!(key = %key, error = %err, "could not persist view state");
        }
        self.shared.changes.send_replace(inner.view.version());
        true
    }

    // ---------------------------------------------------------------------
    // Column visibility (presentation only, never triggers a fetch)
    // ---------------------------------------------------------------------

    pub fn toggle_column(&self, key: &str) -> Option<bool> {
        self.shared.lock().columns.toggle(key)
    }

    pub fn show_all_columns(&self) {
        self.shared.lock().columns.show_all();
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    pub fn select_row(&self, key: RowKey) {
        self.shared.lock().selection.select(key);
    }

    pub fn deselect_row(&self, key: &RowKey) {
        self.shared.lock().selection.deselect(key);
    }

    pub fn toggle_row(&self, key: RowKey) -> bool {
        self.shared.lock().selection.toggle(key)
    }

    pub fn clear_selection(&self) {
        self.shared.lock().selection.clear();
    }

    pub fn selected_row_keys(&self) -> Vec<RowKey> {
        self.shared.lock().selection.keys()
    }

    // ---------------------------------------------------------------------
    // Fetch orchestration
    // ---------------------------------------------------------------------

    /// Fetch the page described by the current view state and apply it.
    ///
    /// Failures keep the previously displayed items and publish
    /// [`ListEvent::FetchFailed`]. The loading flag is released on every path.
    pub async fn load_current_page(&self) -> LoadOutcome {
        let (request, seq) = {
            let mut inner = self.shared.lock();
            inner.issued_seq += 1;
            inner.in_flight += 1;
            (FetchRequest::from(inner.view.state()), inner.issued_seq)
        };
        let mut guard = InFlight {
            shared: &self.shared,
            armed: true,
        };

        tracing::debug!(
            seq,
            page = request.page,
            per_page = request.per_page,
            "fetching page"
        );
        let result = self.shared.fetcher.fetch(&request).await;

        self.settle(seq, result, &mut guard)
    }

    fn settle(
        &self,
        seq: u64,
        result: std::result::Result<PageResult<T>, FetchError>,
        guard: &mut InFlight<'_, T>,
    ) -> LoadOutcome {
        let mut inner = self.shared.lock();
        inner.in_flight = inner.in_flight.saturating_sub(1);
        guard.armed = false;

        let stale = self.shared.stale_policy == StalePolicy::LatestIssuedWins
            && seq != inner.issued_seq;
        if stale {
            let latest = inner.issued_seq;
            drop(inner);
            tracing::debug!(seq, latest, "discarding stale response");
            self.shared.emit(ListEvent::StaleDiscarded { seq });
            return LoadOutcome::Discarded;
        }

        match result {
            Ok(page) => {
                let total = page.total;
                let count = page.items.len();
                inner.items = page.items;
                inner.view.apply_total(total);
                inner.last_error = None;
                drop(inner);

                tracing::debug!(seq, total, count, "page applied");
                self.shared.emit(ListEvent::Loaded { seq, total, count });
                LoadOutcome::Applied { total }
            }
            Err(error) => {
                inner.last_error = Some(error.clone());
                drop(inner);

                tracing::warn!(seq, kind = %error.kind, message = %error.message, "fetch failed");
                self.shared.emit(ListEvent::FetchFailed {
                    seq,
                    error: error.clone(),
                });
                LoadOutcome::Failed(error)
            }
        }
    }

    /// Start a fetch on the runtime without waiting for it.
    pub fn spawn_load(&self) -> JoinHandle<LoadOutcome> {
        let controller = self.clone();
        tokio::spawn(async move { controller.load_current_page().await })
    }

    /// Load once now, then again after every fetch-relevant change.
    ///
    /// Loads are spawned rather than awaited, so overlapping requests run
    /// concurrently and are reconciled by the [`StalePolicy`]. Changes made
    /// without yielding in between coalesce into one load.
    pub fn spawn_auto_fetch(&self) -> JoinHandle<()> {
        let controller = self.clone();
        let mut changes = self.shared.changes.subscribe();
        tokio::spawn(async move {
            controller.spawn_load();
            while changes.changed().await.is_ok() {
                controller.spawn_load();
            }
        })
    }

    /// Run an action against the current selection (and optionally one row).
    pub async fn run_action(
        &self,
        action: &ActionDef<T>,
        row: Option<T>,
        confirmed: bool,
    ) -> Result<()> {
        if action.requires_confirmation && !confirmed {
            return Err(Error::ConfirmationRequired(action.key.clone()));
        }

        let context = ActionContext {
            handle: self.handle(),
            selected: self.selected_row_keys(),
            row,
        };

        tracing::info!(action = %action.key, selected = context.selected.len(), "running action");
        (action.handler)(context)
            .await
            .map_err(|source| Error::Action {
                key: action.key.clone(),
                source,
            })
    }
}

impl<T> ListController<T>
where
    T: Keyed + Clone + Send + 'static,
{
    /// Select (or, if already fully selected, deselect) every row on the loaded page.
    pub fn toggle_page_selection(&self) {
        let mut inner = self.shared.lock();
        let keys: Vec<RowKey> = inner.items.iter().map(Keyed::row_key).collect();
        inner.selection.toggle_page(keys);
    }

    pub fn find_item(&self, key: &RowKey) -> Option<T> {
        self.shared
            .lock()
            .items
            .iter()
            .find(|item| &item.row_key() == key)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FnFetcher;
    use fitchlist_core::MemoryStore;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_fetcher(
        calls: Arc<AtomicUsize>,
    ) -> FnFetcher<
        impl Fn(
            FetchRequest,
        ) -> futures::future::BoxFuture<
            'static,
            std::result::Result<PageResult<RowKey>, FetchError>,
        > + Send
        + Sync,
    > {
        FnFetcher::new(move |request: FetchRequest| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                let items = vec![RowKey::Number(request.page as i64)];
                Ok(PageResult::new(items, 100))
            }
            .boxed()
        })
    }

    #[tokio::test]
    async fn test_load_applies_items_and_total() {
        let calls = Arc::new(AtomicUsize::new(0));
        let controller = ListController::new(counting_fetcher(calls.clone()), ListOptions::new());

        let outcome = controller.load_current_page().await;
        assert_eq!(outcome, LoadOutcome::Applied { total: 100 });
        assert_eq!(controller.items(), vec![RowKey::Number(1)]);
        assert_eq!(controller.view_state().pagination.total, 100);
        assert!(!controller.is_loading());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_items() {
        let fail = Arc::new(AtomicUsize::new(0));
        let flag = fail.clone();
        let fetcher = FnFetcher::new(move |_request: FetchRequest| {
            let should_fail = flag.load(Ordering::SeqCst) > 0;
            async move {
                if should_fail {
                    Err(FetchError::server("Failed to retrieve modules"))
                } else {
                    Ok(PageResult::new(vec![RowKey::Number(7)], 1))
                }
            }
            .boxed()
        });
        let controller = ListController::new(fetcher, ListOptions::new());
        let mut events = controller.subscribe();

        controller.load_current_page().await;
        fail.store(1, Ordering::SeqCst);
        let outcome = controller.load_current_page().await;

        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert_eq!(controller.items(), vec![RowKey::Number(7)]);
        assert_eq!(controller.view_state().pagination.total, 1);
        assert!(!controller.is_loading());
        assert_eq!(
            controller.last_error().map(|e| e.message),
            Some("Failed to retrieve modules".to_string())
        );

        assert!(matches!(events.recv().await, Ok(ListEvent::Loaded { .. })));
        assert!(matches!(
            events.recv().await,
            Ok(ListEvent::FetchFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_setters_signal_changes_but_columns_do_not() {
        let calls = Arc::new(AtomicUsize::new(0));
        let controller = ListController::new(
            counting_fetcher(calls),
            ListOptions::new().columns(vec![
                ColumnDef::new("code", "Code"),
                ColumnDef::new("year", "Year"),
            ]),
        );
        let mut changes = controller.watch_changes();

        assert_eq!(controller.toggle_column("year"), Some(true));
        assert!(!changes.has_changed().unwrap_or(true));

        assert!(controller.set_search_term("COS"));
        assert!(changes.has_changed().unwrap_or(false));
    }

    #[tokio::test]
    async fn test_view_state_is_persisted_and_restored() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let first = ListController::new(
            counting_fetcher(calls.clone()),
            ListOptions::new().persist(store.clone(), "modules"),
        );
        first.set_search_term("COS");
        first.set_sort(vec![SortField::descend("year")]);
        first.set_page_size(50);
        first.set_page(3);

        let second = ListController::new(
            counting_fetcher(calls),
            ListOptions::new().persist(store, "modules"),
        );
        let state = second.view_state();
        assert_eq!(state.search_term, "COS");
        assert_eq!(state.sort, vec![SortField::descend("year")]);
        assert_eq!(state.pagination.page_size, 50);
        assert_eq!(state.pagination.current, 1);
    }

    #[test]
    fn test_concurrent_setters_persist_the_final_state() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let controller = ListController::new(
            counting_fetcher(Arc::new(AtomicUsize::new(0))),
            ListOptions::new().persist(store.clone(), "modules"),
        );

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let controller = controller.clone();
                std::thread::spawn(move || {
                    for round in 0..50 {
                        controller.set_search_term(format!("w{}-{}", worker, round));
                    }
                })
            })
            .collect();
        for worker in workers {
            assert!(worker.join().is_ok());
        }

        let persisted = load_view_state(store.as_ref(), "modules").ok().flatten();
        assert_eq!(
            persisted.map(|p| p.search_term),
            Some(controller.view_state().search_term)
        );
    }

    #[tokio::test]
    async fn test_confirmation_required() {
        let calls = Arc::new(AtomicUsize::new(0));
        let controller = ListController::new(counting_fetcher(calls), ListOptions::new());
        let action = ActionDef::new("delete", "Delete", |_ctx: ActionContext<RowKey>| async {
            Ok::<(), crate::error::BoxError>(())
        })
        .confirm();

        let err = controller.run_action(&action, None, false).await.unwrap_err();
        assert!(matches!(err, Error::ConfirmationRequired(key) if key == "delete"));
        assert!(controller.run_action(&action, None, true).await.is_ok());
    }
}
