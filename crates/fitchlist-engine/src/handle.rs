use fitchlist_types::RowKey;

use crate::controller::{ListController, LoadOutcome};

/// Imperative handle exposed to code outside the list.
///
/// Offers a refresh of the current view state and selection access only.
/// Search, sort, filters and paging go through the controller's setters.
pub struct ListHandle<T> {
    controller: ListController<T>,
}

impl<T> Clone for ListHandle<T> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
        }
    }
}

impl<T> ListHandle<T>
where
    T: Clone + Send + 'static,
{
    pub(crate) fn new(controller: ListController<T>) -> Self {
        Self { controller }
    }

    /// Re-run the fetch for the current view state without changing it.
    pub async fn refresh(&self) -> LoadOutcome {
        self.controller.load_current_page().await
    }

    pub fn clear_selection(&self) {
        self.controller.clear_selection();
    }

    pub fn selected_row_keys(&self) -> Vec<RowKey> {
        self.controller.selected_row_keys()
    }
}
