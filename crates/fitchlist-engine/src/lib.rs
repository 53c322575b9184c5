//! Headless list view-state controller.
//!
//! A [`ListController`] keeps search text, sort order, column filters,
//! pagination and column visibility in sync with a remote paginated source:
//!
//! - [`ViewStateStore`]: the view state and its setters. Changing the search
//!   term, sort or filters always sends the list back to page 1.
//! - [`PageFetcher`]: the injected data source.
//! - [`ListController::load_current_page`]: the fetch orchestrator, re-run by
//!   [`ListController::spawn_auto_fetch`] whenever the fetch-relevant state
//!   changes.
//! - [`ListHandle`]: the narrow surface handed to code that lives outside the
//!   list (action handlers, parent views).

pub mod action;
pub mod columns;
pub mod controller;
pub mod error;
pub mod fetcher;
pub mod handle;
pub mod selection;
pub mod store;

pub use action::{ActionContext, ActionDef, ActionHandler, find_action, primary_action};
pub use columns::ColumnSet;
pub use controller::{ListController, ListEvent, ListOptions, ListSnapshot, LoadOutcome, StalePolicy};
pub use error::{BoxError, Error, Result};
pub use fetcher::{FnFetcher, PageFetcher};
pub use handle::ListHandle;
pub use selection::Selection;
pub use store::{ClearAction, FetchKey, ViewStateStore};
