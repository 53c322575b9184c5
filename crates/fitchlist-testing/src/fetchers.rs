//! Scripted fetchers for orchestrator tests.
//!
//! Responses are computed from the request, optionally after a delay, so
//! tests can stage overlapping fetches under `tokio::time::pause`.

use async_trait::async_trait;
use fitchlist_engine::PageFetcher;
use fitchlist_types::{FetchError, FetchRequest, PageResult};
use std::sync::Mutex;
use std::time::Duration;

/// One scripted response
#[derive(Debug, Clone)]
pub struct Scripted<T> {
    pub delay: Duration,
    pub result: Result<PageResult<T>, FetchError>,
}

impl<T> Scripted<T> {
    pub fn ok(page: PageResult<T>) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(page),
        }
    }

    pub fn fail(error: FetchError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(error),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Responder<T> = Box<dyn Fn(&FetchRequest) -> Scripted<T> + Send + Sync>;

/// [`PageFetcher`] driven by a closure, recording every request it sees.
///
/// # Example
/// ```no_run
/// use fitchlist_testing::{Scripted, ScriptedFetcher};
/// use fitchlist_types::PageResult;
/// use std::time::Duration;
///
/// let fetcher = ScriptedFetcher::new(|request| {
///     let delay = if request.page == 1 { 500 } else { 50 };
///     Scripted::ok(PageResult::new(vec![request.page], 40))
///         .after(Duration::from_millis(delay))
/// });
/// ```
pub struct ScriptedFetcher<T> {
    respond: Responder<T>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl<T: Clone + Send + 'static> ScriptedFetcher<T> {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&FetchRequest) -> Scripted<T> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Serve `items` page by page, reporting `items.len()` as the total.
    pub fn paginating(items: Vec<T>) -> Self
    where
        T: Sync,
    {
        Self::new(move |request| Scripted::ok(slice_page(&items, request)))
    }

    /// Fail every request with the same error.
    pub fn failing(error: FetchError) -> Self {
        Self::new(move |_| Scripted::fail(error.clone()))
    }

    pub fn calls(&self) -> usize {
        self.log().len()
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.log().clone()
    }

    pub fn last_request(&self) -> Option<FetchRequest> {
        self.log().last().cloned()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<FetchRequest>> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<T> PageFetcher<T> for ScriptedFetcher<T>
where
    T: Clone + Send + 'static,
{
    async fn fetch(&self, request: &FetchRequest) -> Result<PageResult<T>, FetchError> {
        self.log().push(request.clone());
        let scripted = (self.respond)(request);
        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        scripted.result
    }
}

/// Cut one page out of an in-memory list.
pub fn slice_page<T: Clone>(items: &[T], request: &FetchRequest) -> PageResult<T> {
    let per_page = request.per_page.max(1) as usize;
    let start = (request.page.max(1) as usize - 1) * per_page;
    let page = items.iter().skip(start).take(per_page).cloned().collect();
    PageResult::new(page, items.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitchlist_types::ViewState;

    fn request(page: u64, per_page: u64) -> FetchRequest {
        let mut state = ViewState::new().with_page_size(per_page);
        state.pagination.current = page;
        FetchRequest::from(&state)
    }

    #[test]
    fn test_slice_page_bounds() {
        let items: Vec<u32> = (1..=45).collect();
        assert_eq!(slice_page(&items, &request(1, 20)).items.len(), 20);
        assert_eq!(slice_page(&items, &request(3, 20)).items, vec![41, 42, 43, 44, 45]);
        assert!(slice_page(&items, &request(9, 20)).items.is_empty());
        assert_eq!(slice_page(&items, &request(9, 20)).total, 45);
    }

    #[tokio::test]
    async fn test_requests_are_recorded() {
        let fetcher = ScriptedFetcher::paginating(vec!["a", "b", "c"]);
        let page = fetcher.fetch(&request(2, 2)).await;
        assert_eq!(page.map(|p| p.items), Ok(vec!["c"]));
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(fetcher.last_request().map(|r| r.page), Some(2));
    }
}
