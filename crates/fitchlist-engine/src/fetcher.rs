use async_trait::async_trait;
use fitchlist_types::{FetchError, FetchRequest, PageResult};
use futures::future::BoxFuture;

/// Injected data source for a list.
///
/// Implementations normalise every failure (transport, server-reported,
/// malformed payload) into a [`FetchError`] before it reaches the controller.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<PageResult<T>, FetchError>;
}

/// Adapter turning a closure into a [`PageFetcher`]
pub struct FnFetcher<F> {
    f: F,
}

impl<F> FnFetcher<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<T, F> PageFetcher<T> for FnFetcher<F>
where
    T: Send + 'static,
    F: Fn(FetchRequest) -> BoxFuture<'static, Result<PageResult<T>, FetchError>> + Send + Sync,
{
    async fn fetch(&self, request: &FetchRequest) -> Result<PageResult<T>, FetchError> {
        (self.f)(request.clone()).await
    }
}
