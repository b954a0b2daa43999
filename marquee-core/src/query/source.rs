use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::TransportError;
use crate::query::QueryKey;

/// Boxed future produced by a descriptor's fetch operation.
pub type FetchFuture<T> = BoxFuture<'static, Result<T, TransportError>>;

type FetchFn<T> = Arc<dyn Fn() -> FetchFuture<T> + Send + Sync>;

/// Static definition of one fetchable collection: a stable key plus the
/// zero-argument operation that loads it. Holds no state of its own.
///
/// The closure is called with the coordinator's registry locked; it should
/// only build the future and must not call back into the coordinator.
pub struct SourceDescriptor<T> {
    key: QueryKey,
    fetch: FetchFn<T>,
}

impl<T> SourceDescriptor<T> {
    pub fn new<F, Fut>(key: impl Into<QueryKey>, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, TransportError>> + Send + 'static,
    {
        Self {
            key: key.into(),
            fetch: Arc::new(move || fetch().boxed()),
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub(crate) fn fetch(&self) -> FetchFuture<T> {
        (self.fetch)()
    }
}

impl<T> Clone for SourceDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            fetch: Arc::clone(&self.fetch),
        }
    }
}

impl<T> fmt::Debug for SourceDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceDescriptor")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
