use std::fmt;

use super::{QueryKey, QueryState};

/// Kind of mutation applied to a query cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Registered,
    FetchStarted,
    RefetchStarted,
    Succeeded,
    Failed,
    Removed,
}

/// Change event delivered to subscribers, carrying the entry state as it
/// was right after the mutation.
pub struct QueryEvent<T> {
    pub key: QueryKey,
    pub change: ChangeType,
    pub state: QueryState<T>,
}

impl<T> Clone for QueryEvent<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            change: self.change,
            state: self.state.clone(),
        }
    }
}

impl<T> fmt::Debug for QueryEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryEvent")
            .field("key", &self.key)
            .field("change", &self.change)
            .field("state", &self.state)
            .finish()
    }
}

type Detach = Box<dyn FnOnce(u64) + Send + Sync>;

/// Handle returned by `QueryCoordinator::subscribe`.
///
/// The callback stays registered for as long as this handle lives; dropping
/// it or calling [`Subscription::unsubscribe`] detaches the callback.
#[must_use = "dropping a Subscription immediately unsubscribes the callback"]
pub struct Subscription {
    id: u64,
    detach: Option<Detach>,
}

impl Subscription {
    pub(crate) fn new<F>(id: u64, detach: F) -> Self
    where
        F: FnOnce(u64) + Send + Sync + 'static,
    {
        Self {
            id,
            detach: Some(Box::new(detach)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn unsubscribe(mut self) {
        self.detach_now();
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.detach.is_some())
            .finish()
    }
}
