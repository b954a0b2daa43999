use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::TransportError;

/// Lifecycle stage of a query cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryStatus {
    /// Registered, never fetched.
    #[default]
    Idle,
    /// First fetch in flight (or a retry of an entry that never got data).
    Loading,
    Success,
    Error,
}

/// Snapshot of one query cache entry.
///
/// `data` and `error` are independent: an entry whose refresh failed keeps
/// showing its previous data while also carrying the failure.
pub struct QueryState<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<TransportError>,
    /// A refresh is in flight over existing data.
    pub is_refetching: bool,
    pub data_updated_at: Option<DateTime<Utc>>,
    pub error_updated_at: Option<DateTime<Utc>>,
    /// Number of fetches launched for this entry.
    pub fetch_count: u32,
    /// Number of fetches that settled with an error.
    pub failure_count: u32,
    /// Bumped on every mutation; observers use it to drop stale events.
    pub revision: u64,
}

impl<T> QueryState<T> {
    pub fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_refetching: false,
            data_updated_at: None,
            error_updated_at: None,
            fetch_count: 0,
            failure_count: 0,
            revision: 0,
        }
    }

    /// No result has landed yet: either nothing was requested or the first
    /// fetch is still running. This is the state that shows a spinner.
    pub fn is_first_load(&self) -> bool {
        self.data.is_none()
            && matches!(self.status, QueryStatus::Idle | QueryStatus::Loading)
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// A fetch is in flight, first load or refresh.
    pub fn is_fetching(&self) -> bool {
        self.status == QueryStatus::Loading || self.is_refetching
    }

    /// Previous data is being shown alongside a failed refresh.
    pub fn is_stale_with_error(&self) -> bool {
        self.data.is_some() && self.error.is_some()
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_refetching: self.is_refetching,
            data_updated_at: self.data_updated_at,
            error_updated_at: self.error_updated_at,
            fetch_count: self.fetch_count,
            failure_count: self.failure_count,
            revision: self.revision,
        }
    }
}

impl<T> fmt::Debug for QueryState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryState")
            .field("status", &self.status)
            .field("has_data", &self.data.is_some())
            .field("error", &self.error)
            .field("is_refetching", &self.is_refetching)
            .field("data_updated_at", &self.data_updated_at)
            .field("error_updated_at", &self.error_updated_at)
            .field("fetch_count", &self.fetch_count)
            .field("failure_count", &self.failure_count)
            .field("revision", &self.revision)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_and_loading_without_data_are_first_load() {
        let mut state = QueryState::<u32>::idle();
        assert!(state.is_first_load());

        state.status = QueryStatus::Loading;
        assert!(state.is_first_load());
        assert!(state.is_fetching());

        state.status = QueryStatus::Error;
        state.error = Some(TransportError::network("offline"));
        assert!(!state.is_first_load());
    }

    #[test]
    fn refetch_over_data_is_not_first_load() {
        let mut state = QueryState::idle();
        state.status = QueryStatus::Success;
        state.data = Some(Arc::new(1u32));
        state.is_refetching = true;

        assert!(!state.is_first_load());
        assert!(state.is_fetching());
        assert!(!state.is_stale_with_error());
    }
}
