//! Aggregate view model
//!
//! Folds several independent query cache entries into the handful of values
//! a screen needs: one loading flag, one refreshing flag, and each section's
//! current data. The fold runs inside a coordinator subscription, so the
//! published snapshot always reflects the latest mutation of any watched
//! entry.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::TransportError;
use crate::query::{
    ChangeType, QueryCoordinator, QueryEvent, QueryKey, QueryState, Subscription,
};

/// Derived view over the watched entries. Has no identity of its own.
pub struct AggregateSnapshot<T> {
    /// Some watched entry has not produced its first result yet. While this
    /// holds the screen shows its loading state and renders no section, even
    /// sections whose data already arrived.
    pub loading: bool,
    /// Some watched entry is refreshing over existing data.
    pub refreshing: bool,
    entries: Vec<(QueryKey, QueryState<T>)>,
}

impl<T> AggregateSnapshot<T> {
    fn from_keys(keys: &[QueryKey]) -> Self {
        let mut snapshot = Self {
            loading: false,
            refreshing: false,
            entries: keys
                .iter()
                .map(|key| (key.clone(), QueryState::idle()))
                .collect(),
        };
        snapshot.recompute();
        snapshot
    }

    /// Fold one coordinator event in. Returns whether anything changed.
    fn apply(&mut self, event: &QueryEvent<T>) -> bool {
        let Some((_, current)) =
            self.entries.iter_mut().find(|(key, _)| *key == event.key)
        else {
            return false;
        };

        match event.change {
            ChangeType::Removed => *current = QueryState::idle(),
            ChangeType::Registered => *current = event.state.clone(),
            _ if event.state.revision < current.revision => return false,
            _ => *current = event.state.clone(),
        }
        self.recompute();
        true
    }

    /// Seed an entry from a state read directly off the coordinator, unless
    /// a newer event already landed.
    fn merge(&mut self, key: &QueryKey, state: QueryState<T>) -> bool {
        let Some((_, current)) =
            self.entries.iter_mut().find(|(candidate, _)| candidate == key)
        else {
            return false;
        };
        if state.revision < current.revision {
            return false;
        }
        *current = state;
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        self.loading = self.entries.iter().any(|(_, state)| state.is_first_load());
        self.refreshing = self.entries.iter().any(|(_, state)| state.is_refetching);
    }

    pub fn state(&self, key: &QueryKey) -> Option<&QueryState<T>> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, state)| state)
    }

    /// Current data for one section, regardless of the loading gate.
    pub fn section(&self, key: &QueryKey) -> Option<&Arc<T>> {
        self.state(key).and_then(|state| state.data.as_ref())
    }

    /// Last failure recorded for one section, if any.
    pub fn error(&self, key: &QueryKey) -> Option<&TransportError> {
        self.state(key).and_then(|state| state.error.as_ref())
    }

    pub fn entries(&self) -> &[(QueryKey, QueryState<T>)] {
        &self.entries
    }
}

impl<T> Clone for AggregateSnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            loading: self.loading,
            refreshing: self.refreshing,
            entries: self.entries.clone(),
        }
    }
}

impl<T> fmt::Debug for AggregateSnapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateSnapshot")
            .field("loading", &self.loading)
            .field("refreshing", &self.refreshing)
            .field("entries", &self.entries)
            .finish()
    }
}

/// Reactive aggregate over a fixed set of coordinator keys.
///
/// Consumers read the latest snapshot or await [`AggregateViewModel::changes`]
/// for the next one; nothing polls the coordinator.
pub struct AggregateViewModel<T> {
    keys: Vec<QueryKey>,
    receiver: watch::Receiver<AggregateSnapshot<T>>,
    _subscription: Subscription,
}

impl<T: Send + Sync + 'static> AggregateViewModel<T> {
    /// Watch `keys` on `coordinator`. Keys that are not registered yet read
    /// as idle until they are.
    pub fn new<I>(coordinator: &QueryCoordinator<T>, keys: I) -> Self
    where
        I: IntoIterator<Item = QueryKey>,
    {
        let mut watched: Vec<QueryKey> = Vec::new();
        for key in keys {
            if !watched.contains(&key) {
                watched.push(key);
            }
        }

        let (sender, receiver) =
            watch::channel(AggregateSnapshot::from_keys(&watched));
        let sender = Arc::new(sender);

        // Subscribe before seeding so no mutation slips between the two.
        let subscription = {
            let sender = Arc::clone(&sender);
            coordinator.subscribe(move |event| {
                sender.send_if_modified(|snapshot| snapshot.apply(event));
            })
        };

        for key in &watched {
            if let Some(state) = coordinator.state(key) {
                sender.send_if_modified(|snapshot| snapshot.merge(key, state));
            }
        }

        Self {
            keys: watched,
            receiver,
            _subscription: subscription,
        }
    }
}

impl<T> AggregateViewModel<T> {
    pub fn keys(&self) -> &[QueryKey] {
        &self.keys
    }

    pub fn snapshot(&self) -> AggregateSnapshot<T> {
        self.receiver.borrow().clone()
    }

    pub fn loading(&self) -> bool {
        self.receiver.borrow().loading
    }

    pub fn refreshing(&self) -> bool {
        self.receiver.borrow().refreshing
    }

    pub fn section(&self, key: &QueryKey) -> Option<Arc<T>> {
        self.receiver.borrow().section(key).cloned()
    }

    pub fn error(&self, key: &QueryKey) -> Option<TransportError> {
        self.receiver.borrow().error(key).cloned()
    }

    /// Receiver that wakes on every snapshot change.
    pub fn changes(&self) -> watch::Receiver<AggregateSnapshot<T>> {
        self.receiver.clone()
    }
}

impl<T> fmt::Debug for AggregateViewModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.receiver.borrow();
        f.debug_struct("AggregateViewModel")
            .field("keys", &self.keys)
            .field("loading", &snapshot.loading)
            .field("refreshing", &snapshot.refreshing)
            .finish()
    }
}
