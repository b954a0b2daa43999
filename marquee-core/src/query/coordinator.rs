//! QueryCoordinator - single source of truth for catalog fetches
//!
//! Every registered key owns one cache entry. Fetches are spawned onto the
//! Tokio runtime so they finish (and update the cache) even when nobody is
//! awaiting them any more. While a fetch is in flight its outcome is stored
//! on the entry as a shared future, and every caller asking for that key
//! attaches to it instead of starting a second fetch.

use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use futures::FutureExt;
use futures::future::{self, BoxFuture, Shared};
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::events::{ChangeType, QueryEvent, Subscription};
use super::{QueryKey, QueryState, QueryStatus, SourceDescriptor};
use crate::error::{QueryError, Result, TransportError};

type Outcome<T> = std::result::Result<Arc<T>, TransportError>;
type SharedOutcome<T> = Shared<BoxFuture<'static, Outcome<T>>>;
type Listener<T> = Arc<dyn Fn(&QueryEvent<T>) + Send + Sync>;

/// Future returned by [`QueryCoordinator::ensure_fetched`].
pub type QueryFuture<T> = BoxFuture<'static, Result<Arc<T>>>;

/// Future returned by [`QueryCoordinator::refetch`].
pub type RefetchFuture<T> = BoxFuture<'static, RefetchReport<T>>;

struct InFlight<T> {
    id: u64,
    outcome: SharedOutcome<T>,
}

struct Slot<T> {
    descriptor: SourceDescriptor<T>,
    state: QueryState<T>,
    in_flight: Option<InFlight<T>>,
}

struct Registry<T> {
    slots: HashMap<QueryKey, Slot<T>>,
    order: Vec<QueryKey>,
    /// Fetches still running for keys that were removed. A re-registered
    /// key adopts its orphan instead of starting a second fetch.
    orphans: HashMap<QueryKey, InFlight<T>>,
}

struct Inner<T> {
    registry: Mutex<Registry<T>>,
    listeners: Mutex<Vec<(u64, Listener<T>)>>,
    next_id: AtomicU64,
}

/// Owns the key -> entry map and drives every fetch.
///
/// Cloning is cheap; clones share the same cache.
pub struct QueryCoordinator<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for QueryCoordinator<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for QueryCoordinator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (entries, in_flight) = self
            .inner
            .registry
            .try_lock()
            .map(|registry| {
                let in_flight = registry
                    .slots
                    .values()
                    .filter(|slot| slot.in_flight.is_some())
                    .count();
                (registry.slots.len(), in_flight)
            })
            .unwrap_or((0, 0));
        let listeners = self
            .inner
            .listeners
            .try_lock()
            .map(|listeners| listeners.len())
            .unwrap_or(0);

        f.debug_struct("QueryCoordinator")
            .field("entries", &entries)
            .field("in_flight", &in_flight)
            .field("listeners", &listeners)
            .finish()
    }
}

impl<T: Send + Sync + 'static> Default for QueryCoordinator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> QueryCoordinator<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: Mutex::new(Registry {
                    slots: HashMap::new(),
                    order: Vec::new(),
                    orphans: HashMap::new(),
                }),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Create an idle entry for the descriptor's key.
    ///
    /// Returns `false` and changes nothing when the key is already
    /// registered.
    pub fn register(&self, descriptor: SourceDescriptor<T>) -> bool {
        let event = {
            let mut registry = self.inner.registry.lock();
            let key = descriptor.key().clone();
            if registry.slots.contains_key(&key) {
                debug!(key = %key, "query already registered");
                return false;
            }

            let state = QueryState::idle();
            let event = QueryEvent {
                key: key.clone(),
                change: ChangeType::Registered,
                state: state.clone(),
            };
            registry.order.push(key.clone());
            registry.slots.insert(
                key,
                Slot {
                    descriptor,
                    state,
                    in_flight: None,
                },
            );
            event
        };

        debug!(key = %event.key, "registered query");
        self.notify(&event);
        true
    }

    /// Fetch the entry if it has never been fetched.
    ///
    /// - idle: starts the fetch and resolves with its outcome
    /// - loading: resolves with the outcome of the running first fetch
    /// - settled: resolves immediately with the current data or error,
    ///   even while a refresh runs over that data
    ///
    /// The fetch starts when this is called, not when the returned future is
    /// first polled.
    ///
    /// # Panics
    ///
    /// Starting a fetch outside a Tokio runtime panics, as `tokio::spawn`
    /// does.
    pub fn ensure_fetched(&self, key: &QueryKey) -> QueryFuture<T> {
        let (outcome, event) = {
            let mut guard = self.inner.registry.lock();
            let registry = &mut *guard;
            let Some(slot) = registry.slots.get_mut(key) else {
                return unknown_key(key);
            };
            let adopted = adopt_orphan(&mut registry.orphans, key, slot);

            if slot.state.status == QueryStatus::Loading
                && let Some((fetch_id, outcome)) = joinable(slot)
            {
                debug!(key = %key, fetch_id, "joining in-flight fetch");
                (outcome, adopted)
            } else if slot.state.status == QueryStatus::Idle {
                let (outcome, event) = self.launch(key, slot);
                (outcome, Some(event))
            } else {
                let settled = settled_outcome(&slot.state);
                return future::ready(settled.map_err(QueryError::from)).boxed();
            }
        };

        if let Some(event) = event {
            self.notify(&event);
        }
        async move { outcome.await.map_err(QueryError::from) }.boxed()
    }

    /// Re-run the fetch for each key, concurrently.
    ///
    /// Keys holding data keep it (and their status) while the refresh runs,
    /// with `is_refetching` set. Keys without data are fetched as a first
    /// load. A key that already has a fetch in flight joins it. The returned
    /// future settles once every key has settled; each key's entry reflects
    /// its own outcome only.
    ///
    /// # Panics
    ///
    /// Starting a fetch outside a Tokio runtime panics, as `tokio::spawn`
    /// does.
    pub fn refetch<I>(&self, keys: I) -> RefetchFuture<T>
    where
        I: IntoIterator<Item = QueryKey>,
    {
        let mut events = Vec::new();
        let mut pending: Vec<(QueryKey, QueryFuture<T>)> = Vec::new();

        {
            let mut guard = self.inner.registry.lock();
            let registry = &mut *guard;
            for key in keys {
                let Some(slot) = registry.slots.get_mut(&key) else {
                    let fut = unknown_key(&key);
                    pending.push((key, fut));
                    continue;
                };
                if let Some(event) = adopt_orphan(&mut registry.orphans, &key, slot) {
                    events.push(event);
                }

                let outcome = match joinable(slot) {
                    Some((fetch_id, outcome)) => {
                        debug!(key = %key, fetch_id, "refetch joins in-flight fetch");
                        outcome
                    }
                    None => {
                        let (outcome, event) = self.launch(&key, slot);
                        events.push(event);
                        outcome
                    }
                };
                pending.push((
                    key,
                    async move { outcome.await.map_err(QueryError::from) }
                        .boxed(),
                ));
            }
        }

        for event in &events {
            self.notify(event);
        }

        async move {
            let (keys, futures): (Vec<_>, Vec<_>) = pending.into_iter().unzip();
            let outcomes = future::join_all(futures).await;
            RefetchReport {
                outcomes: keys.into_iter().zip(outcomes).collect(),
            }
        }
        .boxed()
    }

    /// Refetch every registered key.
    pub fn refetch_all(&self) -> RefetchFuture<T> {
        self.refetch(self.keys())
    }

    /// Refetch every registered key that starts with `prefix`.
    pub fn refetch_matching(&self, prefix: &QueryKey) -> RefetchFuture<T> {
        let keys: Vec<QueryKey> = self
            .keys()
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect();
        self.refetch(keys)
    }

    /// Register a callback invoked synchronously after every entry
    /// mutation. No coordinator lock is held while it runs, so the callback
    /// may read state or start fetches.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&QueryEvent<T>) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push((id, Arc::new(callback)));

        let inner = Arc::downgrade(&self.inner);
        Subscription::new(id, move |id| {
            if let Some(inner) = inner.upgrade() {
                inner.listeners.lock().retain(|(listener, _)| *listener != id);
            }
        })
    }

    pub fn state(&self, key: &QueryKey) -> Option<QueryState<T>> {
        self.inner
            .registry
            .lock()
            .slots
            .get(key)
            .map(|slot| slot.state.clone())
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> Vec<QueryKey> {
        self.inner.registry.lock().order.clone()
    }

    pub fn is_registered(&self, key: &QueryKey) -> bool {
        self.inner.registry.lock().slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.registry.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of registered keys with a fetch currently in flight.
    pub fn in_flight(&self) -> usize {
        self.inner
            .registry
            .lock()
            .slots
            .values()
            .filter(|slot| slot.in_flight.is_some())
            .count()
    }

    /// Destroy the entry for `key`. A fetch still running for it keeps
    /// running; its result is discarded unless the key is registered again
    /// and fetched before it settles, in which case the new entry adopts it.
    pub fn remove(&self, key: &QueryKey) -> bool {
        let event = {
            let mut registry = self.inner.registry.lock();
            let Some(slot) = registry.slots.remove(key) else {
                return false;
            };
            registry.order.retain(|existing| existing != key);
            if let Some(in_flight) = slot.in_flight {
                registry.orphans.insert(key.clone(), in_flight);
            }
            QueryEvent {
                key: key.clone(),
                change: ChangeType::Removed,
                state: slot.state,
            }
        };

        debug!(key = %key, "removed query");
        self.notify(&event);
        true
    }

    /// Destroy every entry, as on screen unmount.
    pub fn clear(&self) {
        for key in self.keys() {
            self.remove(&key);
        }
    }

    /// Start a fetch for `slot`. Caller holds the registry lock and is
    /// responsible for publishing the returned event once it is released.
    fn launch(
        &self,
        key: &QueryKey,
        slot: &mut Slot<T>,
    ) -> (SharedOutcome<T>, QueryEvent<T>) {
        let fetch_id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        let change = if slot.state.has_data() {
            slot.state.is_refetching = true;
            ChangeType::RefetchStarted
        } else {
            slot.state.status = QueryStatus::Loading;
            ChangeType::FetchStarted
        };
        slot.state.fetch_count += 1;
        slot.state.revision += 1;

        debug!(key = %key, fetch_id, ?change, "starting fetch");

        let fetch = slot.descriptor.fetch();
        let inner = Arc::downgrade(&self.inner);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            let outcome = match AssertUnwindSafe(fetch).catch_unwind().await {
                Ok(result) => result.map(Arc::new),
                Err(_) => Err(TransportError::Interrupted(
                    "fetch panicked".to_string(),
                )),
            };
            if let Some(inner) = inner.upgrade() {
                QueryCoordinator { inner }.settle(&task_key, fetch_id, &outcome);
            }
            outcome
        });

        let outcome = async move {
            handle.await.unwrap_or_else(|err| {
                Err(TransportError::Interrupted(err.to_string()))
            })
        }
        .boxed()
        .shared();

        slot.in_flight = Some(InFlight {
            id: fetch_id,
            outcome: outcome.clone(),
        });

        let event = QueryEvent {
            key: key.clone(),
            change,
            state: slot.state.clone(),
        };
        (outcome, event)
    }

    fn settle(&self, key: &QueryKey, fetch_id: u64, outcome: &Outcome<T>) {
        let event = {
            let mut guard = self.inner.registry.lock();
            let registry = &mut *guard;
            if registry.orphans.get(key).map(|in_flight| in_flight.id)
                == Some(fetch_id)
            {
                registry.orphans.remove(key);
                debug!(key = %key, fetch_id, "discarding result for removed query");
                return;
            }
            let Some(slot) = registry.slots.get_mut(key) else {
                debug!(key = %key, fetch_id, "discarding result for removed query");
                return;
            };
            if slot.in_flight.as_ref().map(|in_flight| in_flight.id)
                != Some(fetch_id)
            {
                debug!(key = %key, fetch_id, "discarding result of superseded fetch");
                return;
            }

            slot.in_flight = None;
            slot.state.is_refetching = false;
            let now = Utc::now();
            let change = match outcome {
                Ok(data) => {
                    slot.state.status = QueryStatus::Success;
                    slot.state.data = Some(Arc::clone(data));
                    slot.state.error = None;
                    slot.state.data_updated_at = Some(now);
                    debug!(key = %key, fetch_id, "fetch succeeded");
                    ChangeType::Succeeded
                }
                Err(err) => {
                    slot.state.status = QueryStatus::Error;
                    slot.state.error = Some(err.clone());
                    slot.state.error_updated_at = Some(now);
                    slot.state.failure_count += 1;
                    warn!(
                        key = %key,
                        fetch_id,
                        has_stale_data = slot.state.has_data(),
                        error = %err,
                        "fetch failed"
                    );
                    ChangeType::Failed
                }
            };
            slot.state.revision += 1;

            QueryEvent {
                key: key.clone(),
                change,
                state: slot.state.clone(),
            }
        };

        self.notify(&event);
    }

    fn notify(&self, event: &QueryEvent<T>) {
        let listeners: Vec<Listener<T>> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }
}

/// Move a fetch left running by an earlier `remove` of `key` onto its new
/// entry. Caller holds the registry lock and publishes the returned event.
fn adopt_orphan<T>(
    orphans: &mut HashMap<QueryKey, InFlight<T>>,
    key: &QueryKey,
    slot: &mut Slot<T>,
) -> Option<QueryEvent<T>> {
    if slot.in_flight.is_some() {
        return None;
    }
    let orphan = orphans.remove(key)?;

    let change = if slot.state.has_data() {
        slot.state.is_refetching = true;
        ChangeType::RefetchStarted
    } else {
        slot.state.status = QueryStatus::Loading;
        ChangeType::FetchStarted
    };
    slot.state.fetch_count += 1;
    slot.state.revision += 1;
    debug!(key = %key, fetch_id = orphan.id, "adopting fetch started before removal");
    slot.in_flight = Some(orphan);

    Some(QueryEvent {
        key: key.clone(),
        change,
        state: slot.state.clone(),
    })
}

fn joinable<T>(slot: &Slot<T>) -> Option<(u64, SharedOutcome<T>)> {
    slot.in_flight
        .as_ref()
        .map(|in_flight| (in_flight.id, in_flight.outcome.clone()))
}

fn unknown_key<T: Send + Sync + 'static>(key: &QueryKey) -> QueryFuture<T> {
    future::ready(Err(QueryError::UnknownKey(key.clone()))).boxed()
}

fn settled_outcome<T>(state: &QueryState<T>) -> Outcome<T> {
    match (state.status, &state.data, &state.error) {
        (QueryStatus::Error, _, Some(err)) => Err(err.clone()),
        (_, Some(data), _) => Ok(Arc::clone(data)),
        (_, None, Some(err)) => Err(err.clone()),
        (_, None, None) => Err(TransportError::Interrupted(
            "query settled without a result".to_string(),
        )),
    }
}

/// Per-key outcomes of one refetch batch, in request order.
pub struct RefetchReport<T> {
    outcomes: Vec<(QueryKey, Result<Arc<T>>)>,
}

impl<T> RefetchReport<T> {
    pub fn outcomes(&self) -> &[(QueryKey, Result<Arc<T>>)] {
        &self.outcomes
    }

    pub fn outcome(&self, key: &QueryKey) -> Option<&Result<Arc<T>>> {
        self.outcomes
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, outcome)| outcome)
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|(_, outcome)| outcome.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&QueryKey, &QueryError)> {
        self.outcomes
            .iter()
            .filter_map(|(key, outcome)| outcome.as_ref().err().map(|err| (key, err)))
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|(_, outcome)| outcome.is_ok())
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl<T> fmt::Debug for RefetchReport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for (key, outcome) in &self.outcomes {
            match outcome {
                Ok(_) => list.entry(&format_args!("{key}: ok")),
                Err(err) => list.entry(&format_args!("{key}: {err}")),
            };
        }
        list.finish()
    }
}
