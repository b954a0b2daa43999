//! Scripted fetch sources whose completion is gated by the test, so
//! mid-flight state can be observed deterministically.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use marquee_core::query::{QueryKey, SourceDescriptor};
use marquee_core::{MovieCatalog, TransportError};
use marquee_model::{Movie, MoviePage};
use tokio::sync::Semaphore;

pub struct ScriptedSource<T> {
    calls: AtomicUsize,
    responses: Mutex<VecDeque<Result<T, TransportError>>>,
    gate: Semaphore,
}

impl<T: Send + 'static> ScriptedSource<T> {
    /// Every fetch waits for a [`ScriptedSource::release`].
    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            responses: Mutex::new(VecDeque::new()),
            gate: Semaphore::new(0),
        })
    }

    /// Fetches complete as soon as they are polled.
    pub fn open() -> Arc<Self> {
        let source = Self::gated();
        source.gate.add_permits(Semaphore::MAX_PERMITS / 2);
        source
    }

    pub fn push_ok(&self, value: T) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(value));
        self
    }

    pub fn push_err(&self, err: TransportError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    /// Let `n` pending or future fetches complete.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    /// Number of fetches started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn next(self: &Arc<Self>) -> BoxFuture<'static, Result<T, TransportError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let source = Arc::clone(self);
        async move {
            source
                .gate
                .acquire()
                .await
                .map_err(|_| TransportError::Interrupted("gate closed".to_string()))?
                .forget();
            source
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::network("no scripted response")))
        }
        .boxed()
    }

    pub fn descriptor(self: &Arc<Self>, key: impl Into<QueryKey>) -> SourceDescriptor<T> {
        let source = Arc::clone(self);
        SourceDescriptor::new(key, move || source.next())
    }
}

pub fn offline() -> TransportError {
    TransportError::network("connection refused")
}

pub fn movie(id: u64, title: &str) -> Movie {
    Movie::new(id, title)
}

pub fn page(movies: &[(u64, &str)]) -> MoviePage {
    MoviePage::from_results(movies.iter().map(|(id, title)| movie(*id, title)).collect())
}

/// Catalog backed by one scripted source per section.
pub struct FakeCatalog {
    pub now_playing: Arc<ScriptedSource<MoviePage>>,
    pub trending: Arc<ScriptedSource<MoviePage>>,
    pub upcoming: Arc<ScriptedSource<MoviePage>>,
}

impl FakeCatalog {
    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            now_playing: ScriptedSource::gated(),
            trending: ScriptedSource::gated(),
            upcoming: ScriptedSource::gated(),
        })
    }

    pub fn open() -> Arc<Self> {
        Arc::new(Self {
            now_playing: ScriptedSource::open(),
            trending: ScriptedSource::open(),
            upcoming: ScriptedSource::open(),
        })
    }

    pub fn release_all(&self) {
        self.now_playing.release(1);
        self.trending.release(1);
        self.upcoming.release(1);
    }
}

#[async_trait]
impl MovieCatalog for FakeCatalog {
    async fn now_playing(&self) -> Result<MoviePage, TransportError> {
        self.now_playing.next().await
    }

    async fn trending(&self) -> Result<MoviePage, TransportError> {
        self.trending.next().await
    }

    async fn upcoming(&self) -> Result<MoviePage, TransportError> {
        self.upcoming.next().await
    }
}
