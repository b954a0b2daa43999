use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use marquee_model::{Movie, MoviePage};
use tokio::sync::watch;
use tracing::{debug, info};

use super::{MovieCatalog, Section};
use crate::error::TransportError;
use crate::feed::{FeedRow, assemble_feed};
use crate::query::{QueryCoordinator, RefetchFuture, SourceDescriptor};
use crate::view_model::{AggregateSnapshot, AggregateViewModel};

/// What the presentation layer should draw.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenView {
    /// At least one section has never produced a result.
    Loading,
    /// Ordered rows; empty when the upcoming list is unavailable.
    Ready {
        rows: Vec<FeedRow<Movie>>,
        refreshing: bool,
    },
}

impl ScreenView {
    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenView::Loading)
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(self, ScreenView::Ready { refreshing: true, .. })
    }

    pub fn rows(&self) -> &[FeedRow<Movie>] {
        match self {
            ScreenView::Loading => &[],
            ScreenView::Ready { rows, .. } => rows,
        }
    }
}

/// Movies screen state: owns the three section queries and the aggregate
/// view over them.
#[derive(Debug)]
pub struct MoviesScreen {
    coordinator: QueryCoordinator<MoviePage>,
    view_model: AggregateViewModel<MoviePage>,
}

impl MoviesScreen {
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        Self::with_coordinator(catalog, QueryCoordinator::new())
    }

    /// Register the screen's sections on an existing coordinator. Sections
    /// already registered there are reused as they are.
    pub fn with_coordinator(
        catalog: Arc<dyn MovieCatalog>,
        coordinator: QueryCoordinator<MoviePage>,
    ) -> Self {
        for section in Section::ALL {
            coordinator.register(section_descriptor(Arc::clone(&catalog), section));
        }
        let view_model =
            AggregateViewModel::new(&coordinator, Section::ALL.map(Section::key));

        Self {
            coordinator,
            view_model,
        }
    }

    /// Fetch every section that has not been fetched yet, concurrently.
    /// The fetches start immediately; the returned future completes when all
    /// of them have settled. Failures stay on their own section.
    pub fn mount(&self) -> BoxFuture<'static, ()> {
        let fetches: Vec<_> = Section::ALL
            .into_iter()
            .map(|section| {
                self.coordinator
                    .ensure_fetched(&section.key())
                    .map(move |outcome| (section, outcome))
            })
            .collect();

        async move {
            for (section, outcome) in future::join_all(fetches).await {
                if let Err(err) = outcome {
                    debug!(section = section.as_str(), error = %err, "section unavailable after mount");
                }
            }
        }
        .boxed()
    }

    /// Pull-to-refresh: refetch every section as one batch. Rendered content
    /// stays visible while the batch runs.
    pub fn refresh(&self) -> RefetchFuture<MoviePage> {
        info!("refreshing movies");
        self.coordinator.refetch_matching(&Section::namespace())
    }

    /// Current render state.
    pub fn view(&self) -> ScreenView {
        Self::project(&self.view_model.snapshot())
    }

    /// Map an aggregate snapshot to a render state. While the loading gate is
    /// closed no section data is consulted, even data that already arrived.
    pub fn project(snapshot: &AggregateSnapshot<MoviePage>) -> ScreenView {
        if snapshot.loading {
            return ScreenView::Loading;
        }

        let rows = assemble_feed(
            section_items(snapshot, Section::NowPlaying),
            section_items(snapshot, Section::Trending),
            section_items(snapshot, Section::Upcoming),
        );
        ScreenView::Ready {
            rows,
            refreshing: snapshot.refreshing,
        }
    }

    pub fn loading(&self) -> bool {
        self.view_model.loading()
    }

    pub fn refreshing(&self) -> bool {
        self.view_model.refreshing()
    }

    /// Last failure of one section, for optional display.
    pub fn error(&self, section: Section) -> Option<TransportError> {
        self.view_model.error(&section.key())
    }

    /// Receiver that wakes on every aggregate change.
    pub fn changes(&self) -> watch::Receiver<AggregateSnapshot<MoviePage>> {
        self.view_model.changes()
    }

    pub fn coordinator(&self) -> &QueryCoordinator<MoviePage> {
        &self.coordinator
    }

    pub fn view_model(&self) -> &AggregateViewModel<MoviePage> {
        &self.view_model
    }

    /// Drop the screen's cache entries. Fetches still running finish, but
    /// their results are discarded.
    pub fn unmount(self) {
        for section in Section::ALL {
            self.coordinator.remove(&section.key());
        }
    }
}

fn section_descriptor(
    catalog: Arc<dyn MovieCatalog>,
    section: Section,
) -> SourceDescriptor<MoviePage> {
    SourceDescriptor::new(section.key(), move || {
        let catalog = Arc::clone(&catalog);
        async move {
            match section {
                Section::NowPlaying => catalog.now_playing().await,
                Section::Trending => catalog.trending().await,
                Section::Upcoming => catalog.upcoming().await,
            }
        }
    })
}

fn section_items(
    snapshot: &AggregateSnapshot<MoviePage>,
    section: Section,
) -> Option<&[Movie]> {
    snapshot.section(&section.key()).map(|page| page.results())
}
