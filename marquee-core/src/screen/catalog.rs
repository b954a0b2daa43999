use async_trait::async_trait;
use marquee_model::MoviePage;

use crate::error::TransportError;
use crate::query::QueryKey;

/// Remote source for the three screen sections.
///
/// Each call returns the first page of its collection or fails as a whole;
/// there are no partial results.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn now_playing(&self) -> Result<MoviePage, TransportError>;

    async fn trending(&self) -> Result<MoviePage, TransportError>;

    async fn upcoming(&self) -> Result<MoviePage, TransportError>;
}

/// Sections of the movies screen, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Carousel at the top.
    NowPlaying,
    /// Horizontal rail under the carousel.
    Trending,
    /// Vertical list, one row per movie.
    Upcoming,
}

impl Section {
    pub const ALL: [Section; 3] =
        [Section::NowPlaying, Section::Trending, Section::Upcoming];

    /// Shared first segment of every section key.
    pub const NAMESPACE: &'static str = "movies";

    pub fn key(self) -> QueryKey {
        QueryKey::from([Self::NAMESPACE, self.as_str()])
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Section::NowPlaying => "nowPlaying",
            Section::Trending => "trending",
            Section::Upcoming => "upcoming",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::NowPlaying => "Now Playing",
            Section::Trending => "Trending Movies",
            Section::Upcoming => "Coming Soon",
        }
    }

    pub fn namespace() -> QueryKey {
        QueryKey::from(Self::NAMESPACE)
    }
}
