use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Poster widths published by the TMDB image CDN (2:3 aspect ratio).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PosterSize {
    W92,
    W154,
    W185,
    W342,
    #[default]
    W500,
    W780,
    Original,
}

impl PosterSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterSize::W92 => "w92",
            PosterSize::W154 => "w154",
            PosterSize::W185 => "w185",
            PosterSize::W342 => "w342",
            PosterSize::W500 => "w500",
            PosterSize::W780 => "w780",
            PosterSize::Original => "original",
        }
    }
}

/// Backdrop widths published by the TMDB image CDN (16:9 aspect ratio).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BackdropSize {
    W300,
    #[default]
    W780,
    W1280,
    Original,
}

impl BackdropSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackdropSize::W300 => "w300",
            BackdropSize::W780 => "w780",
            BackdropSize::W1280 => "w1280",
            BackdropSize::Original => "original",
        }
    }
}

/// Image size variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSize {
    Poster(PosterSize),
    Backdrop(BackdropSize),
}

impl ImageSize {
    /// Default poster size used by list and rail cards
    pub const fn poster() -> Self {
        Self::Poster(PosterSize::W500)
    }

    /// Default backdrop size used by carousel slides
    pub const fn backdrop() -> Self {
        Self::Backdrop(BackdropSize::W780)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Poster(s) => s.as_str(),
            ImageSize::Backdrop(s) => s.as_str(),
        }
    }
}

impl Display for ImageSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ImageSize::Poster(s) => write!(f, "Poster ({})", s.as_str()),
            ImageSize::Backdrop(s) => write!(f, "Backdrop ({})", s.as_str()),
        }
    }
}

/// Build an absolute image URL from the CDN base, a size, and the relative
/// path carried on an item (`/abc.jpg`).
///
/// Returns `None` for an empty path so callers can skip the image instead of
/// requesting a broken URL.
pub fn image_url(base: &str, size: ImageSize, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Some(format!("{base}/{}/{path}", size.as_str()))
}
