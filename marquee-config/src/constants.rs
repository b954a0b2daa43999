use std::time::Duration;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_LOG_FILTER: &str = "info,marquee_core=debug";

/// Files probed, in order, when no config path is given.
pub const DEFAULT_CONFIG_CANDIDATES: &[&str] = &[
    "marquee.toml",
    "marquee.json",
    "config/marquee.toml",
    "config/marquee.json",
];
