pub mod sources;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use marquee_core::display::DateFormat;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb: TmdbConfig,
    pub feed: FeedConfig,
    pub logging: LoggingConfig,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub base_url: Url,
    pub image_base_url: Url,
    pub credentials: Option<TmdbCredentials>,
    pub language: String,
    pub region: Option<String>,
    pub timeout: Duration,
}

/// How requests authenticate against the TMDB API.
#[derive(Clone, PartialEq, Eq)]
pub enum TmdbCredentials {
    /// v3 key sent as the `api_key` query parameter.
    ApiKey(String),
    /// v4 read access token sent as a bearer token.
    AccessToken(String),
}

impl TmdbCredentials {
    pub fn kind(&self) -> &'static str {
        match self {
            TmdbCredentials::ApiKey(_) => "api_key",
            TmdbCredentials::AccessToken(_) => "access_token",
        }
    }
}

// Secrets never reach logs.
impl fmt::Debug for TmdbCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TmdbCredentials::{}(<redacted>)", self.kind())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub title_max_chars: usize,
    pub overview_max_chars: usize,
    pub date_format: DateFormat,
    pub trending_window: TrendingWindow,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title_max_chars: marquee_core::display::TITLE_MAX_CHARS,
            overview_max_chars: marquee_core::display::OVERVIEW_MAX_CHARS,
            date_format: DateFormat::default(),
            trending_window: TrendingWindow::default(),
        }
    }
}

/// Time window of the trending collection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TrendingWindow {
    Day,
    #[default]
    Week,
}

impl TrendingWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingWindow::Day => "day",
            TrendingWindow::Week => "week",
        }
    }
}

impl FromStr for TrendingWindow {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(TrendingWindow::Day),
            "week" => Ok(TrendingWindow::Week),
            other => Err(format!("unknown trending window '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: crate::constants::DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
