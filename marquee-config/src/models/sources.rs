use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use marquee_core::display::DateFormat;

use super::TrendingWindow;
use crate::util::non_empty_var;

/// Raw configuration as defined in a TOML (or JSON) file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub tmdb: FileTmdbConfig,
    #[serde(default)]
    pub feed: FileFeedConfig,
    #[serde(default)]
    pub logging: FileLoggingConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileTmdbConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Human duration, e.g. `"15s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileFeedConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_max_chars: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview_max_chars: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<DateFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trending_window: Option<TrendingWindow>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileLoggingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub tmdb_api_key: Option<String>,
    pub tmdb_access_token: Option<String>,
    pub tmdb_base_url: Option<String>,
    pub tmdb_image_base_url: Option<String>,
    pub tmdb_language: Option<String>,
    pub tmdb_region: Option<String>,
    pub tmdb_timeout: Option<String>,
    pub log_filter: Option<String>,
    pub config_path: Option<PathBuf>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            tmdb_api_key: non_empty_var("TMDB_API_KEY"),
            tmdb_access_token: non_empty_var("TMDB_ACCESS_TOKEN"),
            tmdb_base_url: non_empty_var("TMDB_BASE_URL"),
            tmdb_image_base_url: non_empty_var("TMDB_IMAGE_BASE_URL"),
            tmdb_language: non_empty_var("TMDB_LANGUAGE"),
            tmdb_region: non_empty_var("TMDB_REGION"),
            tmdb_timeout: non_empty_var("TMDB_TIMEOUT"),
            log_filter: non_empty_var("MARQUEE_LOG"),
            config_path: non_empty_var("MARQUEE_CONFIG_PATH").map(PathBuf::from),
        }
    }
}
