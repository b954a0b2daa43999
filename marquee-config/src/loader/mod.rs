pub mod error;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use crate::constants::{
    DEFAULT_CONFIG_CANDIDATES, DEFAULT_LANGUAGE, DEFAULT_TIMEOUT,
    DEFAULT_TMDB_BASE_URL, DEFAULT_TMDB_IMAGE_BASE_URL,
};
use crate::models::sources::{EnvConfig, FileConfig};
use crate::models::{
    Config, ConfigMetadata, FeedConfig, LoggingConfig, TmdbConfig,
    TmdbCredentials,
};
use crate::util::parse_duration;
use crate::validation::{ConfigWarnings, validate};
use error::ConfigLoadError;

/// Result of a successful load: the merged config plus anything worth
/// telling the operator about.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

/// Values given on the command line. They win over every other layer and
/// go through the same validation.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub language: Option<String>,
    pub region: Option<String>,
}

/// Builds a [`Config`] from defaults, an optional file, and the environment.
///
/// Precedence per field: overrides, environment, file, built-in default.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
    load_dotenv: bool,
    env: Option<EnvConfig>,
    overrides: ConfigOverrides,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_file: None,
            load_dotenv: true,
            env: None,
            overrides: ConfigOverrides::default(),
        }
    }

    /// Read this file instead of `$MARQUEE_CONFIG_PATH` or the default
    /// candidates. A missing file is an error.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Load this env file instead of searching for `.env`.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self.load_dotenv = true;
        self
    }

    pub fn without_dotenv(mut self) -> Self {
        self.load_dotenv = false;
        self
    }

    /// Use these values instead of reading the process environment.
    pub fn with_env(mut self, env: EnvConfig) -> Self {
        self.env = Some(env);
        self
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_env_file()?;
        let env = self.env.clone().unwrap_or_else(EnvConfig::gather);

        let config_path = self
            .config_path
            .clone()
            .or_else(|| env.config_path.clone())
            .or_else(find_default_file);
        let file = match &config_path {
            Some(path) => read_file(path)?,
            None => FileConfig::default(),
        };
        debug!(
            config_path = ?config_path,
            env_file_loaded,
            "loading configuration"
        );

        let metadata = ConfigMetadata {
            config_path,
            env_file_loaded,
        };
        let config = merge(file, env, self.overrides.clone(), metadata)?;
        let warnings = validate(&config)?;

        Ok(ConfigLoad { config, warnings })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        if !self.load_dotenv {
            return Ok(false);
        }

        match &self.env_file {
            Some(path) => dotenvy::from_path(path).map(|()| true).map_err(
                |source| ConfigLoadError::EnvFile {
                    path: path.clone(),
                    source,
                },
            ),
            None => match dotenvy::dotenv() {
                Ok(_) => Ok(true),
                Err(err) if err.not_found() => Ok(false),
                Err(source) => Err(ConfigLoadError::EnvFile {
                    path: PathBuf::from(".env"),
                    source,
                }),
            },
        }
    }
}

/// Parse a config file, choosing the format from its extension. Anything
/// that is not `.json` is read as TOML.
pub fn read_file(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&contents).map_err(|source| {
            ConfigLoadError::ParseJson {
                path: path.to_path_buf(),
                source,
            }
        }),
        _ => toml::from_str(&contents).map_err(|source| {
            ConfigLoadError::ParseToml {
                path: path.to_path_buf(),
                source,
            }
        }),
    }
}

fn find_default_file() -> Option<PathBuf> {
    DEFAULT_CONFIG_CANDIDATES
        .iter()
        .map(Path::new)
        .find(|path| path.exists())
        .map(Path::to_path_buf)
}

fn merge(
    file: FileConfig,
    env: EnvConfig,
    overrides: ConfigOverrides,
    metadata: ConfigMetadata,
) -> Result<Config, ConfigLoadError> {
    let FileConfig {
        tmdb,
        feed,
        logging,
    } = file;

    let base_url = parse_url(
        "tmdb.base_url",
        present(env.tmdb_base_url.or(tmdb.base_url)).as_deref(),
        DEFAULT_TMDB_BASE_URL,
    )?;
    let image_base_url = parse_url(
        "tmdb.image_base_url",
        present(env.tmdb_image_base_url.or(tmdb.image_base_url)).as_deref(),
        DEFAULT_TMDB_IMAGE_BASE_URL,
    )?;

    let timeout = match present(env.tmdb_timeout.or(tmdb.timeout)) {
        Some(raw) => parse_duration(&raw).map_err(|err| {
            ConfigLoadError::invalid("tmdb.timeout", format!("'{raw}': {err}"))
        })?,
        None => DEFAULT_TIMEOUT,
    };

    // A bearer token wins over an API key regardless of which layer set it.
    let credentials = present(env.tmdb_access_token.or(tmdb.access_token))
        .map(TmdbCredentials::AccessToken)
        .or_else(|| {
            present(env.tmdb_api_key.or(tmdb.api_key))
                .map(TmdbCredentials::ApiKey)
        });

    let defaults = FeedConfig::default();

    Ok(Config {
        tmdb: TmdbConfig {
            base_url,
            image_base_url,
            credentials,
            language: present(overrides.language)
                .or_else(|| present(env.tmdb_language.or(tmdb.language)))
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            region: present(overrides.region)
                .or_else(|| present(env.tmdb_region.or(tmdb.region))),
            timeout,
        },
        feed: FeedConfig {
            title_max_chars: feed
                .title_max_chars
                .unwrap_or(defaults.title_max_chars),
            overview_max_chars: feed
                .overview_max_chars
                .unwrap_or(defaults.overview_max_chars),
            date_format: feed.date_format.unwrap_or(defaults.date_format),
            trending_window: feed
                .trending_window
                .unwrap_or(defaults.trending_window),
        },
        logging: present(env.log_filter.or(logging.filter))
            .map(|filter| LoggingConfig { filter })
            .unwrap_or_default(),
        metadata,
    })
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_url(
    field: &'static str,
    raw: Option<&str>,
    default: &str,
) -> Result<Url, ConfigLoadError> {
    let raw = raw.unwrap_or(default);
    Url::parse(raw)
        .map_err(|err| ConfigLoadError::invalid(field, format!("'{raw}': {err}")))
}
