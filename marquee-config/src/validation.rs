use std::fmt;

use tracing::warn;
use url::Url;

use crate::loader::error::ConfigLoadError;
use crate::models::Config;

/// Non-fatal configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.items.push(ConfigWarning {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.items.iter().any(|warning| warning.field == field)
    }

    /// Emit every warning through `tracing`.
    pub fn log(&self) {
        for warning in &self.items {
            warn!(field = warning.field, "{}", warning.message);
        }
    }
}

/// Reject values the screen cannot work with and collect the ones that
/// merely degrade it.
pub(crate) fn validate(config: &Config) -> Result<ConfigWarnings, ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    check_base("tmdb.base_url", &config.tmdb.base_url)?;
    check_base("tmdb.image_base_url", &config.tmdb.image_base_url)?;

    if config.tmdb.timeout.is_zero() {
        return Err(ConfigLoadError::invalid(
            "tmdb.timeout",
            "must be greater than zero",
        ));
    }
    if config.feed.title_max_chars == 0 {
        return Err(ConfigLoadError::invalid(
            "feed.title_max_chars",
            "must be greater than zero",
        ));
    }
    if config.feed.overview_max_chars == 0 {
        return Err(ConfigLoadError::invalid(
            "feed.overview_max_chars",
            "must be greater than zero",
        ));
    }

    if config.tmdb.credentials.is_none() {
        warnings.push(
            "tmdb.api_key",
            "no TMDB credentials configured; set TMDB_API_KEY or TMDB_ACCESS_TOKEN",
        );
    } else if config.tmdb.base_url.scheme() == "http" && !is_loopback(&config.tmdb.base_url) {
        warnings.push(
            "tmdb.base_url",
            "credentials will be sent over plain http",
        );
    }

    if let Some(region) = &config.tmdb.region
        && (region.len() != 2 || !region.chars().all(|c| c.is_ascii_alphabetic()))
    {
        warnings.push(
            "tmdb.region",
            format!("'{region}' is not an ISO 3166-1 alpha-2 code"),
        );
    }

    Ok(warnings)
}

fn check_base(field: &'static str, url: &Url) -> Result<(), ConfigLoadError> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigLoadError::invalid(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.cannot_be_a_base() {
        return Err(ConfigLoadError::invalid(field, "not a base URL"));
    }
    Ok(())
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain == "localhost",
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
