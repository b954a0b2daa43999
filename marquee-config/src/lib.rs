//! Shared configuration library for Marquee.
//!
//! Settings are layered: built-in defaults, then an optional TOML (or JSON)
//! file, then `.env` / process environment variables. The loader returns the
//! merged [`Config`] together with any non-fatal [`ConfigWarnings`] so the
//! caller decides how loudly to report them.

#![allow(missing_docs)]

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, ConfigOverrides, error::ConfigLoadError};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{
    Config, ConfigMetadata, FeedConfig, LoggingConfig, TmdbConfig,
    TmdbCredentials, TrendingWindow,
};
pub use validation::{ConfigWarning, ConfigWarnings};
