use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid TOML in {}", path.display())]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid JSON in {}", path.display())]
    ParseJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to load env file {}", path.display())]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },
    #[error("invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ConfigLoadError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ConfigLoadError::Invalid {
            field,
            message: message.into(),
        }
    }
}
