use thiserror::Error;

use crate::query::QueryKey;

/// Failure reported by a fetch operation.
///
/// The core never inspects the variant; it records the error on the entry
/// that produced it and hands it back to whoever asks. `Clone` because every
/// caller attached to the same in-flight fetch receives its own copy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Fetch interrupted: {0}")]
    Interrupted(String),
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        TransportError::Network(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        TransportError::Decode(message.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("No source registered for query {0}")]
    UnknownKey(QueryKey),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, QueryError>;
