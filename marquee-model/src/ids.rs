use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a catalog item, as assigned by the upstream API.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl MovieId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for MovieId {
    fn from(value: u64) -> Self {
        MovieId(value)
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
