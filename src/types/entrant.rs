//! Entrants and seeds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use super::ids::EntrantId;
use super::round::Region;

/// Returned when a seed is outside `1..=16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("seed {0} is outside 1..=16")]
pub struct InvalidSeed(pub u8);

/// A seed within a region, always in `1..=16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Seed(u8);

impl Seed {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 16;

    pub fn new(n: u8) -> Result<Self, InvalidSeed> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(Seed(n))
        } else {
            Err(InvalidSeed(n))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every seed, best first.
    pub fn all() -> impl Iterator<Item = Seed> {
        (Self::MIN..=Self::MAX).map(Seed)
    }
}

impl TryFrom<u8> for Seed {
    type Error = InvalidSeed;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Seed::new(n)
    }
}

impl From<Seed> for u8 {
    fn from(seed: Seed) -> u8 {
        seed.0
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A competitor in the tournament.
///
/// Entrants are created once at setup and only change through administrative
/// correction; the core never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,

    pub display_name: String,

    pub region: Region,

    pub seed: Seed,

    /// Free-form attributes (department, title, ...). Opaque to the core.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Entrant {
    pub fn new(
        id: impl Into<EntrantId>,
        display_name: impl Into<String>,
        region: Region,
        seed: Seed,
    ) -> Self {
        Entrant {
            id: id.into(),
            display_name: display_name.into(),
            region,
            seed,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for Entrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {} [{}]", self.seed, self.display_name, self.region)
    }
}
