//! Faction Types
//!
//! The two mutually exclusive groups a participant can belong to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two factions.
///
/// The factions are symmetric; which real-world group is `A` and which is
/// `B` is decided by the caller through [`FactionNames`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    A,
    B,
}

impl Faction {
    /// Returns the other faction.
    pub fn opposite(self) -> Self {
        match self {
            Faction::A => Faction::B,
            Faction::B => Faction::A,
        }
    }

    /// Returns both faction variants.
    pub fn all() -> &'static [Faction] {
        &[Faction::A, Faction::B]
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::A => write!(f, "a"),
            Faction::B => write!(f, "b"),
        }
    }
}

/// Display names for the two factions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactionNames {
    /// Name shown for faction A
    pub a: String,
    /// Name shown for faction B
    pub b: String,
}

impl Default for FactionNames {
    fn default() -> Self {
        Self {
            a: "Reindeer".to_string(),
            b: "Penguin".to_string(),
        }
    }
}

impl FactionNames {
    /// Returns the display name of a faction.
    pub fn name(&self, faction: Faction) -> &str {
        match faction {
            Faction::A => &self.a,
            Faction::B => &self.b,
        }
    }
}
