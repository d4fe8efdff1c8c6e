//! Shared interaction types for the skirmish faction tool.
//!
//! This crate contains pure data structures with no inference logic:
//! participant identities, the two factions, interaction records, the
//! JSONL interaction log, and the write-once label state.
//! It is a dependency for all other crates in the workspace.

pub mod faction;
pub mod interaction;
pub mod labels;
pub mod log;
pub mod participant;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export participant types
pub use participant::ParticipantId;

// Re-export faction types
pub use faction::{Faction, FactionNames};

// Re-export interaction types
pub use interaction::{Interaction, InteractionTime, ParseTimeError};

// Re-export log types
pub use log::{InteractionLog, LoadError, LoadOptions};

// Re-export label types
pub use labels::{LabelState, SeedError};
