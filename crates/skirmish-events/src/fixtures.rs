//! Sample data fixtures for testing.
//!
//! This module provides a ready-made snowball fight log for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // skirmish-events = { path = "../skirmish-events", features = ["test-fixtures"] }
//!
//! use skirmish_events::fixtures;
//!
//! let log = fixtures::sample_log();
//! let seeds = fixtures::sample_seeds();
//! ```

use crate::{Faction, InteractionLog, LabelState, LoadOptions};

/// Raw JSONL of the sample log.
pub const SAMPLE_INTERACTIONS_JSONL: &str =
    include_str!("../tests/fixtures/sample_interactions.jsonl");

/// Returns the sample interaction log.
///
/// Contains 36 interactions among 16 participants:
/// - 6 seeded participants, including fights between seeds
/// - Frosty, Jingle and Blizzard, resolvable from seeds directly
/// - Sleet, resolvable only once Frosty is labeled
/// - Cocoa, resolvable only once Sleet is labeled
/// - Tinsel (tied) and Icicle (5 vs 3), never resolvable
/// - Mittens and Scarf, fighting only each other
/// - Snowdrift, hitting only itself
pub fn sample_log() -> InteractionLog {
    InteractionLog::from_jsonl_str(SAMPLE_INTERACTIONS_JSONL, &LoadOptions::default())
        .unwrap_or_else(|e| panic!("Failed to parse sample interactions: {}", e))
}

/// Returns the seed labels matching the sample log.
///
/// Reindeer (faction A): bsims, SammyxxFairy.
/// Penguin (faction B): VMKNeec, Luckymaxer, Winnie, BuckyBarnes.
pub fn sample_seeds() -> LabelState {
    LabelState::from_seeds([
        ("bsims", Faction::A),
        ("SammyxxFairy", Faction::A),
        ("VMKNeec", Faction::B),
        ("Luckymaxer", Faction::B),
        ("Winnie", Faction::B),
        ("BuckyBarnes", Faction::B),
    ])
    .expect("sample seeds are consistent")
}
