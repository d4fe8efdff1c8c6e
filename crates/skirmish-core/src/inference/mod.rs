//! Faction Inference
//!
//! Iterative, conservative label propagation over the interaction graph.
//!
//! Every interaction is read as "subject and object are on opposite sides".
//! Each pass counts, for every unlabeled participant, how many labeled
//! neighbors point at each faction, then commits only the participants whose
//! evidence is lopsided enough. Passes repeat until one commits nothing.

pub mod engine;
pub mod tally;

pub use engine::{collect_evidence, InferenceEngine, InferenceOutcome, PassReport, Termination};
pub use tally::{Tally, Verdict};
