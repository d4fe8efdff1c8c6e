//! Faction inference for pairwise interaction logs.
//!
//! Given an attacker/victim style event stream and a few participants whose
//! faction is known, infers the faction of everyone else the evidence
//! allows and summarizes per-participant activity.
//!
//! # Architecture
//!
//! ```text
//! interactions.jsonl ──▶ InteractionLog ─┐
//!                                        ├─▶ InferenceEngine ──▶ ActivityReport ──▶ report.json
//! config.toml ──▶ seeds ──▶ LabelState ──┘
//! ```
//!
//! # Modules
//!
//! - [`config`]: TOML configuration and seed lists
//! - [`inference`]: Evidence tallies and the fixpoint engine
//! - [`report`]: Per-participant counts joined with labels
//! - [`output`]: JSON and JSONL writers

pub mod config;
pub mod error;
pub mod inference;
pub mod output;
pub mod report;

pub use config::{default_config_toml, ConfigError, InferenceConfig, SeedConfig, SkirmishConfig};
pub use error::{Result, SkirmishError};
pub use inference::{
    collect_evidence, InferenceEngine, InferenceOutcome, PassReport, Tally, Termination, Verdict,
};
pub use output::{render_report, write_records_jsonl, write_report, OutputError};
pub use report::{matches_search, ActivityReport, FactionSummary, ParticipantRecord, ReportOptions};

use skirmish_events::{InteractionLog, LabelState};

/// Everything produced by one run over a loaded log.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub outcome: InferenceOutcome,
    pub report: ActivityReport,
}

/// Runs inference and aggregation over an already-loaded log.
pub fn analyze(
    log: &InteractionLog,
    seeds: LabelState,
    config: &SkirmishConfig,
) -> Analysis {
    let engine = InferenceEngine::new(config.inference.clone());
    let outcome = engine.infer(log, seeds);
    let report = ActivityReport::build(log, &outcome.labels, &config.report);
    Analysis { outcome, report }
}

/// Loads the log at `input`, builds seeds from the config, and analyzes.
pub fn run_file(input: &std::path::Path, config: &SkirmishConfig) -> Result<Analysis> {
    let log = InteractionLog::from_path(input, &config.input)?;
    let seeds = config.seeds.labels()?;
    if seeds.is_empty() {
        tracing::warn!("no seed labels configured; nothing can be inferred");
    }
    Ok(analyze(&log, seeds, config))
}
