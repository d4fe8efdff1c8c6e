//! Fixpoint propagation engine.

use std::collections::BTreeMap;

use serde::Serialize;
use skirmish_events::{Faction, InteractionLog, LabelState, ParticipantId};

use super::tally::{Tally, Verdict};
use crate::config::InferenceConfig;

/// Why the engine stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The last pass committed no new labels
    Fixpoint,
    /// The configured pass limit was reached first
    PassLimit,
}

/// What happened during one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// 1-based pass number
    pub pass: usize,
    /// Labels committed by this pass, sorted by participant
    pub committed: Vec<(ParticipantId, Faction)>,
    /// Participants that had evidence but stayed unlabeled, with their tallies
    pub deferred: Vec<(ParticipantId, Tally)>,
}

impl PassReport {
    pub fn changed(&self) -> bool {
        !self.committed.is_empty()
    }
}

/// Result of an inference run.
#[derive(Debug, Clone)]
pub struct InferenceOutcome {
    /// Seeds plus every committed label
    pub labels: LabelState,
    /// One report per pass, in order
    pub passes: Vec<PassReport>,
    pub termination: Termination,
}

impl InferenceOutcome {
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    pub fn reached_fixpoint(&self) -> bool {
        self.termination == Termination::Fixpoint
    }

    /// Labels added on top of the seeds, in commit order.
    pub fn inferred(&self) -> impl Iterator<Item = &(ParticipantId, Faction)> {
        self.passes.iter().flat_map(|p| p.committed.iter())
    }
}

/// Runs label propagation to a fixpoint.
#[derive(Debug, Clone, Default)]
pub struct InferenceEngine {
    config: InferenceConfig,
}

impl InferenceEngine {
    pub fn new(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// Extends the seed labels as far as the evidence allows.
    ///
    /// Seeds are never revised. Each pass reads the labels as they stood at
    /// the start of the pass and commits all of its decisions together, so
    /// results do not depend on interaction order within a pass. The pass
    /// limit, if any, is checked only between passes.
    pub fn infer(&self, log: &InteractionLog, seeds: LabelState) -> InferenceOutcome {
        let mut labels = seeds;
        let mut passes: Vec<PassReport> = Vec::new();

        loop {
            if let Some(limit) = self.config.max_passes {
                if passes.len() >= limit {
                    tracing::warn!(
                        passes = passes.len(),
                        labeled = labels.len(),
                        "pass limit reached before fixpoint"
                    );
                    return InferenceOutcome {
                        labels,
                        passes,
                        termination: Termination::PassLimit,
                    };
                }
            }

            let evidence = collect_evidence(log, &labels);
            let report = commit_pass(&mut labels, evidence, passes.len() + 1);

            tracing::debug!(
                pass = report.pass,
                committed = report.committed.len(),
                deferred = report.deferred.len(),
                "inference pass complete"
            );

            let changed = report.changed();
            passes.push(report);

            if !changed {
                tracing::info!(
                    passes = passes.len(),
                    labeled = labels.len(),
                    "inference reached fixpoint"
                );
                return InferenceOutcome {
                    labels,
                    passes,
                    termination: Termination::Fixpoint,
                };
            }
        }
    }
}

/// Sweeps every interaction once and tallies votes for unlabeled endpoints.
///
/// An interaction votes only when exactly one endpoint is labeled: the
/// unlabeled endpoint gets one vote for the opposite faction. Repeated
/// interactions vote repeatedly.
pub fn collect_evidence(log: &InteractionLog, labels: &LabelState) -> BTreeMap<ParticipantId, Tally> {
    let mut tallies: BTreeMap<ParticipantId, Tally> = BTreeMap::new();

    for interaction in log {
        match (labels.get(&interaction.subject), labels.get(&interaction.object)) {
            (Some(faction), None) => tallies
                .entry(interaction.object.clone())
                .or_default()
                .vote(faction.opposite()),
            (None, Some(faction)) => tallies
                .entry(interaction.subject.clone())
                .or_default()
                .vote(faction.opposite()),
            _ => {}
        }
    }

    tallies
}

fn commit_pass(
    labels: &mut LabelState,
    evidence: BTreeMap<ParticipantId, Tally>,
    pass: usize,
) -> PassReport {
    let mut committed = Vec::new();
    let mut deferred = Vec::new();

    // Decide everything against the same snapshot before writing anything
    for (id, tally) in evidence {
        match tally.verdict() {
            Verdict::Commit(faction) => committed.push((id, faction)),
            Verdict::Defer => deferred.push((id, tally)),
        }
    }

    for (id, faction) in &committed {
        if labels.assign(id.clone(), *faction) {
            tracing::trace!(pass, participant = %id, faction = %faction, "label committed");
        }
    }

    PassReport {
        pass,
        committed,
        deferred,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_events::{Interaction, InteractionTime};

    fn id(s: &str) -> ParticipantId {
        ParticipantId::parse(s).unwrap()
    }

    fn log(pairs: &[(&str, &str)]) -> InteractionLog {
        let time: InteractionTime = "2025-12-20 18:00:00".parse().unwrap();
        InteractionLog::new(
            pairs
                .iter()
                .map(|(s, o)| Interaction::new(id(s), id(o), time))
                .collect(),
        )
    }

    fn seeds(pairs: &[(&str, Faction)]) -> LabelState {
        LabelState::from_seeds(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_one_sided_resolution() {
        let log = log(&[("X", "Z"), ("X", "Z"), ("X", "Z")]);
        let outcome = InferenceEngine::default().infer(&log, seeds(&[("X", Faction::A)]));

        assert_eq!(outcome.labels.get(&id("Z")), Some(Faction::B));
        assert_eq!(outcome.passes[0].committed, vec![(id("Z"), Faction::B)]);
        assert_eq!(outcome.pass_count(), 2);
        assert!(outcome.reached_fixpoint());
    }

    #[test]
    fn test_tied_evidence_stays_unresolved() {
        let log = log(&[("X", "Z"), ("Z", "Y"), ("X", "Z"), ("Z", "Y")]);
        let outcome = InferenceEngine::default()
            .infer(&log, seeds(&[("X", Faction::A), ("Y", Faction::B)]));

        assert!(!outcome.labels.contains(&id("Z")));
        assert_eq!(outcome.labels.len(), 2);
        assert_eq!(outcome.pass_count(), 1);
        assert_eq!(outcome.passes[0].deferred, vec![(id("Z"), Tally::new(2, 2))]);
    }

    #[test]
    fn test_dominance_resolution() {
        // 7 votes for A (hit by B), 3 votes for B (hit by A)
        let mut pairs = vec![("P", "Z"); 7];
        pairs.extend(vec![("R", "Z"); 3]);
        let outcome = InferenceEngine::default()
            .infer(&log(&pairs), seeds(&[("R", Faction::A), ("P", Faction::B)]));

        assert_eq!(outcome.labels.get(&id("Z")), Some(Faction::A));
    }

    #[test]
    fn test_within_band_stays_unresolved() {
        let mut pairs = vec![("P", "Z"); 5];
        pairs.extend(vec![("R", "Z"); 3]);
        let outcome = InferenceEngine::default()
            .infer(&log(&pairs), seeds(&[("R", Faction::A), ("P", Faction::B)]));

        assert!(!outcome.labels.contains(&id("Z")));
    }

    #[test]
    fn test_propagates_across_passes() {
        // X(A) -> M, M -> N, N -> O
        let log = log(&[("X", "M"), ("M", "N"), ("N", "O")]);
        let outcome = InferenceEngine::default().infer(&log, seeds(&[("X", Faction::A)]));

        assert_eq!(outcome.labels.get(&id("M")), Some(Faction::B));
        assert_eq!(outcome.labels.get(&id("N")), Some(Faction::A));
        assert_eq!(outcome.labels.get(&id("O")), Some(Faction::B));
        assert_eq!(outcome.pass_count(), 4);
        assert_eq!(outcome.passes[1].committed, vec![(id("N"), Faction::A)]);
    }

    #[test]
    fn test_no_in_pass_feedback() {
        // M resolves in pass 1; N must wait for pass 2 even though the
        // M -> N interaction is read after M's evidence.
        let log = log(&[("X", "M"), ("M", "N")]);
        let outcome = InferenceEngine::default().infer(&log, seeds(&[("X", Faction::A)]));

        assert_eq!(outcome.passes[0].committed, vec![(id("M"), Faction::B)]);
        assert_eq!(outcome.passes[1].committed, vec![(id("N"), Faction::A)]);
    }

    #[test]
    fn test_seeds_are_never_revised() {
        // Two seeds of the same faction fighting each other
        let log = log(&[("X", "Y"), ("Y", "X"), ("X", "Y")]);
        let initial = seeds(&[("X", Faction::A), ("Y", Faction::A)]);
        let outcome = InferenceEngine::default().infer(&log, initial.clone());

        assert_eq!(outcome.labels, initial);
        assert_eq!(outcome.pass_count(), 1);
    }

    #[test]
    fn test_seed_overrides_evidence() {
        // Y is seeded A although X(A) attacks it repeatedly
        let log = log(&[("X", "Y"), ("X", "Y"), ("X", "Y")]);
        let outcome = InferenceEngine::default()
            .infer(&log, seeds(&[("X", Faction::A), ("Y", Faction::A)]));

        assert_eq!(outcome.labels.get(&id("Y")), Some(Faction::A));
    }

    #[test]
    fn test_self_interaction_is_no_evidence() {
        let log = log(&[("Z", "Z"), ("Z", "Z")]);
        let outcome = InferenceEngine::default().infer(&log, seeds(&[("X", Faction::A)]));

        assert!(!outcome.labels.contains(&id("Z")));
        assert!(outcome.passes[0].deferred.is_empty());
    }

    #[test]
    fn test_empty_input_terminates_immediately() {
        let outcome = InferenceEngine::default().infer(&InteractionLog::default(), LabelState::new());

        assert!(outcome.labels.is_empty());
        assert_eq!(outcome.pass_count(), 1);
        assert!(outcome.reached_fixpoint());
    }

    #[test]
    fn test_no_seeds_labels_nothing() {
        let log = log(&[("A1", "B1"), ("B1", "A1")]);
        let outcome = InferenceEngine::default().infer(&log, LabelState::new());

        assert!(outcome.labels.is_empty());
        assert!(outcome.passes[0].deferred.is_empty());
    }

    #[test]
    fn test_pass_limit_stops_between_passes() {
        let log = log(&[("X", "M"), ("M", "N"), ("N", "O")]);
        let engine = InferenceEngine::new(InferenceConfig {
            max_passes: Some(2),
        });
        let outcome = engine.infer(&log, seeds(&[("X", Faction::A)]));

        assert_eq!(outcome.termination, Termination::PassLimit);
        assert_eq!(outcome.pass_count(), 2);
        assert!(outcome.labels.contains(&id("N")));
        assert!(!outcome.labels.contains(&id("O")));
    }

    #[test]
    fn test_inferred_lists_commits_in_order() {
        let log = log(&[("X", "M"), ("M", "N")]);
        let outcome = InferenceEngine::default().infer(&log, seeds(&[("X", Faction::A)]));

        let inferred: Vec<_> = outcome.inferred().cloned().collect();
        assert_eq!(inferred, vec![(id("M"), Faction::B), (id("N"), Faction::A)]);
    }

    #[test]
    fn test_collect_evidence_counts_multiplicity() {
        let log = log(&[("X", "Z"), ("Z", "X"), ("Y", "Z")]);
        let labels = seeds(&[("X", Faction::A), ("Y", Faction::B)]);
        let evidence = collect_evidence(&log, &labels);

        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[&id("Z")], Tally::new(1, 2));
    }
}
