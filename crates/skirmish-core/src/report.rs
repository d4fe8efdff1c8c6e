//! Activity Report
//!
//! Per-participant interaction counts joined with the final faction labels.
//! Participants whose faction never resolved are listed separately and left
//! out of the records.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use skirmish_events::{Faction, InteractionLog, InteractionTime, LabelState, ParticipantId};

/// Report settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Flag records whose identity contains this text (case-insensitive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

/// One resolved participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantRecord {
    pub id: ParticipantId,
    /// Interactions where the participant is the subject
    pub outgoing: usize,
    /// Interactions where the participant is the object
    pub incoming: usize,
    pub faction: Faction,
    pub highlighted: bool,
}

/// Totals for one faction across its reported members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FactionSummary {
    pub members: usize,
    pub outgoing: usize,
    pub incoming: usize,
}

/// The aggregated dataset handed to presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityReport {
    pub interactions: usize,
    pub skipped_rows: usize,
    pub first_interaction: Option<InteractionTime>,
    pub last_interaction: Option<InteractionTime>,
    /// Resolved participants, sorted by id
    pub records: Vec<ParticipantRecord>,
    /// Participants in the log without a label, sorted by id
    pub unresolved: Vec<ParticipantId>,
    pub factions: BTreeMap<Faction, FactionSummary>,
}

impl ActivityReport {
    /// Counts every participant's interactions and joins the counts with labels.
    ///
    /// Only participants that appear in the log are considered, so seeds that
    /// never interacted are absent from the output.
    pub fn build(log: &InteractionLog, labels: &LabelState, options: &ReportOptions) -> Self {
        let mut counts: HashMap<&ParticipantId, (usize, usize)> = HashMap::new();
        for interaction in log {
            counts.entry(&interaction.subject).or_default().0 += 1;
            counts.entry(&interaction.object).or_default().1 += 1;
        }

        let highlight = options.highlight.as_deref();
        let mut records = Vec::new();
        let mut unresolved = Vec::new();
        let mut factions: BTreeMap<Faction, FactionSummary> =
            Faction::all().iter().map(|f| (*f, FactionSummary::default())).collect();

        for id in log.participants() {
            let (outgoing, incoming) = counts.get(id).copied().unwrap_or_default();

            let Some(faction) = labels.get(id) else {
                unresolved.push(id.clone());
                continue;
            };

            let summary = factions.entry(faction).or_default();
            summary.members += 1;
            summary.outgoing += outgoing;
            summary.incoming += incoming;

            records.push(ParticipantRecord {
                id: id.clone(),
                outgoing,
                incoming,
                faction,
                highlighted: highlight.is_some_and(|q| matches_search(q, id.as_str())),
            });
        }

        let span = log.time_span();
        tracing::debug!(
            records = records.len(),
            unresolved = unresolved.len(),
            "activity report built"
        );

        Self {
            interactions: log.len(),
            skipped_rows: log.skipped_rows(),
            first_interaction: span.map(|(first, _)| first),
            last_interaction: span.map(|(_, last)| last),
            records,
            unresolved,
            factions,
        }
    }

    /// Looks up the record for a participant.
    pub fn record(&self, id: &str) -> Option<&ParticipantRecord> {
        self.records
            .binary_search_by(|r| r.id.as_str().cmp(id))
            .ok()
            .map(|index| &self.records[index])
    }

    /// Records whose identity matches a search query.
    pub fn search<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a ParticipantRecord> {
        self.records
            .iter()
            .filter(move |r| matches_search(query, r.id.as_str()))
    }
}

/// Case-insensitive substring match of a search query against an identity.
///
/// The query is trimmed first; an empty query matches nothing.
pub fn matches_search(query: &str, identity: &str) -> bool {
    let query = query.trim().to_lowercase();
    !query.is_empty() && identity.to_lowercase().contains(&query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_events::Interaction;

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

    #[test]
    fn test_counts_and_filtering() {
        let log = log(&[("X", "Z"), ("X", "Z"), ("Z", "Y"), ("Q", "R")]);
        let labels =
            LabelState::from_seeds([("X", Faction::A), ("Y", Faction::B), ("Z", Faction::B)])
                .unwrap();
        let report = ActivityReport::build(&log, &labels, &ReportOptions::default());

        assert_eq!(report.interactions, 4);
        assert_eq!(report.records.len(), 3);

        let x = report.record("X").unwrap();
        assert_eq!((x.outgoing, x.incoming), (2, 0));
        let z = report.record("Z").unwrap();
        assert_eq!((z.outgoing, z.incoming), (1, 2));
        let y = report.record("Y").unwrap();
        assert_eq!((y.outgoing, y.incoming), (0, 1));

        assert_eq!(report.unresolved, vec![id("Q"), id("R")]);
        assert!(report.record("Q").is_none());
    }

    #[test]
    fn test_seed_without_interactions_is_absent() {
        let log = log(&[("X", "Z")]);
        let labels = LabelState::from_seeds([("X", Faction::A), ("Lurker", Faction::B)]).unwrap();
        let report = ActivityReport::build(&log, &labels, &ReportOptions::default());

        assert!(report.record("Lurker").is_none());
        assert_eq!(report.factions[&Faction::B].members, 0);
    }

    #[test]
    fn test_records_sorted_by_id() {
        let log = log(&[("b", "c"), ("a", "b")]);
        let labels =
            LabelState::from_seeds([("a", Faction::A), ("b", Faction::B), ("c", Faction::A)])
                .unwrap();
        let report = ActivityReport::build(&log, &labels, &ReportOptions::default());

        let ids: Vec<&str> = report.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_faction_summaries() {
        let log = log(&[("X", "Z"), ("X", "Z"), ("Z", "Y")]);
        let labels =
            LabelState::from_seeds([("X", Faction::A), ("Y", Faction::B), ("Z", Faction::B)])
                .unwrap();
        let report = ActivityReport::build(&log, &labels, &ReportOptions::default());

        assert_eq!(
            report.factions[&Faction::A],
            FactionSummary {
                members: 1,
                outgoing: 2,
                incoming: 0
            }
        );
        assert_eq!(
            report.factions[&Faction::B],
            FactionSummary {
                members: 2,
                outgoing: 1,
                incoming: 3
            }
        );
    }

    #[test]
    fn test_highlight_flags_matching_records() {
        let log = log(&[("Winnie", "bsims"), ("WinterWolf", "bsims")]);
        let labels = LabelState::from_seeds([
            ("Winnie", Faction::B),
            ("WinterWolf", Faction::B),
            ("bsims", Faction::A),
        ])
        .unwrap();
        let options = ReportOptions {
            highlight: Some("WINN".to_string()),
        };
        let report = ActivityReport::build(&log, &labels, &options);

        assert!(report.record("Winnie").unwrap().highlighted);
        assert!(!report.record("WinterWolf").unwrap().highlighted);
        assert!(!report.record("bsims").unwrap().highlighted);
    }

    #[test]
    fn test_search() {
        let log = log(&[("Winnie", "bsims"), ("WinterWolf", "bsims")]);
        let labels = LabelState::from_seeds([
            ("Winnie", Faction::B),
            ("WinterWolf", Faction::B),
            ("bsims", Faction::A),
        ])
        .unwrap();
        let report = ActivityReport::build(&log, &labels, &ReportOptions::default());

        assert_eq!(report.search("win").count(), 2);
        assert_eq!(report.search("  ").count(), 0);
    }

    #[test]
    fn test_matches_search() {
        assert!(matches_search("win", "Winnie"));
        assert!(matches_search(" NIE ", "Winnie"));
        assert!(!matches_search("", "Winnie"));
        assert!(!matches_search("bsims", "Winnie"));
    }

    #[test]
    fn test_empty_log() {
        let report = ActivityReport::build(
            &InteractionLog::default(),
            &LabelState::new(),
            &ReportOptions::default(),
        );

        assert!(report.records.is_empty());
        assert!(report.unresolved.is_empty());
        assert!(report.first_interaction.is_none());
        assert_eq!(report.factions.len(), 2);
    }
}
