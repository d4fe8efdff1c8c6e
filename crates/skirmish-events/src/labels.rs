//! Label State
//!
//! Partial, write-once mapping from participants to factions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::faction::Faction;
use crate::participant::ParticipantId;

/// Errors that can occur while building seed labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeedError {
    /// Seed name is empty after trimming
    #[error("seed name is empty")]
    EmptyName,
    /// Same participant seeded into both factions
    #[error("participant '{participant}' is seeded as both {first} and {second}")]
    Conflict {
        participant: ParticipantId,
        first: Faction,
        second: Faction,
    },
}

/// Faction labels known so far.
///
/// Labels are monotonic: once a participant has a faction it can never be
/// changed or removed. [`LabelState::assign`] refuses to overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelState {
    labels: BTreeMap<ParticipantId, Faction>,
}

impl LabelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the initial state from authoritative seed assignments.
    ///
    /// Names are normalized like any other participant identity. Listing a
    /// participant twice under the same faction is harmless; listing it under
    /// both is an error.
    pub fn from_seeds<I, S>(seeds: I) -> Result<Self, SeedError>
    where
        I: IntoIterator<Item = (S, Faction)>,
        S: AsRef<str>,
    {
        let mut state = Self::new();
        for (name, faction) in seeds {
            let id = ParticipantId::parse(name.as_ref()).ok_or(SeedError::EmptyName)?;
            match state.get(&id) {
                Some(existing) if existing != faction => {
                    return Err(SeedError::Conflict {
                        participant: id,
                        first: existing,
                        second: faction,
                    });
                }
                Some(_) => {}
                None => {
                    state.labels.insert(id, faction);
                }
            }
        }
        Ok(state)
    }

    pub fn get(&self, id: &ParticipantId) -> Option<Faction> {
        self.labels.get(id).copied()
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.labels.contains_key(id)
    }

    /// Labels an unlabeled participant.
    ///
    /// Returns false and leaves the state untouched if the participant
    /// already has a label.
    pub fn assign(&mut self, id: ParticipantId, faction: Faction) -> bool {
        if self.labels.contains_key(&id) {
            return false;
        }
        self.labels.insert(id, faction);
        true
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates labels in participant order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, Faction)> {
        self.labels.iter().map(|(id, faction)| (id, *faction))
    }

    /// Participants labeled with the given faction.
    pub fn members(&self, faction: Faction) -> impl Iterator<Item = &ParticipantId> {
        self.labels
            .iter()
            .filter(move |(_, f)| **f == faction)
            .map(|(id, _)| id)
    }

    /// True if every label in `other` is present here with the same faction.
    pub fn extends(&self, other: &LabelState) -> bool {
        other.iter().all(|(id, faction)| self.get(id) == Some(faction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ParticipantId {
        ParticipantId::parse(s).unwrap()
    }

    #[test]
    fn test_from_seeds() {
        let state = LabelState::from_seeds([
            ("bsims", Faction::A),
            (" SammyxxFairy ", Faction::A),
            ("Winnie", Faction::B),
        ])
        .unwrap();

        assert_eq!(state.len(), 3);
        assert_eq!(state.get(&id("SammyxxFairy")), Some(Faction::A));
        assert_eq!(state.members(Faction::B).count(), 1);
    }

    #[test]
    fn test_duplicate_seed_same_faction_is_fine() {
        let state = LabelState::from_seeds([("x", Faction::A), ("x ", Faction::A)]).unwrap();
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_conflicting_seed_rejected() {
        let err = LabelState::from_seeds([("x", Faction::A), ("x", Faction::B)]).unwrap_err();
        assert_eq!(
            err,
            SeedError::Conflict {
                participant: id("x"),
                first: Faction::A,
                second: Faction::B,
            }
        );
    }

    #[test]
    fn test_empty_seed_rejected() {
        let err = LabelState::from_seeds([(" ", Faction::A)]).unwrap_err();
        assert_eq!(err, SeedError::EmptyName);
    }

    #[test]
    fn test_assign_is_write_once() {
        let mut state = LabelState::new();
        assert!(state.assign(id("z"), Faction::B));
        assert!(!state.assign(id("z"), Faction::A));
        assert_eq!(state.get(&id("z")), Some(Faction::B));
    }

    #[test]
    fn test_extends() {
        let seeds = LabelState::from_seeds([("x", Faction::A)]).unwrap();
        let mut grown = seeds.clone();
        grown.assign(id("y"), Faction::B);

        assert!(grown.extends(&seeds));
        assert!(!seeds.extends(&grown));

        let flipped = LabelState::from_seeds([("x", Faction::B)]).unwrap();
        assert!(!flipped.extends(&seeds));
    }

    #[test]
    fn test_serializes_as_map() {
        let state = LabelState::from_seeds([("x", Faction::A), ("y", Faction::B)]).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"x":"a","y":"b"}"#);

        let parsed: LabelState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }
}
