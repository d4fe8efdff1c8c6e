//! Evidence tallies and the commit rule.

use serde::{Deserialize, Serialize};
use skirmish_events::Faction;

/// Votes collected for one unlabeled participant during a single pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Votes for faction A
    pub a: usize,
    /// Votes for faction B
    pub b: usize,
}

/// Outcome of applying the commit rule to a tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Evidence is decisive
    Commit(Faction),
    /// Evidence is absent or contradictory; stay unlabeled this pass
    Defer,
}

impl Tally {
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// Records one vote for a faction.
    pub fn vote(&mut self, faction: Faction) {
        match faction {
            Faction::A => self.a += 1,
            Faction::B => self.b += 1,
        }
    }

    pub fn count(&self, faction: Faction) -> usize {
        match faction {
            Faction::A => self.a,
            Faction::B => self.b,
        }
    }

    pub fn total(&self) -> usize {
        self.a + self.b
    }

    /// Applies the commit rule.
    ///
    /// Rules are checked in order, first match wins:
    /// 1. dominance: one side has strictly more than twice the other
    /// 2. one-sidedness: one side is zero and the other positive
    /// 3. otherwise defer
    ///
    /// Dominance subsumes every one-sided tally, so rule 2 never fires on
    /// its own. `(0, 0)` matches nothing.
    pub fn verdict(&self) -> Verdict {
        let Tally { a, b } = *self;

        if a > b.saturating_mul(2) && a > 0 {
            Verdict::Commit(Faction::A)
        } else if b > a.saturating_mul(2) && b > 0 {
            Verdict::Commit(Faction::B)
        } else if a > 0 && b == 0 {
            Verdict::Commit(Faction::A)
        } else if b > 0 && a == 0 {
            Verdict::Commit(Faction::B)
        } else {
            Verdict::Defer
        }
    }
}
