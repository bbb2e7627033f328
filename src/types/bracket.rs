//! Brackets and picks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::ids::{BracketId, EntrantId, MatchId, PickId, UserId};

/// One participant's bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub id: BracketId,

    /// The participant who owns this bracket.
    pub owner: UserId,

    /// When the bracket was submitted. Once set, the owner can no longer edit it.
    pub locked_at: Option<DateTime<Utc>>,

    /// Set when an administrator has edited the bracket on the owner's behalf.
    #[serde(default)]
    pub admin_override: bool,
}

impl Bracket {
    pub fn new(id: impl Into<BracketId>, owner: impl Into<UserId>) -> Self {
        Bracket {
            id: id.into(),
            owner: owner.into(),
            locked_at: None,
            admin_override: false,
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.locked_at.is_some()
    }
}

/// A predicted winner for one match of one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pick {
    pub id: PickId,
    pub bracket_id: BracketId,
    pub match_id: MatchId,
    #[serde(rename = "picked_entrant_id")]
    pub entrant_id: EntrantId,
}

impl Pick {
    pub fn new(
        id: impl Into<PickId>,
        bracket_id: impl Into<BracketId>,
        match_id: impl Into<MatchId>,
        entrant_id: impl Into<EntrantId>,
    ) -> Self {
        Pick {
            id: id.into(),
            bracket_id: bracket_id.into(),
            match_id: match_id.into(),
            entrant_id: entrant_id.into(),
        }
    }

    /// The id a new pick for `(bracket, match)` receives when the caller has none.
    pub fn default_id(bracket_id: &BracketId, match_id: &MatchId) -> PickId {
        PickId::new(format!("{}:{}", bracket_id, match_id))
    }
}

/// All picks of a single bracket, indexed by match.
///
/// At most one pick per match: inserting a second pick for the same match
/// replaces the first, mirroring the `(bracket, match)` uniqueness of storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickSet {
    bracket_id: BracketId,
    by_match: HashMap<MatchId, Pick>,
}

impl PickSet {
    pub fn new(bracket_id: impl Into<BracketId>) -> Self {
        PickSet {
            bracket_id: bracket_id.into(),
            by_match: HashMap::new(),
        }
    }

    /// Collects the picks belonging to `bracket_id`; picks of other brackets are ignored.
    pub fn from_picks(
        bracket_id: impl Into<BracketId>,
        picks: impl IntoIterator<Item = Pick>,
    ) -> Self {
        let mut set = PickSet::new(bracket_id);
        for pick in picks {
            if pick.bracket_id == set.bracket_id {
                set.insert(pick);
            }
        }
        set
    }

    pub fn bracket_id(&self) -> &BracketId {
        &self.bracket_id
    }

    /// Inserts a pick, returning the one it replaced.
    pub fn insert(&mut self, pick: Pick) -> Option<Pick> {
        self.by_match.insert(pick.match_id.clone(), pick)
    }

    pub fn get(&self, match_id: &MatchId) -> Option<&Pick> {
        self.by_match.get(match_id)
    }

    /// The entrant picked to win `match_id`, if any.
    pub fn entrant_for(&self, match_id: &MatchId) -> Option<&EntrantId> {
        self.by_match.get(match_id).map(|p| &p.entrant_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pick> {
        self.by_match.values()
    }

    pub fn len(&self) -> usize {
        self.by_match.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_match.is_empty()
    }

    /// A copy of this set with the given picks removed.
    pub fn without(&self, removed: &BTreeSet<PickId>) -> PickSet {
        PickSet {
            bracket_id: self.bracket_id.clone(),
            by_match: self
                .by_match
                .iter()
                .filter(|(_, pick)| !removed.contains(&pick.id))
                .map(|(m, pick)| (m.clone(), pick.clone()))
                .collect(),
        }
    }
}
