//! Virtual projection: who a bracket predicts will occupy each match slot.
//!
//! First-round slots come straight from the stored matches. Every later slot
//! is the bracket's pick on the corresponding feeder match, checked against
//! that feeder's own projected pair.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::types::{Entrant, EntrantId, MatchCoord, MatchId, PickSet, Round, Side, Tournament};

use super::topology::{all_coords, feeder_slots};

/// The projected `(left, right)` occupants of one match for one bracket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualPair {
    pub left: Option<EntrantId>,
    pub right: Option<EntrantId>,
}

impl VirtualPair {
    pub fn new(left: Option<EntrantId>, right: Option<EntrantId>) -> Self {
        VirtualPair { left, right }
    }

    pub fn get(&self, side: Side) -> Option<&EntrantId> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }

    pub fn contains(&self, entrant: &EntrantId) -> bool {
        self.left.as_ref() == Some(entrant) || self.right.as_ref() == Some(entrant)
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Resolves both ids to entrant records.
    pub fn entrants<'t>(
        &self,
        tournament: &'t Tournament,
    ) -> (Option<&'t Entrant>, Option<&'t Entrant>) {
        (
            self.left.as_ref().and_then(|id| tournament.entrant(id)),
            self.right.as_ref().and_then(|id| tournament.entrant(id)),
        )
    }
}

/// Resolves virtual pairs for one bracket, memoizing per match.
///
/// A projector borrows one consistent snapshot. Build a new one after the
/// picks change.
pub struct Projector<'a> {
    tournament: &'a Tournament,
    picks: &'a PickSet,
    memo: HashMap<MatchCoord, VirtualPair>,
}

impl<'a> Projector<'a> {
    pub fn new(tournament: &'a Tournament, picks: &'a PickSet) -> Self {
        Projector {
            tournament,
            picks,
            memo: HashMap::new(),
        }
    }

    /// The virtual pair of the match with the given id. Unknown ids resolve to an empty pair.
    pub fn resolve(&mut self, match_id: &MatchId) -> VirtualPair {
        match self.tournament.get(match_id) {
            Some(m) => self.resolve_coord(m.coord()),
            None => VirtualPair::default(),
        }
    }

    /// The virtual pair of the match at `coord`.
    pub fn resolve_coord(&mut self, coord: MatchCoord) -> VirtualPair {
        if let Some(pair) = self.memo.get(&coord) {
            return pair.clone();
        }
        let pair = self.compute(coord);
        self.memo.insert(coord, pair.clone());
        pair
    }

    /// Virtual pairs of every stored match, keyed by match id.
    pub fn resolve_all(&mut self) -> BTreeMap<MatchId, VirtualPair> {
        all_coords()
            .into_iter()
            .filter_map(|coord| {
                let id = self.tournament.at(coord)?.id.clone();
                Some((id, self.resolve_coord(coord)))
            })
            .collect()
    }

    fn compute(&mut self, coord: MatchCoord) -> VirtualPair {
        if coord.round == Round::R64 {
            return match self.tournament.at(coord) {
                Some(m) => VirtualPair::new(m.left.clone(), m.right.clone()),
                None => VirtualPair::default(),
            };
        }

        let feeders = match feeder_slots(coord) {
            Ok(Some(feeders)) => feeders,
            Ok(None) => return VirtualPair::default(),
            Err(error) => {
                debug!(%coord, %error, "Malformed coordinate, projecting empty pair");
                return VirtualPair::default();
            }
        };

        let [left, right] = feeders;
        let (Some(left_match), Some(right_match)) =
            (self.tournament.at(left), self.tournament.at(right))
        else {
            debug!(%coord, "Feeder match missing, projecting empty pair");
            return VirtualPair::default();
        };

        let left_pick = self.picks.entrant_for(&left_match.id).cloned();
        let right_pick = self.picks.entrant_for(&right_match.id).cloned();

        VirtualPair::new(
            self.advance(left, left_pick),
            self.advance(right, right_pick),
        )
    }

    /// Projects the pick made on `feeder` into the next round.
    fn advance(&mut self, feeder: MatchCoord, pick: Option<EntrantId>) -> Option<EntrantId> {
        let pick = pick?;
        if self.resolve_coord(feeder).contains(&pick) {
            return Some(pick);
        }
        // Picked entrant isn't projected into the feeder; accept any known first-round entrant.
        let known = self.tournament.first_round_entrants().any(|id| *id == pick);
        known.then_some(pick)
    }
}

/// One-shot resolution of a single match's virtual pair.
pub fn virtual_entrants(
    tournament: &Tournament,
    picks: &PickSet,
    target: &MatchId,
) -> VirtualPair {
    Projector::new(tournament, picks).resolve(target)
}
