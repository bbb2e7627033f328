//! An indexed, read-only view of the entrants and matches.
//!
//! Matches and picks refer to entrants by id only; `Tournament` owns the
//! lookup indexes that turn those ids back into entrants and coordinates
//! back into matches.

use std::collections::HashMap;
use thiserror::Error;

use super::entrant::Entrant;
use super::game::{Match, MatchCoord};
use super::ids::{EntrantId, MatchId};
use super::round::{Round, Side};

/// Errors building a [`Tournament`] from raw entrants and matches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    #[error("entrant {0} appears more than once")]
    DuplicateEntrant(EntrantId),

    #[error("match {0} appears more than once")]
    DuplicateMatchId(MatchId),

    #[error("more than one match at {0}")]
    DuplicateCoord(MatchCoord),

    #[error("match {match_id} references unknown entrant {entrant_id}")]
    UnknownEntrant {
        match_id: MatchId,
        entrant_id: EntrantId,
    },
}

/// Entrants and matches with id and coordinate indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tournament {
    entrants: HashMap<EntrantId, Entrant>,
    matches: Vec<Match>,
    by_id: HashMap<MatchId, usize>,
    by_coord: HashMap<MatchCoord, usize>,
}

impl Tournament {
    /// Indexes the given entrants and matches.
    ///
    /// Matches are kept in the order given. Every entrant id referenced by a
    /// match slot or winner must belong to a known entrant.
    pub fn new(entrants: Vec<Entrant>, matches: Vec<Match>) -> Result<Self, TournamentError> {
        let mut entrant_index = HashMap::with_capacity(entrants.len());
        for entrant in entrants {
            if entrant_index.contains_key(&entrant.id) {
                return Err(TournamentError::DuplicateEntrant(entrant.id));
            }
            entrant_index.insert(entrant.id.clone(), entrant);
        }

        let mut by_id = HashMap::with_capacity(matches.len());
        let mut by_coord = HashMap::with_capacity(matches.len());
        for (i, m) in matches.iter().enumerate() {
            if by_id.insert(m.id.clone(), i).is_some() {
                return Err(TournamentError::DuplicateMatchId(m.id.clone()));
            }
            if by_coord.insert(m.coord(), i).is_some() {
                return Err(TournamentError::DuplicateCoord(m.coord()));
            }
            for entrant_id in [&m.left, &m.right, &m.winner].into_iter().flatten() {
                if !entrant_index.contains_key(entrant_id) {
                    return Err(TournamentError::UnknownEntrant {
                        match_id: m.id.clone(),
                        entrant_id: entrant_id.clone(),
                    });
                }
            }
        }

        Ok(Tournament {
            entrants: entrant_index,
            matches,
            by_id,
            by_coord,
        })
    }

    pub fn entrant(&self, id: &EntrantId) -> Option<&Entrant> {
        self.entrants.get(id)
    }

    pub fn entrants(&self) -> impl Iterator<Item = &Entrant> {
        self.entrants.values()
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn get(&self, id: &MatchId) -> Option<&Match> {
        self.by_id.get(id).map(|&i| &self.matches[i])
    }

    pub fn at(&self, coord: MatchCoord) -> Option<&Match> {
        self.by_coord.get(&coord).map(|&i| &self.matches[i])
    }

    /// Matches of one round, in stored order.
    pub fn in_round(&self, round: Round) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// Entrant ids stored in first-round slots.
    pub fn first_round_entrants(&self) -> impl Iterator<Item = &EntrantId> {
        self.in_round(Round::R64)
            .flat_map(|m| [m.left.as_ref(), m.right.as_ref()])
            .flatten()
    }

    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(Match::is_decided)
    }

    /// Overwrites one slot. Returns false if the match is unknown.
    pub fn set_slot(&mut self, id: &MatchId, side: Side, entrant: Option<EntrantId>) -> bool {
        match self.by_id.get(id) {
            Some(&i) => {
                *self.matches[i].slot_mut(side) = entrant;
                true
            }
            None => false,
        }
    }

    /// Overwrites the winner. Returns false if the match is unknown.
    pub fn set_winner(&mut self, id: &MatchId, winner: Option<EntrantId>) -> bool {
        match self.by_id.get(id) {
            Some(&i) => {
                self.matches[i].winner = winner;
                true
            }
            None => false,
        }
    }
}
