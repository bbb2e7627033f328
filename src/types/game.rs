//! Matches, their coordinates and their progression state.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{EntrantId, MatchId};
use super::round::{Region, Round, Side};

/// The position of a match in the tournament: `(round, region, match number)`.
///
/// Cross-regional rounds (Final Four, Championship) have `region = None`.
/// Coordinates are not validated on construction; the topology functions
/// reject malformed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchCoord {
    pub round: Round,
    pub region: Option<Region>,
    pub number: u8,
}

impl MatchCoord {
    pub fn new(round: Round, region: Option<Region>, number: u8) -> Self {
        MatchCoord {
            round,
            region,
            number,
        }
    }

    pub fn regional(round: Round, region: Region, number: u8) -> Self {
        MatchCoord::new(round, Some(region), number)
    }

    pub fn final_four(number: u8) -> Self {
        MatchCoord::new(Round::F4, None, number)
    }

    pub fn championship() -> Self {
        MatchCoord::new(Round::Championship, None, 1)
    }

    /// A stable id derived from the coordinate, e.g. `r32-east-2` or `f4-1`.
    pub fn default_id(&self) -> MatchId {
        let round = self.round.code().to_ascii_lowercase();
        match self.region {
            Some(region) => MatchId::new(format!(
                "{}-{}-{}",
                round,
                region.label().to_ascii_lowercase(),
                self.number
            )),
            None => MatchId::new(format!("{}-{}", round, self.number)),
        }
    }
}

impl fmt::Display for MatchCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.region {
            Some(region) => write!(f, "{} {} #{}", self.round, region, self.number),
            None => write!(f, "{} #{}", self.round, self.number),
        }
    }
}

/// Progression state of a single match.
///
/// Only `Ready -> Decided` is triggered directly (by recording a result);
/// the earlier transitions happen as winners advance into the slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    /// Neither slot is filled.
    Empty,
    /// Exactly one slot is filled.
    Partial,
    /// Both slots filled, no winner yet.
    Ready,
    /// A winner has been recorded.
    Decided,
}

/// One game of the tournament as stored by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,

    pub round: Round,

    /// Set for regional rounds, `None` for the Final Four and Championship.
    pub region: Option<Region>,

    /// Position within the round (and region).
    pub match_number: u8,

    #[serde(rename = "left_entrant_id")]
    pub left: Option<EntrantId>,

    #[serde(rename = "right_entrant_id")]
    pub right: Option<EntrantId>,

    /// The actual winner, set only by an authoritative result.
    #[serde(rename = "winner_entrant_id")]
    pub winner: Option<EntrantId>,
}

impl Match {
    /// Creates an empty match at the given coordinate.
    pub fn empty(id: impl Into<MatchId>, coord: MatchCoord) -> Self {
        Match {
            id: id.into(),
            round: coord.round,
            region: coord.region,
            match_number: coord.number,
            left: None,
            right: None,
            winner: None,
        }
    }

    /// Sets both slots. Used for the first round, whose entrants are fixed at setup.
    pub fn with_entrants(mut self, left: EntrantId, right: EntrantId) -> Self {
        self.left = Some(left);
        self.right = Some(right);
        self
    }

    pub fn coord(&self) -> MatchCoord {
        MatchCoord::new(self.round, self.region, self.match_number)
    }

    pub fn state(&self) -> MatchState {
        if self.winner.is_some() {
            return MatchState::Decided;
        }
        match (&self.left, &self.right) {
            (None, None) => MatchState::Empty,
            (Some(_), Some(_)) => MatchState::Ready,
            _ => MatchState::Partial,
        }
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    pub fn slot(&self, side: Side) -> Option<&EntrantId> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut Option<EntrantId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Which slot holds the given entrant, if any.
    pub fn side_of(&self, entrant: &EntrantId) -> Option<Side> {
        if self.left.as_ref() == Some(entrant) {
            Some(Side::Left)
        } else if self.right.as_ref() == Some(entrant) {
            Some(Side::Right)
        } else {
            None
        }
    }
}
