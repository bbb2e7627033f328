//! Result advancement for the match state machine.
//!
//! Recording a winner moves a match from `Ready` to `Decided` and advances the
//! winner into the one downstream slot the topology assigns it. The earlier
//! transitions (`Empty -> Partial -> Ready`) are consequences of those writes.

use serde::{Deserialize, Serialize};

use crate::types::{EntrantId, MatchCoord, MatchId, Side, Tournament};

use super::topology::{TopologyError, successor_slot};

/// Error returned when a result cannot be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WinnerError {
    /// No match has this id.
    UnknownMatch { match_id: MatchId },

    /// The proposed winner is not one of the match's two stored entrants.
    InvalidWinner { match_id: MatchId, winner: EntrantId },

    /// The match's coordinate is not part of the tournament.
    Topology(TopologyError),

    /// The topology names a successor that is not stored.
    MissingSuccessor { coord: MatchCoord },
}

impl std::fmt::Display for WinnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinnerError::UnknownMatch { match_id } => {
                write!(f, "Match {} not found", match_id)
            }
            WinnerError::InvalidWinner { match_id, winner } => {
                write!(
                    f,
                    "{} is not one of the two entrants of match {}",
                    winner, match_id
                )
            }
            WinnerError::Topology(e) => write!(f, "Invalid match coordinate: {}", e),
            WinnerError::MissingSuccessor { coord } => {
                write!(f, "Successor match at {} is missing", coord)
            }
        }
    }
}

impl std::error::Error for WinnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WinnerError::Topology(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TopologyError> for WinnerError {
    fn from(e: TopologyError) -> Self {
        WinnerError::Topology(e)
    }
}

/// A write to one slot of one match. `entrant_id = None` clears the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotWrite {
    pub match_id: MatchId,
    pub side: Side,
    pub entrant_id: Option<EntrantId>,
}

/// Everything recording one result changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advancement {
    pub match_id: MatchId,
    pub winner: EntrantId,

    /// The winner recorded before this call, if the match was already decided.
    pub previous_winner: Option<EntrantId>,

    /// The winner's advancement. `None` for the Championship.
    pub slot_write: Option<SlotWrite>,

    /// Downstream matches whose results are voided, nearest first.
    pub voided: Vec<MatchId>,

    /// Downstream slots emptied because the entrant that filled them was voided.
    pub cleared_slots: Vec<SlotWrite>,
}

impl Advancement {
    /// True if this overwrote a different, previously recorded winner.
    pub fn is_correction(&self) -> bool {
        self.previous_winner
            .as_ref()
            .is_some_and(|prev| *prev != self.winner)
    }
}

/// Records `winner` as the result of `match_id`.
///
/// Re-recording the same winner yields the same slot write and voids nothing.
/// Recording a different winner over an existing result re-propagates: the
/// downstream slot is overwritten and every later result that was decided
/// with the superseded entrant present is voided, along with the slot its
/// winner had advanced into, down to the Championship.
pub fn record_winner(
    tournament: &Tournament,
    match_id: &MatchId,
    winner: &EntrantId,
) -> Result<Advancement, WinnerError> {
    let m = tournament
        .get(match_id)
        .ok_or_else(|| WinnerError::UnknownMatch {
            match_id: match_id.clone(),
        })?;

    if m.side_of(winner).is_none() {
        return Err(WinnerError::InvalidWinner {
            match_id: match_id.clone(),
            winner: winner.clone(),
        });
    }

    let previous_winner = m.winner.clone();
    let mut advancement = Advancement {
        match_id: match_id.clone(),
        winner: winner.clone(),
        previous_winner,
        slot_write: None,
        voided: Vec::new(),
        cleared_slots: Vec::new(),
    };

    let Some(slot) = successor_slot(m.coord())? else {
        return Ok(advancement);
    };
    let next = tournament
        .at(slot.coord)
        .ok_or(WinnerError::MissingSuccessor { coord: slot.coord })?;

    advancement.slot_write = Some(SlotWrite {
        match_id: next.id.clone(),
        side: slot.side,
        entrant_id: Some(winner.clone()),
    });

    if advancement.is_correction() {
        void_downstream(tournament, next.coord(), &mut advancement)?;
    }

    Ok(advancement)
}

/// Voids decided results starting at `start`, following each voided winner downstream.
fn void_downstream(
    tournament: &Tournament,
    start: MatchCoord,
    advancement: &mut Advancement,
) -> Result<(), WinnerError> {
    let mut current = start;

    loop {
        let Some(m) = tournament.at(current) else {
            return Err(WinnerError::MissingSuccessor { coord: current });
        };
        let Some(voided_winner) = m.winner.as_ref() else {
            return Ok(());
        };
        advancement.voided.push(m.id.clone());

        let Some(slot) = successor_slot(current)? else {
            return Ok(());
        };
        let next = tournament
            .at(slot.coord)
            .ok_or(WinnerError::MissingSuccessor { coord: slot.coord })?;

        if next.slot(slot.side) == Some(voided_winner) {
            advancement.cleared_slots.push(SlotWrite {
                match_id: next.id.clone(),
                side: slot.side,
                entrant_id: None,
            });
        }
        current = slot.coord;
    }
}
