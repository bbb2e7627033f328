//! In-memory pool storage.
//!
//! Holds one tournament with its brackets, picks and audit log, and applies
//! effect batches all-or-nothing.

use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::effects::{AuditRecord, Effect, EffectInterpreter};
use crate::types::{
    Bracket, BracketId, EntrantId, MatchId, Pick, PickId, PickSet, Settings, Tournament,
};

/// Errors applying an effect to the in-memory pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("effect {index}: match {match_id} not found")]
    UnknownMatch { index: usize, match_id: MatchId },

    #[error("effect {index}: bracket {bracket_id} not found")]
    UnknownBracket { index: usize, bracket_id: BracketId },

    #[error("effect {index}: entrant {entrant_id} not found")]
    UnknownEntrant { index: usize, entrant_id: EntrantId },

    #[error("effect {index}: bracket {bracket_id} has no pick {pick_id}")]
    UnknownPick {
        index: usize,
        bracket_id: BracketId,
        pick_id: PickId,
    },

    #[error("bracket {0} already exists")]
    DuplicateBracket(BracketId),
}

/// A whole pool held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryPool {
    settings: Settings,
    tournament: Tournament,
    brackets: BTreeMap<BracketId, Bracket>,
    picks: BTreeMap<BracketId, PickSet>,
    audit_log: Vec<AuditRecord>,
}

impl InMemoryPool {
    pub fn new(tournament: Tournament, settings: Settings) -> Self {
        InMemoryPool {
            settings,
            tournament,
            brackets: BTreeMap::new(),
            picks: BTreeMap::new(),
            audit_log: Vec::new(),
        }
    }

    /// Adds a bracket with no picks.
    pub fn add_bracket(&mut self, bracket: Bracket) -> Result<(), ApplyError> {
        if self.brackets.contains_key(&bracket.id) {
            return Err(ApplyError::DuplicateBracket(bracket.id));
        }
        self.picks
            .insert(bracket.id.clone(), PickSet::new(bracket.id.clone()));
        self.brackets.insert(bracket.id.clone(), bracket);
        Ok(())
    }

    /// Loads picks as stored, without validation. Picks of unknown brackets are dropped.
    pub fn load_picks(&mut self, picks: impl IntoIterator<Item = Pick>) {
        for pick in picks {
            match self.picks.get_mut(&pick.bracket_id) {
                Some(set) => {
                    set.insert(pick);
                }
                None => warn!(
                    bracket_id = %pick.bracket_id,
                    pick_id = %pick.id,
                    "Dropping pick of unknown bracket"
                ),
            }
        }
    }

    /// Replaces the audit log, e.g. when restoring from a snapshot.
    pub fn restore_audit_log(&mut self, records: Vec<AuditRecord>) {
        self.audit_log = records;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tournament(&self) -> &Tournament {
        &self.tournament
    }

    pub fn bracket(&self, id: &BracketId) -> Option<&Bracket> {
        self.brackets.get(id)
    }

    pub fn brackets(&self) -> impl Iterator<Item = &Bracket> {
        self.brackets.values()
    }

    pub fn picks(&self, id: &BracketId) -> Option<&PickSet> {
        self.picks.get(id)
    }

    /// Every bracket with its picks, in bracket id order.
    pub fn entries(&self) -> impl Iterator<Item = (&Bracket, &PickSet)> {
        self.brackets
            .values()
            .filter_map(|b| Some((b, self.picks.get(&b.id)?)))
    }

    pub fn audit_log(&self) -> &[AuditRecord] {
        &self.audit_log
    }

    fn apply_one(&mut self, index: usize, effect: &Effect) -> Result<(), ApplyError> {
        match effect {
            Effect::UpsertPick { pick } => {
                self.require_match(index, &pick.match_id)?;
                self.require_entrant(index, &pick.entrant_id)?;
                self.picks_mut(index, &pick.bracket_id)?.insert(pick.clone());
            }
            Effect::DeletePicks {
                bracket_id,
                pick_ids,
            } => {
                let set = self.picks_mut(index, bracket_id)?;
                if let Some(missing) = pick_ids
                    .iter()
                    .find(|id| !set.iter().any(|p| p.id == **id))
                {
                    return Err(ApplyError::UnknownPick {
                        index,
                        bracket_id: bracket_id.clone(),
                        pick_id: missing.clone(),
                    });
                }
                *set = set.without(pick_ids);
            }
            Effect::LockBracket { bracket_id, at } => {
                self.bracket_mut(index, bracket_id)?.locked_at = Some(*at);
            }
            Effect::MarkAdminOverride { bracket_id } => {
                self.bracket_mut(index, bracket_id)?.admin_override = true;
            }
            Effect::SetWinner { match_id, winner } => {
                self.require_entrant(index, winner)?;
                if !self.tournament.set_winner(match_id, Some(winner.clone())) {
                    return Err(self.unknown_match(index, match_id));
                }
            }
            Effect::ClearWinner { match_id } => {
                if !self.tournament.set_winner(match_id, None) {
                    return Err(self.unknown_match(index, match_id));
                }
            }
            Effect::FillSlot {
                match_id,
                side,
                entrant_id,
            } => {
                self.require_entrant(index, entrant_id)?;
                if !self
                    .tournament
                    .set_slot(match_id, *side, Some(entrant_id.clone()))
                {
                    return Err(self.unknown_match(index, match_id));
                }
            }
            Effect::ClearSlot { match_id, side } => {
                if !self.tournament.set_slot(match_id, *side, None) {
                    return Err(self.unknown_match(index, match_id));
                }
            }
            Effect::RecordAudit { record } => self.audit_log.push(record.clone()),
        }
        Ok(())
    }

    fn unknown_match(&self, index: usize, match_id: &MatchId) -> ApplyError {
        ApplyError::UnknownMatch {
            index,
            match_id: match_id.clone(),
        }
    }

    fn require_match(&self, index: usize, match_id: &MatchId) -> Result<(), ApplyError> {
        match self.tournament.get(match_id) {
            Some(_) => Ok(()),
            None => Err(self.unknown_match(index, match_id)),
        }
    }

    fn require_entrant(&self, index: usize, entrant_id: &EntrantId) -> Result<(), ApplyError> {
        match self.tournament.entrant(entrant_id) {
            Some(_) => Ok(()),
            None => Err(ApplyError::UnknownEntrant {
                index,
                entrant_id: entrant_id.clone(),
            }),
        }
    }

    fn bracket_mut(&mut self, index: usize, id: &BracketId) -> Result<&mut Bracket, ApplyError> {
        self.brackets
            .get_mut(id)
            .ok_or_else(|| ApplyError::UnknownBracket {
                index,
                bracket_id: id.clone(),
            })
    }

    fn picks_mut(&mut self, index: usize, id: &BracketId) -> Result<&mut PickSet, ApplyError> {
        self.picks
            .get_mut(id)
            .ok_or_else(|| ApplyError::UnknownBracket {
                index,
                bracket_id: id.clone(),
            })
    }
}

impl EffectInterpreter for InMemoryPool {
    type Error = ApplyError;

    fn apply(&mut self, batch: &[Effect]) -> Result<(), ApplyError> {
        let mut staged = self.clone();
        for (index, effect) in batch.iter().enumerate() {
            if let Err(error) = staged.apply_one(index, effect) {
                warn!(%error, batch_len = batch.len(), "Rejecting effect batch");
                return Err(error);
            }
        }
        *self = staged;
        debug!(batch_len = batch.len(), "Applied effect batch");
        Ok(())
    }
}
