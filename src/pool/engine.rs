//! Pool engine for orchestrating pick and result operations.
//!
//! The `PoolEngine` is a stateless orchestrator that validates requests against
//! a snapshot and returns effects to be applied by an interpreter. It does not
//! perform I/O directly.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::effects::{AdminAction, AuditRecord, Effect};
use crate::scoring::{Leaderboard, build_leaderboard};
use crate::state::{
    PickValidationError, VirtualPair, WinnerError, invalidate, missing_picks, record_winner,
    validate_pick,
};
use crate::types::{
    Bracket, BracketId, EntrantId, MatchId, Pick, PickId, PickSet, Round, Settings, Tournament,
    UserId,
};

/// What a user may do in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Participant,
    Admin,
}

/// The user performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user: UserId,
    pub role: Role,
}

impl Actor {
    pub fn participant(user: impl Into<UserId>) -> Self {
        Actor {
            user: user.into(),
            role: Role::Participant,
        }
    }

    pub fn admin(user: impl Into<UserId>) -> Self {
        Actor {
            user: user.into(),
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Errors that can occur in pool operations.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Only the bracket's owner (or an admin) may change it.
    #[error("{user} does not own bracket {bracket_id}")]
    NotOwner { bracket_id: BracketId, user: UserId },

    /// The bracket has been submitted.
    #[error("bracket {0} has already been submitted")]
    BracketSubmitted(BracketId),

    /// Picks are locked for participants.
    #[error("picks locked at {lock_at}")]
    PoolLocked { lock_at: DateTime<Utc> },

    /// The operation is reserved for administrators.
    #[error("{0} is not an administrator")]
    AdminOnly(UserId),

    /// The pick set passed in belongs to another bracket.
    #[error("picks of bracket {got} passed for bracket {expected}")]
    PickSetMismatch { expected: BracketId, got: BracketId },

    /// A bracket cannot be submitted until every match is picked.
    #[error("bracket {bracket_id} is incomplete: {missing} of {total} matches unpicked")]
    IncompleteBracket {
        bracket_id: BracketId,
        missing: usize,
        total: usize,
    },

    #[error("invalid pick: {0}")]
    InvalidPick(#[from] PickValidationError),

    #[error("invalid result: {0}")]
    InvalidWinner(#[from] WinnerError),
}

/// Result of placing a pick.
#[derive(Debug)]
pub struct PickOutcome {
    /// The pick as it is stored after the effects are applied.
    pub pick: Pick,

    /// The entrant previously picked on this match, if any.
    pub replaced: Option<EntrantId>,

    /// Downstream picks deleted by the cascade.
    pub invalidated: BTreeSet<PickId>,

    /// The projected pair the pick was validated against.
    pub projected: VirtualPair,

    /// Effects to apply. Empty when the same entrant was already picked.
    pub effects: Vec<Effect>,
}

/// Result of recording a match result.
#[derive(Debug)]
pub struct ResultOutcome {
    pub previous_winner: Option<EntrantId>,

    /// Downstream results voided by a correction.
    pub voided: Vec<MatchId>,

    pub effects: Vec<Effect>,
}

/// The leaderboard together with the round being played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    pub current_round: Round,

    #[serde(flatten)]
    pub leaderboard: Leaderboard,
}

/// The pool engine orchestrates bracket operations.
///
/// This is a stateless object that validates and returns effects. All state is
/// passed in and returned explicitly.
#[derive(Debug, Clone, Default)]
pub struct PoolEngine {
    pub settings: Settings,
}

impl PoolEngine {
    pub fn new(settings: Settings) -> Self {
        PoolEngine { settings }
    }

    /// Places (or changes) a pick.
    ///
    /// # Errors
    ///
    /// - `PickSetMismatch`: `picks` do not belong to `bracket`
    /// - `NotOwner`: a participant edits someone else's bracket
    /// - `BracketSubmitted`: a participant edits a submitted bracket
    /// - `PoolLocked`: a participant edits after the lock deadline
    /// - `InvalidPick`: the match is unknown or the entrant is not projected into it
    #[allow(clippy::too_many_arguments)]
    pub fn place_pick(
        &self,
        tournament: &Tournament,
        bracket: &Bracket,
        picks: &PickSet,
        actor: &Actor,
        match_id: &MatchId,
        entrant_id: &EntrantId,
        now: DateTime<Utc>,
    ) -> Result<PickOutcome, PoolError> {
        if *picks.bracket_id() != bracket.id {
            return Err(PoolError::PickSetMismatch {
                expected: bracket.id.clone(),
                got: picks.bracket_id().clone(),
            });
        }

        let is_owner = actor.user == bracket.owner;
        if !actor.is_admin() {
            if !is_owner {
                return Err(PoolError::NotOwner {
                    bracket_id: bracket.id.clone(),
                    user: actor.user.clone(),
                });
            }
            if bracket.is_submitted() {
                return Err(PoolError::BracketSubmitted(bracket.id.clone()));
            }
            if let Some(lock_at) = self.settings.lock_at.filter(|_| self.settings.is_locked(now)) {
                return Err(PoolError::PoolLocked { lock_at });
            }
        }

        let projected = validate_pick(tournament, picks, match_id, entrant_id)?;

        let existing = picks.get(match_id);
        let pick_id = existing
            .map(|p| p.id.clone())
            .unwrap_or_else(|| Pick::default_id(&bracket.id, match_id));
        let pick = Pick::new(pick_id, bracket.id.clone(), match_id.clone(), entrant_id.clone());
        let replaced = existing.map(|p| p.entrant_id.clone());

        if replaced.as_ref() == Some(entrant_id) {
            debug!(bracket_id = %bracket.id, %match_id, %entrant_id, "Pick unchanged");
            return Ok(PickOutcome {
                pick,
                replaced,
                invalidated: BTreeSet::new(),
                projected,
                effects: Vec::new(),
            });
        }

        let invalidated = match &replaced {
            Some(old) => {
                let mut staged = picks.clone();
                staged.insert(pick.clone());
                invalidate(&staged, tournament, match_id, old)
            }
            None => BTreeSet::new(),
        };

        let mut effects = vec![Effect::UpsertPick { pick: pick.clone() }];
        if !invalidated.is_empty() {
            effects.push(Effect::DeletePicks {
                bracket_id: bracket.id.clone(),
                pick_ids: invalidated.clone(),
            });
        }

        let overriding = actor.is_admin()
            && (!is_owner || bracket.is_submitted() || self.settings.is_locked(now));
        if overriding {
            warn!(
                admin = %actor.user,
                bracket_id = %bracket.id,
                owner = %bracket.owner,
                %match_id,
                %entrant_id,
                "Admin pick override"
            );
            effects.push(Effect::MarkAdminOverride {
                bracket_id: bracket.id.clone(),
            });
            effects.push(Effect::RecordAudit {
                record: AuditRecord {
                    actor: actor.user.clone(),
                    at: now,
                    action: AdminAction::OverridePick {
                        bracket_id: bracket.id.clone(),
                        match_id: match_id.clone(),
                        entrant_id: entrant_id.clone(),
                    },
                },
            });
        }

        info!(
            bracket_id = %bracket.id,
            %match_id,
            %entrant_id,
            replaced = ?replaced,
            invalidated = invalidated.len(),
            "Pick placed"
        );

        Ok(PickOutcome {
            pick,
            replaced,
            invalidated,
            projected,
            effects,
        })
    }

    /// Records a match result. Administrators only.
    ///
    /// Recording a different winner over an existing result is a correction:
    /// the downstream slot is overwritten and dependent results are voided.
    /// Picks are never touched by results.
    pub fn record_result(
        &self,
        tournament: &Tournament,
        actor: &Actor,
        match_id: &MatchId,
        winner: &EntrantId,
        now: DateTime<Utc>,
    ) -> Result<ResultOutcome, PoolError> {
        if !actor.is_admin() {
            return Err(PoolError::AdminOnly(actor.user.clone()));
        }

        let advancement = record_winner(tournament, match_id, winner)?;

        if advancement.is_correction() {
            warn!(
                %match_id,
                previous = ?advancement.previous_winner,
                %winner,
                voided = advancement.voided.len(),
                "Correcting recorded result"
            );
        }

        let mut effects = vec![Effect::SetWinner {
            match_id: match_id.clone(),
            winner: winner.clone(),
        }];
        effects.extend(advancement.slot_write.clone().map(Effect::from_slot_write));
        effects.extend(
            advancement
                .voided
                .iter()
                .map(|id| Effect::ClearWinner { match_id: id.clone() }),
        );
        effects.extend(
            advancement
                .cleared_slots
                .iter()
                .cloned()
                .map(Effect::from_slot_write),
        );
        effects.push(Effect::RecordAudit {
            record: AuditRecord {
                actor: actor.user.clone(),
                at: now,
                action: AdminAction::RecordResult {
                    match_id: match_id.clone(),
                    winner: winner.clone(),
                    previous_winner: advancement.previous_winner.clone(),
                },
            },
        });

        info!(%match_id, %winner, admin = %actor.user, "Result recorded");

        Ok(ResultOutcome {
            previous_winner: advancement.previous_winner,
            voided: advancement.voided,
            effects,
        })
    }

    /// Submits a complete bracket, locking it against further owner edits.
    ///
    /// # Errors
    ///
    /// - `NotOwner`: only the owner submits
    /// - `BracketSubmitted`: already submitted
    /// - `IncompleteBracket`: some match has no pick
    pub fn submit_bracket(
        &self,
        tournament: &Tournament,
        bracket: &Bracket,
        picks: &PickSet,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<Vec<Effect>, PoolError> {
        if actor.user != bracket.owner {
            return Err(PoolError::NotOwner {
                bracket_id: bracket.id.clone(),
                user: actor.user.clone(),
            });
        }
        if bracket.is_submitted() {
            return Err(PoolError::BracketSubmitted(bracket.id.clone()));
        }
        if *picks.bracket_id() != bracket.id {
            return Err(PoolError::PickSetMismatch {
                expected: bracket.id.clone(),
                got: picks.bracket_id().clone(),
            });
        }

        let missing = missing_picks(tournament, picks).len();
        if missing > 0 {
            return Err(PoolError::IncompleteBracket {
                bracket_id: bracket.id.clone(),
                missing,
                total: tournament.matches().len(),
            });
        }

        info!(bracket_id = %bracket.id, owner = %bracket.owner, "Bracket submitted");
        Ok(vec![Effect::LockBracket {
            bracket_id: bracket.id.clone(),
            at: now,
        }])
    }

    /// Scores and ranks every bracket with the configured weights.
    ///
    /// `today` selects the current round from the configured schedule.
    pub fn leaderboard<'a>(
        &self,
        tournament: &Tournament,
        entries: impl IntoIterator<Item = (&'a Bracket, &'a PickSet)>,
        today: NaiveDate,
    ) -> Standings {
        Standings {
            current_round: self.settings.current_round(today),
            leaderboard: build_leaderboard(tournament, entries, &self.settings.weights),
        }
    }
}
