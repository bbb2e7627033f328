//! Effects-as-data for pool mutations.
//!
//! Pool operations never write anything themselves. They return a batch of
//! [`Effect`] values describing the writes, and the caller applies each batch
//! atomically through an [`EffectInterpreter`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::state::SlotWrite;
use crate::types::{BracketId, EntrantId, MatchId, Pick, PickId, Side, UserId};

pub mod interpreter;

pub use interpreter::EffectInterpreter;

/// A single write to pool storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    // ─── Picks ────────────────────────────────────────────────────────────────
    /// Insert the pick, or replace the bracket's existing pick on the same match.
    UpsertPick { pick: Pick },

    /// Delete the given picks of one bracket.
    DeletePicks {
        bracket_id: BracketId,
        pick_ids: BTreeSet<PickId>,
    },

    // ─── Brackets ─────────────────────────────────────────────────────────────
    /// Submit the bracket; the owner can no longer edit it.
    LockBracket {
        bracket_id: BracketId,
        at: DateTime<Utc>,
    },

    /// Flag the bracket as edited by an administrator.
    MarkAdminOverride { bracket_id: BracketId },

    // ─── Results ──────────────────────────────────────────────────────────────
    /// Record the winner of a match.
    SetWinner { match_id: MatchId, winner: EntrantId },

    /// Void a previously recorded result.
    ClearWinner { match_id: MatchId },

    /// Put an entrant into a match slot, replacing whoever was there.
    FillSlot {
        match_id: MatchId,
        side: Side,
        entrant_id: EntrantId,
    },

    /// Empty a match slot.
    ClearSlot { match_id: MatchId, side: Side },

    // ─── Audit ────────────────────────────────────────────────────────────────
    /// Append an entry to the admin audit log.
    RecordAudit { record: AuditRecord },
}

impl Effect {
    /// The effect that performs a slot write.
    pub fn from_slot_write(write: SlotWrite) -> Effect {
        match write.entrant_id {
            Some(entrant_id) => Effect::FillSlot {
                match_id: write.match_id,
                side: write.side,
                entrant_id,
            },
            None => Effect::ClearSlot {
                match_id: write.match_id,
                side: write.side,
            },
        }
    }
}

/// What an administrator did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AdminAction {
    /// Recorded (or corrected) a match result.
    RecordResult {
        match_id: MatchId,
        winner: EntrantId,
        previous_winner: Option<EntrantId>,
    },

    /// Placed a pick in someone else's bracket, or after the lock.
    OverridePick {
        bracket_id: BracketId,
        match_id: MatchId,
        entrant_id: EntrantId,
    },
}

/// One entry of the admin audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub actor: UserId,
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub action: AdminAction,
}
