//! Pure tournament logic for the bracket pool.
//!
//! This module contains the functional core: topology, virtual projection,
//! cascade invalidation and result advancement. Nothing here performs I/O;
//! callers apply the returned changes.

pub mod advancement;
pub mod cascade;
pub mod downstream;
pub mod projection;
pub mod setup;
pub mod topology;
pub mod validation;

// Re-export commonly used types and functions
pub use advancement::{Advancement, SlotWrite, WinnerError, record_winner};
pub use cascade::invalidate;
pub use downstream::{downstream_chain, is_downstream_of};
pub use projection::{Projector, VirtualPair, virtual_entrants};
pub use setup::{SetupError, build_matches, build_tournament};
pub use topology::{
    SEED_PAIRINGS, SuccessorSlot, TOTAL_MATCHES, TopologyError, all_coords, feeder_slots,
    matches_in_round, next_round, previous_round, successor_slot, validate_coord,
};
pub use validation::{
    FieldValidationError, PickValidationError, is_complete, missing_picks, validate_field,
    validate_pick,
};
