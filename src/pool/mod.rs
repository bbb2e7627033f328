//! Pool engine and storage.
//!
//! # Architecture
//!
//! The pool follows the effects-as-data pattern:
//! - `PoolEngine` validates a request against one consistent snapshot and
//!   returns `Effect` values
//! - an `EffectInterpreter` (here `InMemoryPool`) applies each batch atomically
//!
//! # Key Invariants
//!
//! 1. **Projection**: a pick on a later-round match always names one of that
//!    match's projected entrants when it is placed.
//!
//! 2. **Cascade closure**: changing a pick deletes every downstream pick built
//!    on the replaced entrant, in the same batch.
//!
//! 3. **Results never touch picks**: corrections re-propagate through match
//!    slots only.

pub mod engine;
pub mod memory;

#[cfg(test)]
mod engine_tests;

// Re-export commonly used types
pub use engine::{Actor, PickOutcome, PoolEngine, PoolError, ResultOutcome, Role, Standings};
pub use memory::{ApplyError, InMemoryPool};
