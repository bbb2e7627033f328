//! Bracket Pool - functional core for a 64-entrant single-elimination prediction pool.
//!
//! This library provides the tournament topology, pick projection and cascade
//! invalidation, result advancement, scoring and a snapshot-backed in-memory pool.

pub mod effects;
pub mod persistence;
pub mod pool;
pub mod scoring;
pub mod state;
pub mod types;

#[cfg(test)]
pub mod test_utils;
