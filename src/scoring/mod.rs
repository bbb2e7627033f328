//! Scoring and ranking.
//!
//! Scores are computed from a snapshot of picks and results and are never
//! stored; recompute after every result.

pub mod leaderboard;
pub mod score;

pub use leaderboard::{Leaderboard, Standing, build_leaderboard, rank};
pub use score::{BracketScore, RoundTally, score};
