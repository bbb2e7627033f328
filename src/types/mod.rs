//! Core domain types for the bracket pool.
//!
//! Entities reference each other by id newtypes; [`Tournament`] provides the
//! indexes that resolve those ids.

pub mod bracket;
pub mod entrant;
pub mod game;
pub mod ids;
pub mod round;
pub mod settings;
pub mod tournament;

// Re-export commonly used types at the module level
pub use bracket::{Bracket, Pick, PickSet};
pub use entrant::{Entrant, InvalidSeed, Seed};
pub use game::{Match, MatchCoord, MatchState};
pub use ids::{BracketId, EntrantId, MatchId, PickId, UserId};
pub use round::{Region, Round, Side};
pub use settings::{RoundWindow, ScoringWeights, Settings, SettingsError};
pub use tournament::{Tournament, TournamentError};
