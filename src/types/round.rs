//! Rounds, regions and slot sides.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stage of the tournament, in elimination order.
///
/// The derived `Ord` follows declaration order, so `Round::R64 < Round::Championship`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Round {
    #[serde(rename = "R64")]
    R64,
    #[serde(rename = "R32")]
    R32,
    #[serde(rename = "S16")]
    S16,
    #[serde(rename = "E8")]
    E8,
    #[serde(rename = "F4")]
    F4,
    #[serde(rename = "CHAMP")]
    Championship,
}

impl Round {
    /// All rounds from first to last.
    pub const ALL: [Round; 6] = [
        Round::R64,
        Round::R32,
        Round::S16,
        Round::E8,
        Round::F4,
        Round::Championship,
    ];

    /// Zero-based position in elimination order.
    pub fn index(self) -> usize {
        match self {
            Round::R64 => 0,
            Round::R32 => 1,
            Round::S16 => 2,
            Round::E8 => 3,
            Round::F4 => 4,
            Round::Championship => 5,
        }
    }

    /// The round whose winners feed this one, or `None` for the first round.
    pub fn previous(self) -> Option<Round> {
        match self {
            Round::R64 => None,
            Round::R32 => Some(Round::R64),
            Round::S16 => Some(Round::R32),
            Round::E8 => Some(Round::S16),
            Round::F4 => Some(Round::E8),
            Round::Championship => Some(Round::F4),
        }
    }

    /// The round this one's winners advance into, or `None` for the Championship.
    pub fn next(self) -> Option<Round> {
        match self {
            Round::R64 => Some(Round::R32),
            Round::R32 => Some(Round::S16),
            Round::S16 => Some(Round::E8),
            Round::E8 => Some(Round::F4),
            Round::F4 => Some(Round::Championship),
            Round::Championship => None,
        }
    }

    /// Returns true for rounds played inside a single region.
    pub fn is_regional(self) -> bool {
        matches!(self, Round::R64 | Round::R32 | Round::S16 | Round::E8)
    }

    /// Number of matches in this round within one region (regional rounds),
    /// or in total (Final Four and Championship).
    pub fn match_count(self) -> u8 {
        match self {
            Round::R64 => 8,
            Round::R32 => 4,
            Round::S16 => 2,
            Round::E8 => 1,
            Round::F4 => 2,
            Round::Championship => 1,
        }
    }

    /// Short code used on the wire and in logs.
    pub fn code(self) -> &'static str {
        match self {
            Round::R64 => "R64",
            Round::R32 => "R32",
            Round::S16 => "S16",
            Round::E8 => "E8",
            Round::F4 => "F4",
            Round::Championship => "CHAMP",
        }
    }

    /// Human-readable round name.
    pub fn label(self) -> &'static str {
        match self {
            Round::R64 => "Round of 64",
            Round::R32 => "Round of 32",
            Round::S16 => "Sweet 16",
            Round::E8 => "Elite 8",
            Round::F4 => "Final 4",
            Round::Championship => "Championship",
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One of the four groups of 16 entrants.
///
/// Declaration order is the region order used by the Final-Four pairing:
/// East meets West, South meets Midwest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    East,
    West,
    South,
    Midwest,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::East, Region::West, Region::South, Region::Midwest];

    /// One-based position in region order.
    pub fn ordinal(self) -> u8 {
        match self {
            Region::East => 1,
            Region::West => 2,
            Region::South => 3,
            Region::Midwest => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Region::East => "East",
            Region::West => "West",
            Region::South => "South",
            Region::Midwest => "Midwest",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which of a match's two entrant slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}
