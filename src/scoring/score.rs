//! Scoring one bracket against the recorded results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{BracketId, PickSet, Round, ScoringWeights, Tournament};

/// Per-round counts: picks made, picks proven right, points earned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTally {
    pub correct: u32,
    pub total: u32,
    pub points: u32,
}

/// A bracket's score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketScore {
    pub bracket_id: BracketId,
    pub total_points: u32,

    /// Upper bound: weights of every undecided match the bracket has picked,
    /// whether or not the picked entrant can still get there.
    pub possible_remaining_points: u32,

    /// No decided match has been picked wrong.
    pub is_perfect: bool,

    pub round_breakdown: BTreeMap<Round, RoundTally>,
}

impl BracketScore {
    /// The most this bracket could finish with.
    pub fn max_possible_points(&self) -> u32 {
        self.total_points.saturating_add(self.possible_remaining_points)
    }
}

/// Scores `picks` against the tournament's recorded winners.
///
/// Picks on matches the tournament does not know are ignored. Point totals
/// saturate at `u32::MAX` rather than wrapping.
pub fn score(picks: &PickSet, tournament: &Tournament, weights: &ScoringWeights) -> BracketScore {
    let mut result = BracketScore {
        bracket_id: picks.bracket_id().clone(),
        total_points: 0,
        possible_remaining_points: 0,
        is_perfect: true,
        round_breakdown: Round::ALL.iter().map(|&r| (r, RoundTally::default())).collect(),
    };

    for pick in picks.iter() {
        let Some(m) = tournament.get(&pick.match_id) else {
            continue;
        };
        let weight = weights.weight(m.round);
        let tally = result.round_breakdown.entry(m.round).or_default();
        tally.total += 1;

        match &m.winner {
            Some(winner) if *winner == pick.entrant_id => {
                tally.correct += 1;
                tally.points = tally.points.saturating_add(weight);
                result.total_points = result.total_points.saturating_add(weight);
            }
            Some(_) => result.is_perfect = false,
            None => {
                result.possible_remaining_points =
                    result.possible_remaining_points.saturating_add(weight)
            }
        }
    }

    result
}
