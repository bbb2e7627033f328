//! Ranking brackets.

use serde::{Deserialize, Serialize};

use crate::types::{Bracket, BracketId, PickSet, ScoringWeights, Tournament, UserId};

use super::score::{BracketScore, score};

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based position. Ties keep input order and still get distinct ranks.
    pub rank: usize,
    pub bracket_id: BracketId,
    pub owner: UserId,
    pub total_points: u32,
    pub possible_remaining_points: u32,
    pub is_perfect: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub standings: Vec<Standing>,
    pub perfect_brackets: usize,
    pub participants: usize,
}

/// Ranks already computed scores.
///
/// Sorted by total points, then remaining points, both descending. The sort
/// is stable, so equal brackets stay in the order given.
pub fn rank(scored: Vec<(UserId, BracketScore)>) -> Leaderboard {
    let participants = scored.len();
    let perfect_brackets = scored.iter().filter(|(_, s)| s.is_perfect).count();

    let mut scored = scored;
    scored.sort_by(|(_, a), (_, b)| {
        b.total_points
            .cmp(&a.total_points)
            .then(b.possible_remaining_points.cmp(&a.possible_remaining_points))
    });

    let standings = scored
        .into_iter()
        .enumerate()
        .map(|(i, (owner, s))| Standing {
            rank: i + 1,
            bracket_id: s.bracket_id,
            owner,
            total_points: s.total_points,
            possible_remaining_points: s.possible_remaining_points,
            is_perfect: s.is_perfect,
        })
        .collect();

    Leaderboard {
        standings,
        perfect_brackets,
        participants,
    }
}

/// Scores and ranks every bracket.
pub fn build_leaderboard<'a>(
    tournament: &Tournament,
    entries: impl IntoIterator<Item = (&'a Bracket, &'a PickSet)>,
    weights: &ScoringWeights,
) -> Leaderboard {
    rank(
        entries
            .into_iter()
            .map(|(bracket, picks)| (bracket.owner.clone(), score(picks, tournament, weights)))
            .collect(),
    )
}
