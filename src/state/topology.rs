//! Tournament topology.
//!
//! Pure functions over match coordinates describing which match feeds which.
//! Every mapping is an explicit lookup table; nothing is inferred from the
//! matches a collaborator happens to have stored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{MatchCoord, Region, Round, Seed, Side};

/// Total number of matches in a 64-entrant single-elimination tournament.
pub const TOTAL_MATCHES: usize = 63;

/// First-round seed pairings within a region, indexed by `match_number - 1`.
pub const SEED_PAIRINGS: [(u8, u8); 8] = [
    (1, 16),
    (8, 9),
    (5, 12),
    (4, 13),
    (6, 11),
    (3, 14),
    (7, 10),
    (2, 15),
];

/// Regional feeders, indexed by `match_number - 1`: match `k` is fed by
/// previous-round matches `2k-1` (left) and `2k` (right).
const REGIONAL_FEEDERS: [[u8; 2]; 4] = [[1, 2], [3, 4], [5, 6], [7, 8]];

/// Regional successors, indexed by `match_number - 1`: odd matches fill the
/// left slot of `ceil(n/2)`, even matches the right slot.
const REGIONAL_SUCCESSORS: [(u8, Side); 8] = [
    (1, Side::Left),
    (1, Side::Right),
    (2, Side::Left),
    (2, Side::Right),
    (3, Side::Left),
    (3, Side::Right),
    (4, Side::Left),
    (4, Side::Right),
];

/// Final-Four feeders, indexed by `match_number - 1`: `[left region, right region]`.
const FINAL_FOUR_FEEDERS: [[Region; 2]; 2] = [
    [Region::East, Region::West],
    [Region::South, Region::Midwest],
];

/// Where each region's Elite-8 winner goes in the Final Four.
const fn region_to_final_four(region: Region) -> (u8, Side) {
    match region {
        Region::East => (1, Side::Left),
        Region::West => (1, Side::Right),
        Region::South => (2, Side::Left),
        Region::Midwest => (2, Side::Right),
    }
}

/// Championship slot filled by each Final-Four match, indexed by `match_number - 1`.
const FINAL_FOUR_TO_CHAMPIONSHIP: [Side; 2] = [Side::Left, Side::Right];

/// A coordinate that names no match in the tournament.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("{round} is a regional round and requires a region")]
    MissingRegion { round: Round },

    #[error("{round} is cross-regional but was given region {region}")]
    UnexpectedRegion { round: Round, region: Region },

    #[error("{round} has no match number {number}")]
    MatchNumberOutOfRange { round: Round, number: u8 },
}

/// The downstream match and side a match's winner advances into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuccessorSlot {
    pub coord: MatchCoord,
    pub side: Side,
}

/// Checks that a coordinate names a real match.
pub fn validate_coord(coord: MatchCoord) -> Result<(), TopologyError> {
    match (coord.round.is_regional(), coord.region) {
        (true, None) => {
            return Err(TopologyError::MissingRegion { round: coord.round });
        }
        (false, Some(region)) => {
            return Err(TopologyError::UnexpectedRegion {
                round: coord.round,
                region,
            });
        }
        _ => {}
    }
    if coord.number == 0 || coord.number > coord.round.match_count() {
        return Err(TopologyError::MatchNumberOutOfRange {
            round: coord.round,
            number: coord.number,
        });
    }
    Ok(())
}

/// Returns the round that feeds into `round`, or `None` for the first round.
pub fn previous_round(round: Round) -> Option<Round> {
    round.previous()
}

/// Returns the round `round` feeds into, or `None` for the Championship.
pub fn next_round(round: Round) -> Option<Round> {
    round.next()
}

/// Returns the `[left, right]` feeder coordinates of a match.
///
/// First-round matches have no feeders (`Ok(None)`): their entrants are set at creation.
pub fn feeder_slots(coord: MatchCoord) -> Result<Option<[MatchCoord; 2]>, TopologyError> {
    validate_coord(coord)?;
    let idx = usize::from(coord.number - 1);

    let feeders = match (coord.round, coord.region) {
        (Round::R64, _) => return Ok(None),
        (Round::R32 | Round::S16 | Round::E8, Some(region)) => {
            let Some(prev) = coord.round.previous() else {
                return Ok(None);
            };
            let [left, right] = REGIONAL_FEEDERS[idx];
            [
                MatchCoord::regional(prev, region, left),
                MatchCoord::regional(prev, region, right),
            ]
        }
        (Round::F4, _) => {
            let [left, right] = FINAL_FOUR_FEEDERS[idx];
            [
                MatchCoord::regional(Round::E8, left, 1),
                MatchCoord::regional(Round::E8, right, 1),
            ]
        }
        (Round::Championship, _) => [MatchCoord::final_four(1), MatchCoord::final_four(2)],
        // validate_coord guarantees regional rounds carry a region
        (_, None) => return Err(TopologyError::MissingRegion { round: coord.round }),
    };

    Ok(Some(feeders))
}

/// Returns where a match's winner advances to, or `None` for the Championship.
pub fn successor_slot(coord: MatchCoord) -> Result<Option<SuccessorSlot>, TopologyError> {
    validate_coord(coord)?;
    let idx = usize::from(coord.number - 1);

    let slot = match (coord.round, coord.region) {
        (Round::Championship, _) => return Ok(None),
        (Round::R64 | Round::R32 | Round::S16, Some(region)) => {
            let (number, side) = REGIONAL_SUCCESSORS[idx];
            let Some(next) = coord.round.next() else {
                return Ok(None);
            };
            SuccessorSlot {
                coord: MatchCoord::regional(next, region, number),
                side,
            }
        }
        (Round::E8, Some(region)) => {
            let (number, side) = region_to_final_four(region);
            SuccessorSlot {
                coord: MatchCoord::final_four(number),
                side,
            }
        }
        (Round::F4, _) => SuccessorSlot {
            coord: MatchCoord::championship(),
            side: FINAL_FOUR_TO_CHAMPIONSHIP[idx],
        },
        (_, None) => return Err(TopologyError::MissingRegion { round: coord.round }),
    };

    Ok(Some(slot))
}

/// Coordinates of every match in one round, regions in region order.
pub fn matches_in_round(round: Round) -> Vec<MatchCoord> {
    if round.is_regional() {
        Region::ALL
            .iter()
            .flat_map(|&region| {
                (1..=round.match_count()).map(move |n| MatchCoord::regional(round, region, n))
            })
            .collect()
    } else {
        (1..=round.match_count())
            .map(|n| MatchCoord::new(round, None, n))
            .collect()
    }
}

/// Coordinates of all 63 matches, first round first.
pub fn all_coords() -> Vec<MatchCoord> {
    Round::ALL.iter().flat_map(|&r| matches_in_round(r)).collect()
}

/// The `(left, right)` seeds of a first-round match, or `None` for a bad match number.
pub fn first_round_pairing(number: u8) -> Option<(Seed, Seed)> {
    let (left, right) = *SEED_PAIRINGS.get(usize::from(number.checked_sub(1)?))?;
    Some((Seed::new(left).ok()?, Seed::new(right).ok()?))
}
