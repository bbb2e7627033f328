//! Validation of the entrant field and of individual picks.
//!
//! Pure functions; the pool engine decides what to do with the errors.

use std::collections::HashSet;

use crate::types::{Entrant, EntrantId, Match, MatchId, PickSet, Region, Seed, Tournament};

use super::projection::{Projector, VirtualPair};
use super::topology::TOTAL_MATCHES;

/// Entrants per region.
pub const REGION_SIZE: usize = 16;

/// Entrants in a full field.
pub const FIELD_SIZE: usize = REGION_SIZE * 4;

/// Error types for field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValidationError {
    /// The field does not have exactly 64 entrants.
    WrongFieldSize { expected: usize, got: usize },

    /// Two entrants share an id.
    DuplicateEntrant { entrant_id: EntrantId },

    /// Two entrants share a seed within one region.
    DuplicateSeed { region: Region, seed: Seed },
}

impl std::fmt::Display for FieldValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValidationError::WrongFieldSize { expected, got } => {
                write!(f, "Field has {} entrants, expected {}", got, expected)
            }
            FieldValidationError::DuplicateEntrant { entrant_id } => {
                write!(f, "Entrant {} appears more than once", entrant_id)
            }
            FieldValidationError::DuplicateSeed { region, seed } => {
                write!(
                    f,
                    "Seed {} is used more than once in the {} region",
                    seed, region
                )
            }
        }
    }
}

impl std::error::Error for FieldValidationError {}

/// Error types for pick validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickValidationError {
    /// No match has this id.
    UnknownMatch { match_id: MatchId },

    /// The entrant is not projected into the match by this bracket's earlier picks.
    NotAVirtualEntrant {
        match_id: MatchId,
        entrant_id: EntrantId,
        projected: VirtualPair,
    },
}

impl std::fmt::Display for PickValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickValidationError::UnknownMatch { match_id } => {
                write!(f, "Match {} not found", match_id)
            }
            PickValidationError::NotAVirtualEntrant {
                match_id,
                entrant_id,
                projected,
            } => {
                let show = |slot: &Option<EntrantId>| match slot {
                    Some(id) => id.to_string(),
                    None => "(empty)".to_string(),
                };
                write!(
                    f,
                    "{} cannot be picked in match {}: this bracket projects {} vs {} there",
                    entrant_id,
                    match_id,
                    show(&projected.left),
                    show(&projected.right)
                )
            }
        }
    }
}

impl std::error::Error for PickValidationError {}

/// Validates that `entrants` form a full field: 64 unique entrants, and in
/// each region exactly one entrant per seed 1-16.
///
/// With 64 distinct `(region, seed)` pairs every region is full, so a short
/// region shows up as a duplicate seed elsewhere.
pub fn validate_field(entrants: &[Entrant]) -> Result<(), FieldValidationError> {
    if entrants.len() != FIELD_SIZE {
        return Err(FieldValidationError::WrongFieldSize {
            expected: FIELD_SIZE,
            got: entrants.len(),
        });
    }

    let mut ids = HashSet::with_capacity(FIELD_SIZE);
    let mut seeds = HashSet::with_capacity(FIELD_SIZE);
    for entrant in entrants {
        if !ids.insert(&entrant.id) {
            return Err(FieldValidationError::DuplicateEntrant {
                entrant_id: entrant.id.clone(),
            });
        }
        if !seeds.insert((entrant.region, entrant.seed)) {
            return Err(FieldValidationError::DuplicateSeed {
                region: entrant.region,
                seed: entrant.seed,
            });
        }
    }

    Ok(())
}

/// Checks that `entrant_id` may be picked to win `match_id` in this bracket.
///
/// The entrant must be one of the match's virtual entrants given the
/// bracket's picks on earlier rounds. Returns the projected pair on success.
pub fn validate_pick(
    tournament: &Tournament,
    picks: &PickSet,
    match_id: &MatchId,
    entrant_id: &EntrantId,
) -> Result<VirtualPair, PickValidationError> {
    if tournament.get(match_id).is_none() {
        return Err(PickValidationError::UnknownMatch {
            match_id: match_id.clone(),
        });
    }

    let projected = Projector::new(tournament, picks).resolve(match_id);
    if !projected.contains(entrant_id) {
        return Err(PickValidationError::NotAVirtualEntrant {
            match_id: match_id.clone(),
            entrant_id: entrant_id.clone(),
            projected,
        });
    }
    Ok(projected)
}

/// Matches this bracket has not picked yet, in tournament order.
pub fn missing_picks(tournament: &Tournament, picks: &PickSet) -> Vec<MatchId> {
    let mut missing: Vec<&Match> = tournament
        .matches()
        .iter()
        .filter(|m| picks.get(&m.id).is_none())
        .collect();
    missing.sort_by_key(|m| m.coord());
    missing.into_iter().map(|m| m.id.clone()).collect()
}

/// True once the bracket holds a pick for every one of the 63 matches.
pub fn is_complete(tournament: &Tournament, picks: &PickSet) -> bool {
    tournament.matches().len() == TOTAL_MATCHES && missing_picks(tournament, picks).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestTournament, entrant_id, field};
    use crate::types::{MatchCoord, Round};

    mod validate_field_tests {
        use super::*;

        #[test]
        fn full_field_is_valid() {
            assert_eq!(validate_field(&field()), Ok(()));
        }

        #[test]
        fn rejects_short_field() {
            let mut entrants = field();
            entrants.pop();
            assert_eq!(
                validate_field(&entrants),
                Err(FieldValidationError::WrongFieldSize {
                    expected: 64,
                    got: 63
                })
            );
        }

        #[test]
        fn rejects_duplicate_seed_in_region() {
            let mut entrants = field();
            let east_two = entrants
                .iter()
                .position(|e| e.id == entrant_id(Region::East, 2))
                .unwrap();
            entrants[east_two].seed = Seed::new(1).unwrap();
            assert_eq!(
                validate_field(&entrants),
                Err(FieldValidationError::DuplicateSeed {
                    region: Region::East,
                    seed: Seed::new(1).unwrap(),
                })
            );
        }

        #[test]
        fn unbalanced_regions_surface_as_duplicate_seed() {
            let mut entrants = field();
            let west_sixteen = entrants
                .iter()
                .position(|e| e.id == entrant_id(Region::West, 16))
                .unwrap();
            entrants[west_sixteen].region = Region::East;
            assert_eq!(
                validate_field(&entrants),
                Err(FieldValidationError::DuplicateSeed {
                    region: Region::East,
                    seed: Seed::new(16).unwrap(),
                })
            );
        }

        #[test]
        fn rejects_duplicate_id() {
            let mut entrants = field();
            entrants[1].id = entrants[0].id.clone();
            assert_eq!(
                validate_field(&entrants),
                Err(FieldValidationError::DuplicateEntrant {
                    entrant_id: entrants[0].id.clone()
                })
            );
        }

        #[test]
        fn error_messages_are_readable() {
            let err = FieldValidationError::DuplicateSeed {
                region: Region::South,
                seed: Seed::new(7).unwrap(),
            };
            assert_eq!(err.to_string(), "Seed 7 is used more than once in the South region");
        }
    }

    mod validate_pick_tests {
        use super::*;

        #[test]
        fn first_round_pick_of_stored_entrant_is_valid() {
            let t = TestTournament::new();
            let id = t.id_at(MatchCoord::regional(Round::R64, Region::East, 1));
            let picks = PickSet::new("b1");
            let underdog = entrant_id(Region::East, 16);
            assert!(validate_pick(&t.tournament, &picks, &id, &underdog).is_ok());
        }

        #[test]
        fn later_pick_must_be_projected() {
            let t = TestTournament::new();
            let id = t.id_at(MatchCoord::regional(Round::R32, Region::East, 1));
            let picks = PickSet::new("b1");
            let err = validate_pick(&t.tournament, &picks, &id, &entrant_id(Region::East, 1))
                .unwrap_err();
            assert!(matches!(err, PickValidationError::NotAVirtualEntrant { .. }));
            assert!(err.to_string().contains("(empty) vs (empty)"));

            let picks = t.chalk_picks("b1");
            let favorite = entrant_id(Region::East, 1);
            assert!(validate_pick(&t.tournament, &picks, &id, &favorite).is_ok());
        }

        #[test]
        fn unknown_match_is_rejected() {
            let t = TestTournament::new();
            let picks = PickSet::new("b1");
            assert_eq!(
                validate_pick(
                    &t.tournament,
                    &picks,
                    &MatchId::new("nope"),
                    &entrant_id(Region::East, 1)
                ),
                Err(PickValidationError::UnknownMatch {
                    match_id: MatchId::new("nope")
                })
            );
        }
    }

    mod completeness {
        use super::*;

        #[test]
        fn empty_bracket_misses_everything() {
            let t = TestTournament::new();
            let picks = PickSet::new("b1");
            let missing = missing_picks(&t.tournament, &picks);
            assert_eq!(missing.len(), 63);
            assert_eq!(missing[0], t.id_at(MatchCoord::regional(Round::R64, Region::East, 1)));
            assert!(!is_complete(&t.tournament, &picks));
        }

        #[test]
        fn chalk_bracket_is_complete() {
            let t = TestTournament::new();
            let picks = t.chalk_picks("b1");
            assert!(is_complete(&t.tournament, &picks));
        }
    }
}
