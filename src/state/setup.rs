//! Building a fresh tournament from a field of 64 entrants.

use std::collections::HashMap;
use thiserror::Error;

use crate::types::{Entrant, EntrantId, Match, Region, Round, Seed, Tournament, TournamentError};

use super::topology::{all_coords, first_round_pairing};
use super::validation::{FieldValidationError, validate_field};

/// Errors setting up a tournament.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid field: {0}")]
    Field(#[from] FieldValidationError),

    #[error(transparent)]
    Tournament(#[from] TournamentError),
}

/// Creates all 63 matches for a validated field.
///
/// First-round matches are filled from the seed pairings; every later match
/// starts empty. Match ids are derived from coordinates (`r64-east-1`, `f4-2`, ...).
pub fn build_matches(entrants: &[Entrant]) -> Result<Vec<Match>, FieldValidationError> {
    validate_field(entrants)?;

    let by_seed: HashMap<(Region, Seed), &EntrantId> = entrants
        .iter()
        .map(|e| ((e.region, e.seed), &e.id))
        .collect();

    let matches = all_coords()
        .into_iter()
        .map(|coord| {
            let m = Match::empty(coord.default_id(), coord);
            let (Round::R64, Some(region)) = (coord.round, coord.region) else {
                return m;
            };
            let Some((left, right)) = first_round_pairing(coord.number) else {
                return m;
            };
            match (by_seed.get(&(region, left)), by_seed.get(&(region, right))) {
                (Some(&l), Some(&r)) => m.with_entrants(l.clone(), r.clone()),
                _ => m,
            }
        })
        .collect();

    Ok(matches)
}

/// Validates the field and indexes it together with its freshly built matches.
pub fn build_tournament(entrants: Vec<Entrant>) -> Result<Tournament, SetupError> {
    let matches = build_matches(&entrants)?;
    Ok(Tournament::new(entrants, matches)?)
}
