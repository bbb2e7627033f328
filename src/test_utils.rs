//! Shared test fixtures and arbitrary generators for property-based testing.

use std::collections::HashMap;

use crate::state::{
    all_coords, build_matches, build_tournament, feeder_slots, is_downstream_of, record_winner,
};
use crate::types::{
    BracketId, Entrant, EntrantId, MatchCoord, MatchId, Pick, PickSet, Region, Round, Seed,
    Tournament,
};
use proptest::prelude::*;

/// Id of the entrant with `seed` in `region`, e.g. `east-1`.
pub fn entrant_id(region: Region, seed: u8) -> EntrantId {
    EntrantId::new(format!("{}-{}", region.label().to_ascii_lowercase(), seed))
}

/// A full 64-entrant field, regions in order, seeds ascending.
pub fn field() -> Vec<Entrant> {
    Region::ALL
        .iter()
        .flat_map(|&region| {
            Seed::all().map(move |seed| {
                Entrant::new(
                    entrant_id(region, seed.get()),
                    format!("{} #{}", region, seed),
                    region,
                    seed,
                )
            })
        })
        .collect()
}

/// A freshly set-up tournament with helpers for addressing its matches.
pub struct TestTournament {
    pub tournament: Tournament,
}

impl TestTournament {
    pub fn new() -> Self {
        TestTournament {
            tournament: build_tournament(field()).unwrap(),
        }
    }

    /// A tournament missing the match at `coord`.
    pub fn without(coord: MatchCoord) -> Self {
        let matches = build_matches(&field())
            .unwrap()
            .into_iter()
            .filter(|m| m.coord() != coord)
            .collect();
        TestTournament {
            tournament: Tournament::new(field(), matches).unwrap(),
        }
    }

    pub fn id_at(&self, coord: MatchCoord) -> MatchId {
        self.tournament.at(coord).unwrap().id.clone()
    }

    /// The stored `(left, right)` entrants of a first-round match.
    pub fn stored_pair(&self, coord: MatchCoord) -> (EntrantId, EntrantId) {
        let m = self.tournament.at(coord).unwrap();
        (m.left.clone().unwrap(), m.right.clone().unwrap())
    }

    /// A pick with the default id for `(bracket, match at coord)`.
    pub fn pick(&self, bracket: &str, coord: MatchCoord, entrant: EntrantId) -> Pick {
        let match_id = self.id_at(coord);
        Pick::new(
            Pick::default_id(&BracketId::new(bracket), &match_id),
            bracket,
            match_id,
            entrant,
        )
    }

    /// A complete bracket picking the better seed everywhere (East breaks ties).
    pub fn chalk_picks(&self, bracket: &str) -> PickSet {
        self.bracket_from(bracket, |l, r| better(&self.tournament, l, r))
    }

    /// A complete, consistent bracket; `choose(left, right)` picks each match's winner.
    pub fn bracket_from(
        &self,
        bracket: &str,
        mut choose: impl FnMut(&EntrantId, &EntrantId) -> EntrantId,
    ) -> PickSet {
        let mut winners: HashMap<MatchCoord, EntrantId> = HashMap::new();
        let mut picks = PickSet::new(bracket);
        for coord in all_coords() {
            let (left, right) = match feeder_slots(coord).unwrap() {
                None => self.stored_pair(coord),
                Some([l, r]) => (winners[&l].clone(), winners[&r].clone()),
            };
            let winner = choose(&left, &right);
            picks.insert(self.pick(bracket, coord, winner.clone()));
            winners.insert(coord, winner);
        }
        picks
    }

    /// Every match feeding `target` plus `target` itself, in playing order.
    pub fn path_to(target: MatchCoord) -> Vec<MatchCoord> {
        all_coords()
            .into_iter()
            .filter(|&c| c == target || is_downstream_of(target, c).unwrap())
            .collect()
    }

    /// The better-seeded of a match's two stored entrants.
    pub fn favorite(t: &Tournament, coord: MatchCoord) -> EntrantId {
        let m = t.at(coord).unwrap();
        better(t, m.left.as_ref().unwrap(), m.right.as_ref().unwrap())
    }

    /// Records `winner` at `coord` and advances it, as an admin would.
    pub fn decide(&mut self, coord: MatchCoord, winner: EntrantId) {
        let id = self.id_at(coord);
        let adv = record_winner(&self.tournament, &id, &winner).unwrap();
        self.tournament.set_winner(&id, Some(winner));
        for write in adv.slot_write.iter().chain(&adv.cleared_slots) {
            self.tournament
                .set_slot(&write.match_id, write.side, write.entrant_id.clone());
        }
        for voided in &adv.voided {
            self.tournament.set_winner(voided, None);
        }
    }

    /// Plays every match up to and including `last` with the favorite winning.
    pub fn play_chalk_through(&mut self, last: Round) {
        for coord in all_coords().into_iter().filter(|c| c.round <= last) {
            let favorite = Self::favorite(&self.tournament, coord);
            self.decide(coord, favorite);
        }
    }
}

impl Default for TestTournament {
    fn default() -> Self {
        Self::new()
    }
}

fn better(t: &Tournament, left: &EntrantId, right: &EntrantId) -> EntrantId {
    let key = |id: &EntrantId| {
        let e = t.entrant(id).unwrap();
        (e.seed, e.region)
    };
    if key(right) < key(left) {
        right.clone()
    } else {
        left.clone()
    }
}

pub fn arb_coord() -> impl Strategy<Value = MatchCoord> {
    prop::sample::select(all_coords())
}

pub fn arb_entrant_id() -> impl Strategy<Value = EntrantId> {
    (prop::sample::select(Region::ALL.to_vec()), 1u8..=16).prop_map(|(r, s)| entrant_id(r, s))
}

/// A complete bracket where every pick is one of its match's projected entrants.
pub fn arb_consistent_picks(bracket: &'static str) -> impl Strategy<Value = PickSet> {
    prop::collection::vec(any::<bool>(), all_coords().len()).prop_map(move |choices| {
        let t = TestTournament::new();
        let mut choices = choices.into_iter();
        t.bracket_from(bracket, |l, r| {
            if choices.next().unwrap_or(true) {
                l.clone()
            } else {
                r.clone()
            }
        })
    })
}

/// A consistent bracket with a random subset of its picks kept.
pub fn arb_partial_picks(bracket: &'static str) -> impl Strategy<Value = PickSet> {
    (
        arb_consistent_picks(bracket),
        prop::collection::vec(any::<bool>(), all_coords().len()),
    )
        .prop_map(move |(full, keep)| {
            let t = TestTournament::new();
            let picks = all_coords()
                .into_iter()
                .zip(keep)
                .filter(|(_, k)| *k)
                .filter_map(|(c, _)| full.get(&t.id_at(c)).cloned());
            PickSet::from_picks(bracket, picks)
        })
}
