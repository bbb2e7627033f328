//! Pick cascade invalidation.
//!
//! When a bracket changes its pick on a match, later picks built on the
//! replaced entrant no longer describe a reachable bracket. This module
//! computes which picks must go; the caller deletes them.

use std::collections::BTreeSet;

use crate::types::{EntrantId, MatchId, PickId, PickSet, Tournament};

use super::downstream::downstream_chain;
use super::projection::Projector;

/// Computes the picks invalidated by changing the pick on `changed_match`
/// away from `old_entrant`.
///
/// `picks` is the bracket's pick set with the new pick already in place. The
/// returned set is transitively closed: once it is deleted, every remaining
/// pick downstream of `changed_match` names one of its match's projected
/// entrants. An unknown `changed_match` invalidates nothing.
pub fn invalidate(
    picks: &PickSet,
    tournament: &Tournament,
    changed_match: &MatchId,
    old_entrant: &EntrantId,
) -> BTreeSet<PickId> {
    let mut marked = BTreeSet::new();
    let Some(changed) = tournament.get(changed_match) else {
        return marked;
    };
    let origin = changed.coord();

    // Any later pick on the replaced entrant goes, wherever it sits.
    for pick in picks.iter() {
        let later = tournament
            .get(&pick.match_id)
            .is_some_and(|m| m.round > origin.round);
        if later && pick.entrant_id == *old_entrant {
            marked.insert(pick.id.clone());
        }
    }

    let Ok(chain) = downstream_chain(origin) else {
        return marked;
    };

    // Walk toward the Championship, re-projecting after each round's deletions.
    for slot in chain {
        let Some(m) = tournament.at(slot.coord) else {
            continue;
        };
        let remaining = picks.without(&marked);
        let Some(pick) = remaining.get(&m.id) else {
            continue;
        };
        let pair = Projector::new(tournament, &remaining).resolve_coord(slot.coord);
        if !pair.contains(&pick.entrant_id) {
            marked.insert(pick.id.clone());
        }
    }

    marked
}
