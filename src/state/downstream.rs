//! Downstream walks over the feeder graph, following successor slots from a
//! match to the Championship.

use crate::types::{MatchCoord, Round};

use super::topology::{SuccessorSlot, TopologyError, successor_slot};

/// Returns the successor slots from `origin` to the Championship, nearest first.
///
/// The Championship itself has an empty chain.
pub fn downstream_chain(origin: MatchCoord) -> Result<Vec<SuccessorSlot>, TopologyError> {
    let mut chain = Vec::with_capacity(Round::ALL.len());
    let mut current = origin;
    while let Some(slot) = successor_slot(current)? {
        chain.push(slot);
        current = slot.coord;
    }
    Ok(chain)
}

/// Returns true if `candidate` lies on the downstream chain of `origin`.
///
/// A match is not downstream of itself.
pub fn is_downstream_of(candidate: MatchCoord, origin: MatchCoord) -> Result<bool, TopologyError> {
    Ok(downstream_chain(origin)?
        .iter()
        .any(|slot| slot.coord == candidate))
}
