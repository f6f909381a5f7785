//! Pruning of candidate leg pairs.
//!
//! A pair survives only when a through fare across the stop-over is a
//! plausible pricing opportunity. Rules are checked in a fixed order and
//! the first that fires names the reason.

use std::fmt;

use tracing::{debug, trace};

use crate::governing::MileageSource;

use super::pairs::{LegEnds, LegPair};

/// Why a candidate pair was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PruneReason {
    /// An endpoint is not one of the known legs.
    UnknownLeg,
    /// A surface sector starts before the first leg or ends after the last.
    SurfaceAtEnds,
    /// The combination ends in the city it started from.
    ReturnsToOrigin,
    /// An original leg already covers the same origin and destination.
    DuplicatesExistingLeg,
    /// The direct mileage is too short compared to the travelled mileage.
    BelowMileageThreshold,
}

impl fmt::Display for PruneReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PruneReason::UnknownLeg => "unknown leg",
            PruneReason::SurfaceAtEnds => "surface sector at combination end",
            PruneReason::ReturnsToOrigin => "returns to origin",
            PruneReason::DuplicatesExistingLeg => "duplicates existing leg",
            PruneReason::BelowMileageThreshold => "below through mileage threshold",
        };
        f.write_str(s)
    }
}

/// Whether `direct` miles is at least `percent` percent of `travelled`.
///
/// The threshold is truncated to whole miles before comparing.
pub fn passes_mileage_threshold(direct: u32, travelled: u32, percent: u32) -> bool {
    let threshold = u64::from(percent) * u64::from(travelled) / 100;
    u64::from(direct) >= threshold
}

/// First rule that removes `pair`, if any.
///
/// Travelled mileage is the sum of the origin to destination mileage of
/// every leg from `pair.first` to `pair.last`. When any lookup is unknown
/// the mileage rule does not fire.
pub fn prune_reason(
    pair: LegPair,
    ends: &[LegEnds],
    mileage: &dyn MileageSource,
    percent: u32,
) -> Option<PruneReason> {
    let (Some(first), Some(last)) = (ends.get(pair.first), ends.get(pair.last)) else {
        return Some(PruneReason::UnknownLeg);
    };

    if first.surface.ends_at_orig() || last.surface.begins_at_dest() {
        return Some(PruneReason::SurfaceAtEnds);
    }

    if first.origin.city == last.destination.city {
        return Some(PruneReason::ReturnsToOrigin);
    }

    let duplicate = ends
        .iter()
        .any(|e| e.origin.code == first.origin.code && e.destination.code == last.destination.code);
    if duplicate {
        return Some(PruneReason::DuplicatesExistingLeg);
    }

    let direct = mileage.loc_mileage(&first.origin, &last.destination);
    let travelled = ends.get(pair.legs()).and_then(|covered| {
        covered.iter().try_fold(0u32, |total, e| {
            mileage
                .loc_mileage(&e.origin, &e.destination)
                .map(|miles| total.saturating_add(miles))
        })
    });
    if let (Some(direct), Some(travelled)) = (direct, travelled) {
        trace!(pair = %pair, direct, travelled, "through mileage");
        if !passes_mileage_threshold(direct, travelled, percent) {
            return Some(PruneReason::BelowMileageThreshold);
        }
    }

    None
}

/// Drop every pair that a pruning rule removes, keeping the rest in order.
pub fn prune_pairs(
    pairs: Vec<LegPair>,
    ends: &[LegEnds],
    mileage: &dyn MileageSource,
    percent: u32,
) -> Vec<LegPair> {
    pairs
        .into_iter()
        .filter(|&pair| match prune_reason(pair, ends, mileage, percent) {
            Some(reason) => {
                debug!(pair = %pair, reason = %reason, "pruned stop-over pair");
                false
            }
            None => true,
        })
        .collect()
}
