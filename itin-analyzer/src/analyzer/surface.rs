//! Surface sector classification between consecutive legs.

use tracing::trace;

use crate::domain::{Arena, Leg, SurfaceSectorType};

/// Mark where surface travel joins consecutive legs.
///
/// For each pair, the first SOP of each leg supplies the cities compared:
/// the earlier leg's last destination against the later leg's first origin.
/// When they differ, the earlier leg begins a surface sector at its
/// destination and the later leg ends one at its origin. Legs without
/// segments are left as they are.
pub fn classify_surface_sectors(arena: &Arena, legs: &mut [Leg]) {
    let cities: Vec<_> = legs
        .iter()
        .map(|leg| {
            leg.sops
                .first()
                .and_then(|sop| arena.endpoints(sop.itin).ok())
                .map(|(origin, destination)| (origin.city, destination.city))
        })
        .collect();

    for j in 1..legs.len() {
        let (Some((_, arrived)), Some((departs, _))) = (cities[j - 1], cities[j]) else {
            continue;
        };
        if arrived == departs {
            continue;
        }
        trace!(before = j - 1, after = j, from = %arrived, to = %departs, "surface sector");

        let before = &mut legs[j - 1].surface_sector;
        *before = SurfaceSectorType::from_ends(before.ends_at_orig(), true);
        let after = &mut legs[j].surface_sector;
        *after = SurfaceSectorType::from_ends(true, after.begins_at_dest());
    }
}
