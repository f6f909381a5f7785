//! Carrier adoption for across-stop-over legs.

use tracing::{debug, trace};

use crate::domain::{
    Arena, CarrierCode, DomainError, FareMarket, ItinId, Itinerary, JumpedLeg, Leg,
    SchedulingOption,
};
use crate::index::{CellInfo, CheckType, ItinIndex, ScheduleKey};

/// Copy the synthetic itinerary with the segment of `adopted_leg` re-tagged
/// to `carrier`, along with a fare market governed by that carrier.
fn retagged_copy(
    arena: &mut Arena,
    source: ItinId,
    jumped: &[JumpedLeg],
    adopted_leg: usize,
    carrier: CarrierCode,
) -> Result<ItinId, DomainError> {
    let source_segments = arena.itin(source).segments.clone();
    let mut segments = Vec::with_capacity(source_segments.len());
    let mut primary = None;

    for (pos, &id) in source_segments.iter().enumerate() {
        let mut seg = arena.segment(id).clone();
        if jumped.get(pos) == Some(&JumpedLeg::Leg(adopted_leg)) {
            seg.marketing = Some(carrier);
            let new_id = arena.alloc_segment(seg);
            primary = Some(new_id);
            segments.push(new_id);
        } else {
            segments.push(arena.alloc_segment(seg));
        }
    }

    let template = arena
        .itin(source)
        .fare_markets
        .first()
        .map(|&fm| arena.fare_market(fm).clone());
    let itin = arena.alloc_itin(Itinerary::new(segments.clone()));
    let (origin, destination) = arena.endpoints(itin)?;

    let mut fm = template.unwrap_or_else(|| FareMarket::new(origin, destination, Vec::new()));
    fm.segments = segments;
    fm.governing_carrier = Some(carrier);
    fm.candidate_carriers = vec![carrier];
    fm.primary_sector = primary;
    let fm = arena.alloc_fare_market(fm);
    arena.itin_mut(itin).fare_markets.push(fm);
    Ok(itin)
}

/// Populate a synthetic leg from the carriers of its adopted leg.
///
/// `adopted_index` is the index of the leg named by the synthetic leg's
/// `adopted_leg`. For every carrier row in it with a real (non-fake) direct
/// cell, the synthetic itinerary is copied with the adopted leg's segment
/// re-tagged to that carrier and added as a new SOP under the carrier's
/// direct column. Adopted SOPs are not cabin validated. The leg's previous
/// SOPs are replaced; the returned index is the leg's new index.
///
/// # Errors
///
/// [`DomainError::EmptyItinerary`] when `leg` is not a stop-over leg or has
/// no synthetic itinerary.
pub fn adopt_carriers(
    arena: &mut Arena,
    leg: &mut Leg,
    adopted_index: &ItinIndex,
) -> Result<ItinIndex, DomainError> {
    let stop_over = leg.stop_over.clone().ok_or(DomainError::EmptyItinerary)?;
    let source = leg.sops.first().map(|s| s.itin).ok_or(DomainError::EmptyItinerary)?;

    let mut index = ItinIndex::new();
    let mut sops = Vec::new();
    for carrier in adopted_index.carriers() {
        let Some(cell) =
            adopted_index.retrieve_top_itin_cell(carrier, CheckType::ExcludeFakeDirect)
        else {
            trace!(leg = leg.index, carrier = %carrier, "no real direct cell to adopt");
            continue;
        };
        let itin = retagged_copy(
            arena,
            source,
            &stop_over.jumped,
            stop_over.adopted_leg,
            *carrier,
        )?;

        let global_direction = arena
            .itin(itin)
            .fare_markets
            .first()
            .and_then(|&fm| arena.fare_market(fm).global_direction);
        let sop_index = sops.len();
        let mut sop = SchedulingOption::new(itin, sop_index as u32 + 1, sop_index);
        sop.governing_carrier = Some(*carrier);
        sop.cabin_valid = false;
        sop.global_direction = global_direction.or(cell.info.global_direction);
        let info = CellInfo {
            global_direction: sop.global_direction,
            ..CellInfo::new(sop_index)
        };
        sops.push(sop);
        index.add_itin_cell(itin, info, *carrier, ScheduleKey::DIRECT);
    }

    debug!(
        leg = leg.index,
        adopted = stop_over.adopted_leg,
        carriers = sops.len(),
        "adopted carriers"
    );
    leg.sops = sops;
    Ok(index)
}
