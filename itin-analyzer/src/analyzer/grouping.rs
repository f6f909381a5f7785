//! Governing carrier resolution and index population.

use tracing::{debug, trace, warn};

use crate::domain::{
    Arena, CarrierCode, FareMarket, GlobalDirection, Itinerary, Leg, SchedulingOption,
    SegmentFlags, TravelBoundary, TravelSegment,
};
use crate::governing::GoverningCarrierSelector;
use crate::index::{CellFlags, CellInfo, ItinIndex, ScheduleKey};

use super::error::AnalysisError;

/// Give every SOP of `leg` a fare market and a governing carrier.
///
/// The fare market spans the whole itinerary. When the selector has no
/// answer, the first flown segment's marketing carrier is used instead.
/// SOPs with no carrier at all stay unresolved and are left out of the
/// index.
pub fn resolve_governing_carriers(
    arena: &mut Arena,
    leg: &mut Leg,
    selector: &GoverningCarrierSelector<'_>,
) {
    for sop in &mut leg.sops {
        let Ok((origin, destination)) = arena.endpoints(sop.itin) else {
            continue;
        };
        let segments = arena.itin(sop.itin).segments.clone();
        let fm = arena.alloc_fare_market(FareMarket::new(origin, destination, segments));
        arena.itin_mut(sop.itin).fare_markets.push(fm);

        let carrier = match selector.apply(arena, fm, false) {
            Some(carrier) => Some(carrier),
            None => {
                let fallback = arena
                    .itin_segments(sop.itin)
                    .into_iter()
                    .find(|s| s.is_air())
                    .and_then(|s| s.marketing);
                warn!(
                    leg = leg.index,
                    sop = sop.external_id,
                    fallback = ?fallback,
                    "no governing carrier, using first flown carrier"
                );
                if let Some(carrier) = fallback {
                    let fm = arena.fare_market_mut(fm);
                    fm.governing_carrier = Some(carrier);
                    fm.candidate_carriers = vec![carrier];
                }
                fallback
            }
        };

        sop.governing_carrier = carrier;
        sop.global_direction = arena.fare_market(fm).global_direction;
        trace!(leg = leg.index, sop = sop.sop_id, carrier = ?carrier, "resolved governing carrier");
    }
}

/// Index a leg's SOPs by governing carrier and connection count.
///
/// Cabin-invalid SOPs, empty itineraries and SOPs without a governing
/// carrier are skipped.
pub fn group_into_index(arena: &Arena, leg: &Leg) -> ItinIndex {
    let mut index = ItinIndex::new();
    for (position, sop) in leg.sops.iter().enumerate() {
        let itin = arena.itin(sop.itin);
        let Some(carrier) = sop.governing_carrier else {
            continue;
        };
        if !sop.cabin_valid || itin.is_empty() {
            continue;
        }
        let info = CellInfo {
            global_direction: sop.global_direction,
            primary_sector: itin
                .fare_markets
                .first()
                .and_then(|&fm| arena.fare_market(fm).primary_sector),
            ..CellInfo::new(position)
        };
        index.add_itin_cell(sop.itin, info, carrier, ScheduleKey::for_itin(itin));
    }
    debug!(
        leg = leg.index,
        carriers = index.carrier_count(),
        cells = index.cell_count(),
        "grouped SOPs"
    );
    index
}

/// Build a direct stand-in for `carrier` spanning `segments`.
///
/// The segment runs from the itinerary's first origin to its last
/// destination and carries the flight number of the last segment marketed
/// by `carrier`. Returns `None` when no segment is marketed by `carrier`.
fn fake_direct_segment(
    segments: &[&TravelSegment],
    carrier: CarrierCode,
) -> Result<Option<TravelSegment>, AnalysisError> {
    let (Some(front), Some(back)) = (segments.first(), segments.last()) else {
        return Ok(None);
    };
    let Some(source) = segments.iter().rev().find(|s| s.marketing == Some(carrier)) else {
        return Ok(None);
    };
    let mut seg = match source.flight_number {
        Some(number) => TravelSegment::air(
            front.origin,
            back.destination,
            carrier,
            number,
            front.departure(),
            back.arrival(),
        )?,
        None => TravelSegment::open(
            front.origin,
            back.destination,
            Some(carrier),
            front.departure(),
            back.arrival(),
        )?,
    };
    seg.offered_cabins = source.offered_cabins.clone();
    seg.flags |= SegmentFlags::FAKE_DIRECT_FLIGHT;
    Ok(Some(seg))
}

/// Make sure every carrier row of `index` has a direct cell.
///
/// A row without one gets a synthesized direct itinerary built from the
/// first cell of its lowest populated column. The stand-in is appended to
/// the leg as a dummy, cabin-invalid SOP and indexed under the direct
/// column with [`CellFlags::FAKE_DIRECT_FLIGHT`]. Stop-over legs are left
/// alone. Returns the number of stand-ins added.
///
/// # Errors
///
/// [`AnalysisError::NoValidFlightFound`] naming the leg when a row's
/// itinerary has no segment marketed by the row's carrier.
pub fn ensure_direct_flights(
    arena: &mut Arena,
    leg: &mut Leg,
    index: &mut ItinIndex,
) -> Result<usize, AnalysisError> {
    if leg.is_stop_over() {
        return Ok(0);
    }

    let missing: Vec<CarrierCode> = index
        .carriers()
        .filter(|c| !index.has_direct(c))
        .copied()
        .collect();

    for carrier in &missing {
        let Some(key) = index.schedule_keys(carrier).next() else {
            continue;
        };
        let Some(cell) = index.column(carrier, key).first().copied() else {
            continue;
        };

        let segments = arena.itin_segments(cell.itin);
        let Some(seg) = fake_direct_segment(&segments, *carrier)? else {
            warn!(leg = leg.index, carrier = %carrier, "no flight by governing carrier");
            return Err(AnalysisError::no_valid_flight(vec![leg.index]));
        };

        let boundary = TravelBoundary::classify([&seg]);
        let global_direction = GlobalDirection::from_segments([&seg]);
        let (origin, destination) = (seg.origin, seg.destination);
        let seg = arena.alloc_segment(seg);
        let itin = arena.alloc_itin(Itinerary::new(vec![seg]));
        let mut fm = FareMarket::new(origin, destination, vec![seg]);
        fm.boundary = boundary;
        fm.global_direction = global_direction;
        fm.governing_carrier = Some(*carrier);
        fm.candidate_carriers = vec![*carrier];
        fm.primary_sector = Some(seg);
        let fm = arena.alloc_fare_market(fm);
        arena.itin_mut(itin).fare_markets.push(fm);

        let sop_index = leg.sops.len();
        let mut sop = SchedulingOption::new(itin, 0, sop_index);
        sop.governing_carrier = Some(*carrier);
        sop.cabin_valid = false;
        sop.dummy = true;
        sop.global_direction = global_direction;
        leg.sops.push(sop);

        let info = CellInfo {
            global_direction,
            primary_sector: Some(seg),
            ..CellInfo::new(sop_index)
        }
        .with_flags(CellFlags::FAKE_DIRECT_FLIGHT);
        index.add_itin_cell(itin, info, *carrier, ScheduleKey::DIRECT);
        debug!(leg = leg.index, carrier = %carrier, sop = sop_index, "added fake direct flight");
    }

    Ok(missing.len())
}
