//! Construction of a synthetic leg spanning several original legs.

use chrono::NaiveDateTime;
use tracing::trace;

use crate::domain::{
    Arena, CarrierCode, DomainError, FareMarket, Itinerary, JumpedLeg, Leg, Loc, SchedulingOption,
    SegmentId, StopOverInfo, TravelSegment,
};

use super::pairs::LegPair;

/// Shape of one original leg, collapsed to a single hop.
struct Hop {
    origin: Loc,
    destination: Loc,
    carrier: Option<CarrierCode>,
    flight_number: Option<u32>,
    departure: NaiveDateTime,
    arrival: NaiveDateTime,
}

impl Hop {
    fn of(arena: &Arena, leg: &Leg) -> Result<Self, DomainError> {
        let sop = leg.representative_sop().ok_or(DomainError::EmptyItinerary)?;
        let segs = arena.itin_segments(sop.itin);
        let (front, back) = match (segs.first(), segs.last()) {
            (Some(f), Some(b)) => (*f, *b),
            _ => return Err(DomainError::EmptyItinerary),
        };
        Ok(Self {
            origin: front.origin,
            destination: back.destination,
            carrier: front.marketing,
            flight_number: front.flight_number,
            departure: front.departure(),
            arrival: back.arrival(),
        })
    }

    fn into_segment(self) -> Result<TravelSegment, DomainError> {
        match (self.carrier, self.flight_number) {
            (Some(carrier), Some(number)) => TravelSegment::air(
                self.origin,
                self.destination,
                carrier,
                number,
                self.departure,
                self.arrival,
            ),
            (carrier, _) => TravelSegment::open(
                self.origin,
                self.destination,
                carrier,
                self.departure,
                self.arrival,
            ),
        }
    }
}

/// Whether a surface sector separates leg `k` from leg `k + 1`.
fn surface_between(before: &Leg, after: &Leg) -> bool {
    before.surface_sector.begins_at_dest() || after.surface_sector.ends_at_orig()
}

/// Build the synthetic leg for `pair` and allocate its itinerary.
///
/// Every spanned leg contributes one segment derived from its
/// representative SOP, carrying the carrier and flight number of that
/// SOP's first segment. An interior surface gap becomes an arunk segment
/// and a [`JumpedLeg::Surface`] marker at the same position. The leg gets
/// a single SOP over the new itinerary and prefers the lower of the two
/// endpoint cabins. The adopted leg starts as the first spanned leg.
///
/// # Errors
///
/// [`DomainError::EmptyItinerary`] when a spanned leg is missing or has no
/// segments.
pub fn synthesize_leg(
    arena: &mut Arena,
    legs: &[Leg],
    pair: LegPair,
    index: usize,
) -> Result<Leg, DomainError> {
    let mut jumped = Vec::new();
    let mut segments: Vec<SegmentId> = Vec::new();
    let mut previous: Option<(&Leg, Loc, NaiveDateTime)> = None;

    for k in pair.legs() {
        let leg = legs.get(k).ok_or(DomainError::EmptyItinerary)?;
        let hop = Hop::of(arena, leg)?;

        if let Some((before, gap_origin, gap_departure)) = previous {
            if surface_between(before, leg) {
                let arrival = gap_departure.max(hop.departure);
                let arunk = TravelSegment::arunk(gap_origin, hop.origin, gap_departure, arrival)?;
                segments.push(arena.alloc_segment(arunk));
                jumped.push(JumpedLeg::Surface);
            }
        }

        previous = Some((leg, hop.destination, hop.arrival));
        segments.push(arena.alloc_segment(hop.into_segment()?));
        jumped.push(JumpedLeg::Leg(k));
    }

    let (first, last) = match (legs.get(pair.first), legs.get(pair.last)) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(DomainError::EmptyItinerary),
    };
    let preferred_cabin = first.preferred_cabin.max(last.preferred_cabin);

    let itin = arena.alloc_itin(Itinerary::new(segments.clone()));
    let (origin, destination) = arena.endpoints(itin)?;
    let fare_market = arena.alloc_fare_market(FareMarket::new(origin, destination, segments));
    arena.itin_mut(itin).fare_markets.push(fare_market);

    trace!(pair = %pair, leg = index, jumped = ?jumped, "synthesized stop-over leg");

    let mut leg = Leg::new(index, vec![SchedulingOption::new(itin, 1, 0)], preferred_cabin);
    leg.stop_over = Some(StopOverInfo {
        jumped,
        adopted_leg: pair.first,
    });
    Ok(leg)
}
