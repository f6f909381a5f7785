//! The journey itinerary: one open segment per requested leg.

use tracing::{debug, warn};

use crate::domain::{
    Arena, FareMarket, FareMarketId, ItinId, Itinerary, Leg, TravelBoundary, TravelSegment,
};
use crate::governing::GoverningCarrierSelector;

use super::direction::assign_journey_directions;
use super::error::AnalysisError;

/// The whole trip, one segment per original leg.
#[derive(Debug, Clone, PartialEq)]
pub struct Journey {
    pub itin: ItinId,
    /// One fare market per original leg, indexed like the legs.
    pub leg_fare_markets: Vec<FareMarketId>,
    /// Fare market over the whole journey, built for round-the-world
    /// requests only.
    pub whole_fare_market: Option<FareMarketId>,
    pub boundary: TravelBoundary,
}

/// Build the journey itinerary from the first SOP of each original leg.
///
/// Each leg contributes one open segment from its first origin to its last
/// destination, carrying the first segment's marketing carrier. Journey
/// fare markets are given directions, then classified and assigned a
/// governing carrier. For round-the-world requests the whole journey is
/// also priced as one fare market using the round-the-world steps.
///
/// # Errors
///
/// [`AnalysisError::InvalidInput`] when there are no original legs or a leg
/// has no SOP with segments.
pub fn build_journey(
    arena: &mut Arena,
    legs: &[Leg],
    selector: &GoverningCarrierSelector<'_>,
    round_the_world: bool,
) -> Result<Journey, AnalysisError> {
    let mut segments = Vec::new();
    for leg in legs.iter().filter(|l| !l.is_stop_over()) {
        let sop = leg
            .sops
            .first()
            .ok_or_else(|| AnalysisError::InvalidInput(format!("leg {} has no options", leg.index)))?;
        let segs = arena.itin_segments(sop.itin);
        let (Some(front), Some(back)) = (segs.first(), segs.last()) else {
            return Err(AnalysisError::InvalidInput(format!(
                "leg {} option {} has no segments",
                leg.index, sop.external_id
            )));
        };
        let seg = TravelSegment::open(
            front.origin,
            back.destination,
            front.marketing,
            front.departure(),
            back.arrival(),
        )?;
        segments.push(arena.alloc_segment(seg));
    }
    if segments.is_empty() {
        return Err(AnalysisError::InvalidInput("request has no legs".to_string()));
    }

    let mut itin = Itinerary::new(segments.clone());
    for &id in &segments {
        let seg = arena.segment(id);
        let fm = FareMarket::new(seg.origin, seg.destination, vec![id]);
        itin.fare_markets.push(arena.alloc_fare_market(fm));
    }
    let leg_fare_markets = itin.fare_markets.clone();

    let whole_fare_market = if round_the_world {
        let (origin, destination) = (
            arena.segment(segments[0]).origin,
            arena.segment(segments[segments.len() - 1]).destination,
        );
        let fm = arena.alloc_fare_market(FareMarket::new(origin, destination, segments.clone()));
        itin.fare_markets.push(fm);
        Some(fm)
    } else {
        None
    };

    let boundary = TravelBoundary::classify(arena.segments_of(&segments));
    let journey = Journey {
        itin: arena.alloc_itin(itin),
        leg_fare_markets,
        whole_fare_market,
        boundary,
    };

    assign_journey_directions(arena, &journey);
    for &fm in &journey.leg_fare_markets {
        selector.apply(arena, fm, false);
    }
    if let Some(whole) = journey.whole_fare_market {
        if selector.apply(arena, whole, true).is_none() {
            warn!("no round-the-world governing carrier for journey");
        }
    }

    debug!(
        legs = journey.leg_fare_markets.len(),
        boundary = ?journey.boundary,
        round_the_world,
        "built journey itinerary"
    );
    Ok(journey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Cabin, CarrierCode, Direction, Loc, LocCode, NationCode, SchedulingOption, SegmentKind,
        SubArea,
    };
    use crate::governing::MileageTable;
    use chrono::{NaiveDate, NaiveDateTime};

    fn loc(code: &str, nation: &str, sub: &str) -> Loc {
        let c = LocCode::parse(code).unwrap();
        Loc::new(
            c,
            c,
            NationCode::parse(nation).unwrap(),
            SubArea::parse(sub).unwrap(),
        )
    }

    fn at(day: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn leg(arena: &mut Arena, index: usize, hops: &[(Loc, Loc, &str)], day: u32) -> Leg {
        let ids = hops
            .iter()
            .enumerate()
            .map(|(i, (o, d, c))| {
                let h = 6 + 3 * i as u32;
                let seg = TravelSegment::air(
                    *o,
                    *d,
                    CarrierCode::parse(c).unwrap(),
                    100 + i as u32,
                    at(day, h),
                    at(day, h + 2),
                )
                .unwrap();
                arena.alloc_segment(seg)
            })
            .collect();
        let itin = arena.alloc_itin(Itinerary::new(ids));
        Leg::new(index, vec![SchedulingOption::new(itin, 1, 0)], Cabin::Economy)
    }

    #[test]
    fn one_open_segment_per_leg() {
        let mut arena = Arena::new();
        let jfk = loc("JFK", "US", "11");
        let ord = loc("ORD", "US", "11");
        let lhr = loc("LHR", "GB", "21");
        let legs = vec![
            leg(&mut arena, 0, &[(jfk, ord, "AA"), (ord, lhr, "BA")], 1),
            leg(&mut arena, 1, &[(lhr, jfk, "BA")], 8),
        ];
        let mileage = MileageTable::new();
        let selector = GoverningCarrierSelector::new(&mileage);

        let journey = build_journey(&mut arena, &legs, &selector, false).unwrap();
        let segs = arena.itin_segments(journey.itin);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].kind, SegmentKind::Open);
        assert_eq!(segs[0].origin, jfk);
        assert_eq!(segs[0].destination, lhr);
        assert_eq!(segs[0].departure(), at(1, 6));
        assert_eq!(segs[0].arrival(), at(1, 11));
        assert_eq!(segs[0].marketing, Some(CarrierCode::parse("AA").unwrap()));

        assert_eq!(journey.boundary, TravelBoundary::WITHIN_TWO_IATA);
        assert_eq!(journey.whole_fare_market, None);
        let outbound = arena.fare_market(journey.leg_fare_markets[0]);
        let inbound = arena.fare_market(journey.leg_fare_markets[1]);
        assert_eq!(outbound.direction, Direction::Outbound);
        assert_eq!(inbound.direction, Direction::Inbound);
        assert_eq!(outbound.boundary, TravelBoundary::WITHIN_TWO_IATA);
        assert!(outbound.governing_carrier.is_some());
    }

    #[test]
    fn round_the_world_adds_whole_fare_market() {
        let mut arena = Arena::new();
        let jfk = loc("JFK", "US", "11");
        let lhr = loc("LHR", "GB", "21");
        let nrt = loc("NRT", "JP", "31");
        let legs = vec![
            leg(&mut arena, 0, &[(jfk, lhr, "BA")], 1),
            leg(&mut arena, 1, &[(lhr, nrt, "JL")], 5),
            leg(&mut arena, 2, &[(nrt, jfk, "AA")], 9),
        ];
        let mileage = MileageTable::new();
        let selector = GoverningCarrierSelector::new(&mileage);

        let journey = build_journey(&mut arena, &legs, &selector, true).unwrap();
        let whole = journey.whole_fare_market.unwrap();
        let fm = arena.fare_market(whole);
        assert_eq!(fm.segments.len(), 3);
        assert_eq!(fm.boundary, TravelBoundary::WITHIN_ALL_IATA);
        assert_eq!(arena.itin(journey.itin).fare_markets.len(), 4);
    }

    #[test]
    fn leg_without_options_is_invalid() {
        let mut arena = Arena::new();
        let legs = vec![Leg::new(0, Vec::new(), Cabin::Economy)];
        let mileage = MileageTable::new();
        let selector = GoverningCarrierSelector::new(&mileage);

        let err = build_journey(&mut arena, &legs, &selector, false).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn no_legs_is_invalid() {
        let mut arena = Arena::new();
        let mileage = MileageTable::new();
        let selector = GoverningCarrierSelector::new(&mileage);
        assert!(matches!(
            build_journey(&mut arena, &[], &selector, false),
            Err(AnalysisError::InvalidInput(_))
        ));
    }
}
