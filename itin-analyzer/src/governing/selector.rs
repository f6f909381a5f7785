//! Governing carrier selection for fare markets.

use tracing::{debug, trace};

use crate::domain::{
    Arena, CarrierCode, Direction, FareMarketId, GlobalDirection, SegmentId, TravelBoundary,
    TravelSegment,
};

use super::mileage::MileageSource;
use super::rtw::{RtwSteps, select_rtw};
use super::rules::{RuleInput, RuleOutcome, dispatch};

/// Result of governing carrier selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoverningSelection {
    pub carrier: CarrierCode,
    /// Every retained candidate, `carrier` first.
    pub candidates: Vec<CarrierCode>,
    pub primary_sector: Option<SegmentId>,
    pub boundary: TravelBoundary,
}

/// Classifies segment sequences and picks their governing carrier.
pub struct GoverningCarrierSelector<'m> {
    mileage: &'m dyn MileageSource,
}

impl<'m> GoverningCarrierSelector<'m> {
    pub fn new(mileage: &'m dyn MileageSource) -> Self {
        Self { mileage }
    }

    /// Select the governing carrier for an ordered segment list.
    ///
    /// `None` is a soft miss: no rule produced a carrier. The caller decides
    /// on a fallback.
    pub fn select(
        &self,
        arena: &Arena,
        segments: &[SegmentId],
        direction: Direction,
    ) -> Option<GoverningSelection> {
        let segs = arena.segments_of(segments);
        let boundary = TravelBoundary::classify(segs.iter().copied());
        let input = RuleInput {
            segments: &segs,
            direction,
            mileage: self.mileage,
        };

        match dispatch(boundary, &input) {
            Some((matched, outcome)) => {
                trace!(boundary = ?matched, carriers = ?outcome.carriers, "boundary rule fired");
                Self::finish(outcome, segments, boundary)
            }
            None => {
                debug!(boundary = ?boundary, segments = segments.len(), "no governing carrier");
                None
            }
        }
    }

    /// Select using the round-the-world crossing steps instead of the
    /// boundary rule table.
    pub fn select_round_the_world(
        &self,
        arena: &Arena,
        segments: &[SegmentId],
    ) -> Option<GoverningSelection> {
        let segs = arena.segments_of(segments);
        let boundary = TravelBoundary::classify(segs.iter().copied());
        let steps = RtwSteps::for_boundary(boundary);
        let input = RuleInput {
            segments: &segs,
            direction: Direction::Outbound,
            mileage: self.mileage,
        };
        let outcome = select_rtw(&input, steps);
        if outcome.is_none() {
            debug!(steps = ?steps, "no round-the-world governing carrier");
        }
        outcome.and_then(|o| Self::finish(o, segments, boundary))
    }

    /// Classify a fare market and record its governing carrier.
    ///
    /// Boundary and global direction are always written; carrier, candidates
    /// and primary sector only when selection succeeds. Returns the carrier.
    pub fn apply(
        &self,
        arena: &mut Arena,
        fare_market: FareMarketId,
        round_the_world: bool,
    ) -> Option<CarrierCode> {
        let fm = arena.fare_market(fare_market);
        let segments = fm.segments.clone();
        let direction = fm.direction;

        let selection = if round_the_world {
            self.select_round_the_world(arena, &segments)
        } else {
            self.select(arena, &segments, direction)
        };
        let segs: Vec<&TravelSegment> = arena.segments_of(&segments);
        let boundary = TravelBoundary::classify(segs.iter().copied());
        let global = GlobalDirection::from_segments(segs.iter().copied());

        let fm = arena.fare_market_mut(fare_market);
        fm.boundary = boundary;
        fm.global_direction = global;
        match selection {
            Some(sel) => {
                fm.governing_carrier = Some(sel.carrier);
                fm.candidate_carriers = sel.candidates;
                fm.primary_sector = sel.primary_sector;
                Some(sel.carrier)
            }
            None => None,
        }
    }

    fn finish(
        outcome: RuleOutcome,
        segments: &[SegmentId],
        boundary: TravelBoundary,
    ) -> Option<GoverningSelection> {
        let carrier = *outcome.carriers.first()?;
        Some(GoverningSelection {
            carrier,
            candidates: outcome.carriers,
            primary_sector: outcome.primary_sector.and_then(|i| segments.get(i).copied()),
            boundary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FareMarket, Loc, LocCode, NationCode, SubArea};
    use crate::governing::MileageTable;
    use chrono::NaiveDate;

    fn loc(code: &str, nation: &str, sub: &str) -> Loc {
        let c = LocCode::parse(code).unwrap();
        Loc::new(
            c,
            c,
            NationCode::parse(nation).unwrap(),
            SubArea::parse(sub).unwrap(),
        )
    }

    fn cxr(s: &str) -> CarrierCode {
        CarrierCode::parse(s).unwrap()
    }

    fn add(arena: &mut Arena, from: Loc, to: Loc, carrier: &str) -> SegmentId {
        let t = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        arena.alloc_segment(TravelSegment::air(from, to, cxr(carrier), 1, t, t).unwrap())
    }

    #[test]
    fn select_transatlantic() {
        let mut arena = Arena::new();
        let ord = loc("ORD", "US", "11");
        let jfk = loc("JFK", "US", "11");
        let lhr = loc("LHR", "GB", "21");
        let a = add(&mut arena, ord, jfk, "AA");
        let b = add(&mut arena, jfk, lhr, "BA");
        let miles = MileageTable::new();

        let sel = GoverningCarrierSelector::new(&miles)
            .select(&arena, &[a, b], Direction::Outbound)
            .unwrap();
        assert_eq!(sel.carrier, cxr("BA"));
        assert_eq!(sel.primary_sector, Some(b));
        assert_eq!(sel.boundary, TravelBoundary::WITHIN_TWO_IATA);
    }

    #[test]
    fn empty_segments_are_soft_miss() {
        let arena = Arena::new();
        let miles = MileageTable::new();
        let selector = GoverningCarrierSelector::new(&miles);
        assert!(selector.select(&arena, &[], Direction::Outbound).is_none());
    }

    #[test]
    fn apply_writes_fare_market() {
        let mut arena = Arena::new();
        let jfk = loc("JFK", "US", "11");
        let lax = loc("LAX", "US", "11");
        let a = add(&mut arena, jfk, lax, "DL");
        let fm = arena.alloc_fare_market(FareMarket::new(jfk, lax, vec![a]));
        let miles = MileageTable::new();

        let carrier = GoverningCarrierSelector::new(&miles).apply(&mut arena, fm, false);
        assert_eq!(carrier, Some(cxr("DL")));

        let fm = arena.fare_market(fm);
        assert_eq!(fm.boundary, TravelBoundary::WITHIN_USCA);
        assert_eq!(fm.governing_carrier, Some(cxr("DL")));
        assert_eq!(fm.primary_sector, Some(a));
        assert_eq!(fm.global_direction, Some(GlobalDirection::WH));
    }

    #[test]
    fn round_the_world_uses_steps() {
        let mut arena = Arena::new();
        let lhr = loc("LHR", "GB", "21");
        let jfk = loc("JFK", "US", "11");
        let nrt = loc("NRT", "JP", "32");
        let a = add(&mut arena, lhr, jfk, "BA");
        let b = add(&mut arena, jfk, nrt, "JL");
        let c = add(&mut arena, nrt, lhr, "NH");
        let miles = MileageTable::new();

        let sel = GoverningCarrierSelector::new(&miles)
            .select_round_the_world(&arena, &[a, b, c])
            .unwrap();
        assert_eq!(sel.carrier, cxr("BA"));
        assert_eq!(sel.primary_sector, Some(a));
    }
}
