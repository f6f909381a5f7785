//! Governing leg estimation for across-stop-over legs.
//!
//! A synthetic leg inherits its carriers from the spanned leg with the most
//! international travel. Each spanned leg is scored by the weights of its
//! travel boundary bits; the highest score wins. Equal scores fall through
//! to a finer score over the leg's endpoints, and anything still tied is
//! settled by [`RemainingTie`].

use serde::Deserialize;
use tracing::{debug, trace};

use crate::domain::{Arena, JumpedLeg, Leg, Loc, StopOverInfo, TravelBoundary};

/// Cost per travel boundary bit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoundaryWeights {
    pub within_usca: u32,
    pub within_same_country: u32,
    pub within_one_iata: u32,
    pub within_two_iata: u32,
    pub within_all_iata: u32,
    pub within_sub_iata_11: u32,
    pub within_sub_iata_21: u32,
    pub within_same_sub_iata: u32,
}

impl Default for BoundaryWeights {
    fn default() -> Self {
        Self {
            within_usca: 1,
            within_same_country: 1,
            within_one_iata: 4,
            within_two_iata: 8,
            within_all_iata: 16,
            within_sub_iata_11: 2,
            within_sub_iata_21: 2,
            within_same_sub_iata: 1,
        }
    }
}

impl BoundaryWeights {
    /// Sum of the weights of every bit set in `boundary`.
    pub fn cost(&self, boundary: TravelBoundary) -> u32 {
        [
            (TravelBoundary::WITHIN_USCA, self.within_usca),
            (
                TravelBoundary::WITHIN_SAME_COUNTRY_EXCEPT_USCA,
                self.within_same_country,
            ),
            (TravelBoundary::WITHIN_ONE_IATA, self.within_one_iata),
            (TravelBoundary::WITHIN_TWO_IATA, self.within_two_iata),
            (TravelBoundary::WITHIN_ALL_IATA, self.within_all_iata),
            (TravelBoundary::WITHIN_SUB_IATA_11, self.within_sub_iata_11),
            (TravelBoundary::WITHIN_SUB_IATA_21, self.within_sub_iata_21),
            (TravelBoundary::WITHIN_SAME_SUB_IATA, self.within_same_sub_iata),
        ]
        .into_iter()
        .filter(|(bit, _)| boundary.contains(*bit))
        .map(|(_, weight)| weight)
        .sum()
    }
}

/// Increments for the finer endpoint comparison.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetailWeights {
    pub area_change: u32,
    pub sub_area_change: u32,
    pub nation_change: u32,
}

impl Default for DetailWeights {
    fn default() -> Self {
        Self {
            area_change: 8,
            sub_area_change: 4,
            nation_change: 1,
        }
    }
}

impl DetailWeights {
    pub fn cost(&self, origin: &Loc, destination: &Loc) -> u32 {
        let mut cost = 0;
        if origin.area() != destination.area() {
            cost += self.area_change;
        }
        if origin.sub_area != destination.sub_area {
            cost += self.sub_area_change;
        }
        if origin.nation != destination.nation {
            cost += self.nation_change;
        }
        cost
    }
}

/// How a tie left after the detailed comparison is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemainingTie {
    /// The earliest tied leg in jumped order.
    #[default]
    FirstJumpedLeg,
}

impl RemainingTie {
    fn resolve(&self, tied: &[Scored]) -> Option<usize> {
        match self {
            RemainingTie::FirstJumpedLeg => tied.first().map(|s| s.leg),
        }
    }
}

/// Per-leg inputs to the estimate.
#[derive(Debug, Clone, Copy)]
struct Scored {
    leg: usize,
    boundary: TravelBoundary,
    origin: Loc,
    destination: Loc,
}

impl Scored {
    /// Geography of a leg, from the first fare market of its representative
    /// SOP, or from the itinerary's segments when no fare market exists yet.
    fn of(arena: &Arena, leg_index: usize, leg: &Leg) -> Option<Self> {
        let sop = leg.representative_sop()?;
        let itin = arena.itin(sop.itin);
        if let Some(&fm) = itin.fare_markets.first() {
            let fm = arena.fare_market(fm);
            return Some(Self {
                leg: leg_index,
                boundary: fm.boundary,
                origin: fm.origin,
                destination: fm.destination,
            });
        }
        let (origin, destination) = arena.endpoints(sop.itin).ok()?;
        Some(Self {
            leg: leg_index,
            boundary: TravelBoundary::classify(arena.itin_segments(sop.itin)),
            origin,
            destination,
        })
    }
}

/// Pick the spanned leg whose carriers the synthetic leg adopts.
///
/// Surface markers and legs without geography are skipped. Returns the
/// original leg index, or `None` when no spanned leg can be scored.
pub fn estimate_governing_leg(
    arena: &Arena,
    legs: &[Leg],
    stop_over: &StopOverInfo,
    boundary_weights: &BoundaryWeights,
    detail_weights: &DetailWeights,
    remaining_tie: RemainingTie,
) -> Option<usize> {
    let scored: Vec<Scored> = stop_over
        .jumped
        .iter()
        .filter_map(JumpedLeg::leg)
        .filter_map(|i| legs.get(i).and_then(|leg| Scored::of(arena, i, leg)))
        .collect();

    let costs: Vec<u32> = scored
        .iter()
        .map(|s| boundary_weights.cost(s.boundary))
        .collect();
    let max = *costs.iter().max()?;
    let tied: Vec<Scored> = scored
        .iter()
        .zip(&costs)
        .filter(|(_, c)| **c == max)
        .map(|(s, _)| *s)
        .collect();
    trace!(costs = ?costs, max, tied = tied.len(), "boundary costs");

    if tied.len() == 1 {
        return tied.first().map(|s| s.leg);
    }

    let details: Vec<u32> = tied
        .iter()
        .map(|s| detail_weights.cost(&s.origin, &s.destination))
        .collect();
    let best = details.iter().copied().max().unwrap_or(0);
    let leaders: Vec<Scored> = tied
        .iter()
        .zip(&details)
        .filter(|(_, d)| **d == best)
        .map(|(s, _)| *s)
        .collect();

    if leaders.len() == 1 {
        return leaders.first().map(|s| s.leg);
    }
    debug!(details = ?details, rule = ?remaining_tie, "governing leg still tied");
    remaining_tie.resolve(&tied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Cabin, CarrierCode, Itinerary, LocCode, NationCode, SchedulingOption, SubArea,
        TravelSegment,
    };
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

    fn leg(arena: &mut Arena, index: usize, from: Loc, to: Loc) -> Leg {
        path(arena, index, &[from, to])
    }

    fn path(arena: &mut Arena, index: usize, points: &[Loc]) -> Leg {
        let t = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let ids = points
            .windows(2)
            .map(|w| {
                let cx = CarrierCode::parse("XX").unwrap();
                arena.alloc_segment(TravelSegment::air(w[0], w[1], cx, 1, t, t).unwrap())
            })
            .collect();
        let itin = arena.alloc_itin(Itinerary::new(ids));
        Leg::new(index, vec![SchedulingOption::new(itin, 1, 0)], Cabin::Economy)
    }

    fn info(jumped: Vec<JumpedLeg>) -> StopOverInfo {
        StopOverInfo {
            jumped,
            adopted_leg: 0,
        }
    }

    fn estimate(arena: &Arena, legs: &[Leg], jumped: Vec<JumpedLeg>) -> Option<usize> {
        estimate_governing_leg(
            arena,
            legs,
            &info(jumped),
            &BoundaryWeights::default(),
            &DetailWeights::default(),
            RemainingTie::default(),
        )
    }

    #[test]
    fn boundary_cost_sums_bits() {
        let w = BoundaryWeights::default();
        assert_eq!(w.cost(TravelBoundary::WITHIN_USCA), 1);
        assert_eq!(w.cost(TravelBoundary::WITHIN_ALL_IATA), 16);
        assert_eq!(
            w.cost(TravelBoundary::WITHIN_ONE_IATA | TravelBoundary::WITHIN_TWO_IATA),
            12
        );
        assert_eq!(w.cost(TravelBoundary::empty()), 0);
    }

    #[test]
    fn detail_cost_increments() {
        let w = DetailWeights::default();
        let jfk = loc("JFK", "US", "11");
        let yyz = loc("YYZ", "CA", "11");
        let lhr = loc("LHR", "GB", "21");
        let nrt = loc("NRT", "JP", "32");
        assert_eq!(w.cost(&jfk, &yyz), 1);
        assert_eq!(w.cost(&jfk, &lhr), 13);
        assert_eq!(w.cost(&lhr, &nrt), 13);
        assert_eq!(w.cost(&jfk, &jfk), 0);
    }

    #[test]
    fn most_international_leg_wins() {
        let mut arena = Arena::new();
        let legs = vec![
            leg(&mut arena, 0, loc("ORD", "US", "11"), loc("JFK", "US", "11")),
            leg(&mut arena, 1, loc("JFK", "US", "11"), loc("LHR", "GB", "21")),
            leg(&mut arena, 2, loc("LHR", "GB", "21"), loc("CDG", "FR", "21")),
        ];
        let jumped = vec![JumpedLeg::Leg(0), JumpedLeg::Leg(1), JumpedLeg::Leg(2)];
        assert_eq!(estimate(&arena, &legs, jumped), Some(1));
    }

    #[test]
    fn detailed_check_breaks_boundary_tie() {
        let mut arena = Arena::new();
        let yyz = loc("YYZ", "CA", "11");
        let mex = loc("MEX", "MX", "12");
        let yvr = loc("YVR", "CA", "11");
        let bog = loc("BOG", "CO", "13");
        // Legs 1 and 2 both stay within area 1 across sub-areas. Leg 1 ends
        // where it started in sub-area terms, leg 2 does not.
        let legs = vec![
            leg(&mut arena, 0, loc("JFK", "US", "11"), yyz),
            path(&mut arena, 1, &[yyz, mex, yvr]),
            leg(&mut arena, 2, mex, bog),
        ];
        let jumped = vec![JumpedLeg::Leg(0), JumpedLeg::Leg(1), JumpedLeg::Leg(2)];
        assert_eq!(estimate(&arena, &legs, jumped), Some(2));
    }

    #[test]
    fn remaining_tie_takes_first_jumped_leg() {
        let mut arena = Arena::new();
        let legs = vec![
            leg(&mut arena, 0, loc("LHR", "GB", "21"), loc("CDG", "FR", "21")),
            leg(&mut arena, 1, loc("CDG", "FR", "21"), loc("FRA", "DE", "21")),
            leg(&mut arena, 2, loc("FRA", "DE", "21"), loc("MAD", "ES", "21")),
        ];
        let jumped = vec![JumpedLeg::Leg(0), JumpedLeg::Leg(1), JumpedLeg::Leg(2)];
        assert_eq!(estimate(&arena, &legs, jumped), Some(0));
    }

    #[test]
    fn surface_markers_are_skipped() {
        let mut arena = Arena::new();
        let legs = vec![
            leg(&mut arena, 0, loc("ORD", "US", "11"), loc("JFK", "US", "11")),
            leg(&mut arena, 1, loc("EWR", "US", "11"), loc("LHR", "GB", "21")),
        ];
        let jumped = vec![JumpedLeg::Leg(0), JumpedLeg::Surface, JumpedLeg::Leg(1)];
        assert_eq!(estimate(&arena, &legs, jumped), Some(1));
        assert_eq!(estimate(&arena, &legs, vec![JumpedLeg::Surface]), None);
    }
}
