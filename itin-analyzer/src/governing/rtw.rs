//! Round-the-world governing carrier steps.
//!
//! A round-the-world fare market replaces the single boundary rule with an
//! ordered list of crossing tests. The boundary decides which steps apply;
//! the first step that finds a qualifying air segment fixes the carrier.

use crate::domain::{TravelBoundary, TravelSegment};

use super::rules::{RuleInput, RuleOutcome};

bitflags::bitflags! {
    /// Steps enabled for a round-the-world fare market.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RtwSteps: u8 {
        const TRANSOCEANIC = 1 << 0;
        const AREA_CROSSING = 1 << 1;
        const SUBAREA_CROSSING = 1 << 2;
        const INTERNATIONAL = 1 << 3;
    }
}

impl RtwSteps {
    /// Steps implied by a travel boundary. Each wider scope enables every
    /// narrower step as well.
    pub fn for_boundary(boundary: TravelBoundary) -> Self {
        let mut steps = RtwSteps::empty();
        let transoceanic = boundary.contains(TravelBoundary::WITHIN_ALL_IATA);
        steps.set(RtwSteps::TRANSOCEANIC, transoceanic);

        let area = transoceanic || boundary.contains(TravelBoundary::WITHIN_TWO_IATA);
        steps.set(RtwSteps::AREA_CROSSING, area);

        let subarea = area || boundary.contains(TravelBoundary::WITHIN_ONE_IATA);
        steps.set(RtwSteps::SUBAREA_CROSSING, subarea);

        let international = subarea
            || boundary.intersects(
                TravelBoundary::WITHIN_SUB_IATA_11
                    | TravelBoundary::WITHIN_SUB_IATA_21
                    | TravelBoundary::WITHIN_SAME_SUB_IATA,
            );
        steps.set(RtwSteps::INTERNATIONAL, international);
        steps
    }
}

type StepPredicate = fn(&TravelSegment) -> bool;

const STEP_ORDER: [(RtwSteps, StepPredicate); 4] = [
    (
        RtwSteps::TRANSOCEANIC,
        TravelSegment::crosses_into_or_out_of_area1,
    ),
    (RtwSteps::AREA_CROSSING, TravelSegment::changes_area),
    (RtwSteps::SUBAREA_CROSSING, TravelSegment::changes_sub_area),
    (
        RtwSteps::INTERNATIONAL,
        TravelSegment::is_international_excluding_transborder,
    ),
];

/// Select a governing carrier for a round-the-world fare market.
///
/// Only air segments are considered. `None` when no enabled step finds a
/// qualifying segment.
pub fn select_rtw(input: &RuleInput<'_>, steps: RtwSteps) -> Option<RuleOutcome> {
    for (step, pred) in STEP_ORDER {
        if !steps.contains(step) {
            continue;
        }
        let found = input
            .segments
            .iter()
            .position(|seg| seg.is_air() && pred(seg));
        if let Some(at) = found {
            return Some(RuleOutcome {
                carriers: vec![input.segments[at].carrier_or_industry()],
                primary_sector: Some(at),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CarrierCode, Direction, Loc, LocCode, NationCode, SubArea};
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

    fn seg(from: Loc, to: Loc, carrier: &str) -> TravelSegment {
        let t = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        TravelSegment::air(from, to, CarrierCode::parse(carrier).unwrap(), 1, t, t).unwrap()
    }

    #[test]
    fn steps_accumulate_downwards() {
        let all = RtwSteps::for_boundary(TravelBoundary::WITHIN_ALL_IATA);
        assert_eq!(all, RtwSteps::all());

        let two = RtwSteps::for_boundary(TravelBoundary::WITHIN_TWO_IATA);
        assert!(!two.contains(RtwSteps::TRANSOCEANIC));
        assert!(two.contains(RtwSteps::AREA_CROSSING | RtwSteps::INTERNATIONAL));

        let sub = RtwSteps::for_boundary(TravelBoundary::WITHIN_SUB_IATA_21);
        assert_eq!(sub, RtwSteps::INTERNATIONAL);

        assert!(RtwSteps::for_boundary(TravelBoundary::WITHIN_USCA).is_empty());
    }

    #[test]
    fn transoceanic_step_wins_first() {
        let lhr = loc("LHR", "GB", "21");
        let sin = loc("SIN", "SG", "33");
        let syd = loc("SYD", "AU", "34");
        let lax = loc("LAX", "US", "11");
        let a = seg(lhr, sin, "BA");
        let b = seg(sin, syd, "SQ");
        let c = seg(syd, lax, "QF");
        let miles = MileageTable::new();
        let input = RuleInput {
            segments: &[&a, &b, &c],
            direction: Direction::Outbound,
            mileage: &miles,
        };

        let out = select_rtw(&input, RtwSteps::all()).unwrap();
        assert_eq!(out.carriers, vec![CarrierCode::parse("QF").unwrap()]);
        assert_eq!(out.primary_sector, Some(2));

        let out = select_rtw(&input, RtwSteps::AREA_CROSSING).unwrap();
        assert_eq!(out.carriers, vec![CarrierCode::parse("BA").unwrap()]);
    }

    #[test]
    fn no_enabled_step_is_soft_miss() {
        let jfk = loc("JFK", "US", "11");
        let lax = loc("LAX", "US", "11");
        let a = seg(jfk, lax, "AA");
        let miles = MileageTable::new();
        let input = RuleInput {
            segments: &[&a],
            direction: Direction::Outbound,
            mileage: &miles,
        };
        assert!(select_rtw(&input, RtwSteps::all()).is_none());
        assert!(select_rtw(&input, RtwSteps::empty()).is_none());
    }
}
