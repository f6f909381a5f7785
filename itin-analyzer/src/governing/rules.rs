//! Boundary-specific governing carrier rules.
//!
//! Each rule is a pure function from an ordered segment sequence to a
//! candidate carrier list and a primary sector. [`RULES`] maps each travel
//! boundary to its rule; [`dispatch`] fires the first entry whose boundary
//! is set.

use crate::domain::{CarrierCode, Direction, TravelBoundary, TravelSegment};

use super::mileage::MileageSource;
use super::tpm::highest_tpm_carrier;

/// Inputs shared by every rule.
pub struct RuleInput<'a> {
    pub segments: &'a [&'a TravelSegment],
    pub direction: Direction,
    pub mileage: &'a dyn MileageSource,
}

/// What a rule selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Candidates in priority order; the first is the governing carrier.
    pub carriers: Vec<CarrierCode>,
    /// Position of the primary sector within the input segments.
    pub primary_sector: Option<usize>,
}

impl RuleOutcome {
    fn single(input: &RuleInput<'_>, at: usize) -> Self {
        Self {
            carriers: vec![input.segments[at].carrier_or_industry()],
            primary_sector: Some(at),
        }
    }
}

pub type RuleFn = fn(&RuleInput<'_>) -> Option<RuleOutcome>;

/// Boundary rules in evaluation order.
pub static RULES: &[(TravelBoundary, RuleFn)] = &[
    (TravelBoundary::WITHIN_USCA, within_usca),
    (TravelBoundary::WITHIN_ONE_IATA, within_one_iata),
    (TravelBoundary::WITHIN_TWO_IATA, within_two_iata),
    (TravelBoundary::WITHIN_ALL_IATA, within_all_iata),
    (TravelBoundary::WITHIN_SUB_IATA_11, within_sub_iata_11),
    (TravelBoundary::WITHIN_SAME_SUB_IATA, within_same_sub_iata),
    (
        TravelBoundary::WITHIN_SAME_COUNTRY_EXCEPT_USCA,
        within_same_country_except_usca,
    ),
    (TravelBoundary::WITHIN_SUB_IATA_21, within_sub_iata_21),
];

/// Run the first rule whose boundary is set in `boundary`.
///
/// Returns the boundary that matched alongside the rule's outcome. `None`
/// when no rule matches or the matching rule finds no qualifying segment.
pub fn dispatch(
    boundary: TravelBoundary,
    input: &RuleInput<'_>,
) -> Option<(TravelBoundary, RuleOutcome)> {
    let (matched, rule) = RULES.iter().find(|(b, _)| boundary.contains(*b))?;
    rule(input).map(|outcome| (*matched, outcome))
}

/// First segment satisfying `pred`, scanning from the end for inbound
/// fare markets.
fn find_segment(input: &RuleInput<'_>, pred: impl Fn(&TravelSegment) -> bool) -> Option<usize> {
    let n = input.segments.len();
    if input.direction == Direction::Inbound {
        (0..n).rev().find(|&i| pred(input.segments[i]))
    } else {
        (0..n).find(|&i| pred(input.segments[i]))
    }
}

/// First air segment's carrier.
pub fn within_usca(input: &RuleInput<'_>) -> Option<RuleOutcome> {
    let at = find_segment(input, TravelSegment::is_air)?;
    Some(RuleOutcome::single(input, at))
}

/// First carrier crossing two sub-areas.
pub fn within_one_iata(input: &RuleInput<'_>) -> Option<RuleOutcome> {
    let at = find_segment(input, TravelSegment::changes_sub_area)?;
    Some(RuleOutcome::single(input, at))
}

/// Carrier of the first area crossing.
pub fn within_two_iata(input: &RuleInput<'_>) -> Option<RuleOutcome> {
    let at = find_segment(input, TravelSegment::changes_area)?;
    Some(RuleOutcome::single(input, at))
}

/// First carrier into or out of Area 1.
pub fn within_all_iata(input: &RuleInput<'_>) -> Option<RuleOutcome> {
    let at = find_segment(input, TravelSegment::crosses_into_or_out_of_area1)?;
    Some(RuleOutcome::single(input, at))
}

/// First carrier to or from the United States or Canada, falling back to
/// the first international flight.
pub fn within_sub_iata_11(input: &RuleInput<'_>) -> Option<RuleOutcome> {
    let at = find_segment(input, TravelSegment::is_international_to_or_from_usca)
        .or_else(|| find_segment(input, TravelSegment::is_international_excluding_transborder))?;
    Some(RuleOutcome::single(input, at))
}

/// First carrier operating an international flight.
pub fn within_same_sub_iata(input: &RuleInput<'_>) -> Option<RuleOutcome> {
    let at = find_segment(input, TravelSegment::is_international_excluding_transborder)?;
    Some(RuleOutcome::single(input, at))
}

/// First segment's carrier. Every other carrier is kept as a candidate for
/// the lowest-fare comparison made downstream.
pub fn within_same_country_except_usca(input: &RuleInput<'_>) -> Option<RuleOutcome> {
    let first = input.segments.first()?;
    let mut carriers = vec![first.carrier_or_industry()];
    for seg in &input.segments[1..] {
        let carrier = seg.carrier_or_industry();
        if !carriers.contains(&carrier) {
            carriers.push(carrier);
        }
    }
    Some(RuleOutcome {
        carriers,
        primary_sector: Some(0),
    })
}

/// First-international-flight carrier and highest-TPM carrier, both kept
/// for the fare comparison made downstream.
pub fn within_sub_iata_21(input: &RuleInput<'_>) -> Option<RuleOutcome> {
    let forward = RuleInput {
        segments: input.segments,
        direction: Direction::Outbound,
        mileage: input.mileage,
    };
    let at = find_segment(&forward, TravelSegment::is_international_excluding_transborder)?;
    let mut outcome = RuleOutcome::single(input, at);
    if let Some(tpm) = highest_tpm_carrier(input.segments, input.mileage) {
        if !outcome.carriers.contains(&tpm) {
            outcome.carriers.push(tpm);
        }
    }
    Some(outcome)
}
