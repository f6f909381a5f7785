//! Cabin validation and SOP pruning.

use tracing::{debug, trace};

use crate::domain::{Arena, Cabin, Leg, TravelSegment};

use super::error::AnalysisError;

/// How well an itinerary serves a leg's preferred cabin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CabinAvailability {
    /// Every flown segment offers the preferred cabin.
    Preferred,
    /// Every flown segment offers the preferred cabin or a lower one.
    Mixed,
    Unavailable,
}

/// Decides cabin availability for one itinerary.
pub trait CabinValidator {
    fn classify(&self, segments: &[&TravelSegment], preferred: Cabin) -> CabinAvailability;
}

/// Validator reading the cabins offered on each segment.
///
/// Surface segments are ignored. A segment listing no cabins is treated as
/// unrestricted.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfferedCabinValidator;

impl CabinValidator for OfferedCabinValidator {
    fn classify(&self, segments: &[&TravelSegment], preferred: Cabin) -> CabinAvailability {
        let mut availability = CabinAvailability::Preferred;
        for seg in segments.iter().filter(|s| s.is_air()) {
            if seg.offered_cabins.is_empty() || seg.offered_cabins.contains(&preferred) {
                continue;
            }
            // Cabins order from highest to lowest, so a jump-down is greater.
            if seg.offered_cabins.iter().any(|&c| c > preferred) {
                availability = CabinAvailability::Mixed;
            } else {
                return CabinAvailability::Unavailable;
            }
        }
        availability
    }
}

/// Prune SOPs that cannot be sold in the leg's preferred cabin.
///
/// SOPs offering the preferred cabin throughout are kept. When a leg has
/// none and `allow_jump_down` is set, its mixed-cabin SOPs are kept
/// instead. Surviving SOPs are renumbered; external ids are untouched.
///
/// # Errors
///
/// [`AnalysisError::NoValidFlightFound`] listing every leg left without a
/// SOP. Legs are still pruned when this is returned.
pub fn validate_cabins(
    arena: &Arena,
    legs: &mut [Leg],
    validator: &dyn CabinValidator,
    allow_jump_down: bool,
) -> Result<(), AnalysisError> {
    let mut failing = Vec::new();

    for leg in legs.iter_mut() {
        let classes: Vec<CabinAvailability> = leg
            .sops
            .iter()
            .map(|sop| validator.classify(&arena.itin_segments(sop.itin), leg.preferred_cabin))
            .collect();

        let keep = if classes.contains(&CabinAvailability::Preferred) {
            CabinAvailability::Preferred
        } else if allow_jump_down && classes.contains(&CabinAvailability::Mixed) {
            trace!(leg = leg.index, "jumping down to mixed cabins");
            CabinAvailability::Mixed
        } else {
            CabinAvailability::Unavailable
        };

        let before = leg.sops.len();
        let mut classes = classes.into_iter();
        leg.sops
            .retain(|_| classes.next() == Some(keep) && keep != CabinAvailability::Unavailable);
        leg.renumber_sops();

        if before != leg.sops.len() {
            debug!(
                leg = leg.index,
                cabin = ?leg.preferred_cabin,
                pruned = before - leg.sops.len(),
                kept = leg.sops.len(),
                "pruned SOPs by cabin"
            );
        }
        if leg.sops.is_empty() {
            failing.push(leg.index);
        }
    }

    if failing.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::no_valid_flight(failing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CarrierCode, Itinerary, Loc, LocCode, NationCode, SchedulingOption, SubArea,
    };
    use chrono::NaiveDate;

    fn loc(code: &str) -> Loc {
        let c = LocCode::parse(code).unwrap();
        Loc::new(c, c, NationCode::US, SubArea::NORTH_AMERICA)
    }

    fn seg(cabins: &[Cabin]) -> TravelSegment {
        let t = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        TravelSegment::air(
            loc("JFK"),
            loc("LAX"),
            CarrierCode::parse("AA").unwrap(),
            1,
            t,
            t,
        )
        .unwrap()
        .with_cabins(cabins.iter().copied())
    }

    fn leg(arena: &mut Arena, index: usize, preferred: Cabin, sops: &[&[Cabin]]) -> Leg {
        let sops = sops
            .iter()
            .enumerate()
            .map(|(i, cabins)| {
                let id = arena.alloc_segment(seg(cabins));
                let itin = arena.alloc_itin(Itinerary::new(vec![id]));
                SchedulingOption::new(itin, 10 + i as u32, i)
            })
            .collect();
        Leg::new(index, sops, preferred)
    }

    #[test]
    fn classify_offered_cabins() {
        let v = OfferedCabinValidator;
        let business = seg(&[Cabin::Business]);
        let economy = seg(&[Cabin::Economy]);
        let first = seg(&[Cabin::First]);
        let open = seg(&[]);

        assert_eq!(
            v.classify(&[&business, &open], Cabin::Business),
            CabinAvailability::Preferred
        );
        assert_eq!(
            v.classify(&[&business, &economy], Cabin::Business),
            CabinAvailability::Mixed
        );
        assert_eq!(
            v.classify(&[&first], Cabin::Business),
            CabinAvailability::Unavailable
        );
    }

    #[test]
    fn keeps_preferred_and_renumbers() {
        let mut arena = Arena::new();
        let mut legs = vec![leg(
            &mut arena,
            0,
            Cabin::Business,
            &[&[Cabin::Economy], &[Cabin::Business], &[Cabin::First]],
        )];

        validate_cabins(&arena, &mut legs, &OfferedCabinValidator, true).unwrap();
        assert_eq!(legs[0].sops.len(), 1);
        assert_eq!(legs[0].sops[0].sop_id, 0);
        assert_eq!(legs[0].sops[0].external_id, 11);
    }

    #[test]
    fn jump_down_keeps_mixed_when_nothing_preferred() {
        let mut arena = Arena::new();
        let mut legs = vec![leg(
            &mut arena,
            0,
            Cabin::Business,
            &[&[Cabin::Economy], &[Cabin::First]],
        )];

        validate_cabins(&arena, &mut legs, &OfferedCabinValidator, true).unwrap();
        assert_eq!(legs[0].sops.len(), 1);
        assert_eq!(legs[0].sops[0].external_id, 10);
    }

    #[test]
    fn no_jump_down_fails_leg() {
        let mut arena = Arena::new();
        let mut legs = vec![
            leg(&mut arena, 0, Cabin::Economy, &[&[Cabin::Economy]]),
            leg(&mut arena, 1, Cabin::Business, &[&[Cabin::Economy]]),
        ];

        let err = validate_cabins(&arena, &mut legs, &OfferedCabinValidator, false).unwrap_err();
        assert_eq!(err.to_string(), "NO VALID FLIGHT FOUND FOR LEG 2");
        assert!(legs[1].sops.is_empty());
        assert_eq!(legs[0].sops.len(), 1);
    }
}
