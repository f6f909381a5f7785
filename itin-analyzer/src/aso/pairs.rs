//! Candidate leg pairs for across-stop-over legs.

use std::fmt;

use crate::domain::{Arena, DomainError, Leg, Loc, SurfaceSectorType};

/// Fewest original legs (after dropping a closing round-trip leg) for which
/// across-stop-over legs are built.
pub const MIN_LEGS_FOR_STOP_OVER: usize = 3;

/// Widest span, counted as legs strictly between the endpoints.
pub const MAX_SPAN: usize = 2;

/// First and last original leg spanned by a synthetic leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LegPair {
    pub first: usize,
    pub last: usize,
}

impl LegPair {
    pub fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    /// Legs strictly between the endpoints.
    pub fn span(&self) -> usize {
        self.last.saturating_sub(self.first).saturating_sub(1)
    }

    /// Every original leg spanned, endpoints included.
    pub fn legs(&self) -> std::ops::RangeInclusive<usize> {
        self.first..=self.last
    }
}

impl fmt::Display for LegPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.first, self.last)
    }
}

/// Geography of one original leg, taken from its representative SOP.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegEnds {
    pub origin: Loc,
    pub destination: Loc,
    pub surface: SurfaceSectorType,
}

impl LegEnds {
    /// # Errors
    ///
    /// [`DomainError::EmptyItinerary`] when the leg has no SOP or its
    /// itinerary has no segments.
    pub fn of(arena: &Arena, leg: &Leg) -> Result<Self, DomainError> {
        let sop = leg.representative_sop().ok_or(DomainError::EmptyItinerary)?;
        let (origin, destination) = arena.endpoints(sop.itin)?;
        Ok(Self {
            origin,
            destination,
            surface: leg.surface_sector,
        })
    }
}

/// Whether the last leg brings the traveller back to the first leg's
/// origin city.
pub fn closes_round_trip(ends: &[LegEnds]) -> bool {
    match (ends.first(), ends.last()) {
        (Some(first), Some(last)) if ends.len() > 1 => first.origin.city == last.destination.city,
        _ => false,
    }
}

/// All `(first, last)` pairs eligible for a synthetic leg.
///
/// Adjacent pairs are skipped, as are pairs spanning more than
/// [`MAX_SPAN`] intermediate legs. A closing round-trip leg never serves as
/// an endpoint. Pairs come out ordered by first leg, then last leg.
pub fn enumerate_pairs(leg_count: usize, round_trip: bool) -> Vec<LegPair> {
    let usable = if round_trip {
        leg_count.saturating_sub(1)
    } else {
        leg_count
    };
    if usable < MIN_LEGS_FOR_STOP_OVER {
        return Vec::new();
    }

    let mut pairs = Vec::new();
    for first in 0..usable {
        let upper = (first + MAX_SPAN + 2).min(usable);
        for last in (first + 2)..upper {
            pairs.push(LegPair::new(first, last));
        }
    }
    pairs
}
