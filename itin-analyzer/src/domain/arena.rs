//! Request-scoped storage for segments, itineraries and fare markets.
//!
//! Everything built while analyzing one request lives in a single [`Arena`].
//! Other structures refer to entries by typed handle. Handles are only minted
//! by the arena that owns the entry and entries are never removed, so a
//! handle stays valid for the arena's lifetime.

use super::{DomainError, FareMarket, Itinerary, Loc, TravelSegment};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(usize);

        impl $name {
            /// Position of the entry in allocation order.
            pub fn index(&self) -> usize {
                self.0
            }
        }
    };
}

handle!(
    /// Handle to a [`TravelSegment`] in an [`Arena`].
    SegmentId
);
handle!(
    /// Handle to an [`Itinerary`] in an [`Arena`].
    ItinId
);
handle!(
    /// Handle to a [`FareMarket`] in an [`Arena`].
    FareMarketId
);

/// Owner of every segment, itinerary and fare market for one request.
#[derive(Debug, Default)]
pub struct Arena {
    segments: Vec<TravelSegment>,
    itins: Vec<Itinerary>,
    fare_markets: Vec<FareMarket>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_segment(&mut self, segment: TravelSegment) -> SegmentId {
        self.segments.push(segment);
        SegmentId(self.segments.len() - 1)
    }

    pub fn segment(&self, id: SegmentId) -> &TravelSegment {
        &self.segments[id.0]
    }

    pub fn segment_mut(&mut self, id: SegmentId) -> &mut TravelSegment {
        &mut self.segments[id.0]
    }

    pub fn alloc_itin(&mut self, itin: Itinerary) -> ItinId {
        self.itins.push(itin);
        ItinId(self.itins.len() - 1)
    }

    pub fn itin(&self, id: ItinId) -> &Itinerary {
        &self.itins[id.0]
    }

    pub fn itin_mut(&mut self, id: ItinId) -> &mut Itinerary {
        &mut self.itins[id.0]
    }

    pub fn alloc_fare_market(&mut self, fare_market: FareMarket) -> FareMarketId {
        self.fare_markets.push(fare_market);
        FareMarketId(self.fare_markets.len() - 1)
    }

    pub fn fare_market(&self, id: FareMarketId) -> &FareMarket {
        &self.fare_markets[id.0]
    }

    pub fn fare_market_mut(&mut self, id: FareMarketId) -> &mut FareMarket {
        &mut self.fare_markets[id.0]
    }

    /// Resolve a list of segment handles.
    pub fn segments_of(&self, ids: &[SegmentId]) -> Vec<&TravelSegment> {
        ids.iter().map(|&id| self.segment(id)).collect()
    }

    /// Resolve the segments of an itinerary, in travel order.
    pub fn itin_segments(&self, id: ItinId) -> Vec<&TravelSegment> {
        self.segments_of(&self.itin(id).segments)
    }

    /// First origin and last destination of an itinerary.
    pub fn endpoints(&self, id: ItinId) -> Result<(Loc, Loc), DomainError> {
        let segs = &self.itin(id).segments;
        match (segs.first(), segs.last()) {
            (Some(&first), Some(&last)) => {
                Ok((self.segment(first).origin, self.segment(last).destination))
            }
            _ => Err(DomainError::EmptyItinerary),
        }
    }

    /// Allocate a copy of an itinerary's segment list, without its fare markets.
    pub fn clone_itin(&mut self, id: ItinId) -> ItinId {
        let segments = self.itin(id).segments.clone();
        self.alloc_itin(Itinerary::new(segments))
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn itin_count(&self) -> usize {
        self.itins.len()
    }

    pub fn fare_market_count(&self) -> usize {
        self.fare_markets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CarrierCode, LocCode, NationCode, SubArea};
    use chrono::NaiveDate;

    fn loc(code: &str) -> Loc {
        let c = LocCode::parse(code).unwrap();
        Loc::new(c, c, NationCode::US, SubArea::NORTH_AMERICA)
    }

    fn seg(from: &str, to: &str) -> TravelSegment {
        let t = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        TravelSegment::air(
            loc(from),
            loc(to),
            CarrierCode::parse("AA").unwrap(),
            1,
            t,
            t,
        )
        .unwrap()
    }

    #[test]
    fn handles_are_sequential() {
        let mut arena = Arena::new();
        let a = arena.alloc_segment(seg("JFK", "ORD"));
        let b = arena.alloc_segment(seg("ORD", "LAX"));
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(arena.segment(b).origin.code.as_str(), "ORD");
        assert_eq!(arena.segment_count(), 2);
    }

    #[test]
    fn endpoints_of_itinerary() {
        let mut arena = Arena::new();
        let a = arena.alloc_segment(seg("JFK", "ORD"));
        let b = arena.alloc_segment(seg("ORD", "LAX"));
        let itin = arena.alloc_itin(Itinerary::new(vec![a, b]));

        let (from, to) = arena.endpoints(itin).unwrap();
        assert_eq!(from.code.as_str(), "JFK");
        assert_eq!(to.code.as_str(), "LAX");
        assert_eq!(arena.itin_segments(itin).len(), 2);
    }

    #[test]
    fn endpoints_of_empty_itinerary_fail() {
        let mut arena = Arena::new();
        let itin = arena.alloc_itin(Itinerary::default());
        assert!(matches!(
            arena.endpoints(itin),
            Err(DomainError::EmptyItinerary)
        ));
    }

    #[test]
    fn clone_shares_segments() {
        let mut arena = Arena::new();
        let a = arena.alloc_segment(seg("JFK", "ORD"));
        let itin = arena.alloc_itin(Itinerary::new(vec![a]));
        let copy = arena.clone_itin(itin);

        assert_ne!(itin, copy);
        assert_eq!(arena.itin(copy).segments, vec![a]);
        assert_eq!(arena.itin_count(), 2);
    }
}
