//! Travel segment type.
//!
//! A `TravelSegment` is one flown (or surface) hop between two ticketed
//! points. Segments are allocated in the request [`Arena`](super::Arena)
//! and referenced by [`SegmentId`](super::SegmentId) everywhere else.

use chrono::{Duration, NaiveDateTime};

use super::{CarrierCode, DomainError, IataArea, Loc};

/// What kind of travel a segment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// A scheduled flight.
    Air,
    /// An open (unscheduled) air segment, e.g. a journey placeholder.
    Open,
    /// A surface sector (ARUNK): the traveller makes their own way.
    Arunk,
}

/// Cabin classes, ordered from highest to lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Deserialize)]
pub enum Cabin {
    First,
    Business,
    PremiumEconomy,
    Economy,
}

bitflags::bitflags! {
    /// Per-segment flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SegmentFlags: u8 {
        /// Passenger stops over at the segment's destination.
        const STOPOVER = 0b0000_0001;
        /// Connection at the destination is forced, whatever the elapsed time.
        const FORCED_CONNECTION = 0b0000_0010;
        /// Segment was synthesized to stand in for a missing direct flight.
        const FAKE_DIRECT_FLIGHT = 0b0000_0100;
    }
}

/// A single travel segment.
///
/// # Invariants
///
/// - `arrival >= departure`
#[derive(Debug, Clone, PartialEq)]
pub struct TravelSegment {
    pub origin: Loc,
    pub destination: Loc,
    pub kind: SegmentKind,
    pub marketing: Option<CarrierCode>,
    pub operating: Option<CarrierCode>,
    pub flight_number: Option<u32>,
    departure: NaiveDateTime,
    arrival: NaiveDateTime,
    pub offered_cabins: Vec<Cabin>,
    pub flags: SegmentFlags,
}

impl TravelSegment {
    /// Construct an air segment.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::SegmentTimesReversed`] if arrival precedes departure.
    pub fn air(
        origin: Loc,
        destination: Loc,
        carrier: CarrierCode,
        flight_number: u32,
        departure: NaiveDateTime,
        arrival: NaiveDateTime,
    ) -> Result<Self, DomainError> {
        Self::build(
            origin,
            destination,
            SegmentKind::Air,
            Some(carrier),
            Some(flight_number),
            departure,
            arrival,
        )
    }

    /// Construct an open segment with no flight number.
    pub fn open(
        origin: Loc,
        destination: Loc,
        carrier: Option<CarrierCode>,
        departure: NaiveDateTime,
        arrival: NaiveDateTime,
    ) -> Result<Self, DomainError> {
        Self::build(
            origin,
            destination,
            SegmentKind::Open,
            carrier,
            None,
            departure,
            arrival,
        )
    }

    /// Construct a surface sector between two points.
    pub fn arunk(
        origin: Loc,
        destination: Loc,
        departure: NaiveDateTime,
        arrival: NaiveDateTime,
    ) -> Result<Self, DomainError> {
        Self::build(
            origin,
            destination,
            SegmentKind::Arunk,
            None,
            None,
            departure,
            arrival,
        )
    }

    fn build(
        origin: Loc,
        destination: Loc,
        kind: SegmentKind,
        marketing: Option<CarrierCode>,
        flight_number: Option<u32>,
        departure: NaiveDateTime,
        arrival: NaiveDateTime,
    ) -> Result<Self, DomainError> {
        if arrival < departure {
            return Err(DomainError::SegmentTimesReversed {
                origin: origin.code,
                destination: destination.code,
            });
        }
        Ok(Self {
            origin,
            destination,
            kind,
            marketing,
            operating: marketing,
            flight_number,
            departure,
            arrival,
            offered_cabins: Vec::new(),
            flags: SegmentFlags::empty(),
        })
    }

    /// Builder-style helper to set the offered cabins.
    pub fn with_cabins(mut self, cabins: impl IntoIterator<Item = Cabin>) -> Self {
        self.offered_cabins = cabins.into_iter().collect();
        self
    }

    pub fn departure(&self) -> NaiveDateTime {
        self.departure
    }

    pub fn arrival(&self) -> NaiveDateTime {
        self.arrival
    }

    pub fn elapsed(&self) -> Duration {
        self.arrival - self.departure
    }

    /// True for air and open segments.
    pub fn is_air(&self) -> bool {
        matches!(self.kind, SegmentKind::Air | SegmentKind::Open)
    }

    pub fn is_arunk(&self) -> bool {
        self.kind == SegmentKind::Arunk
    }

    /// The carrier to use for rule selection: the marketing carrier of an
    /// air segment, or the industry pseudo-carrier for surface sectors and
    /// segments with no carrier.
    pub fn carrier_or_industry(&self) -> CarrierCode {
        match self.kind {
            SegmentKind::Arunk => CarrierCode::INDUSTRY,
            _ => self.marketing.unwrap_or(CarrierCode::INDUSTRY),
        }
    }

    /// Segment crosses a national border.
    pub fn is_international(&self) -> bool {
        self.origin.nation != self.destination.nation
    }

    /// International, but not a US-Canada transborder flight.
    pub fn is_international_excluding_transborder(&self) -> bool {
        self.is_international() && !(self.origin.is_usca() && self.destination.is_usca())
    }

    pub fn changes_area(&self) -> bool {
        self.origin.area() != self.destination.area()
    }

    pub fn changes_sub_area(&self) -> bool {
        self.origin.sub_area != self.destination.sub_area
    }

    /// Segment changes area with one end in Area 1.
    pub fn crosses_into_or_out_of_area1(&self) -> bool {
        let from = self.origin.area();
        let to = self.destination.area();
        (from == IataArea::Area1 || to == IataArea::Area1) && from != to
    }

    /// Segment touches the United States or Canada and is international.
    pub fn is_international_to_or_from_usca(&self) -> bool {
        self.is_international_excluding_transborder()
            && (self.origin.is_usca() || self.destination.is_usca())
    }

    pub fn is_stopover(&self) -> bool {
        self.flags.contains(SegmentFlags::STOPOVER)
    }

    pub fn is_forced_connection(&self) -> bool {
        self.flags.contains(SegmentFlags::FORCED_CONNECTION)
    }

    pub fn is_fake_direct(&self) -> bool {
        self.flags.contains(SegmentFlags::FAKE_DIRECT_FLIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocCode, NationCode, SubArea};
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

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn cxr(s: &str) -> CarrierCode {
        CarrierCode::parse(s).unwrap()
    }

    #[test]
    fn air_segment_valid() {
        let seg = TravelSegment::air(
            loc("JFK", "US", "11"),
            loc("LHR", "GB", "21"),
            cxr("BA"),
            178,
            at(18, 0),
            at(23, 0),
        )
        .unwrap();
        assert!(seg.is_air());
        assert!(seg.is_international());
        assert!(seg.changes_area());
        assert!(seg.crosses_into_or_out_of_area1());
        assert_eq!(seg.elapsed(), Duration::hours(5));
        assert_eq!(seg.carrier_or_industry(), cxr("BA"));
    }

    #[test]
    fn reversed_times_rejected() {
        let result = TravelSegment::air(
            loc("JFK", "US", "11"),
            loc("BOS", "US", "11"),
            cxr("AA"),
            1,
            at(10, 0),
            at(9, 0),
        );
        assert!(matches!(
            result,
            Err(DomainError::SegmentTimesReversed { .. })
        ));
    }

    #[test]
    fn arunk_uses_industry_carrier() {
        let seg = TravelSegment::arunk(
            loc("LGW", "GB", "21"),
            loc("LHR", "GB", "21"),
            at(10, 0),
            at(12, 0),
        )
        .unwrap();
        assert!(seg.is_arunk());
        assert!(!seg.is_air());
        assert_eq!(seg.carrier_or_industry(), CarrierCode::INDUSTRY);
    }

    #[test]
    fn open_without_carrier_uses_industry() {
        let seg = TravelSegment::open(
            loc("LGW", "GB", "21"),
            loc("CDG", "FR", "21"),
            None,
            at(10, 0),
            at(11, 0),
        )
        .unwrap();
        assert!(seg.is_air());
        assert_eq!(seg.carrier_or_industry(), CarrierCode::INDUSTRY);
    }

    #[test]
    fn transborder_is_not_counted_as_international() {
        let seg = TravelSegment::air(
            loc("YYZ", "CA", "11"),
            loc("JFK", "US", "11"),
            cxr("AC"),
            700,
            at(8, 0),
            at(9, 30),
        )
        .unwrap();
        assert!(seg.is_international());
        assert!(!seg.is_international_excluding_transborder());
        assert!(!seg.is_international_to_or_from_usca());
    }

    #[test]
    fn flags() {
        let mut seg = TravelSegment::air(
            loc("JFK", "US", "11"),
            loc("BOS", "US", "11"),
            cxr("AA"),
            1,
            at(10, 0),
            at(11, 0),
        )
        .unwrap()
        .with_cabins([Cabin::Economy]);
        assert!(!seg.is_stopover());
        seg.flags |= SegmentFlags::STOPOVER | SegmentFlags::FORCED_CONNECTION;
        assert!(seg.is_stopover());
        assert!(seg.is_forced_connection());
        assert!(!seg.is_fake_direct());
        assert_eq!(seg.offered_cabins, vec![Cabin::Economy]);
    }

    #[test]
    fn cabin_ordering() {
        assert!(Cabin::First < Cabin::Business);
        assert!(Cabin::Business < Cabin::Economy);
    }
}
