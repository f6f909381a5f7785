//! Itinerary and fare market types.

use std::fmt;

use super::{
    CarrierCode, FareMarketId, IataArea, Loc, SegmentId, TravelBoundary, TravelSegment,
};

/// Fare-market direction relative to the journey origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Outbound,
    Inbound,
    #[default]
    Unknown,
}

/// Global direction of travel, derived from the IATA areas visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalDirection {
    /// Western hemisphere: Area 1 only.
    WH,
    /// Eastern hemisphere: Areas 2 and 3 only.
    EH,
    /// Via the Atlantic: Areas 1 and 2.
    AT,
    /// Via the Pacific: Areas 1 and 3.
    PA,
    /// Via the Atlantic and Pacific: all three areas.
    AP,
}

impl GlobalDirection {
    /// Classify a segment sequence. `None` for an empty sequence.
    pub fn from_segments<'a>(
        segments: impl IntoIterator<Item = &'a TravelSegment>,
    ) -> Option<Self> {
        let (mut a1, mut a2, mut a3, mut any) = (false, false, false, false);
        for seg in segments {
            any = true;
            for loc in [&seg.origin, &seg.destination] {
                match loc.area() {
                    IataArea::Area1 => a1 = true,
                    IataArea::Area2 => a2 = true,
                    IataArea::Area3 => a3 = true,
                }
            }
        }
        if !any {
            return None;
        }
        Some(match (a1, a2, a3) {
            (true, false, false) => GlobalDirection::WH,
            (false, _, _) => GlobalDirection::EH,
            (true, true, false) => GlobalDirection::AT,
            (true, false, true) => GlobalDirection::PA,
            (true, true, true) => GlobalDirection::AP,
        })
    }
}

impl fmt::Display for GlobalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GlobalDirection::WH => "WH",
            GlobalDirection::EH => "EH",
            GlobalDirection::AT => "AT",
            GlobalDirection::PA => "PA",
            GlobalDirection::AP => "AP",
        };
        f.write_str(s)
    }
}

/// An ordered sequence of segments plus the fare markets derived from it.
///
/// Segments are arena handles, so cloning an itinerary shares its segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Itinerary {
    pub segments: Vec<SegmentId>,
    pub fare_markets: Vec<FareMarketId>,
}

impl Itinerary {
    pub fn new(segments: Vec<SegmentId>) -> Self {
        Self {
            segments,
            fare_markets: Vec::new(),
        }
    }

    /// A single-segment itinerary.
    pub fn is_direct(&self) -> bool {
        self.segments.len() == 1
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// An origin-destination unit priced as one fare component.
#[derive(Debug, Clone, PartialEq)]
pub struct FareMarket {
    pub origin: Loc,
    pub destination: Loc,
    pub segments: Vec<SegmentId>,
    pub boundary: TravelBoundary,
    pub direction: Direction,
    pub governing_carrier: Option<CarrierCode>,
    /// Every carrier retained by the selector, governing carrier first.
    pub candidate_carriers: Vec<CarrierCode>,
    pub primary_sector: Option<SegmentId>,
    pub global_direction: Option<GlobalDirection>,
}

impl FareMarket {
    pub fn new(origin: Loc, destination: Loc, segments: Vec<SegmentId>) -> Self {
        Self {
            origin,
            destination,
            segments,
            boundary: TravelBoundary::empty(),
            direction: Direction::Unknown,
            governing_carrier: None,
            candidate_carriers: Vec::new(),
            primary_sector: None,
            global_direction: None,
        }
    }
}
