//! Travel boundary classification.

use std::collections::BTreeSet;

use super::{IataArea, Loc, TravelSegment};

bitflags::bitflags! {
    /// Geographic scope of a segment sequence.
    ///
    /// The set is non-exclusive as a type, but [`TravelBoundary::classify`]
    /// sets exactly one scope: the narrowest one containing every point.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TravelBoundary: u8 {
        const WITHIN_USCA = 1 << 0;
        const WITHIN_SAME_COUNTRY_EXCEPT_USCA = 1 << 1;
        const WITHIN_ONE_IATA = 1 << 2;
        const WITHIN_TWO_IATA = 1 << 3;
        const WITHIN_ALL_IATA = 1 << 4;
        const WITHIN_SUB_IATA_11 = 1 << 5;
        const WITHIN_SUB_IATA_21 = 1 << 6;
        /// Same sub-area, other than 11 and 21.
        const WITHIN_SAME_SUB_IATA = 1 << 7;
    }
}

impl TravelBoundary {
    /// Classify an ordered segment sequence by every point it touches.
    ///
    /// An empty sequence yields an empty set.
    pub fn classify<'a>(segments: impl IntoIterator<Item = &'a TravelSegment>) -> Self {
        let points: Vec<&Loc> = segments
            .into_iter()
            .flat_map(|s| [&s.origin, &s.destination])
            .collect();
        let Some(first) = points.first() else {
            return TravelBoundary::empty();
        };

        if points.iter().all(|p| p.is_usca()) {
            return TravelBoundary::WITHIN_USCA;
        }
        if points.iter().all(|p| p.nation == first.nation) {
            return TravelBoundary::WITHIN_SAME_COUNTRY_EXCEPT_USCA;
        }
        if points.iter().all(|p| p.sub_area == first.sub_area) {
            return match first.sub_area.code() {
                11 => TravelBoundary::WITHIN_SUB_IATA_11,
                21 => TravelBoundary::WITHIN_SUB_IATA_21,
                _ => TravelBoundary::WITHIN_SAME_SUB_IATA,
            };
        }

        let areas: BTreeSet<IataArea> = points.iter().map(|p| p.area()).collect();
        match areas.len() {
            1 => TravelBoundary::WITHIN_ONE_IATA,
            2 => TravelBoundary::WITHIN_TWO_IATA,
            _ => TravelBoundary::WITHIN_ALL_IATA,
        }
    }

    /// True for the two domestic scopes.
    pub fn is_domestic(&self) -> bool {
        self.intersects(
            TravelBoundary::WITHIN_USCA | TravelBoundary::WITHIN_SAME_COUNTRY_EXCEPT_USCA,
        )
    }
}
