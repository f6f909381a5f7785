//! Index keys.

use std::fmt;

use crate::domain::{CarrierCode, Itinerary};

/// Row key of an [`ItinIndex`](super::ItinIndex): the governing carrier.
pub type CarrierKey = CarrierCode;

/// Column key: the connection shape of an itinerary.
///
/// Derived from the segment count as `count - 1`, so a nonstop lands in the
/// reserved [`ScheduleKey::DIRECT`] column.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleKey(u32);

impl ScheduleKey {
    /// Column holding direct (single-segment) itineraries.
    pub const DIRECT: ScheduleKey = ScheduleKey(0);

    /// Key for an itinerary with `segment_count` segments. Zero maps to
    /// the direct key.
    pub fn for_segment_count(segment_count: usize) -> Self {
        let connections = segment_count.saturating_sub(1);
        ScheduleKey(u32::try_from(connections).unwrap_or(u32::MAX))
    }

    pub fn for_itin(itin: &Itinerary) -> Self {
        Self::for_segment_count(itin.segments.len())
    }

    pub fn is_direct(&self) -> bool {
        *self == Self::DIRECT
    }

    /// Number of connection points the key represents.
    pub fn connections(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ScheduleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_direct() {
            f.write_str("ScheduleKey(DIRECT)")
        } else {
            write!(f, "ScheduleKey({})", self.0)
        }
    }
}
