//! Itinerary index.
//!
//! A sparse two-level lookup from governing carrier and connection shape to
//! the itineraries of one leg, plus the lazy combination generator used for
//! legs synthesized across a stop-over.

mod cell;
mod combinations;
mod itin_index;
mod key;

pub use cell::{Cell, CellFlags, CellInfo, CheckType};
pub use combinations::{AcrossStopOverCombinations, Combination};
pub use itin_index::ItinIndex;
pub use key::{CarrierKey, ScheduleKey};
