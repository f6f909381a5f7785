//! Domain types for itinerary analysis.
//!
//! This module contains the core model: validated codes and locations,
//! travel segments, itineraries, fare markets and journey legs. Code types
//! enforce their invariants at construction time, so code that receives
//! them can trust their validity.

mod arena;
mod boundary;
mod carrier;
mod error;
mod itinerary;
mod leg;
mod location;
mod segment;

pub use arena::{Arena, FareMarketId, ItinId, SegmentId};
pub use boundary::TravelBoundary;
pub use carrier::{CarrierCode, InvalidCarrierCode};
pub use error::DomainError;
pub use itinerary::{Direction, FareMarket, GlobalDirection, Itinerary};
pub use leg::{JumpedLeg, Leg, SchedulingOption, StopOverInfo, SurfaceSectorType};
pub use location::{IataArea, InvalidLocation, Loc, LocCode, NationCode, SubArea};
pub use segment::{Cabin, SegmentFlags, SegmentKind, TravelSegment};
