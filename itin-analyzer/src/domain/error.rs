//! Domain error types.
//!
//! These errors represent validation failures while building domain values.
//! They are distinct from analysis-stage errors.

use super::{InvalidCarrierCode, InvalidLocation, LocCode};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// A carrier code failed validation
    #[error(transparent)]
    InvalidCarrier(#[from] InvalidCarrierCode),

    /// A location component failed validation
    #[error(transparent)]
    InvalidLocation(#[from] InvalidLocation),

    /// Itinerary has no segments
    #[error("itinerary must have at least one segment")]
    EmptyItinerary,

    /// Segment arrives before it departs
    #[error("segment {origin}-{destination} arrives before it departs")]
    SegmentTimesReversed {
        origin: LocCode,
        destination: LocCode,
    },
}
