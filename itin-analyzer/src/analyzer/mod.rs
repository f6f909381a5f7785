//! Request analysis.
//!
//! [`ItineraryAnalyzer`] takes a converted shopping request through a fixed
//! sequence of stages: journey itinerary, connection times, cabins, surface
//! sectors, grouping into per-leg indices, direct-flight completeness,
//! across-stop-over legs and finally fare-market directions.

mod cabin;
mod cancel;
mod config;
mod direction;
mod error;
mod grouping;
mod journey;
mod mct;
mod orchestrator;
mod request;
mod surface;


pub use cabin::{CabinAvailability, CabinValidator, OfferedCabinValidator, validate_cabins};
pub use cancel::CancellationToken;
pub use config::AnalyzerConfig;
pub use direction::{journey_direction, leg_direction, propagate_directions};
pub use error::{AnalysisError, ConfigError};
pub use grouping::{ensure_direct_flights, group_into_index, resolve_governing_carriers};
pub use journey::{Journey, build_journey};
pub use mct::{check_min_connection, connection_ok};
pub use orchestrator::{AnalysisOutcome, CarrierCombinations, ItineraryAnalyzer, LegSummary};
pub use request::{
    AnalysisRequest, AnalysisRequestDto, ConversionError, LegDto, LocationDto, MileageDto,
    OptionDto, SegmentDto, SegmentKindDto, convert_location, convert_request, convert_segment,
};
pub use surface::classify_surface_sectors;
