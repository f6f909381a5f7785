//! Air-travel itinerary analysis.
//!
//! Given a shopping request of one or more legs, each with candidate
//! itineraries from a schedule search, this crate indexes the candidates by
//! governing carrier and connection shape, decides which carrier governs
//! each fare market, and synthesizes legs spanning a stop-over so through
//! fares can be priced.

pub mod analyzer;
pub mod aso;
pub mod domain;
pub mod governing;
pub mod index;
