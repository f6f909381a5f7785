//! Configuration for itinerary analysis.

use std::path::Path;

use chrono::Duration;
use serde::Deserialize;

use crate::aso::{BoundaryWeights, DetailWeights};

use super::error::ConfigError;

/// Configuration parameters for one analysis run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerConfig {
    /// Minimum connection time between legs on a domestic departure
    /// (minutes). Zero or less disables the threshold.
    pub min_connection_domestic_mins: i64,

    /// Minimum connection time between legs when the departing segment is
    /// international (minutes). Zero or less disables the threshold.
    pub min_connection_international_mins: i64,

    /// Only require each leg to arrive before the next one departs.
    pub allow_illogical_flights: bool,

    /// Master switch for across-stop-over leg synthesis.
    pub aso_enabled: bool,

    /// Across-stop-over synthesis is skipped for requests with more legs
    /// than this.
    pub aso_leg_threshold: usize,

    /// Direct mileage must be at least this percentage of the travelled
    /// mileage for a stop-over pair to survive.
    pub aso_mileage_percent: u32,

    /// Cabin validation may fall back to mixed-cabin SOPs when no SOP offers
    /// the preferred cabin throughout.
    pub allow_jump_down: bool,

    /// Cost of each travel boundary kind when estimating a stop-over leg's
    /// governing leg.
    pub boundary_weights: BoundaryWeights,

    /// Finer costs breaking ties between equally costly legs.
    pub detail_weights: DetailWeights,

    /// Wall-clock budget for the whole analysis (milliseconds).
    pub time_budget_ms: Option<u64>,
}

impl AnalyzerConfig {
    /// Create a new configuration with the given connection and
    /// stop-over parameters; weights keep their defaults.
    pub fn new(
        min_connection_domestic_mins: i64,
        min_connection_international_mins: i64,
        allow_illogical_flights: bool,
        aso_enabled: bool,
        aso_leg_threshold: usize,
        aso_mileage_percent: u32,
        allow_jump_down: bool,
    ) -> Self {
        Self {
            min_connection_domestic_mins,
            min_connection_international_mins,
            allow_illogical_flights,
            aso_enabled,
            aso_leg_threshold,
            aso_mileage_percent,
            allow_jump_down,
            ..Self::default()
        }
    }

    /// Builder-style helper to set the time budget.
    pub fn with_time_budget(mut self, budget: std::time::Duration) -> Self {
        self.time_budget_ms = Some(u64::try_from(budget.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Returns the domestic minimum connection time as a Duration.
    pub fn min_connection_domestic(&self) -> Duration {
        Duration::minutes(self.min_connection_domestic_mins)
    }

    /// Returns the international minimum connection time as a Duration.
    pub fn min_connection_international(&self) -> Duration {
        Duration::minutes(self.min_connection_international_mins)
    }

    /// Returns the time budget, if any.
    pub fn time_budget(&self) -> Option<std::time::Duration> {
        self.time_budget_ms.map(std::time::Duration::from_millis)
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_connection_domestic_mins: 30,
            min_connection_international_mins: 60,
            allow_illogical_flights: false,
            aso_enabled: true,
            aso_leg_threshold: 6,
            aso_mileage_percent: 40,
            allow_jump_down: true,
            boundary_weights: BoundaryWeights::default(),
            detail_weights: DetailWeights::default(),
            time_budget_ms: None,
        }
    }
}
