//! Errors raised while analyzing a request.

use std::path::PathBuf;

use crate::domain::DomainError;

/// Hard failure of an analysis stage.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalysisError {
    /// Malformed or empty leg or segment data.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Every candidate for the listed legs failed validation.
    ///
    /// `legs` holds zero-based leg indices; `message` numbers them from one.
    #[error("{message}")]
    NoValidFlightFound { legs: Vec<usize>, message: String },

    /// An internal invariant did not hold.
    #[error("internal processing error: {0}")]
    InternalProcessing(String),

    /// The cancellation token tripped between stages.
    #[error("analysis timed out")]
    Timeout,
}

impl AnalysisError {
    /// Minimum connection time cannot be met before `legs`.
    pub fn min_connection_not_met(legs: Vec<usize>) -> Self {
        let message = leg_list_message("MIN CONNECTION TIME NOT MET BEFORE", &legs);
        Self::NoValidFlightFound { legs, message }
    }

    /// No SOP of `legs` survived validation.
    pub fn no_valid_flight(legs: Vec<usize>) -> Self {
        let message = leg_list_message("NO VALID FLIGHT FOUND FOR", &legs);
        Self::NoValidFlightFound { legs, message }
    }
}

impl From<DomainError> for AnalysisError {
    fn from(e: DomainError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

/// `"{prefix} LEG 2"` or `"{prefix} LEGS 2, 3"`, numbering legs from one.
fn leg_list_message(prefix: &str, legs: &[usize]) -> String {
    let noun = if legs.len() > 1 { "LEGS" } else { "LEG" };
    let numbers: Vec<String> = legs.iter().map(|l| (l + 1).to_string()).collect();
    format!("{prefix} {noun} {}", numbers.join(", "))
}

/// Failure loading an [`AnalyzerConfig`](super::AnalyzerConfig) or request
/// file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
