//! Cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::error::AnalysisError;

/// Shared abort flag with an optional deadline.
///
/// Clones share the same flag. The orchestrator checks the token between
/// stages; nothing is interrupted mid-stage.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that trips once `budget` has elapsed from now.
    pub fn with_budget(budget: Duration) -> Self {
        Self::new().with_deadline(budget)
    }

    /// Same flag, with the deadline pulled in to `budget` from now if that
    /// is sooner.
    pub fn with_deadline(mut self, budget: Duration) -> Self {
        let deadline = Instant::now().checked_add(budget);
        self.deadline = match (self.deadline, deadline) {
            (Some(current), Some(new)) => Some(current.min(new)),
            (current, new) => current.or(new),
        };
        self
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// `Err(AnalysisError::Timeout)` once tripped.
    pub fn check(&self) -> Result<(), AnalysisError> {
        if self.is_cancelled() {
            Err(AnalysisError::Timeout)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_passes() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert!(token.check().is_ok());
    }

    #[test]
    fn cancel_is_shared_between_clones() {
        let token = CancellationToken::new();
        let other = token.clone();
        other.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(AnalysisError::Timeout)));
    }

    #[test]
    fn zero_budget_trips_immediately() {
        let token = CancellationToken::with_budget(Duration::ZERO);
        assert!(token.is_cancelled());
    }

    #[test]
    fn deadline_keeps_shared_flag() {
        let token = CancellationToken::new();
        let limited = token.clone().with_deadline(Duration::from_secs(3600));
        assert!(!limited.is_cancelled());
        token.cancel();
        assert!(limited.is_cancelled());
    }

    #[test]
    fn generous_budget_does_not_trip() {
        let token = CancellationToken::with_budget(Duration::from_secs(3600));
        assert!(!token.is_cancelled());
    }
}
