//! Across-stop-over leg synthesis.
//!
//! When a journey has enough legs, extra legs are synthesized that span two
//! or more consecutive original legs so a through fare across the stop-over
//! can be priced. The steps run in order: [`enumerate_pairs`],
//! [`prune_pairs`], [`synthesize_leg`], [`estimate_governing_leg`] and
//! finally [`adopt_carriers`].

mod adopt;
mod estimate;
mod pairs;
mod prune;
mod synthesize;

pub use adopt::adopt_carriers;
pub use estimate::{BoundaryWeights, DetailWeights, RemainingTie, estimate_governing_leg};
pub use pairs::{
    LegEnds, LegPair, MAX_SPAN, MIN_LEGS_FOR_STOP_OVER, closes_round_trip, enumerate_pairs,
};
pub use prune::{PruneReason, passes_mileage_threshold, prune_pairs, prune_reason};
pub use synthesize::synthesize_leg;
