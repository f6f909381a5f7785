//! The analysis pipeline for one request.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::aso::{
    LegEnds, RemainingTie, adopt_carriers, closes_round_trip, enumerate_pairs,
    estimate_governing_leg, prune_pairs, synthesize_leg,
};
use crate::domain::{Arena, CarrierCode, Direction, JumpedLeg, Leg};
use crate::governing::{GoverningCarrierSelector, MileageSource};
use crate::index::{AcrossStopOverCombinations, ItinIndex};

use super::cabin::{CabinValidator, OfferedCabinValidator, validate_cabins};
use super::cancel::CancellationToken;
use super::config::AnalyzerConfig;
use super::direction::propagate_directions;
use super::error::AnalysisError;
use super::grouping::{ensure_direct_flights, group_into_index, resolve_governing_carriers};
use super::journey::{Journey, build_journey};
use super::mct::check_min_connection;
use super::request::AnalysisRequest;
use super::surface::classify_surface_sectors;

/// Combination generators of one stop-over leg, one per governing carrier.
#[derive(Debug, Clone)]
pub struct CarrierCombinations {
    /// Index of the stop-over leg.
    pub leg: usize,
    pub carriers: IndexMap<CarrierCode, AcrossStopOverCombinations>,
}

/// Everything built for one request.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub arena: Arena,
    /// Original legs followed by synthesized stop-over legs.
    pub legs: Vec<Leg>,
    /// Itinerary index of each leg, indexed like `legs`.
    pub indices: Vec<ItinIndex>,
    pub journey: Journey,
    pub stop_over_combinations: Vec<CarrierCombinations>,
}

/// One line of the per-leg summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegSummary {
    pub leg: usize,
    pub sops: usize,
    pub carriers: Vec<CarrierCode>,
    pub direction: Direction,
    /// Jumped entries of a stop-over leg.
    pub jumped: Option<Vec<JumpedLeg>>,
}

impl AnalysisOutcome {
    /// Legs synthesized across a stop-over.
    pub fn stop_over_legs(&self) -> impl Iterator<Item = &Leg> {
        self.legs.iter().filter(|l| l.is_stop_over())
    }

    pub fn summary(&self) -> Vec<LegSummary> {
        self.legs
            .iter()
            .zip(&self.indices)
            .map(|(leg, index)| LegSummary {
                leg: leg.index,
                sops: leg.sops.len(),
                carriers: index.carriers().copied().collect(),
                direction: leg.direction,
                jumped: leg.stop_over.as_ref().map(|s| s.jumped.clone()),
            })
            .collect()
    }
}

/// Runs the analysis stages in order for one request.
pub struct ItineraryAnalyzer<'a> {
    config: &'a AnalyzerConfig,
    cabins: &'a dyn CabinValidator,
    cancel: CancellationToken,
}

impl<'a> ItineraryAnalyzer<'a> {
    /// Create an analyzer using the offered-cabin validator.
    pub fn new(config: &'a AnalyzerConfig) -> Self {
        Self {
            config,
            cabins: &OfferedCabinValidator,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cabin_validator(mut self, cabins: &'a dyn CabinValidator) -> Self {
        self.cabins = cabins;
        self
    }

    /// Share a cancellation token with the caller.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Analyze a converted request.
    ///
    /// Stages run in a fixed order and the first hard failure stops the
    /// run. The cancellation token is checked between stages; the time
    /// budget, if configured, starts here.
    pub fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError> {
        let AnalysisRequest {
            mut arena,
            mut legs,
            mileage,
            round_the_world,
        } = request;
        let cancel = match self.config.time_budget() {
            Some(budget) => self.cancel.clone().with_deadline(budget),
            None => self.cancel.clone(),
        };
        let selector = GoverningCarrierSelector::new(&mileage);

        if legs.is_empty() {
            return Err(AnalysisError::InvalidInput("request has no legs".to_string()));
        }
        info!(legs = legs.len(), round_the_world, "analyzing request");

        debug!("building journey");
        let journey = build_journey(&mut arena, &legs, &selector, round_the_world)?;
        cancel.check()?;

        debug!("checking connection times");
        let failing = check_min_connection(&arena, &legs, self.config);
        if !failing.is_empty() {
            return Err(AnalysisError::min_connection_not_met(failing));
        }
        cancel.check()?;

        debug!("validating cabins");
        validate_cabins(&arena, &mut legs, self.cabins, self.config.allow_jump_down)?;
        cancel.check()?;

        debug!("classifying surface sectors");
        classify_surface_sectors(&arena, &mut legs);
        cancel.check()?;

        debug!("grouping SOPs");
        let mut indices = Vec::with_capacity(legs.len());
        for leg in &mut legs {
            resolve_governing_carriers(&mut arena, leg, &selector);
            indices.push(group_into_index(&arena, leg));
        }
        cancel.check()?;

        debug!("completing direct flights");
        for (leg, index) in legs.iter_mut().zip(indices.iter_mut()) {
            ensure_direct_flights(&mut arena, leg, index)?;
        }
        cancel.check()?;

        let stop_over_combinations =
            self.synthesize_stop_over_legs(&mut arena, &mut legs, &mut indices, &mileage)?;
        cancel.check()?;

        debug!("propagating directions");
        propagate_directions(&mut arena, &mut legs, &journey);

        info!(
            legs = legs.len(),
            stop_over_legs = stop_over_combinations.len(),
            "analysis complete"
        );
        Ok(AnalysisOutcome {
            arena,
            legs,
            indices,
            journey,
            stop_over_combinations,
        })
    }

    /// Append a leg for every surviving stop-over pair, with its index and
    /// per-carrier combination generators.
    fn synthesize_stop_over_legs(
        &self,
        arena: &mut Arena,
        legs: &mut Vec<Leg>,
        indices: &mut Vec<ItinIndex>,
        mileage: &dyn MileageSource,
    ) -> Result<Vec<CarrierCombinations>, AnalysisError> {
        let original = legs.len();
        if indices.len() != original {
            return Err(AnalysisError::InternalProcessing(format!(
                "{} indices for {original} legs",
                indices.len()
            )));
        }
        if !self.config.aso_enabled || original > self.config.aso_leg_threshold {
            debug!(
                legs = original,
                enabled = self.config.aso_enabled,
                "skipping stop-over legs"
            );
            return Ok(Vec::new());
        }

        let ends = legs
            .iter()
            .map(|leg| LegEnds::of(arena, leg))
            .collect::<Result<Vec<_>, _>>()?;
        let pairs = enumerate_pairs(original, closes_round_trip(&ends));
        let pairs = prune_pairs(pairs, &ends, mileage, self.config.aso_mileage_percent);
        debug!(pairs = pairs.len(), "synthesizing stop-over legs");

        let mut combinations = Vec::new();
        for pair in pairs {
            let index = legs.len();
            let mut leg = synthesize_leg(arena, &legs[..original], pair, index)?;
            let Some(stop_over) = leg.stop_over.as_mut() else {
                return Err(AnalysisError::InternalProcessing(format!(
                    "synthesized leg {pair} has no stop-over data"
                )));
            };

            let Some(adopted) = estimate_governing_leg(
                arena,
                &legs[..original],
                stop_over,
                &self.config.boundary_weights,
                &self.config.detail_weights,
                RemainingTie::default(),
            ) else {
                debug!(pair = %pair, "no leg to adopt carriers from");
                continue;
            };
            stop_over.adopted_leg = adopted;
            let stop_over = stop_over.clone();

            let adopted_index = &indices[adopted];
            let leg_index = adopt_carriers(arena, &mut leg, adopted_index)?;
            if leg.sops.is_empty() {
                debug!(pair = %pair, adopted, "no carriers to adopt");
                continue;
            }

            let carriers = leg_index
                .carriers()
                .map(|c| {
                    let row = adopted_index.across_stop_over_row(c, &stop_over, &legs[..original]);
                    (*c, row)
                })
                .collect();
            info!(leg = index, pair = %pair, adopted, carriers = leg.sops.len(), "added stop-over leg");
            legs.push(leg);
            indices.push(leg_index);
            combinations.push(CarrierCombinations {
                leg: index,
                carriers,
            });
        }
        Ok(combinations)
    }
}
