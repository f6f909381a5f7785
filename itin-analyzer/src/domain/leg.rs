//! Journey legs and their scheduling options.
//!
//! A `Leg` is one origin-destination unit of the requested journey. It owns
//! a list of [`SchedulingOption`]s, each pointing at a candidate itinerary in
//! the request arena. Legs synthesized across a stop-over additionally carry
//! [`StopOverInfo`].

use super::{Cabin, CarrierCode, Direction, GlobalDirection, ItinId};

/// One candidate path for a leg.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingOption {
    pub itin: ItinId,
    /// Id supplied by the schedule search; survives pruning.
    pub external_id: u32,
    /// Position within the leg; renumbered after pruning.
    pub sop_id: usize,
    pub governing_carrier: Option<CarrierCode>,
    pub cabin_valid: bool,
    /// Synthesized stand-in (fake direct flight); never priced on its own.
    pub dummy: bool,
    pub global_direction: Option<GlobalDirection>,
}

impl SchedulingOption {
    pub fn new(itin: ItinId, external_id: u32, sop_id: usize) -> Self {
        Self {
            itin,
            external_id,
            sop_id,
            governing_carrier: None,
            cabin_valid: true,
            dummy: false,
            global_direction: None,
        }
    }

    /// Cabin-valid and not a dummy.
    pub fn is_usable(&self) -> bool {
        self.cabin_valid && !self.dummy
    }
}

/// How a leg meets surface travel at its ends.
///
/// `BeginAtLegDest`: the leg's destination city differs from the next leg's
/// origin, so a surface sector begins where this leg ends.
/// `EndAtLegOrig`: the leg's origin differs from the previous leg's
/// destination, so a surface sector ends where this leg begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurfaceSectorType {
    #[default]
    None,
    BeginAtLegDest,
    EndAtLegOrig,
    EndAtLegOrigBeginAtLegDest,
}

impl SurfaceSectorType {
    pub fn from_ends(ends_at_orig: bool, begins_at_dest: bool) -> Self {
        match (ends_at_orig, begins_at_dest) {
            (false, false) => SurfaceSectorType::None,
            (false, true) => SurfaceSectorType::BeginAtLegDest,
            (true, false) => SurfaceSectorType::EndAtLegOrig,
            (true, true) => SurfaceSectorType::EndAtLegOrigBeginAtLegDest,
        }
    }

    pub fn begins_at_dest(&self) -> bool {
        matches!(
            self,
            SurfaceSectorType::BeginAtLegDest | SurfaceSectorType::EndAtLegOrigBeginAtLegDest
        )
    }

    pub fn ends_at_orig(&self) -> bool {
        matches!(
            self,
            SurfaceSectorType::EndAtLegOrig | SurfaceSectorType::EndAtLegOrigBeginAtLegDest
        )
    }
}

/// An entry in a stop-over leg's jumped list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JumpedLeg {
    /// An original leg, by index.
    Leg(usize),
    /// A surface gap between two original legs.
    Surface,
}

impl JumpedLeg {
    pub fn leg(&self) -> Option<usize> {
        match self {
            JumpedLeg::Leg(i) => Some(*i),
            JumpedLeg::Surface => None,
        }
    }
}

/// Extra data carried by a leg synthesized across a stop-over.
#[derive(Debug, Clone, PartialEq)]
pub struct StopOverInfo {
    /// Original legs spanned, in order, with surface markers between them.
    pub jumped: Vec<JumpedLeg>,
    /// Original leg whose carriers this leg inherits.
    pub adopted_leg: usize,
}

impl StopOverInfo {
    /// Original leg indices, skipping surface markers.
    pub fn jumped_legs(&self) -> impl Iterator<Item = usize> + '_ {
        self.jumped.iter().filter_map(JumpedLeg::leg)
    }

    pub fn first_leg(&self) -> Option<usize> {
        self.jumped_legs().next()
    }

    pub fn last_leg(&self) -> Option<usize> {
        self.jumped_legs().last()
    }
}

/// One origin-destination unit of the journey.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub index: usize,
    pub sops: Vec<SchedulingOption>,
    pub preferred_cabin: Cabin,
    pub surface_sector: SurfaceSectorType,
    pub stop_over: Option<StopOverInfo>,
    pub direction: Direction,
}

impl Leg {
    pub fn new(index: usize, sops: Vec<SchedulingOption>, preferred_cabin: Cabin) -> Self {
        Self {
            index,
            sops,
            preferred_cabin,
            surface_sector: SurfaceSectorType::None,
            stop_over: None,
            direction: Direction::Unknown,
        }
    }

    pub fn is_stop_over(&self) -> bool {
        self.stop_over.is_some()
    }

    /// SOPs that are cabin-valid and not dummies.
    pub fn usable_sops(&self) -> impl Iterator<Item = &SchedulingOption> {
        self.sops.iter().filter(|s| s.is_usable())
    }

    /// The SOP standing in for the leg's geography: the first usable one,
    /// else the first one.
    pub fn representative_sop(&self) -> Option<&SchedulingOption> {
        self.usable_sops().next().or_else(|| self.sops.first())
    }

    /// Renumber internal SOP ids to match positions.
    pub fn renumber_sops(&mut self) {
        for (i, sop) in self.sops.iter_mut().enumerate() {
            sop.sop_id = i;
        }
    }
}
