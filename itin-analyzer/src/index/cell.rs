//! Index cells.

use crate::domain::{GlobalDirection, ItinId, SegmentId};

bitflags::bitflags! {
    /// Per-cell flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        /// Cell holds a synthesized direct itinerary.
        const FAKE_DIRECT_FLIGHT = 1 << 0;
        /// Cell holds an itinerary cloned for across-stop-over adoption.
        const FAKED_FLIGHT = 1 << 1;
    }
}

/// Metadata stored alongside each indexed itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellInfo {
    /// Position of the SOP within its leg.
    pub sop_index: usize,
    pub flags: CellFlags,
    pub global_direction: Option<GlobalDirection>,
    pub primary_sector: Option<SegmentId>,
}

impl CellInfo {
    pub fn new(sop_index: usize) -> Self {
        Self {
            sop_index,
            ..Self::default()
        }
    }

    pub fn with_flags(mut self, flags: CellFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn is_fake_direct(&self) -> bool {
        self.flags.contains(CellFlags::FAKE_DIRECT_FLIGHT)
    }
}

/// Predicate applied when retrieving the top direct cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckType {
    /// Accept any cell.
    #[default]
    Nothing,
    /// Skip cells holding a synthesized direct itinerary.
    ExcludeFakeDirect,
}

impl CheckType {
    pub fn accepts(&self, info: &CellInfo) -> bool {
        match self {
            CheckType::Nothing => true,
            CheckType::ExcludeFakeDirect => !info.is_fake_direct(),
        }
    }
}

/// An indexed itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub info: CellInfo,
    pub itin: ItinId,
}
