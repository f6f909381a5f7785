//! Per-leg index of candidate itineraries.
//!
//! Itineraries are grouped by governing carrier (the row) and then by
//! connection shape (the column). Lookups for a carrier or column that was
//! never populated return an empty result rather than failing, so callers
//! can probe freely.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::domain::{ItinId, JumpedLeg, Leg, StopOverInfo};

use super::cell::{Cell, CellInfo, CheckType};
use super::combinations::AcrossStopOverCombinations;
use super::key::{CarrierKey, ScheduleKey};

/// All cells for one governing carrier.
#[derive(Debug, Clone, Default)]
struct Row {
    columns: BTreeMap<ScheduleKey, Vec<Cell>>,
    /// (column, position) in insertion order.
    order: Vec<(ScheduleKey, usize)>,
}

/// Index of a leg's itineraries, keyed by carrier then schedule key.
///
/// Rows keep the order in which carriers were first seen, and cells keep
/// insertion order within their column, so iteration is repeatable for
/// identical inputs.
#[derive(Debug, Clone, Default)]
pub struct ItinIndex {
    rows: IndexMap<CarrierKey, Row>,
}

impl ItinIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cell. Existing cells are never replaced.
    pub fn add_itin_cell(
        &mut self,
        itin: ItinId,
        info: CellInfo,
        carrier: CarrierKey,
        schedule: ScheduleKey,
    ) {
        let row = self.rows.entry(carrier).or_default();
        let column = row.columns.entry(schedule).or_default();
        column.push(Cell { info, itin });
        row.order.push((schedule, column.len() - 1));
    }

    /// First cell of the carrier's direct column that passes `check`.
    pub fn retrieve_top_itin_cell(
        &self,
        carrier: &CarrierKey,
        check: CheckType,
    ) -> Option<&Cell> {
        self.column(carrier, ScheduleKey::DIRECT)
            .iter()
            .find(|cell| check.accepts(&cell.info))
    }

    /// Every cell for a carrier, in insertion order, ignoring schedule key.
    pub fn row<'a>(
        &'a self,
        carrier: &CarrierKey,
    ) -> impl Iterator<Item = &'a Cell> + use<'a> {
        let row = self.rows.get(carrier);
        row.into_iter().flat_map(|row| {
            row.order
                .iter()
                .filter_map(|(key, pos)| row.columns.get(key).and_then(|c| c.get(*pos)))
        })
    }

    /// Cells in one column; empty when the row or column is missing.
    pub fn column(&self, carrier: &CarrierKey, schedule: ScheduleKey) -> &[Cell] {
        self.rows
            .get(carrier)
            .and_then(|row| row.columns.get(&schedule))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Schedule keys populated for a carrier, in key order.
    pub fn schedule_keys<'a>(
        &'a self,
        carrier: &CarrierKey,
    ) -> impl Iterator<Item = ScheduleKey> + use<'a> {
        self.rows
            .get(carrier)
            .into_iter()
            .flat_map(|row| row.columns.keys().copied())
    }

    /// Carriers in the order they were first indexed.
    pub fn carriers(&self) -> impl Iterator<Item = &CarrierKey> {
        self.rows.keys()
    }

    pub fn contains_carrier(&self, carrier: &CarrierKey) -> bool {
        self.rows.contains_key(carrier)
    }

    pub fn has_direct(&self, carrier: &CarrierKey) -> bool {
        !self.column(carrier, ScheduleKey::DIRECT).is_empty()
    }

    pub fn carrier_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.order.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Combinations of SOPs across a stop-over leg's jumped entries for one
    /// carrier.
    ///
    /// `self` must be the index of the adopted leg. The adopted leg
    /// contributes the real (non-fake-direct) SOPs of `carrier`'s row; every
    /// other jumped leg contributes all of its usable SOPs; surface gaps
    /// contribute a single empty choice. `legs` holds the original legs,
    /// indexed by position.
    pub fn across_stop_over_row(
        &self,
        carrier: &CarrierKey,
        stop_over: &StopOverInfo,
        legs: &[Leg],
    ) -> AcrossStopOverCombinations {
        let mut dimensions = Vec::with_capacity(stop_over.jumped.len());
        for jumped in &stop_over.jumped {
            let choices: Vec<Option<usize>> = match *jumped {
                JumpedLeg::Surface => vec![None],
                JumpedLeg::Leg(i) if i == stop_over.adopted_leg => {
                    let mut sops: Vec<Option<usize>> = Vec::new();
                    for cell in self.row(carrier) {
                        let sop = Some(cell.info.sop_index);
                        if !cell.info.is_fake_direct() && !sops.contains(&sop) {
                            sops.push(sop);
                        }
                    }
                    sops
                }
                JumpedLeg::Leg(i) => legs
                    .get(i)
                    .map(|leg| leg.usable_sops().map(|s| Some(s.sop_id)).collect())
                    .unwrap_or_default(),
            };
            dimensions.push(choices);
        }
        AcrossStopOverCombinations::new(dimensions)
    }
}
