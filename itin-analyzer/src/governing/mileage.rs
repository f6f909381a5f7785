//! Ticketed point mileage lookups.

use std::collections::HashMap;

use crate::domain::{Loc, LocCode, TravelSegment};

/// Source of ticketed point mileage between two points.
///
/// This abstraction lets the selector and the across-stop-over pruning run
/// against resident data in production and a fixed table in tests.
pub trait MileageSource {
    /// Mileage between two points, if known. Lookups are symmetric.
    fn mileage(&self, from: &LocCode, to: &LocCode) -> Option<u32>;

    /// Mileage between two locations: airport pair first, then city pair.
    fn loc_mileage(&self, from: &Loc, to: &Loc) -> Option<u32> {
        self.mileage(&from.code, &to.code)
            .or_else(|| self.mileage(&from.city, &to.city))
    }

    fn segment_mileage(&self, segment: &TravelSegment) -> Option<u32> {
        self.loc_mileage(&segment.origin, &segment.destination)
    }
}

impl<T: MileageSource + ?Sized> MileageSource for &T {
    fn mileage(&self, from: &LocCode, to: &LocCode) -> Option<u32> {
        (**self).mileage(from, to)
    }
}

/// In-memory symmetric mileage table.
#[derive(Debug, Clone, Default)]
pub struct MileageTable {
    entries: HashMap<(LocCode, LocCode), u32>,
}

impl MileageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(from, to, miles)` triples.
    pub fn from_entries(entries: impl IntoIterator<Item = (LocCode, LocCode, u32)>) -> Self {
        let mut table = Self::new();
        for (from, to, miles) in entries {
            table.insert(from, to, miles);
        }
        table
    }

    /// Record mileage in both directions. A later entry replaces an earlier one.
    pub fn insert(&mut self, from: LocCode, to: LocCode, miles: u32) {
        self.entries.insert(Self::key(from, to), miles);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key(a: LocCode, b: LocCode) -> (LocCode, LocCode) {
        if a <= b { (a, b) } else { (b, a) }
    }
}

impl MileageSource for MileageTable {
    fn mileage(&self, from: &LocCode, to: &LocCode) -> Option<u32> {
        self.entries.get(&Self::key(*from, *to)).copied()
    }
}
