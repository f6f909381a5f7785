//! Lazy Cartesian product over the legs spanned by a stop-over leg.
//!
//! Each dimension is the list of SOP choices for one jumped entry. A surface
//! marker contributes a single `None` choice. Combinations are produced in
//! odometer order (last dimension fastest) and numbered with a sequential
//! bit index, so the same inputs always give the same numbering. Nothing is
//! materialized beyond the current cursor.

/// One combination: a SOP index per jumped entry, `None` for surface gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub bit_index: u64,
    pub sops: Vec<Option<usize>>,
}

impl Combination {
    /// SOP indices of the jumped legs, skipping surface gaps.
    pub fn leg_sops(&self) -> Vec<usize> {
        self.sops.iter().flatten().copied().collect()
    }
}

/// Restartable generator of [`Combination`]s.
///
/// Cloning gives an independent cursor over the same product.
#[derive(Debug, Clone)]
pub struct AcrossStopOverCombinations {
    dimensions: Vec<Vec<Option<usize>>>,
    cursor: Vec<usize>,
    next_bit: u64,
    exhausted: bool,
}

impl AcrossStopOverCombinations {
    /// Build a generator over the given dimensions.
    ///
    /// An empty dimension list, or any empty dimension, yields nothing.
    pub fn new(dimensions: Vec<Vec<Option<usize>>>) -> Self {
        let exhausted = dimensions.is_empty() || dimensions.iter().any(Vec::is_empty);
        let cursor = vec![0; dimensions.len()];
        Self {
            dimensions,
            cursor,
            next_bit: 0,
            exhausted,
        }
    }

    /// Generator that yields nothing.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Rewind to the first combination.
    pub fn reset(&mut self) {
        self.cursor.iter_mut().for_each(|c| *c = 0);
        self.next_bit = 0;
        self.exhausted =
            self.dimensions.is_empty() || self.dimensions.iter().any(Vec::is_empty);
    }

    /// Total number of combinations, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        if self.dimensions.is_empty() {
            return 0;
        }
        self.dimensions
            .iter()
            .try_fold(1u64, |acc, d| acc.checked_mul(d.len() as u64))
            .unwrap_or(u64::MAX)
    }

    pub fn dimensions(&self) -> &[Vec<Option<usize>>] {
        &self.dimensions
    }

    /// Bit index of the combination whose leg SOPs equal `sops`, ignoring
    /// surface gaps. `None` if no such combination exists.
    pub fn bit_index_of(&self, sops: &[usize]) -> Option<u64> {
        if self.total() == 0 {
            return None;
        }
        let mut wanted = sops.iter();
        let mut bit = 0u64;
        for dim in &self.dimensions {
            let pos = if dim.len() == 1 && dim[0].is_none() {
                0
            } else {
                let sop = wanted.next()?;
                dim.iter().position(|c| *c == Some(*sop))?
            };
            bit = bit.checked_mul(dim.len() as u64)?.checked_add(pos as u64)?;
        }
        if wanted.next().is_some() {
            return None;
        }
        Some(bit)
    }

    /// Inverse of [`bit_index_of`](Self::bit_index_of).
    pub fn sops_of(&self, bit_index: u64) -> Option<Vec<Option<usize>>> {
        if bit_index >= self.total() {
            return None;
        }
        let mut rest = bit_index;
        let mut out = vec![None; self.dimensions.len()];
        for (slot, dim) in out.iter_mut().zip(&self.dimensions).rev() {
            let len = dim.len() as u64;
            *slot = dim[(rest % len) as usize];
            rest /= len;
        }
        Some(out)
    }

    fn advance(&mut self) {
        for (pos, dim) in self.cursor.iter_mut().zip(&self.dimensions).rev() {
            *pos += 1;
            if *pos < dim.len() {
                return;
            }
            *pos = 0;
        }
        self.exhausted = true;
    }
}

impl Iterator for AcrossStopOverCombinations {
    type Item = Combination;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let sops = self
            .cursor
            .iter()
            .zip(&self.dimensions)
            .map(|(&pos, dim)| dim[pos])
            .collect();
        let combination = Combination {
            bit_index: self.next_bit,
            sops,
        };
        self.next_bit += 1;
        self.advance();
        Some(combination)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Count equals the product of dimension sizes; bits are 0..n
        #[test]
        fn count_is_product_with_sequential_bits(sizes in prop::collection::vec(1usize..4, 1..5)) {
            let dims: Vec<Vec<Option<usize>>> = sizes
                .iter()
                .map(|&n| (0..n).map(Some).collect())
                .collect();
            let combos = AcrossStopOverCombinations::new(dims);
            let expected: usize = sizes.iter().product();

            let all: Vec<_> = combos.clone().collect();
            prop_assert_eq!(all.len(), expected);
            prop_assert_eq!(combos.total(), expected as u64);
            for (i, c) in all.iter().enumerate() {
                prop_assert_eq!(c.bit_index, i as u64);
                prop_assert_eq!(combos.bit_index_of(&c.leg_sops()), Some(i as u64));
                prop_assert_eq!(combos.sops_of(i as u64), Some(c.sops.clone()));
            }
        }
    }
}
