//! Typed litter/soil value pairs.
//!
//! The two-pool model always carries one value per pool: carbon stocks,
//! respiration fluxes, response factors. [`PoolSlice`] wraps the pair so that
//! pools are addressed by [`CarbonPool`] rather than by magic indices.

use crate::FloatValue;
use serde::{Deserialize, Serialize};

/// A carbon pool of the two-pool model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarbonPool {
    /// Fresh organic matter at the surface
    Litter = 0,
    /// Slower, mineral-associated soil organic matter
    Soil = 1,
}

impl CarbonPool {
    /// All pools in storage order.
    pub const ALL: [CarbonPool; 2] = [CarbonPool::Litter, CarbonPool::Soil];

    /// Number of pools tracked by the model.
    pub const COUNT: usize = 2;

    /// The pool that receives this pool's transferred carbon.
    pub fn other(self) -> CarbonPool {
        match self {
            CarbonPool::Litter => CarbonPool::Soil,
            CarbonPool::Soil => CarbonPool::Litter,
        }
    }
}

impl From<CarbonPool> for usize {
    fn from(pool: CarbonPool) -> usize {
        pool as usize
    }
}

/// A zero-cost wrapper for one value per carbon pool.
///
/// Uses `#[repr(transparent)]` so it has the same layout as `[FloatValue; 2]`.
///
/// # Examples
///
/// ```rust
/// use soilc_core::pools::{CarbonPool, PoolSlice};
///
/// let pools = PoolSlice::new(100.0, 500.0);
/// assert_eq!(pools[CarbonPool::Litter], 100.0);
/// assert_eq!(pools.soil(), 500.0);
/// assert_eq!(pools.total(), 600.0);
/// ```
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoolSlice(pub [FloatValue; 2]);

impl PoolSlice {
    pub fn new(litter: FloatValue, soil: FloatValue) -> Self {
        Self([litter, soil])
    }

    /// Create a slice with both pools set to the same value.
    pub fn uniform(value: FloatValue) -> Self {
        Self([value; 2])
    }

    pub fn litter(&self) -> FloatValue {
        self.0[CarbonPool::Litter as usize]
    }

    pub fn soil(&self) -> FloatValue {
        self.0[CarbonPool::Soil as usize]
    }

    pub fn get(&self, pool: CarbonPool) -> FloatValue {
        self.0[pool as usize]
    }

    pub fn set(&mut self, pool: CarbonPool, value: FloatValue) {
        self.0[pool as usize] = value;
    }

    /// Builder method to set a single pool's value.
    pub fn with(mut self, pool: CarbonPool, value: FloatValue) -> Self {
        self.0[pool as usize] = value;
        self
    }

    /// Sum over both pools.
    pub fn total(&self) -> FloatValue {
        self.litter() + self.soil()
    }

    /// Apply `f` to each pool's value.
    pub fn map(self, mut f: impl FnMut(CarbonPool, FloatValue) -> FloatValue) -> Self {
        Self(CarbonPool::ALL.map(|pool| f(pool, self.get(pool))))
    }

    /// Combine two slices pool by pool.
    pub fn zip_with(
        self,
        other: PoolSlice,
        mut f: impl FnMut(FloatValue, FloatValue) -> FloatValue,
    ) -> Self {
        Self([f(self.0[0], other.0[0]), f(self.0[1], other.0[1])])
    }

    /// True if both values are finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    pub fn as_array(&self) -> &[FloatValue; 2] {
        &self.0
    }
}

impl From<[FloatValue; 2]> for PoolSlice {
    fn from(values: [FloatValue; 2]) -> Self {
        Self(values)
    }
}

impl From<PoolSlice> for [FloatValue; 2] {
    fn from(slice: PoolSlice) -> Self {
        slice.0
    }
}

impl std::ops::Index<CarbonPool> for PoolSlice {
    type Output = FloatValue;

    fn index(&self, pool: CarbonPool) -> &Self::Output {
        &self.0[pool as usize]
    }
}

impl std::ops::IndexMut<CarbonPool> for PoolSlice {
    fn index_mut(&mut self, pool: CarbonPool) -> &mut Self::Output {
        &mut self.0[pool as usize]
    }
}

/// Stack a sequence of slices into an `n x 2` array (columns: litter, soil).
pub fn to_array2(slices: &[PoolSlice]) -> ndarray::Array2<FloatValue> {
    let mut array = ndarray::Array2::zeros((slices.len(), CarbonPool::COUNT));
    for (mut row, slice) in array.rows_mut().into_iter().zip(slices) {
        row[0] = slice.litter();
        row[1] = slice.soil();
    }
    array
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_indexing() {
        let mut slice = PoolSlice::new(1.0, 2.0);
        assert_eq!(slice[CarbonPool::Litter], 1.0);
        assert_eq!(slice[CarbonPool::Soil], 2.0);

        slice[CarbonPool::Soil] = 5.0;
        assert_eq!(slice.soil(), 5.0);

        slice.set(CarbonPool::Litter, 3.0);
        assert_eq!(slice.get(CarbonPool::Litter), 3.0);
    }

    #[test]
    fn test_pool_order_matches_storage() {
        let idx: usize = CarbonPool::Litter.into();
        assert_eq!(idx, 0);
        let idx: usize = CarbonPool::Soil.into();
        assert_eq!(idx, 1);
        assert_eq!(CarbonPool::ALL.len(), CarbonPool::COUNT);
    }

    #[test]
    fn test_other_pool() {
        assert_eq!(CarbonPool::Litter.other(), CarbonPool::Soil);
        assert_eq!(CarbonPool::Soil.other(), CarbonPool::Litter);
    }

    #[test]
    fn test_map_and_zip() {
        let slice = PoolSlice::new(2.0, 4.0);
        let doubled = slice.map(|_, v| v * 2.0);
        assert_eq!(doubled, PoolSlice::new(4.0, 8.0));

        let summed = slice.zip_with(doubled, |a, b| a + b);
        assert_eq!(summed, PoolSlice::new(6.0, 12.0));

        let tagged = slice.map(|pool, v| if pool == CarbonPool::Soil { 0.0 } else { v });
        assert_eq!(tagged, PoolSlice::new(2.0, 0.0));
    }

    #[test]
    fn test_with_builder() {
        let slice = PoolSlice::uniform(1.0).with(CarbonPool::Soil, 7.0);
        assert_eq!(slice.as_array(), &[1.0, 7.0]);
    }

    #[test]
    fn test_is_finite() {
        assert!(PoolSlice::new(1.0, 2.0).is_finite());
        assert!(!PoolSlice::new(f64::NAN, 2.0).is_finite());
        assert!(!PoolSlice::new(1.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_to_array2() {
        let slices = vec![PoolSlice::new(1.0, 2.0), PoolSlice::new(3.0, 4.0)];
        let array = to_array2(&slices);
        assert_eq!(array.shape(), &[2, 2]);
        assert_eq!(array[[0, 0]], 1.0);
        assert_eq!(array[[1, 1]], 4.0);

        let empty = to_array2(&[]);
        assert_eq!(empty.shape(), &[0, 2]);
    }

    #[test]
    fn test_serde_is_a_plain_pair() {
        let json = serde_json::to_string(&PoolSlice::new(1.5, 2.5)).unwrap();
        assert_eq!(json, "[1.5,2.5]");
    }
}
