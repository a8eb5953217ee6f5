//! Output of a decomposition run.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use soilc_core::errors::SoilCError;
use soilc_core::pools::{to_array2, PoolSlice};
use soilc_core::FloatValue;

/// Pool and flux time series produced by a single run.
///
/// For a forcing series of length `N`:
/// - `carbon_pools` has `N + 1` entries, the first being the initial condition
/// - `heterotrophic_respiration` and `transferred` have `N` entries, entry `t`
///   being the flux realised while stepping from pool state `t` to `t + 1`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDecompositionResults")]
pub struct DecompositionResults {
    heterotrophic_respiration: Vec<PoolSlice>,
    carbon_pools: Vec<PoolSlice>,
    transferred: Vec<PoolSlice>,
}

/// Unchecked serialised form of [`DecompositionResults`].
#[derive(Deserialize)]
struct RawDecompositionResults {
    heterotrophic_respiration: Vec<PoolSlice>,
    carbon_pools: Vec<PoolSlice>,
    transferred: Vec<PoolSlice>,
}

impl TryFrom<RawDecompositionResults> for DecompositionResults {
    type Error = SoilCError;

    fn try_from(raw: RawDecompositionResults) -> Result<Self, Self::Error> {
        let steps = raw.heterotrophic_respiration.len();
        if raw.carbon_pools.len() != steps + 1 || raw.transferred.len() != steps {
            return Err(SoilCError::InconsistentResults {
                pool_states: raw.carbon_pools.len(),
                steps,
            });
        }
        Ok(Self {
            heterotrophic_respiration: raw.heterotrophic_respiration,
            carbon_pools: raw.carbon_pools,
            transferred: raw.transferred,
        })
    }
}

impl DecompositionResults {
    pub(crate) fn new(
        heterotrophic_respiration: Vec<PoolSlice>,
        carbon_pools: Vec<PoolSlice>,
        transferred: Vec<PoolSlice>,
    ) -> Self {
        debug_assert_eq!(carbon_pools.len(), heterotrophic_respiration.len() + 1);
        debug_assert_eq!(transferred.len(), heterotrophic_respiration.len());
        Self {
            heterotrophic_respiration,
            carbon_pools,
            transferred,
        }
    }

    /// Number of simulated steps.
    pub fn len(&self) -> usize {
        self.heterotrophic_respiration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heterotrophic_respiration.is_empty()
    }

    /// Respiration flux `Rh` per step.
    pub fn heterotrophic_respiration(&self) -> &[PoolSlice] {
        &self.heterotrophic_respiration
    }

    /// Pool sizes `Cpools`, starting with the initial condition.
    pub fn carbon_pools(&self) -> &[PoolSlice] {
        &self.carbon_pools
    }

    /// Carbon moved out of each pool into the other pool, per step.
    pub fn transferred(&self) -> &[PoolSlice] {
        &self.transferred
    }

    /// Carbon decomposed per step: transferred plus respired.
    pub fn decomposed(&self) -> Vec<PoolSlice> {
        self.transferred
            .iter()
            .zip(&self.heterotrophic_respiration)
            .map(|(transferred, respired)| transferred.zip_with(*respired, |x, r| x + r))
            .collect()
    }

    /// Pool sizes after the last step (the initial condition if no steps ran).
    pub fn final_pools(&self) -> Option<PoolSlice> {
        self.carbon_pools.last().copied()
    }

    /// Respiration summed over both pools, per step.
    pub fn total_respiration(&self) -> Vec<FloatValue> {
        self.heterotrophic_respiration
            .iter()
            .map(PoolSlice::total)
            .collect()
    }

    /// Carbon summed over both pools, per pool state.
    pub fn total_carbon(&self) -> Vec<FloatValue> {
        self.carbon_pools.iter().map(PoolSlice::total).collect()
    }

    /// `Rh` as an `N x 2` array (columns: litter, soil).
    pub fn respiration_array(&self) -> Array2<FloatValue> {
        to_array2(&self.heterotrophic_respiration)
    }

    /// `Cpools` as an `(N + 1) x 2` array (columns: litter, soil).
    pub fn carbon_pools_array(&self) -> Array2<FloatValue> {
        to_array2(&self.carbon_pools)
    }

    /// Split into `(Rh, Cpools)`.
    pub fn into_parts(self) -> (Vec<PoolSlice>, Vec<PoolSlice>) {
        (self.heterotrophic_respiration, self.carbon_pools)
    }
}
