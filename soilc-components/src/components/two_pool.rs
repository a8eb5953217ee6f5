//! Two-Pool Decomposition Component
//!
//! Simulates decomposition of litter and soil carbon under varying temperature
//! and moisture.
//!
//! # What This Component Does
//!
//! 1. Scales each pool's base decomposition rate `dt / tau` by a Q10
//!    temperature factor and a floored quadratic moisture factor
//! 2. Splits decomposed carbon into a transfer to the other pool (`Me`) and
//!    heterotrophic respiration (`1 - Me`)
//! 3. Adds external litter input and advances both pools with an explicit
//!    Euler step
//!
//! # Inputs
//!
//! - `LITTER_TEMP`, `SOIL_TEMP` - Temperature of each layer
//! - `LITTER_MOIST`, `SOIL_MOIST` - Moisture of each layer
//! - `LITTER_INPUT` - Carbon added to the litter pool each step
//!
//! # Outputs
//!
//! - Carbon pools, `N + 1` entries starting at the initial condition
//! - Heterotrophic respiration, `N` entries

use crate::parameters::TwoPoolParameters;
use crate::response::{EnvironmentalResponse, ResponseFactors};
use crate::results::DecompositionResults;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use soilc_core::errors::SoilCResult;
use soilc_core::forcing::{ForcingData, ForcingRecord};
use soilc_core::pools::{CarbonPool, PoolSlice};
use soilc_core::FloatValue;

/// Carbon fluxes realised during a single step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepFluxes {
    /// Carbon leaving each pool through decomposition
    pub decomposed: PoolSlice,
    /// Part of the decomposed carbon moved into the other pool
    pub transferred: PoolSlice,
    /// Part of the decomposed carbon respired to the atmosphere
    pub respired: PoolSlice,
}

/// Two-pool (litter, soil) decomposition model.
///
/// # Algorithm
///
/// For each timestep $t$ and pool $i$:
///
/// 1. Decomposition:
///    $$D_i = C_i(t) \frac{\Delta t}{\tau_i} f_T(T_i) f_W(W_i)$$
///
/// 2. Transfer and respiration:
///    $$X_i = D_i M_i, \quad R_i = D_i (1 - M_i)$$
///
/// 3. Pool update:
///    $$C_{litter}(t+1) = C_{litter}(t) + I(t) - D_{litter} + X_{soil}$$
///    $$C_{soil}(t+1) = C_{soil}(t) + X_{litter} - D_{soil}$$
///
/// Each step reads only the pools at $t$ and the forcing at $t$.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoPoolDecomposition {
    parameters: TwoPoolParameters,
}

impl TwoPoolDecomposition {
    pub fn from_parameters(parameters: TwoPoolParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &TwoPoolParameters {
        &self.parameters
    }

    /// Advance the pools by one step given precomputed response factors.
    fn advance(
        &self,
        pools: PoolSlice,
        factors: &ResponseFactors,
        litter_input: FloatValue,
    ) -> (PoolSlice, StepFluxes) {
        let rate = self.parameters.base_decomposition_rate();

        let decomposed = pools.map(|pool, carbon| {
            carbon * rate[pool] * factors.temperature[pool] * factors.moisture[pool]
        });
        let transferred =
            decomposed.map(|pool, d| d * self.parameters.transfer_fraction(pool));
        let respired =
            decomposed.map(|pool, d| d * (1.0 - self.parameters.transfer_fraction(pool)));

        // Each pool receives what the other pool transfers out
        let received = transferred.map(|pool, _| transferred[pool.other()]);

        // Litter gains the external input, soil does not
        let next = PoolSlice::new(
            pools.litter() + litter_input - decomposed.litter() + received.litter(),
            pools.soil() + received.soil() - decomposed.soil(),
        );

        (
            next,
            StepFluxes {
                decomposed,
                transferred,
                respired,
            },
        )
    }

    /// Advance the pools by a single step of forcing.
    ///
    /// # Returns
    ///
    /// (pools at the next step, fluxes realised during this step)
    pub fn solve_step(
        &self,
        pools: PoolSlice,
        record: &ForcingRecord,
    ) -> (PoolSlice, StepFluxes) {
        let factors = ResponseFactors::for_record(&self.parameters, record);
        self.advance(pools, &factors, record.litter_input)
    }

    /// Run the model over a forcing series.
    ///
    /// Parameter bounds are not enforced; violations are logged and the
    /// recursion runs regardless. An empty forcing series returns just the
    /// initial pools.
    pub fn run(&self, forcing: &ForcingData) -> DecompositionResults {
        self.parameters.warn_violations();

        let n_steps = forcing.len();
        let initial = self.parameters.initial_pools();
        debug!(
            "Running two-pool decomposition for {} steps from litter={} soil={}",
            n_steps,
            initial.litter(),
            initial.soil()
        );

        let response = EnvironmentalResponse::from_forcing(&self.parameters, forcing);

        let mut carbon_pools = Vec::with_capacity(n_steps + 1);
        let mut respiration = Vec::with_capacity(n_steps);
        let mut transferred = Vec::with_capacity(n_steps);
        carbon_pools.push(initial);

        let mut pools = initial;
        let mut reported_non_finite = false;
        for (t, (record, factors)) in forcing.iter().zip(response.iter()).enumerate() {
            let (next, fluxes) = self.advance(pools, factors, record.litter_input);

            if !reported_non_finite && !next.is_finite() {
                warn!(
                    "Carbon pools became non-finite at step {}: litter={} soil={}",
                    t + 1,
                    next.litter(),
                    next.soil()
                );
                reported_non_finite = true;
            }

            respiration.push(fluxes.respired);
            transferred.push(fluxes.transferred);
            carbon_pools.push(next);
            pools = next;
        }

        DecompositionResults::new(respiration, carbon_pools, transferred)
    }

    /// Run the model after checking the parameter bounds.
    ///
    /// Fails with the first violation instead of producing non-physical output.
    pub fn run_checked(&self, forcing: &ForcingData) -> SoilCResult<DecompositionResults> {
        self.parameters.validate()?;
        Ok(self.run(forcing))
    }

    /// Carbon decomposed from `pool` under the given factors, for a pool size.
    pub fn decomposition(
        &self,
        pool: CarbonPool,
        carbon: FloatValue,
        factors: &ResponseFactors,
    ) -> FloatValue {
        carbon
            * self.parameters.base_decomposition_rate()[pool]
            * factors.temperature[pool]
            * factors.moisture[pool]
    }
}
