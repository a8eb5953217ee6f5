//! Two-Pool Decomposition Parameters
//!
//! Parameters for the litter/soil decomposition model with Q10 temperature
//! response and a floored quadratic moisture response.
//!
//! Field names follow the snake_case convention in Rust, while the serialised
//! keys keep the names used in parameter files (`C_litter_t0`, `Q10`, `Wf_min`, ...).

use crate::response::{moisture_response, temperature_response};
use log::warn;
use serde::{Deserialize, Serialize};
use soilc_core::errors::{SoilCError, SoilCResult};
use soilc_core::pools::{CarbonPool, PoolSlice};
use soilc_core::FloatValue;
use std::collections::HashMap;
use std::path::Path;

fn default_npools() -> usize {
    CarbonPool::COUNT
}

/// Parameters for the two-pool decomposition model.
///
/// # Carbon Flows
///
/// ```text
///   LITTER_INPUT
///        |
///        v      Me_litter
///    [LITTER] -----------> [SOIL]
///        ^  <-----------     |
///        |     Me_soil       |
///        v                   v
///   Rh_litter            Rh_soil
/// ```
///
/// Decomposed carbon is split between transfer to the other pool (fraction `Me`)
/// and heterotrophic respiration (fraction `1 - Me`).
///
/// `tau_*` and `dt` must be positive and `Me_*` must lie in `[0, 1]` for the
/// model to conserve mass. These bounds are not enforced when running; see
/// [`TwoPoolParameters::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoPoolParameters {
    /// Number of carbon pools. Only 2 is supported.
    #[serde(default = "default_npools")]
    pub npools: usize,

    /// Initial litter carbon stock
    /// unit: carbon mass per area
    #[serde(rename = "C_litter_t0")]
    pub c_litter_t0: FloatValue,

    /// Initial soil carbon stock
    /// unit: carbon mass per area
    #[serde(rename = "C_soil_t0")]
    pub c_soil_t0: FloatValue,

    /// Timestep length
    /// unit: same time unit as `tau_*`
    pub dt: FloatValue,

    /// Litter turnover time
    pub tau_litter: FloatValue,

    /// Soil turnover time
    pub tau_soil: FloatValue,

    /// Multiplier on the decomposition rate per 10 degree warming
    /// unit: dimensionless
    #[serde(rename = "Q10")]
    pub q10: FloatValue,

    /// Temperature at which the temperature response equals 1
    #[serde(rename = "Tref")]
    pub tref: FloatValue,

    /// Floor of the moisture response
    #[serde(rename = "Wf_min")]
    pub wf_min: FloatValue,

    /// Moisture response at the optimum moisture `Wf_x0`
    #[serde(rename = "Wf_max")]
    pub wf_max: FloatValue,

    /// Curvature of the moisture response (negative for a peaked response)
    #[serde(rename = "Wf_m")]
    pub wf_m: FloatValue,

    /// Optimum moisture
    #[serde(rename = "Wf_x0")]
    pub wf_x0: FloatValue,

    /// Fraction of decomposed litter carbon transferred to the soil pool
    #[serde(rename = "Me_litter")]
    pub me_litter: FloatValue,

    /// Fraction of decomposed soil carbon transferred to the litter pool
    #[serde(rename = "Me_soil")]
    pub me_soil: FloatValue,
}

impl TwoPoolParameters {
    /// Look parameters up by name.
    ///
    /// `npools` may be omitted; if given it must equal 2.
    pub fn from_map(values: &HashMap<String, FloatValue>) -> SoilCResult<Self> {
        let get = |name: &str| -> SoilCResult<FloatValue> {
            values
                .get(name)
                .copied()
                .ok_or_else(|| SoilCError::MissingParameter(name.to_string()))
        };

        let npools = match values.get("npools") {
            Some(&n) if n == CarbonPool::COUNT as FloatValue => CarbonPool::COUNT,
            Some(&n) => return Err(SoilCError::UnsupportedPoolCount(n)),
            None => CarbonPool::COUNT,
        };

        Ok(Self {
            npools,
            c_litter_t0: get("C_litter_t0")?,
            c_soil_t0: get("C_soil_t0")?,
            dt: get("dt")?,
            tau_litter: get("tau_litter")?,
            tau_soil: get("tau_soil")?,
            q10: get("Q10")?,
            tref: get("Tref")?,
            wf_min: get("Wf_min")?,
            wf_max: get("Wf_max")?,
            wf_m: get("Wf_m")?,
            wf_x0: get("Wf_x0")?,
            me_litter: get("Me_litter")?,
            me_soil: get("Me_soil")?,
        })
    }

    /// Parse parameters from a TOML document.
    pub fn from_toml_str(content: &str) -> SoilCResult<Self> {
        let parameters: Self = toml::from_str(content)?;
        parameters.check_pool_count()?;
        Ok(parameters)
    }

    /// Read parameters from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> SoilCResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// The parameters as a name to value mapping, using the serialised names.
    pub fn to_map(&self) -> HashMap<String, FloatValue> {
        HashMap::from([
            ("npools".to_string(), self.npools as FloatValue),
            ("C_litter_t0".to_string(), self.c_litter_t0),
            ("C_soil_t0".to_string(), self.c_soil_t0),
            ("dt".to_string(), self.dt),
            ("tau_litter".to_string(), self.tau_litter),
            ("tau_soil".to_string(), self.tau_soil),
            ("Q10".to_string(), self.q10),
            ("Tref".to_string(), self.tref),
            ("Wf_min".to_string(), self.wf_min),
            ("Wf_max".to_string(), self.wf_max),
            ("Wf_m".to_string(), self.wf_m),
            ("Wf_x0".to_string(), self.wf_x0),
            ("Me_litter".to_string(), self.me_litter),
            ("Me_soil".to_string(), self.me_soil),
        ])
    }

    fn check_pool_count(&self) -> SoilCResult<()> {
        if self.npools != CarbonPool::COUNT {
            return Err(SoilCError::UnsupportedPoolCount(self.npools as FloatValue));
        }
        Ok(())
    }

    /// Initial carbon stocks `(C_litter_t0, C_soil_t0)`.
    pub fn initial_pools(&self) -> PoolSlice {
        PoolSlice::new(self.c_litter_t0, self.c_soil_t0)
    }

    /// Turnover time of a pool.
    pub fn tau(&self, pool: CarbonPool) -> FloatValue {
        match pool {
            CarbonPool::Litter => self.tau_litter,
            CarbonPool::Soil => self.tau_soil,
        }
    }

    /// Fraction of a pool's decomposed carbon moved to the other pool.
    pub fn transfer_fraction(&self, pool: CarbonPool) -> FloatValue {
        match pool {
            CarbonPool::Litter => self.me_litter,
            CarbonPool::Soil => self.me_soil,
        }
    }

    /// Base fraction of each pool decomposed per step, `dt / tau`.
    pub fn base_decomposition_rate(&self) -> PoolSlice {
        PoolSlice::new(self.dt / self.tau_litter, self.dt / self.tau_soil)
    }

    /// Q10 temperature response, `Q10 ^ ((T - Tref) / 10)`.
    pub fn temperature_factor(&self, temperature: FloatValue) -> FloatValue {
        temperature_response(self.q10, self.tref, temperature)
    }

    /// Floored quadratic moisture response,
    /// `max(Wf_min, Wf_max + Wf_m * (W - Wf_x0)^2)`.
    pub fn moisture_factor(&self, moisture: FloatValue) -> FloatValue {
        moisture_response(self.wf_min, self.wf_max, self.wf_m, self.wf_x0, moisture)
    }

    /// Every physically inconsistent setting, in declaration order.
    pub fn violations(&self) -> Vec<SoilCError> {
        let invalid = |name: &str, value: FloatValue, reason: &str| SoilCError::InvalidParameter {
            name: name.to_string(),
            value,
            reason: reason.to_string(),
        };

        let mut found = Vec::new();
        if self.npools != CarbonPool::COUNT {
            found.push(SoilCError::UnsupportedPoolCount(self.npools as FloatValue));
        }
        for (name, value) in [
            ("dt", self.dt),
            ("tau_litter", self.tau_litter),
            ("tau_soil", self.tau_soil),
        ] {
            if value.is_nan() || value <= 0.0 {
                found.push(invalid(name, value, "must be positive"));
            }
        }
        if self.q10.is_nan() || self.q10 <= 0.0 {
            found.push(invalid("Q10", self.q10, "must be positive"));
        }
        for (name, value) in [("Me_litter", self.me_litter), ("Me_soil", self.me_soil)] {
            if !(0.0..=1.0).contains(&value) {
                found.push(invalid(name, value, "must be within [0, 1]"));
            }
        }
        found
    }

    /// Check the bounds the mass balance relies on.
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> SoilCResult<()> {
        match self.violations().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Log a warning for each violation without rejecting the parameters.
    pub(crate) fn warn_violations(&self) {
        for violation in self.violations() {
            warn!("Decomposition parameters are not physically consistent: {violation}");
        }
    }
}
