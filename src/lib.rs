//! Two-pool (litter, soil) carbon decomposition model.
//!
//! This crate bundles [`soilc_core`] and [`soilc_components`] and, with the
//! `python` feature enabled, exposes the model as a Python extension module.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! let params = HashMap::from([
//!     ("C_litter_t0".to_string(), 100.0),
//!     ("C_soil_t0".to_string(), 500.0),
//!     ("dt".to_string(), 1.0),
//!     ("tau_litter".to_string(), 2.0),
//!     ("tau_soil".to_string(), 50.0),
//!     ("Q10".to_string(), 2.0),
//!     ("Tref".to_string(), 10.0),
//!     ("Wf_min".to_string(), 0.1),
//!     ("Wf_max".to_string(), 1.0),
//!     ("Wf_m".to_string(), -0.1),
//!     ("Wf_x0".to_string(), 0.5),
//!     ("Me_litter".to_string(), 0.3),
//!     ("Me_soil".to_string(), 0.2),
//! ]);
//! let forcing = HashMap::from([
//!     ("LITTER_TEMP".to_string(), vec![10.0]),
//!     ("SOIL_TEMP".to_string(), vec![10.0]),
//!     ("LITTER_MOIST".to_string(), vec![0.5]),
//!     ("SOIL_MOIST".to_string(), vec![0.5]),
//!     ("LITTER_INPUT".to_string(), vec![10.0]),
//! ]);
//!
//! let (rh, cpools) = soilc::run(&params, &forcing).unwrap();
//! assert_eq!(rh.len(), 1);
//! assert_eq!(cpools.len(), 2);
//! assert!((cpools[1].litter() - 62.0).abs() < 1e-10);
//! ```

pub use soilc_components::components::{StepFluxes, TwoPoolDecomposition};
pub use soilc_components::parameters::TwoPoolParameters;
pub use soilc_components::results::DecompositionResults;
pub use soilc_core::errors::{SoilCError, SoilCResult};
pub use soilc_core::forcing::{ForcingData, ForcingRecord};
pub use soilc_core::pools::{CarbonPool, PoolSlice};
pub use soilc_core::FloatValue;

use std::collections::HashMap;

#[cfg(feature = "python")]
pub mod python;

/// Run the two-pool model from named parameters and named forcing columns.
///
/// # Returns
///
/// `(Rh, Cpools)`: `N` respiration entries and `N + 1` pool states for `N`
/// forcing rows.
///
/// # Errors
///
/// Fails if a parameter or forcing column is missing, if forcing columns differ
/// in length, or if `npools` is not 2.
pub fn run(
    params: &HashMap<String, FloatValue>,
    forcing: &HashMap<String, Vec<FloatValue>>,
) -> SoilCResult<(Vec<PoolSlice>, Vec<PoolSlice>)> {
    let parameters = TwoPoolParameters::from_map(params)?;
    let forcing = ForcingData::from_columns(forcing)?;
    Ok(TwoPoolDecomposition::from_parameters(parameters)
        .run(&forcing)
        .into_parts())
}
