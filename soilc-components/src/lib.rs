//! Soil carbon decomposition components
//!
//! # Module Organisation
//!
//! - `components`: the two-pool (litter, soil) decomposition model
//! - `parameters`: parameter structs, loadable from TOML or a name to value map
//! - `response`: temperature and moisture response functions
//! - `results`: pool and respiration time series returned by a run

pub mod components;
pub mod parameters;
pub mod response;
pub mod results;
