mod two_pool;

pub use two_pool::{StepFluxes, TwoPoolDecomposition};
