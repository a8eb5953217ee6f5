//! Core types shared by soil carbon decomposition components.
//!
//! - [`pools`]: typed litter/soil value pairs
//! - [`forcing`]: ordered environmental driver series
//! - [`errors`]: the crate-wide error type

pub mod errors;
pub mod forcing;
pub mod pools;

/// Floating point type used throughout the model.
pub type FloatValue = f64;
