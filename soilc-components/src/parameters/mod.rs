//! Component parameters
//!
//! Parameter structures deserialise from TOML parameter files and can also be
//! looked up from a name to value mapping.

mod two_pool;

pub use two_pool::TwoPoolParameters;
