use thiserror::Error;

/// Error type for invalid inputs to a decomposition model.
#[derive(Error, Debug)]
pub enum SoilCError {
    #[error("Missing parameter: {0}")]
    MissingParameter(String),
    #[error("Missing forcing column: {0}")]
    MissingForcingColumn(String),
    #[error("Forcing column {column} has {found} values, expected {expected}")]
    ForcingLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
    #[error("Only two carbon pools are supported, got npools={0}")]
    UnsupportedPoolCount(f64),
    #[error("Invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: String,
        value: f64,
        reason: String,
    },
    #[error("Inconsistent results: {pool_states} pool states for {steps} steps")]
    InconsistentResults { pool_states: usize, steps: usize },
    #[error("Failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type for `Result<T, SoilCError>`.
pub type SoilCResult<T> = Result<T, SoilCError>;
