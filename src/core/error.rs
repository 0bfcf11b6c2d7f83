//! Error types for car park operations.

use thiserror::Error;

/// Errors produced by the pool, its process roles and the simulation driver.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The gate and the slot table disagree about how many bays are free.
    ///
    /// This is fatal: the pool is desynchronized and must not be used again.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Reading monitor input failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Internal failure (worker thread panic, runtime join error).
    #[error("internal error: {0}")]
    Internal(String),
}

impl PoolError {
    /// Whether the error means the pool can no longer be trusted.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation(_) | Self::Internal(_))
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
