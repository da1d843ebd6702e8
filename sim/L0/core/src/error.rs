//! Error types for collision-core construction and validation.
//!
//! None of these are produced on the per-pair hot path. View building,
//! parameter resolution and contact commit resolve every degenerate input by
//! fallback policy; only allocation and shape checks can fail.

use thiserror::Error;

/// Result type alias for collision-core operations.
pub type CollisionResult<T> = Result<T, CollisionError>;

/// Errors from collision-core construction and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CollisionError {
    /// Contact capacity must be positive.
    #[error("invalid contact capacity: {0} (must be > 0)")]
    InvalidCapacity(usize),

    /// A per-world table has a row count other than 1 or `nworld`.
    #[error("{field}: {rows} rows, expected 1 or nworld = {nworld}")]
    RowCountMismatch {
        /// Name of the offending table.
        field: &'static str,
        /// Declared row count.
        rows: usize,
        /// Number of worlds in the batch.
        nworld: usize,
    },

    /// A per-world table has the wrong number of columns.
    #[error("{field}: {cols} columns, expected {expected}")]
    ColumnCountMismatch {
        /// Name of the offending table.
        field: &'static str,
        /// Declared column count.
        cols: usize,
        /// Column count implied by the model dimensions.
        expected: usize,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },
}

impl CollisionError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
