//! Error types for probability and indexing operations.

use thiserror::Error;

/// Errors that can occur in probability computations.
#[derive(Debug, Clone, Error)]
pub enum ProbError {
    /// Distribution doesn't sum to 1.
    #[error("Distribution not normalized: sum = {sum} (expected 1.0)")]
    NotNormalized { sum: f64 },

    /// Negative probability encountered.
    #[error("Negative probability encountered")]
    NegativeProbability,

    /// All weights are zero (can't normalize).
    #[error("Cannot normalize: all weights are zero")]
    ZeroWeights,

    /// Empty distribution.
    #[error("Distribution cannot be empty")]
    EmptyDistribution,

    /// A transition table row doesn't sum to 1.
    #[error("Row (state {state}, action {action}) not normalized: sum = {sum} (expected 1.0)")]
    RowNotNormalized { state: usize, action: usize, sum: f64 },

    /// Shape mismatch between a distribution and a table.
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// Index out of bounds.
    #[error("Index {index} out of bounds for size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    /// A world state that the state space cannot encode.
    #[error("State not in space: {reason}")]
    StateNotInSpace { reason: String },

    /// The board has no open cell to stand on.
    #[error("State space is empty")]
    EmptySpace,
}
