//! Error types for game operations.

use boxpush_core::BoardError;
use boxpush_prob::ProbError;
use thiserror::Error;

/// Errors that can occur in game operations.
#[derive(Debug, Error)]
pub enum GameError {
    /// Stepping an episode that has already ended.
    #[error("Environment is in terminal state")]
    TerminalState,

    /// The start state does not fit the board.
    #[error("Invalid start state: {reason}")]
    InvalidStart { reason: String },

    /// Board or layout failed validation.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// Sampling an outcome failed.
    #[error(transparent)]
    Prob(#[from] ProbError),
}
