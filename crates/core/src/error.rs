//! # Error Types
//!
//! Two families of failure live here:
//!
//! - [`BoardError`]: a layout that cannot describe a playable board. These are
//!   raised once, when geometry is loaded, and never from the transition engine.
//! - [`TransitionError`]: a world state that violates the holding invariants.
//!   The engine never propagates these to callers of
//!   [`transition`](crate::transition()); they are reported through a
//!   [`TransitionHook`](crate::TransitionHook) and the state is left unchanged.

use thiserror::Error;

use crate::state::Cell;

/// Errors raised while building or validating board geometry.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Width or height is zero.
    #[error("Grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    /// A configured cell lies outside the grid.
    #[error("{what} at {cell} is outside the {width}x{height} grid")]
    OutOfBounds {
        what: &'static str,
        cell: Cell,
        width: usize,
        height: usize,
    },

    /// A box, goal, drop or start cell was placed on a wall.
    #[error("{what} at {cell} is placed on a wall")]
    OnWall { what: &'static str, cell: Cell },

    /// Move success probability outside `(0, 1]`.
    #[error("Move success probability must be in (0, 1], got {p}")]
    InvalidMoveProbability { p: f64 },

    /// The board has nothing to transport.
    #[error("Board must list at least one box location")]
    NoBoxes,

    /// Layout document could not be parsed.
    #[error("Failed to parse layout: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors describing a world state the engine cannot meaningfully advance.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransitionError {
    /// Holding states contradict each other, or a jointly held box has
    /// agents on different cells.
    #[error("Malformed state: {reason}")]
    MalformedState { reason: String },

    /// The state tracks a different number of boxes than the board lists.
    #[error("State tracks {got} boxes but the board lists {expected}")]
    BoxCountMismatch { expected: usize, got: usize },

    /// An agent stands outside the grid or inside a wall.
    #[error("Agent {agent} at {cell} is not on an open cell")]
    AgentOutOfBounds { agent: u8, cell: Cell },

    /// The board's move success probability is outside `(0, 1]`.
    #[error("Move success probability must be in (0, 1], got {p}")]
    InvalidMoveProbability { p: f64 },
}
