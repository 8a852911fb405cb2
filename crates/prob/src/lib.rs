//! # Prob - Distributions and Tabular Models for Box Transport
//!
//! This crate turns the structured transition engine of `boxpush-core` into
//! the finite objects that samplers and tabular planners work with.
//!
//! ## Core Concepts
//!
//! - **Finite distributions**: [`Dist`] over `0..n`, sampled by inverse transform
//! - **Indexing**: [`StateSpace`] numbers every world state of a board,
//!   [`ActionSpace`] numbers the 49 joint actions
//! - **Transition tables**: [`TransitionTable`] stores `P(next | state, action)`
//!   as sparse row-stochastic rows
//!
//! ## Example
//!
//! ```rust
//! use boxpush_core::{transition, Action, BoardGeometry, Cell, WorldState};
//! use boxpush_prob::Dist;
//!
//! let board = BoardGeometry::new(4, 4).with_boxes(vec![Cell::new(1, 1)]);
//! let state = WorldState::initial(&board, Cell::new(1, 1), Cell::new(3, 3));
//! let outcomes = transition(&board, &state, Action::Hold, Action::Left);
//!
//! let weights = Dist::from_weights(outcomes.iter().map(|o| o.prob).collect()).unwrap();
//! let picked = &outcomes.outcomes()[weights.sample(0.5)];
//! assert_eq!(picked.state.a2, Cell::new(2, 3));
//! ```

mod dist;
mod error;
mod index;
mod kernel;

pub use dist::Dist;
pub use error::ProbError;
pub use index::{ActionSpace, StateSpace};
pub use kernel::TransitionTable;

/// Tolerance for probability comparisons.
pub use boxpush_core::PROB_TOLERANCE;
