//! # Core - Two-Agent Box Transport Dynamics
//!
//! This crate is the stochastic transition model of a grid world where two
//! agents move boxes from their home cells to goals:
//!
//! - **Actions**: the seven primitive actions and joint actions
//! - **Board**: static geometry (walls, box homes, goals, drop spots)
//! - **State**: box holding states and agent positions
//! - **Movement**: single-step move resolution with optional box blocking
//! - **Regimes**: who is carrying what, decided once per call
//! - **Transition**: the engine that turns (state, a1, a2) into a distribution
//! - **Hooks**: diagnostics for regime selection and malformed inputs
//! - **Config**: JSON layouts
//!
//! ## Design Philosophy
//!
//! The engine is a pure function. It never mutates its input, never fails
//! on a state it can classify, and degrades to "nothing happens" on a state
//! it cannot. Everything that varies between boards (including the move
//! success probability) lives in [`BoardGeometry`].
//!
//! ## Quick Start
//!
//! ```rust
//! use boxpush_core::{layouts, transition, Action};
//!
//! let layout = layouts::open_field();
//! let board = layout.board().unwrap();
//! let state = layout.initial_state();
//!
//! let dist = transition(&board, &state, Action::Right, Action::Down);
//! assert!(dist.is_normalized());
//! ```

pub mod action;
pub mod board;
pub mod config;
pub mod error;
pub mod hooks;
pub mod movement;
pub mod outcome;
pub mod regime;
pub mod state;
pub mod transition;

// Re-export key types at crate root for convenience
pub use action::{Action, JointAction};
pub use board::{BoardGeometry, DEFAULT_P_MOVE};
pub use config::{layouts, LayoutConfig};
pub use error::{BoardError, TransitionError};
pub use hooks::{CompositeHook, MalformedCounter, NullHook, TracingHook, TransitionHook};
pub use movement::{resolve_move, Blocking};
pub use outcome::{Outcome, OutcomeDistribution};
pub use regime::Regime;
pub use state::{BoxHoldState, Cell, WorldState};
pub use transition::{transition, TransitionEngine};

/// Tolerance used when checking that probabilities sum to one.
pub const PROB_TOLERANCE: f64 = 1e-6;
