//! Transition hooks for observability.
//!
//! The engine is a pure function, so diagnostics leave it through an
//! observer rather than through its return value. Every call reports the
//! regime it selected, and a malformed input is reported before the engine
//! falls back to the unchanged state.
//!
//! ## Example
//!
//! ```rust
//! use boxpush_core::{Action, BoardGeometry, Cell, TransitionEngine, TracingHook, WorldState};
//!
//! let board = BoardGeometry::new(3, 3).with_boxes(vec![Cell::new(1, 1)]);
//! let hook = TracingHook;
//! let engine = TransitionEngine::new(&board).with_hook(&hook);
//! let state = WorldState::initial(&board, Cell::new(0, 0), Cell::new(2, 2));
//! let dist = engine.transition(&state, Action::Stay, Action::Stay);
//! assert_eq!(dist.len(), 1);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::action::JointAction;
use crate::error::TransitionError;
use crate::regime::Regime;
use crate::state::WorldState;

/// Observer for transition engine events.
///
/// All methods default to no-ops.
pub trait TransitionHook: Send + Sync {
    /// Called once per well-formed call, after classification.
    fn on_regime(&self, _state: &WorldState, _regime: Regime, _joint: JointAction) {}

    /// Called when the input state cannot be advanced; the engine then
    /// returns the unchanged state with probability 1.
    fn on_malformed(&self, _state: &WorldState, _error: &TransitionError) {}
}

/// Ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHook;

impl TransitionHook for NullHook {}

/// Forwards events to `tracing`: regimes at `trace`, malformed states at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHook;

impl TransitionHook for TracingHook {
    fn on_regime(&self, state: &WorldState, regime: Regime, joint: JointAction) {
        tracing::trace!(%regime, %joint, %state, "classified transition");
    }

    fn on_malformed(&self, state: &WorldState, error: &TransitionError) {
        tracing::warn!(%error, %state, "malformed state, holding position");
    }
}

/// Counts malformed inputs. Useful when sweeping whole state spaces, where
/// unreachable states are expected.
#[derive(Debug, Default)]
pub struct MalformedCounter {
    count: AtomicUsize,
}

impl MalformedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

impl TransitionHook for MalformedCounter {
    fn on_malformed(&self, _state: &WorldState, _error: &TransitionError) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}

/// Delegates to several hooks in order.
#[derive(Default)]
pub struct CompositeHook<'a> {
    hooks: Vec<&'a dyn TransitionHook>,
}

impl<'a> CompositeHook<'a> {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    pub fn with(mut self, hook: &'a dyn TransitionHook) -> Self {
        self.hooks.push(hook);
        self
    }
}

impl TransitionHook for CompositeHook<'_> {
    fn on_regime(&self, state: &WorldState, regime: Regime, joint: JointAction) {
        for hook in &self.hooks {
            hook.on_regime(state, regime, joint);
        }
    }

    fn on_malformed(&self, state: &WorldState, error: &TransitionError) {
        for hook in &self.hooks {
            hook.on_malformed(state, error);
        }
    }
}
