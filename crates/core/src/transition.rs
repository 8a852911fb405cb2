//! The stochastic transition engine.
//!
//! Given the board, the current [`WorldState`] and both agents' actions, the
//! engine lists every possible next state with its probability. Each call is a
//! pure function of its inputs: no state survives between calls, and the
//! caller's `WorldState` is only ever read.
//!
//! The rule set depends on the holding [`Regime`]:
//!
//! ```text
//!              classify(state)
//!                    │
//!    ┌───────┬───────┼─────────┬──────────┐
//!    ▼       ▼       ▼         ▼          ▼
//!  Alone    Both    Each    A1Only     A2Only
//!  (det.)  (tug)  (P_MOVE)  (P_MOVE)  (mirror of A1Only)
//! ```

use crate::action::{Action, JointAction};
use crate::board::BoardGeometry;
use crate::error::TransitionError;
use crate::hooks::{TracingHook, TransitionHook};
use crate::movement::{resolve_move, Blocking};
use crate::outcome::OutcomeDistribution;
use crate::regime::Regime;
use crate::state::{BoxHoldState, Cell, WorldState};

/// Compute the distribution over next states.
///
/// Shorthand for `TransitionEngine::new(board).transition(state, a1, a2)`;
/// malformed states are reported through [`TracingHook`].
///
/// # Example
///
/// ```rust
/// use boxpush_core::{transition, Action, BoardGeometry, BoxHoldState, Cell, WorldState};
///
/// let board = BoardGeometry::new(5, 5).with_boxes(vec![Cell::new(2, 2)]);
/// let state = WorldState::initial(&board, Cell::new(2, 2), Cell::new(2, 2));
///
/// let dist = transition(&board, &state, Action::Hold, Action::Hold);
/// assert_eq!(dist.len(), 1);
/// assert_eq!(dist.outcomes()[0].state.boxes[0], BoxHoldState::WithBoth);
/// ```
pub fn transition(
    board: &BoardGeometry,
    state: &WorldState,
    a1: Action,
    a2: Action,
) -> OutcomeDistribution {
    TransitionEngine::new(board).transition(state, a1, a2)
}

/// Where a carrying agent ends up if its attempt succeeds, and how likely that is.
#[derive(Debug, Clone, Copy)]
struct Attempt {
    target: Cell,
    p_success: f64,
}

/// Transition engine bound to one board.
///
/// Cheap to construct; holds only borrows. `Send + Sync`, so a single engine
/// can serve many threads.
#[derive(Clone, Copy)]
pub struct TransitionEngine<'a> {
    board: &'a BoardGeometry,
    hook: &'a dyn TransitionHook,
}

impl<'a> TransitionEngine<'a> {
    /// An engine reporting through [`TracingHook`].
    pub fn new(board: &'a BoardGeometry) -> Self {
        Self {
            board,
            hook: &TracingHook,
        }
    }

    /// Replace the diagnostics hook.
    pub fn with_hook(mut self, hook: &'a dyn TransitionHook) -> Self {
        self.hook = hook;
        self
    }

    pub fn board(&self) -> &'a BoardGeometry {
        self.board
    }

    /// Distribution over next states. Never fails.
    ///
    /// A malformed `state` is passed to the hook's
    /// [`on_malformed`](TransitionHook::on_malformed) and yields the unchanged
    /// state with probability 1.
    pub fn transition(&self, state: &WorldState, a1: Action, a2: Action) -> OutcomeDistribution {
        match self.try_transition(state, a1, a2) {
            Ok(dist) => dist,
            Err(error) => {
                self.hook.on_malformed(state, &error);
                OutcomeDistribution::certain(state.clone())
            }
        }
    }

    /// Distribution over next states, or the reason `state` cannot be advanced.
    ///
    /// # Errors
    ///
    /// - [`TransitionError::InvalidMoveProbability`] if the board's `p_move` is not in `(0, 1]`
    /// - [`TransitionError::BoxCountMismatch`] if the state and board disagree on box count
    /// - [`TransitionError::AgentOutOfBounds`] if an agent is off the grid or in a wall
    /// - [`TransitionError::MalformedState`] if the holding states conflict
    pub fn try_transition(
        &self,
        state: &WorldState,
        a1: Action,
        a2: Action,
    ) -> Result<OutcomeDistribution, TransitionError> {
        self.check_shape(state)?;
        let regime = Regime::classify(state)?;
        self.hook.on_regime(state, regime, JointAction::new(a1, a2));

        let dist = match regime {
            Regime::Alone => self.alone(state, a1, a2),
            Regime::Both(held) => self.both(state, held, a1, a2)?,
            Regime::Each { a1: b1, a2: b2 } => self.each(state, b1, b2, a1, a2),
            Regime::A1Only(held) => self.a1_only(state, held, a1, a2),
            Regime::A2Only(held) => self.a1_only(&state.mirrored(), held, a2, a1).mirrored(),
        };
        debug_assert!(dist.is_normalized(), "unnormalized outcome: {dist:?}");
        Ok(dist)
    }

    fn check_shape(&self, state: &WorldState) -> Result<(), TransitionError> {
        let p = self.board.p_move;
        if !(p > 0.0 && p <= 1.0) {
            return Err(TransitionError::InvalidMoveProbability { p });
        }
        if state.boxes.len() != self.board.boxes.len() {
            return Err(TransitionError::BoxCountMismatch {
                expected: self.board.boxes.len(),
                got: state.boxes.len(),
            });
        }
        for (agent, cell) in [(1, state.a1), (2, state.a2)] {
            if !self.board.is_open(cell) {
                return Err(TransitionError::AgentOutOfBounds { agent, cell });
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Alone: nobody carries anything. Fully deterministic.
    // ------------------------------------------------------------------

    fn alone(&self, s: &WorldState, a1: Action, a2: Action) -> OutcomeDistribution {
        if a1 == Action::Hold && a2 == Action::Hold && s.a1 == s.a2 {
            let next = match self.board.movable_box_at(s.a1, s) {
                Some(idx) => s.with_box(idx, BoxHoldState::WithBoth),
                None => s.clone(),
            };
            return OutcomeDistribution::certain(next);
        }

        let mut boxes = s.boxes.clone();
        let a1_next = self.free_agent(s, s.a1, a1, BoxHoldState::WithAgent1, &mut boxes);
        let a2_next = self.free_agent(s, s.a2, a2, BoxHoldState::WithAgent2, &mut boxes);
        OutcomeDistribution::certain(WorldState::new(boxes, a1_next, a2_next))
    }

    /// An empty-handed agent: `Hold` picks up whatever box is underfoot,
    /// anything else moves deterministically through boxes.
    fn free_agent(
        &self,
        s: &WorldState,
        pos: Cell,
        action: Action,
        carrier: BoxHoldState,
        boxes: &mut [BoxHoldState],
    ) -> Cell {
        if action == Action::Hold {
            if let Some(idx) = self.board.movable_box_at(pos, s) {
                boxes[idx] = carrier;
            }
            return pos;
        }
        resolve_move(pos, action, self.board, Blocking::Ignore)
    }

    // ------------------------------------------------------------------
    // Both: one box carried jointly, agents share a cell.
    // ------------------------------------------------------------------

    fn both(
        &self,
        s: &WorldState,
        held: usize,
        a1: Action,
        a2: Action,
    ) -> Result<OutcomeDistribution, TransitionError> {
        if s.a1 != s.a2 {
            return Err(TransitionError::MalformedState {
                reason: format!(
                    "box {held} is carried jointly but agents stand at {} and {}",
                    s.a1, s.a2
                ),
            });
        }
        let pos = s.a1;
        let mut dist = OutcomeDistribution::new();

        match (a1 == Action::Unhold, a2 == Action::Unhold) {
            (true, true) => match self.board.resting_state_at(pos) {
                Some(rest) => dist.push(1.0, s.with_box(held, rest)),
                // Nowhere to put it: whoever grabs it first keeps it.
                None => {
                    dist.push(0.5, s.with_box(held, BoxHoldState::WithAgent1));
                    dist.push(0.5, s.with_box(held, BoxHoldState::WithAgent2));
                }
            },
            (true, false) => {
                let handed = s.with_box(held, BoxHoldState::WithAgent2);
                let target = resolve_move(pos, a2, self.board, Blocking::Boxes(s));
                self.push_attempt(&mut dist, handed.with_positions(pos, target), handed);
            }
            (false, true) => {
                let handed = s.with_box(held, BoxHoldState::WithAgent1);
                let target = resolve_move(pos, a1, self.board, Blocking::Boxes(s));
                self.push_attempt(&mut dist, handed.with_positions(target, pos), handed);
            }
            (false, false) => {
                if a1.is_opposite(a2) || (a1 == Action::Stay && a2 == Action::Stay) {
                    dist.push(1.0, s.clone());
                } else if a1 == a2 {
                    let target = resolve_move(pos, a1, self.board, Blocking::Boxes(s));
                    dist.push(1.0, s.with_positions(target, target));
                } else {
                    // Tug of war: each agent's direction wins half the time.
                    let t1 = resolve_move(pos, a1, self.board, Blocking::Boxes(s));
                    let t2 = resolve_move(pos, a2, self.board, Blocking::Boxes(s));
                    dist.push(0.5, s.with_positions(t1, t1));
                    dist.push(0.5, s.with_positions(t2, t2));
                }
            }
        }
        Ok(dist)
    }

    /// `moved` with probability `p_move`, `stayed` otherwise; a single certain
    /// outcome when the move was impossible to begin with.
    fn push_attempt(&self, dist: &mut OutcomeDistribution, moved: WorldState, stayed: WorldState) {
        if moved == stayed {
            dist.push(1.0, stayed);
        } else {
            dist.push(self.board.p_move, moved);
            dist.push(1.0 - self.board.p_move, stayed);
        }
    }

    // ------------------------------------------------------------------
    // Each: two different boxes, one per agent.
    // ------------------------------------------------------------------

    fn each(&self, s: &WorldState, b1: usize, b2: usize, a1: Action, a2: Action) -> OutcomeDistribution {
        let stationary = |a: Action| matches!(a, Action::Unhold | Action::Stay);

        if stationary(a1) || stationary(a2) {
            let mut boxes = s.boxes.clone();
            let first = self.carried_attempt(s, s.a1, a1, b1, &mut boxes);
            let second = self.carried_attempt(s, s.a2, a2, b2, &mut boxes);
            return self.independent(s, &boxes, first, second);
        }

        let first = self.carried_attempt(s, s.a1, a1, b1, &mut []);
        let second = self.carried_attempt(s, s.a2, a2, b2, &mut []);

        match s.a1.manhattan(s.a2) {
            d if d > 2 => self.independent(s, &s.boxes, first, second),
            2 if first.target == second.target => {
                // Both heading for the same cell: only one of them gets it.
                let mut dist = OutcomeDistribution::new();
                let (p1, p2) = (first.p_success, second.p_success);
                let p_both = p1 * p2;
                dist.push(p_both * 0.5, s.with_positions(first.target, s.a2));
                dist.push(p_both * 0.5, s.with_positions(s.a1, second.target));
                dist.push(p1 * (1.0 - p2), s.with_positions(first.target, s.a2));
                dist.push((1.0 - p1) * p2, s.with_positions(s.a1, second.target));
                dist.push((1.0 - p1) * (1.0 - p2), s.clone());
                dist
            }
            2 => self.independent(s, &s.boxes, first, second),
            _ => self.adjacent(s, first, second, a1, a2),
        }
    }

    /// Adjacent (or stacked) carriers. A move into the other agent's cell is
    /// blocked by that agent's box unless the other agent leaves first.
    fn adjacent(
        &self,
        s: &WorldState,
        first: Attempt,
        second: Attempt,
        a1: Action,
        a2: Action,
    ) -> OutcomeDistribution {
        let p = self.board.p_move;
        let a1_moves = first.target != s.a1;
        let a2_moves = second.target != s.a2;

        match (a1_moves, a2_moves) {
            (true, false) if resolve_move(s.a2, a2, self.board, Blocking::Ignore) == s.a1 => {
                let mut dist = OutcomeDistribution::new();
                dist.push(p * p, s.with_positions(first.target, s.a1));
                dist.push(p * (1.0 - p), s.with_positions(first.target, s.a2));
                dist.push(1.0 - p, s.clone());
                dist
            }
            (false, true) if resolve_move(s.a1, a1, self.board, Blocking::Ignore) == s.a2 => {
                let mut dist = OutcomeDistribution::new();
                dist.push(p * p, s.with_positions(s.a2, second.target));
                dist.push((1.0 - p) * p, s.with_positions(s.a1, second.target));
                dist.push(1.0 - p, s.clone());
                dist
            }
            _ => self.independent(s, &s.boxes, first, second),
        }
    }

    /// Resolve a carrier's own action. `Unhold` puts the box down if the cell
    /// allows it (writing into `boxes`) and always counts as a success; a move
    /// succeeds with `p_move` when it is legal at all.
    fn carried_attempt(
        &self,
        s: &WorldState,
        pos: Cell,
        action: Action,
        held: usize,
        boxes: &mut [BoxHoldState],
    ) -> Attempt {
        if action == Action::Unhold {
            if let (Some(rest), Some(slot)) = (self.board.resting_state_at(pos), boxes.get_mut(held)) {
                *slot = rest;
            }
            return Attempt {
                target: pos,
                p_success: 1.0,
            };
        }
        let target = resolve_move(pos, action, self.board, Blocking::Boxes(s));
        let p_success = if target != pos { self.board.p_move } else { 0.0 };
        Attempt { target, p_success }
    }

    /// Four-way product of two independent attempts.
    fn independent(
        &self,
        s: &WorldState,
        boxes: &[BoxHoldState],
        first: Attempt,
        second: Attempt,
    ) -> OutcomeDistribution {
        let (p1, p2) = (first.p_success, second.p_success);
        let next = |c1, c2| WorldState::new(boxes.to_vec(), c1, c2);
        let mut dist = OutcomeDistribution::new();
        dist.push(p1 * p2, next(first.target, second.target));
        dist.push(p1 * (1.0 - p2), next(first.target, s.a2));
        dist.push((1.0 - p1) * p2, next(s.a1, second.target));
        dist.push((1.0 - p1) * (1.0 - p2), next(s.a1, s.a2));
        dist
    }

    // ------------------------------------------------------------------
    // A1Only: agent 1 carries, agent 2 is free. A2Only runs this mirrored.
    // ------------------------------------------------------------------

    fn a1_only(&self, s: &WorldState, held: usize, a1: Action, a2: Action) -> OutcomeDistribution {
        if a2 == Action::Hold && s.a1 == s.a2 {
            let next = if a1 == Action::Unhold {
                BoxHoldState::WithAgent2
            } else {
                BoxHoldState::WithBoth
            };
            return OutcomeDistribution::certain(s.with_box(held, next));
        }

        let mut boxes = s.boxes.clone();
        let carrier = self.carried_attempt(s, s.a1, a1, held, &mut boxes);
        let a2_next = self.free_agent(s, s.a2, a2, BoxHoldState::WithAgent2, &mut boxes);

        let mut dist = OutcomeDistribution::new();
        dist.push(
            carrier.p_success,
            WorldState::new(boxes.clone(), carrier.target, a2_next),
        );
        dist.push(
            1.0 - carrier.p_success,
            WorldState::new(boxes, s.a1, a2_next),
        );
        dist
    }
}
