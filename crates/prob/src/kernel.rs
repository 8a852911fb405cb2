//! Tabular transition model.
//!
//! A [`TransitionTable`] is the engine evaluated once per
//! `(state index, action index)` pair, with probability mass accumulated per
//! destination index. Rows are sparse: a transition has at most a handful of
//! outcomes, while a state space easily has tens of thousands of states.

use boxpush_core::{BoardGeometry, MalformedCounter, TransitionEngine};

use crate::dist::Dist;
use crate::error::ProbError;
use crate::index::{ActionSpace, StateSpace};
use crate::PROB_TOLERANCE;

/// `P(next | state, action)` for every indexed state and joint action.
///
/// # Example
///
/// ```rust
/// use boxpush_core::{layouts, Action, JointAction};
/// use boxpush_prob::{ActionSpace, StateSpace, TransitionTable};
///
/// let board = layouts::open_field().board().unwrap();
/// let states = StateSpace::new(&board).unwrap();
/// let table = TransitionTable::build(&board, &states, &ActionSpace).unwrap();
/// table.validate().unwrap();
///
/// let stay = ActionSpace.joint_to_index(JointAction::new(Action::Stay, Action::Stay));
/// assert_eq!(table.row(0, stay).unwrap(), &[(0, 1.0)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTable {
    /// `rows[s * n_actions + a]`, sorted by destination.
    rows: Vec<Vec<(usize, f64)>>,
    n_states: usize,
    n_actions: usize,
    malformed: usize,
}

impl TransitionTable {
    /// Evaluate the engine over the whole product space.
    ///
    /// # Errors
    ///
    /// [`ProbError::StateNotInSpace`] if the engine ever produces a state the
    /// space cannot encode.
    pub fn build(
        board: &BoardGeometry,
        states: &StateSpace,
        actions: &ActionSpace,
    ) -> Result<Self, ProbError> {
        let counter = MalformedCounter::new();
        let engine = TransitionEngine::new(board).with_hook(&counter);
        let n_states = states.len();
        let n_actions = actions.len();

        let mut rows = Vec::with_capacity(n_states * n_actions);
        for (s_idx, state) in states.iter().enumerate() {
            for joint in actions.iter() {
                let dist = engine.transition(&state, joint.a1, joint.a2);
                let mut row: Vec<(usize, f64)> = Vec::with_capacity(dist.len());
                for outcome in &dist {
                    let next = states.state_to_index(&outcome.state)?;
                    match row.iter_mut().find(|(idx, _)| *idx == next) {
                        Some((_, p)) => *p += outcome.prob,
                        None => row.push((next, outcome.prob)),
                    }
                }
                row.sort_by_key(|&(idx, _)| idx);
                rows.push(row);
            }
            if s_idx % 10_000 == 0 {
                tracing::trace!(s_idx, n_states, "building transition table");
            }
        }

        // Each malformed state is reported once per joint action.
        let malformed = counter.count() / n_actions;
        tracing::debug!(n_states, n_actions, malformed, "transition table built");

        Ok(Self {
            rows,
            n_states,
            n_actions,
            malformed,
        })
    }

    pub fn num_states(&self) -> usize {
        self.n_states
    }

    pub fn num_actions(&self) -> usize {
        self.n_actions
    }

    /// Number of indexed states the engine rejected as malformed. Their rows
    /// are self-loops.
    pub fn malformed_states(&self) -> usize {
        self.malformed
    }

    /// Sparse `(next, probability)` pairs for one state and action.
    pub fn row(&self, state: usize, action: usize) -> Result<&[(usize, f64)], ProbError> {
        if state >= self.n_states {
            return Err(ProbError::IndexOutOfBounds {
                index: state,
                size: self.n_states,
            });
        }
        if action >= self.n_actions {
            return Err(ProbError::IndexOutOfBounds {
                index: action,
                size: self.n_actions,
            });
        }
        Ok(&self.rows[state * self.n_actions + action])
    }

    /// `P(next | state, action)`, zero when `next` is not in the row.
    pub fn conditional(&self, state: usize, action: usize, next: usize) -> Result<f64, ProbError> {
        let row = self.row(state, action)?;
        Ok(row
            .binary_search_by_key(&next, |&(idx, _)| idx)
            .map_or(0.0, |pos| row[pos].1))
    }

    /// Check that every row is a probability distribution.
    pub fn validate(&self) -> Result<(), ProbError> {
        for (i, row) in self.rows.iter().enumerate() {
            let (state, action) = (i / self.n_actions, i % self.n_actions);
            if row.iter().any(|&(_, p)| p < 0.0) {
                return Err(ProbError::NegativeProbability);
            }
            let sum: f64 = row.iter().map(|&(_, p)| p).sum();
            if (sum - 1.0).abs() > PROB_TOLERANCE {
                return Err(ProbError::RowNotNormalized { state, action, sum });
            }
        }
        Ok(())
    }

    /// Push a distribution over states through one step under a fixed action.
    pub fn apply(&self, dist: &Dist, action: usize) -> Result<Dist, ProbError> {
        if dist.len() != self.n_states {
            return Err(ProbError::ShapeMismatch {
                expected: self.n_states,
                got: dist.len(),
            });
        }

        let mut out = vec![0.0; self.n_states];
        for (state, &mass) in dist.p.iter().enumerate() {
            if mass <= 0.0 {
                continue;
            }
            for &(next, p) in self.row(state, action)? {
                out[next] += mass * p;
            }
        }
        Dist::new(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxpush_core::{Action, BoxHoldState, Cell, JointAction, WorldState};

    fn corridor() -> BoardGeometry {
        BoardGeometry::new(3, 1)
            .with_boxes(vec![Cell::new(1, 0)])
            .with_goals(vec![Cell::new(2, 0)])
    }

    fn joint(a1: Action, a2: Action) -> usize {
        ActionSpace.joint_to_index(JointAction::new(a1, a2))
    }

    #[test]
    fn test_table_dimensions() {
        let board = corridor();
        let states = StateSpace::new(&board).unwrap();
        let table = TransitionTable::build(&board, &states, &ActionSpace).unwrap();
        // 3 cells, 5 hold states, 1 box
        assert_eq!(table.num_states(), 3 * 3 * 5);
        assert_eq!(table.num_actions(), 49);
        table.validate().unwrap();
    }

    #[test]
    fn test_row_matches_engine() {
        let board = corridor();
        let states = StateSpace::new(&board).unwrap();
        let table = TransitionTable::build(&board, &states, &ActionSpace).unwrap();

        let start = WorldState::new(vec![BoxHoldState::WithAgent1], Cell::new(1, 0), Cell::new(0, 0));
        let moved = start.with_positions(Cell::new(2, 0), Cell::new(0, 0));
        let s = states.state_to_index(&start).unwrap();
        let a = joint(Action::Right, Action::Stay);

        let p_moved = table.conditional(s, a, states.state_to_index(&moved).unwrap()).unwrap();
        let p_stayed = table.conditional(s, a, s).unwrap();
        assert!((p_moved - 0.7).abs() < 1e-9);
        assert!((p_stayed - 0.3).abs() < 1e-9);
        assert_eq!(table.row(s, a).unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_states_are_counted() {
        let board = corridor();
        let states = StateSpace::new(&board).unwrap();
        let table = TransitionTable::build(&board, &states, &ActionSpace).unwrap();
        // WithBoth with agents on different cells: 3 * 3 - 3 = 6 states.
        assert_eq!(table.malformed_states(), 6);
    }

    #[test]
    fn test_apply_point_mass() {
        let board = corridor();
        let states = StateSpace::new(&board).unwrap();
        let table = TransitionTable::build(&board, &states, &ActionSpace).unwrap();

        let start = WorldState::new(vec![BoxHoldState::WithAgent1], Cell::new(1, 0), Cell::new(0, 0));
        let s = states.state_to_index(&start).unwrap();
        let d = Dist::point(states.len(), s).unwrap();
        let next = table.apply(&d, joint(Action::Right, Action::Stay)).unwrap();
        assert_eq!(next.support_size(), 2);
        assert!((next.p[s] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_row() {
        let board = corridor();
        let states = StateSpace::new(&board).unwrap();
        let table = TransitionTable::build(&board, &states, &ActionSpace).unwrap();
        assert!(table.row(states.len(), 0).is_err());
        assert!(table.row(0, 49).is_err());
    }
}
