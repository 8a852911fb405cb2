//! Integer indexing of world states and joint actions.
//!
//! Tabular planners want `0..n` instead of structured values. A
//! [`StateSpace`] is the mixed-radix product
//!
//! ```text
//! a1 cell × a2 cell × hold(box 0) × ... × hold(box n-1)
//! ```
//!
//! with the first factor varying slowest. Cells are the board's open cells in
//! row-major order; holds are [`BoxHoldState::possible`]. Many encoded states
//! are unreachable or malformed; they are still valid indices.

use std::collections::HashMap;

use boxpush_core::{Action, BoardGeometry, BoxHoldState, Cell, JointAction, WorldState};

use crate::error::ProbError;

/// Every world state of one board, numbered.
#[derive(Debug, Clone)]
pub struct StateSpace {
    cells: Vec<Cell>,
    cell_index: HashMap<Cell, usize>,
    holds: Vec<BoxHoldState>,
    hold_index: HashMap<BoxHoldState, usize>,
    n_boxes: usize,
    len: usize,
}

impl StateSpace {
    /// # Errors
    ///
    /// [`ProbError::EmptySpace`] if the board has no open cell.
    pub fn new(board: &BoardGeometry) -> Result<Self, ProbError> {
        let cells = board.open_cells();
        if cells.is_empty() {
            return Err(ProbError::EmptySpace);
        }
        let holds = BoxHoldState::possible(board);
        let n_boxes = board.boxes.len();

        let len = cells.len() * cells.len() * holds.len().pow(n_boxes as u32);
        let cell_index = cells.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        let hold_index = holds.iter().enumerate().map(|(i, &h)| (h, i)).collect();

        Ok(Self {
            cells,
            cell_index,
            holds,
            hold_index,
            n_boxes,
            len,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Encode a state.
    ///
    /// # Errors
    ///
    /// [`ProbError::StateNotInSpace`] for a wrong box count, an agent off the
    /// open cells, or a holding state this board cannot have.
    pub fn state_to_index(&self, state: &WorldState) -> Result<usize, ProbError> {
        if state.boxes.len() != self.n_boxes {
            return Err(ProbError::StateNotInSpace {
                reason: format!("expected {} boxes, got {}", self.n_boxes, state.boxes.len()),
            });
        }

        let mut idx = self.cell_digit(state.a1)?;
        idx = idx * self.cells.len() + self.cell_digit(state.a2)?;
        for hold in &state.boxes {
            let digit = self
                .hold_index
                .get(hold)
                .ok_or_else(|| ProbError::StateNotInSpace {
                    reason: format!("hold state {hold:?} does not exist on this board"),
                })?;
            idx = idx * self.holds.len() + digit;
        }
        Ok(idx)
    }

    /// Decode an index.
    ///
    /// # Errors
    ///
    /// [`ProbError::IndexOutOfBounds`] if `idx >= len()`.
    pub fn index_to_state(&self, idx: usize) -> Result<WorldState, ProbError> {
        if idx >= self.len {
            return Err(ProbError::IndexOutOfBounds {
                index: idx,
                size: self.len,
            });
        }

        let mut rest = idx;
        let mut boxes = vec![BoxHoldState::AtOriginalSpot; self.n_boxes];
        for slot in boxes.iter_mut().rev() {
            *slot = self.holds[rest % self.holds.len()];
            rest /= self.holds.len();
        }
        let a2 = self.cells[rest % self.cells.len()];
        let a1 = self.cells[rest / self.cells.len()];
        Ok(WorldState::new(boxes, a1, a2))
    }

    /// Every state in index order.
    pub fn iter(&self) -> impl Iterator<Item = WorldState> + '_ {
        (0..self.len).filter_map(move |i| self.index_to_state(i).ok())
    }

    fn cell_digit(&self, cell: Cell) -> Result<usize, ProbError> {
        self.cell_index
            .get(&cell)
            .copied()
            .ok_or_else(|| ProbError::StateNotInSpace {
                reason: format!("agent cell {cell} is not an open cell"),
            })
    }
}

/// The 49 joint actions, agent 1's action varying slowest.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionSpace;

impl ActionSpace {
    pub const LEN: usize = Action::ALL.len() * Action::ALL.len();

    pub fn len(&self) -> usize {
        Self::LEN
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn joint_to_index(&self, joint: JointAction) -> usize {
        action_digit(joint.a1) * Action::ALL.len() + action_digit(joint.a2)
    }

    pub fn index_to_joint(&self, idx: usize) -> Result<JointAction, ProbError> {
        if idx >= Self::LEN {
            return Err(ProbError::IndexOutOfBounds {
                index: idx,
                size: Self::LEN,
            });
        }
        let n = Action::ALL.len();
        Ok(JointAction::new(Action::ALL[idx / n], Action::ALL[idx % n]))
    }

    pub fn iter(&self) -> impl Iterator<Item = JointAction> {
        JointAction::all()
    }
}

fn action_digit(action: Action) -> usize {
    match action {
        Action::Up => 0,
        Action::Down => 1,
        Action::Left => 2,
        Action::Right => 3,
        Action::Stay => 4,
        Action::Hold => 5,
        Action::Unhold => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> BoardGeometry {
        BoardGeometry::new(3, 3)
            .with_walls(vec![Cell::new(1, 0)])
            .with_boxes(vec![Cell::new(0, 0), Cell::new(2, 2)])
            .with_goals(vec![Cell::new(2, 0)])
            .with_drops(vec![Cell::new(0, 2)])
    }

    #[test]
    fn test_state_space_size() {
        let space = StateSpace::new(&board()).unwrap();
        // 8 open cells, 6 hold states, 2 boxes
        assert_eq!(space.len(), 8 * 8 * 6 * 6);
        assert_eq!(space.cells().len(), 8);
    }

    #[test]
    fn test_index_order_first_factor_slowest() {
        let space = StateSpace::new(&board()).unwrap();
        let first = space.index_to_state(0).unwrap();
        let second = space.index_to_state(1).unwrap();
        assert_eq!(first.a1, second.a1);
        assert_eq!(first.a2, second.a2);
        assert_eq!(first.boxes[0], second.boxes[0]);
        assert_ne!(first.boxes[1], second.boxes[1]);

        let last = space.index_to_state(space.len() - 1).unwrap();
        assert_eq!(last.a1, Cell::new(2, 2));
    }

    #[test]
    fn test_every_index_decodes_back() {
        let space = StateSpace::new(&board()).unwrap();
        for (i, state) in space.iter().enumerate() {
            assert_eq!(space.state_to_index(&state).unwrap(), i);
        }
    }

    #[test]
    fn test_foreign_state_rejected() {
        let space = StateSpace::new(&board()).unwrap();
        let on_wall = WorldState::initial(&board(), Cell::new(1, 0), Cell::new(0, 0));
        assert!(matches!(
            space.state_to_index(&on_wall),
            Err(ProbError::StateNotInSpace { .. })
        ));
        let bad_drop = WorldState::new(
            vec![BoxHoldState::AtDropLocation(3), BoxHoldState::AtOriginalSpot],
            Cell::new(0, 0),
            Cell::new(0, 0),
        );
        assert!(space.state_to_index(&bad_drop).is_err());
        assert!(space.index_to_state(space.len()).is_err());
    }

    #[test]
    fn test_action_space_roundtrip() {
        let actions = ActionSpace;
        assert_eq!(actions.len(), 49);
        for (i, joint) in actions.iter().enumerate() {
            assert_eq!(actions.joint_to_index(joint), i);
            assert_eq!(actions.index_to_joint(i).unwrap(), joint);
        }
        assert!(actions.index_to_joint(49).is_err());
    }
}
