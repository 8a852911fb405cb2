//! Box and agent state model.
//!
//! A [`WorldState`] is a plain value: the engine never mutates one in place,
//! it builds fresh states for every outcome it reports.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::BoardGeometry;

/// A grid cell. `x` grows to the right, `y` grows downward.
///
/// Serialized as a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan distance.
    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Cell> for (i32, i32) {
    fn from(cell: Cell) -> Self {
        (cell.x, cell.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Where a box is and who, if anyone, is carrying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoxHoldState {
    /// Resting on its home cell from the board's box list.
    AtOriginalSpot,
    /// Carried by agent 1 alone; located wherever agent 1 is.
    WithAgent1,
    /// Carried by agent 2 alone; located wherever agent 2 is.
    WithAgent2,
    /// Carried jointly; both agents must share a cell.
    WithBoth,
    /// Resting on the drop location with this index.
    AtDropLocation(usize),
    /// Delivered to the goal with this index. Terminal for the box.
    AtGoalLocation(usize),
}

impl BoxHoldState {
    /// Whether some agent is carrying the box.
    pub fn is_held(self) -> bool {
        matches!(
            self,
            BoxHoldState::WithAgent1 | BoxHoldState::WithAgent2 | BoxHoldState::WithBoth
        )
    }

    /// Delivered boxes never move again.
    pub fn is_terminal(self) -> bool {
        matches!(self, BoxHoldState::AtGoalLocation(_))
    }

    /// Relabel agent 1 as agent 2 and vice versa.
    pub fn mirrored(self) -> Self {
        match self {
            BoxHoldState::WithAgent1 => BoxHoldState::WithAgent2,
            BoxHoldState::WithAgent2 => BoxHoldState::WithAgent1,
            other => other,
        }
    }

    /// Every holding state a box can take on `board`: the four base states,
    /// then one per drop location, then one per goal.
    pub fn possible(board: &BoardGeometry) -> Vec<BoxHoldState> {
        let mut states = vec![
            BoxHoldState::AtOriginalSpot,
            BoxHoldState::WithAgent1,
            BoxHoldState::WithAgent2,
            BoxHoldState::WithBoth,
        ];
        states.extend((0..board.drops.len()).map(BoxHoldState::AtDropLocation));
        states.extend((0..board.goals.len()).map(BoxHoldState::AtGoalLocation));
        states
    }
}

/// Full world state: every box's holding state plus both agent positions.
///
/// Box order matches [`BoardGeometry::boxes`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldState {
    pub boxes: Vec<BoxHoldState>,
    pub a1: Cell,
    pub a2: Cell,
}

impl WorldState {
    pub fn new(boxes: Vec<BoxHoldState>, a1: Cell, a2: Cell) -> Self {
        Self { boxes, a1, a2 }
    }

    /// Episode start: every box at home, agents on their start cells.
    pub fn initial(board: &BoardGeometry, a1: Cell, a2: Cell) -> Self {
        Self {
            boxes: vec![BoxHoldState::AtOriginalSpot; board.boxes.len()],
            a1,
            a2,
        }
    }

    /// A copy with box `idx` set to `hold`.
    ///
    /// # Panics
    ///
    /// If `idx` is not a box index of this state.
    pub fn with_box(&self, idx: usize, hold: BoxHoldState) -> Self {
        let mut boxes = self.boxes.clone();
        boxes[idx] = hold;
        Self {
            boxes,
            a1: self.a1,
            a2: self.a2,
        }
    }

    /// A copy with both agents moved.
    pub fn with_positions(&self, a1: Cell, a2: Cell) -> Self {
        Self {
            boxes: self.boxes.clone(),
            a1,
            a2,
        }
    }

    /// The same world with the two agents' identities exchanged.
    pub fn mirrored(&self) -> Self {
        Self {
            boxes: self.boxes.iter().map(|b| b.mirrored()).collect(),
            a1: self.a2,
            a2: self.a1,
        }
    }

    /// Where box `idx` currently sits, if it is still on the board.
    pub fn box_location(&self, idx: usize, board: &BoardGeometry) -> Option<Cell> {
        match self.boxes.get(idx)? {
            BoxHoldState::AtOriginalSpot => board.boxes.get(idx).copied(),
            BoxHoldState::WithAgent1 | BoxHoldState::WithBoth => Some(self.a1),
            BoxHoldState::WithAgent2 => Some(self.a2),
            BoxHoldState::AtDropLocation(i) => board.drops.get(*i).copied(),
            BoxHoldState::AtGoalLocation(i) => board.goals.get(*i).copied(),
        }
    }

    /// The episode is over once every box has been delivered to a goal.
    pub fn is_terminal(&self) -> bool {
        self.boxes.iter().all(|b| b.is_terminal())
    }
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a1={} a2={} boxes={:?}", self.a1, self.a2, self.boxes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan() {
        assert_eq!(Cell::new(0, 0).manhattan(Cell::new(2, 3)), 5);
        assert_eq!(Cell::new(4, 1).manhattan(Cell::new(1, 1)), 3);
        assert_eq!(Cell::new(1, 1).manhattan(Cell::new(1, 1)), 0);
    }

    #[test]
    fn test_cell_serializes_as_pair() {
        let json = serde_json::to_string(&Cell::new(3, 4)).unwrap();
        assert_eq!(json, "[3,4]");
        let back: Cell = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(back, Cell::new(1, 2));
    }

    #[test]
    fn test_with_box_leaves_original_untouched() {
        let s = WorldState::new(
            vec![BoxHoldState::AtOriginalSpot; 2],
            Cell::new(0, 0),
            Cell::new(1, 1),
        );
        let t = s.with_box(1, BoxHoldState::WithAgent2);
        assert_eq!(s.boxes[1], BoxHoldState::AtOriginalSpot);
        assert_eq!(t.boxes[1], BoxHoldState::WithAgent2);
    }

    #[test]
    #[should_panic]
    fn test_with_box_out_of_range_panics() {
        let s = WorldState::new(vec![BoxHoldState::AtOriginalSpot], Cell::new(0, 0), Cell::new(0, 0));
        let _ = s.with_box(1, BoxHoldState::WithBoth);
    }

    #[test]
    fn test_mirror_is_involution() {
        let s = WorldState::new(
            vec![BoxHoldState::WithAgent1, BoxHoldState::AtDropLocation(0)],
            Cell::new(0, 2),
            Cell::new(3, 1),
        );
        let m = s.mirrored();
        assert_eq!(m.a1, s.a2);
        assert_eq!(m.boxes[0], BoxHoldState::WithAgent2);
        assert_eq!(m.boxes[1], BoxHoldState::AtDropLocation(0));
        assert_eq!(m.mirrored(), s);
    }

    #[test]
    fn test_possible_states_per_board() {
        let board = BoardGeometry::new(4, 4)
            .with_boxes(vec![Cell::new(1, 1)])
            .with_goals(vec![Cell::new(3, 3)])
            .with_drops(vec![Cell::new(0, 3), Cell::new(3, 0)]);
        let states = BoxHoldState::possible(&board);
        assert_eq!(states.len(), 7);
        assert_eq!(states[4], BoxHoldState::AtDropLocation(0));
        assert_eq!(states[6], BoxHoldState::AtGoalLocation(0));
    }

    #[test]
    fn test_terminal_only_when_all_delivered() {
        let s = WorldState::new(
            vec![BoxHoldState::AtGoalLocation(0), BoxHoldState::AtDropLocation(0)],
            Cell::new(0, 0),
            Cell::new(0, 0),
        );
        assert!(!s.is_terminal());
        assert!(s.with_box(1, BoxHoldState::AtGoalLocation(0)).is_terminal());
    }
}
