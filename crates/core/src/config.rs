//! # Layout Configuration
//!
//! A layout is a JSON document describing the board plus where the agents
//! start:
//!
//! ```json
//! {
//!   "width": 5, "height": 4,
//!   "walls": [[2, 1]],
//!   "boxes": [[1, 1], [3, 2]],
//!   "goals": [[4, 3]],
//!   "drops": [[0, 3]],
//!   "p_move": 0.7,
//!   "a1_start": [0, 0],
//!   "a2_start": [4, 0]
//! }
//! ```
//!
//! `walls`, `goals`, `drops` and `p_move` may be omitted. Validation happens
//! here, once, so the transition engine can assume a well-formed board.

use serde::{Deserialize, Serialize};

use crate::board::BoardGeometry;
use crate::error::BoardError;
use crate::state::{Cell, WorldState};

/// Board geometry plus agent start cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(flatten)]
    pub board: BoardGeometry,
    pub a1_start: Cell,
    pub a2_start: Cell,
}

impl LayoutConfig {
    pub fn new(board: BoardGeometry, a1_start: Cell, a2_start: Cell) -> Self {
        Self {
            board,
            a1_start,
            a2_start,
        }
    }

    /// Parse and validate a layout document.
    ///
    /// # Errors
    ///
    /// [`BoardError::Parse`] for malformed JSON, otherwise whatever
    /// [`validate`](Self::validate) reports.
    pub fn from_json_str(json: &str) -> Result<Self, BoardError> {
        let config: LayoutConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, BoardError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Board checks plus both start cells being open.
    pub fn validate(&self) -> Result<(), BoardError> {
        self.board.validate()?;
        self.board.check_open("agent 1 start", self.a1_start)?;
        self.board.check_open("agent 2 start", self.a2_start)?;
        Ok(())
    }

    /// A validated copy of the geometry.
    pub fn board(&self) -> Result<BoardGeometry, BoardError> {
        self.validate()?;
        Ok(self.board.clone())
    }

    /// Every box at home, agents on their start cells.
    pub fn initial_state(&self) -> WorldState {
        WorldState::initial(&self.board, self.a1_start, self.a2_start)
    }
}

/// Built-in sample layouts.
pub mod layouts {
    use super::LayoutConfig;
    use crate::board::BoardGeometry;
    use crate::state::Cell;

    fn cells(raw: &[(i32, i32)]) -> Vec<Cell> {
        raw.iter().copied().map(Cell::from).collect()
    }

    /// A 6x5 room split by a partial wall. Two boxes on the left, one goal in
    /// the bottom-right corner and a drop spot halfway.
    ///
    /// ```text
    ///   0 1 2 3 4 5
    /// 0 1 . . # . 2
    /// 1 . B . # . .
    /// 2 . . . . D .
    /// 3 . B . # . .
    /// 4 . . . # . G
    /// ```
    pub fn two_box_room() -> LayoutConfig {
        let board = BoardGeometry::new(6, 5)
            .with_walls(cells(&[(3, 0), (3, 1), (3, 3), (3, 4)]))
            .with_boxes(cells(&[(1, 1), (1, 3)]))
            .with_goals(cells(&[(5, 4)]))
            .with_drops(cells(&[(4, 2)]));
        LayoutConfig::new(board, Cell::new(0, 0), Cell::new(5, 0))
    }

    /// A wall-free 5x5 field with one box in the middle and a goal in a corner.
    pub fn open_field() -> LayoutConfig {
        let board = BoardGeometry::new(5, 5)
            .with_boxes(cells(&[(2, 2)]))
            .with_goals(cells(&[(4, 4)]));
        LayoutConfig::new(board, Cell::new(0, 0), Cell::new(4, 0))
    }
}
