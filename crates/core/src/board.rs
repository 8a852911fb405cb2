//! Board geometry: the static part of the world.
//!
//! The grid, its walls, and the three kinds of special cells (box homes,
//! goals, drop spots) never change during an episode. Everything that does
//! change lives in [`WorldState`].

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::state::{BoxHoldState, Cell, WorldState};

/// Probability that an encumbered or contested move succeeds.
pub const DEFAULT_P_MOVE: f64 = 0.7;

fn default_p_move() -> f64 {
    DEFAULT_P_MOVE
}

/// Read-only description of the grid.
///
/// # Example
///
/// ```rust
/// use boxpush_core::{BoardGeometry, Cell};
///
/// let board = BoardGeometry::new(5, 5)
///     .with_walls(vec![Cell::new(2, 0)])
///     .with_boxes(vec![Cell::new(2, 2)])
///     .with_goals(vec![Cell::new(4, 4)]);
///
/// assert!(board.is_wall(Cell::new(2, 0)));
/// assert!(!board.in_bounds(Cell::new(5, 0)));
/// assert_eq!(board.goal_index(Cell::new(4, 4)), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardGeometry {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub walls: Vec<Cell>,
    /// Home cell of each box; the index is the box's identity.
    pub boxes: Vec<Cell>,
    #[serde(default)]
    pub goals: Vec<Cell>,
    #[serde(default)]
    pub drops: Vec<Cell>,
    /// Success probability of a stochastic move.
    #[serde(default = "default_p_move")]
    pub p_move: f64,
}

impl BoardGeometry {
    /// An empty `width x height` grid with no walls, boxes, goals or drops.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            walls: Vec::new(),
            boxes: Vec::new(),
            goals: Vec::new(),
            drops: Vec::new(),
            p_move: DEFAULT_P_MOVE,
        }
    }

    pub fn with_walls(mut self, walls: Vec<Cell>) -> Self {
        self.walls = walls;
        self
    }

    pub fn with_boxes(mut self, boxes: Vec<Cell>) -> Self {
        self.boxes = boxes;
        self
    }

    pub fn with_goals(mut self, goals: Vec<Cell>) -> Self {
        self.goals = goals;
        self
    }

    pub fn with_drops(mut self, drops: Vec<Cell>) -> Self {
        self.drops = drops;
        self
    }

    pub fn with_p_move(mut self, p_move: f64) -> Self {
        self.p_move = p_move;
        self
    }

    /// Check that the layout describes a playable board.
    ///
    /// # Errors
    ///
    /// - [`BoardError::EmptyGrid`] for a zero-sized grid
    /// - [`BoardError::InvalidMoveProbability`] if `p_move` is not in `(0, 1]`
    /// - [`BoardError::NoBoxes`] if there is nothing to carry
    /// - [`BoardError::OutOfBounds`] / [`BoardError::OnWall`] for misplaced cells
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.width == 0 || self.height == 0 {
            return Err(BoardError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.p_move > 0.0 && self.p_move <= 1.0) {
            return Err(BoardError::InvalidMoveProbability { p: self.p_move });
        }
        if self.boxes.is_empty() {
            return Err(BoardError::NoBoxes);
        }

        for &wall in &self.walls {
            self.check_in_bounds("wall", wall)?;
        }
        let placed = [
            ("box", &self.boxes),
            ("goal", &self.goals),
            ("drop", &self.drops),
        ];
        for (what, cells) in placed {
            for &cell in cells {
                self.check_open(what, cell)?;
            }
        }
        Ok(())
    }

    /// Fails unless `cell` is in bounds and not a wall.
    pub fn check_open(&self, what: &'static str, cell: Cell) -> Result<(), BoardError> {
        self.check_in_bounds(what, cell)?;
        if self.is_wall(cell) {
            return Err(BoardError::OnWall { what, cell });
        }
        Ok(())
    }

    fn check_in_bounds(&self, what: &'static str, cell: Cell) -> Result<(), BoardError> {
        if self.in_bounds(cell) {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds {
                what,
                cell,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Whether `cell` lies inside `[0, width) x [0, height)`.
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.width
            && (cell.y as usize) < self.height
    }

    pub fn is_wall(&self, cell: Cell) -> bool {
        self.walls.contains(&cell)
    }

    /// In bounds and not a wall.
    pub fn is_open(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.is_wall(cell)
    }

    pub fn goal_index(&self, cell: Cell) -> Option<usize> {
        self.goals.iter().position(|&g| g == cell)
    }

    pub fn drop_index(&self, cell: Cell) -> Option<usize> {
        self.drops.iter().position(|&d| d == cell)
    }

    /// The resting state a box takes when put down on `cell`, if that is
    /// allowed there. Goals win over drop spots when a cell is both.
    pub fn resting_state_at(&self, cell: Cell) -> Option<BoxHoldState> {
        self.goal_index(cell)
            .map(BoxHoldState::AtGoalLocation)
            .or_else(|| self.drop_index(cell).map(BoxHoldState::AtDropLocation))
    }

    /// Every open cell in row-major order.
    pub fn open_cells(&self) -> Vec<Cell> {
        (0..self.height as i32)
            .flat_map(|y| (0..self.width as i32).map(move |x| Cell::new(x, y)))
            .filter(|&c| !self.is_wall(c))
            .collect()
    }

    /// Index of the first box occupying `cell` in `state`, including boxes
    /// already delivered to a goal there.
    ///
    /// A jointly held box occupies the cell of either agent.
    pub fn box_index_at(&self, cell: Cell, state: &WorldState) -> Option<usize> {
        self.find_box(cell, state, true)
    }

    /// Like [`box_index_at`](Self::box_index_at) but skips delivered boxes,
    /// which can be neither picked up nor bumped into.
    pub fn movable_box_at(&self, cell: Cell, state: &WorldState) -> Option<usize> {
        self.find_box(cell, state, false)
    }

    fn find_box(&self, cell: Cell, state: &WorldState, include_delivered: bool) -> Option<usize> {
        state.boxes.iter().enumerate().find_map(|(idx, &hold)| {
            let occupies = match hold {
                BoxHoldState::AtOriginalSpot => self.boxes.get(idx) == Some(&cell),
                BoxHoldState::WithAgent1 => state.a1 == cell,
                BoxHoldState::WithAgent2 => state.a2 == cell,
                BoxHoldState::WithBoth => state.a1 == cell || state.a2 == cell,
                BoxHoldState::AtDropLocation(i) => self.drops.get(i) == Some(&cell),
                BoxHoldState::AtGoalLocation(i) => {
                    include_delivered && self.goals.get(i) == Some(&cell)
                }
            };
            occupies.then_some(idx)
        })
    }
}
