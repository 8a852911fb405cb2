//! Movement resolver: hard legality of a single one-cell move.
//!
//! Everything here is deterministic. The chance that a legal move fails is
//! applied by the [`TransitionEngine`](crate::TransitionEngine).

use crate::action::Action;
use crate::board::BoardGeometry;
use crate::state::{Cell, WorldState};

/// Whether boxes on the board stop a move.
#[derive(Debug, Clone, Copy)]
pub enum Blocking<'a> {
    /// Only walls and the grid edge stop the agent. Used for empty-handed agents.
    Ignore,
    /// Any non-delivered box in `state` also stops the agent. Used while carrying.
    Boxes(&'a WorldState),
}

/// The cell an agent at `from` ends up in if `action` succeeds.
///
/// `Stay`, `Hold` and `Unhold` never move. A directional action returns `from`
/// when the neighbouring cell is off the grid, a wall, or (with
/// [`Blocking::Boxes`]) occupied by a box. The carried box sits on `from`, so
/// it can never block its own carrier.
pub fn resolve_move(from: Cell, action: Action, board: &BoardGeometry, blocking: Blocking<'_>) -> Cell {
    let Some((dx, dy)) = action.delta() else {
        return from;
    };
    let target = from.offset(dx, dy);
    if !board.is_open(target) {
        return from;
    }
    if let Blocking::Boxes(state) = blocking {
        if board.movable_box_at(target, state).is_some() {
            return from;
        }
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::BoxHoldState;

    fn board() -> BoardGeometry {
        BoardGeometry::new(3, 3)
            .with_walls(vec![Cell::new(1, 0)])
            .with_boxes(vec![Cell::new(2, 1)])
            .with_goals(vec![Cell::new(1, 2)])
    }

    #[test]
    fn test_non_moves_stay_put() {
        let b = board();
        let from = Cell::new(1, 1);
        for action in [Action::Stay, Action::Hold, Action::Unhold] {
            assert_eq!(resolve_move(from, action, &b, Blocking::Ignore), from);
        }
    }

    #[test]
    fn test_directions() {
        let b = board();
        let from = Cell::new(1, 1);
        assert_eq!(resolve_move(from, Action::Left, &b, Blocking::Ignore), Cell::new(0, 1));
        assert_eq!(resolve_move(from, Action::Down, &b, Blocking::Ignore), Cell::new(1, 2));
        assert_eq!(resolve_move(from, Action::Right, &b, Blocking::Ignore), Cell::new(2, 1));
    }

    #[test]
    fn test_walls_and_edges_block() {
        let b = board();
        assert_eq!(
            resolve_move(Cell::new(1, 1), Action::Up, &b, Blocking::Ignore),
            Cell::new(1, 1)
        );
        assert_eq!(
            resolve_move(Cell::new(0, 0), Action::Left, &b, Blocking::Ignore),
            Cell::new(0, 0)
        );
        assert_eq!(
            resolve_move(Cell::new(2, 2), Action::Down, &b, Blocking::Ignore),
            Cell::new(2, 2)
        );
    }

    #[test]
    fn test_boxes_block_only_when_requested() {
        let b = board();
        let s = WorldState::initial(&b, Cell::new(1, 1), Cell::new(0, 2));
        let from = Cell::new(1, 1);
        assert_eq!(resolve_move(from, Action::Right, &b, Blocking::Ignore), Cell::new(2, 1));
        assert_eq!(resolve_move(from, Action::Right, &b, Blocking::Boxes(&s)), from);
    }

    #[test]
    fn test_delivered_box_does_not_block() {
        let b = board();
        let s = WorldState::initial(&b, Cell::new(1, 1), Cell::new(0, 0))
            .with_box(0, BoxHoldState::AtGoalLocation(0));
        assert_eq!(
            resolve_move(Cell::new(1, 1), Action::Down, &b, Blocking::Boxes(&s)),
            Cell::new(1, 2)
        );
    }

    #[test]
    fn test_other_agents_box_blocks() {
        let b = board();
        let s = WorldState::initial(&b, Cell::new(0, 1), Cell::new(1, 1))
            .with_box(0, BoxHoldState::WithAgent2);
        assert_eq!(
            resolve_move(Cell::new(0, 1), Action::Right, &b, Blocking::Boxes(&s)),
            Cell::new(0, 1)
        );
    }
}
