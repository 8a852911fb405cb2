//! Team reward for box transport.
//!
//! Both agents share one scalar per step: a constant step penalty, plus a
//! bonus when the joint action puts a box down on a goal. Reward depends only
//! on the state the action was taken in and the action itself.

use boxpush_core::{Action, BoardGeometry, BoxHoldState, JointAction, WorldState};

/// Step penalty and delivery bonus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamReward {
    pub step_penalty: f64,
    pub delivery_bonus: f64,
}

impl Default for TeamReward {
    fn default() -> Self {
        Self {
            step_penalty: -1.0,
            delivery_bonus: 10.0,
        }
    }
}

impl TeamReward {
    pub fn new(step_penalty: f64, delivery_bonus: f64) -> Self {
        Self {
            step_penalty,
            delivery_bonus,
        }
    }

    /// Reward for taking `joint` in `state`. Zero once every box is delivered.
    ///
    /// # Example
    ///
    /// ```rust
    /// use boxpush_core::{Action, BoardGeometry, BoxHoldState, Cell, JointAction, WorldState};
    /// use boxpush_games::TeamReward;
    ///
    /// let board = BoardGeometry::new(3, 1)
    ///     .with_boxes(vec![Cell::new(0, 0)])
    ///     .with_goals(vec![Cell::new(2, 0)]);
    /// let carrying = WorldState::new(vec![BoxHoldState::WithAgent1], Cell::new(2, 0), Cell::new(0, 0));
    ///
    /// let reward = TeamReward::default();
    /// let drop = JointAction::new(Action::Unhold, Action::Stay);
    /// assert_eq!(reward.reward(&board, &carrying, drop), 9.0);
    /// ```
    pub fn reward(&self, board: &BoardGeometry, state: &WorldState, joint: JointAction) -> f64 {
        if state.is_terminal() {
            return 0.0;
        }
        if self.delivers(board, state, joint) {
            self.step_penalty + self.delivery_bonus
        } else {
            self.step_penalty
        }
    }

    /// Whether `joint` puts some box down on a goal.
    pub fn delivers(&self, board: &BoardGeometry, state: &WorldState, joint: JointAction) -> bool {
        let carries = |hold: BoxHoldState| state.boxes.contains(&hold);
        let on_goal = |cell| board.goal_index(cell).is_some();

        let a1_drop = joint.a1 == Action::Unhold && on_goal(state.a1) && carries(BoxHoldState::WithAgent1);
        let a2_drop = joint.a2 == Action::Unhold && on_goal(state.a2) && carries(BoxHoldState::WithAgent2);
        let both_drop = joint.a1 == Action::Unhold
            && joint.a2 == Action::Unhold
            && state.a1 == state.a2
            && on_goal(state.a1)
            && carries(BoxHoldState::WithBoth);

        a1_drop || a2_drop || both_drop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxpush_core::Cell;

    fn board() -> BoardGeometry {
        BoardGeometry::new(4, 4)
            .with_boxes(vec![Cell::new(0, 0), Cell::new(1, 0)])
            .with_goals(vec![Cell::new(3, 3)])
    }

    fn joint(a1: Action, a2: Action) -> JointAction {
        JointAction::new(a1, a2)
    }

    #[test]
    fn test_step_penalty() {
        let state = WorldState::initial(&board(), Cell::new(0, 0), Cell::new(1, 1));
        let r = TeamReward::default().reward(&board(), &state, joint(Action::Up, Action::Hold));
        assert_eq!(r, -1.0);
    }

    #[test]
    fn test_joint_delivery() {
        let state = WorldState::new(
            vec![BoxHoldState::WithBoth, BoxHoldState::AtOriginalSpot],
            Cell::new(3, 3),
            Cell::new(3, 3),
        );
        let reward = TeamReward::default();
        assert_eq!(reward.reward(&board(), &state, joint(Action::Unhold, Action::Unhold)), 9.0);
        // One hand letting go is a hand-over, not a delivery.
        assert_eq!(reward.reward(&board(), &state, joint(Action::Unhold, Action::Stay)), -1.0);
    }

    #[test]
    fn test_unhold_off_goal_is_not_delivery() {
        let state = WorldState::new(
            vec![BoxHoldState::WithAgent1, BoxHoldState::WithAgent2],
            Cell::new(2, 3),
            Cell::new(3, 3),
        );
        let reward = TeamReward::default();
        assert!(!reward.delivers(&board(), &state, joint(Action::Unhold, Action::Stay)));
        assert!(reward.delivers(&board(), &state, joint(Action::Stay, Action::Unhold)));
    }

    #[test]
    fn test_terminal_state_earns_nothing() {
        let state = WorldState::new(
            vec![BoxHoldState::AtGoalLocation(0), BoxHoldState::AtGoalLocation(0)],
            Cell::new(3, 3),
            Cell::new(0, 0),
        );
        let r = TeamReward::default().reward(&board(), &state, joint(Action::Unhold, Action::Unhold));
        assert_eq!(r, 0.0);
    }

    #[test]
    fn test_custom_weights() {
        let state = WorldState::new(
            vec![BoxHoldState::WithAgent1, BoxHoldState::AtOriginalSpot],
            Cell::new(3, 3),
            Cell::new(0, 0),
        );
        let reward = TeamReward::new(-0.1, 1.0);
        let r = reward.reward(&board(), &state, joint(Action::Unhold, Action::Stay));
        assert!((r - 0.9).abs() < 1e-12);
    }
}
