//! Per-agent actions and the joint action the engine consumes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a single agent asks to do this tick.
///
/// `Hold` asks to pick up the box on the agent's cell, `Unhold` asks to put the
/// carried box down. The four directions request a one-cell move; whether the
/// move happens is up to the [`TransitionEngine`](crate::TransitionEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Stay,
    Hold,
    Unhold,
}

impl Action {
    /// Every action, in the order used for integer indexing.
    pub const ALL: [Action; 7] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Stay,
        Action::Hold,
        Action::Unhold,
    ];

    /// The four directional actions.
    pub const MOVES: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Whether this action requests a one-cell move.
    pub fn is_move(self) -> bool {
        self.delta().is_some()
    }

    /// Grid offset of a directional action. Rows grow downward, so `Up` is `y - 1`.
    pub fn delta(self) -> Option<(i32, i32)> {
        match self {
            Action::Up => Some((0, -1)),
            Action::Down => Some((0, 1)),
            Action::Left => Some((-1, 0)),
            Action::Right => Some((1, 0)),
            Action::Stay | Action::Hold | Action::Unhold => None,
        }
    }

    /// The reverse direction, if this is a move.
    pub fn opposite(self) -> Option<Action> {
        match self {
            Action::Up => Some(Action::Down),
            Action::Down => Some(Action::Up),
            Action::Left => Some(Action::Right),
            Action::Right => Some(Action::Left),
            Action::Stay | Action::Hold | Action::Unhold => None,
        }
    }

    /// True when both actions are moves pointing in opposite directions.
    pub fn is_opposite(self, other: Action) -> bool {
        self.opposite() == Some(other)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
            Action::Stay => "stay",
            Action::Hold => "hold",
            Action::Unhold => "unhold",
        };
        f.write_str(name)
    }
}

/// The pair of actions chosen by agent 1 and agent 2 in the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JointAction {
    pub a1: Action,
    pub a2: Action,
}

impl JointAction {
    pub fn new(a1: Action, a2: Action) -> Self {
        Self { a1, a2 }
    }

    /// Exchange the roles of the two agents.
    pub fn swapped(self) -> Self {
        Self {
            a1: self.a2,
            a2: self.a1,
        }
    }

    /// All 49 joint actions, agent 1 varying slowest.
    pub fn all() -> impl Iterator<Item = JointAction> {
        Action::ALL
            .into_iter()
            .flat_map(|a1| Action::ALL.into_iter().map(move |a2| JointAction::new(a1, a2)))
    }
}

impl fmt::Display for JointAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a1, self.a2)
    }
}
