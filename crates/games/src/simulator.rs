//! Step-by-step simulator.
//!
//! Interactive front ends drive one episode at a time: they submit both
//! agents' actions, the simulator samples an outcome and keeps the result as
//! the new current state. An agent that has not chosen yet is treated as
//! standing still.

use boxpush_core::{Action, JointAction, OutcomeDistribution, WorldState};

use crate::env::{BoxPushEnv, Env};
use crate::GameError;

/// What happened in one simulator tick.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub state: WorldState,
    pub joint: JointAction,
    pub next_state: WorldState,
    pub reward: f64,
    pub done: bool,
}

/// Holds the current world state of one episode.
///
/// # Example
///
/// ```rust
/// use boxpush_core::{layouts, Action};
/// use boxpush_games::{BoxPushEnv, Simulator};
///
/// let env = BoxPushEnv::from_layout(&layouts::open_field(), 1).unwrap();
/// let mut sim = Simulator::new(env);
///
/// sim.step(Action::Right, Action::Down).unwrap();
/// sim.step_partial(Some(Action::Down), None).unwrap();
/// assert_eq!(sim.history().len(), 2);
///
/// sim.reset();
/// assert!(sim.history().is_empty());
/// ```
#[derive(Debug)]
pub struct Simulator {
    env: BoxPushEnv,
    state: WorldState,
    history: Vec<StepReport>,
}

impl Simulator {
    pub fn new(env: BoxPushEnv) -> Self {
        let state = env.initial_state();
        Self {
            env,
            state,
            history: Vec::new(),
        }
    }

    pub fn env(&self) -> &BoxPushEnv {
        &self.env
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn history(&self) -> &[StepReport] {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        self.env.is_terminal(&self.state)
    }

    pub fn total_reward(&self) -> f64 {
        self.history.iter().map(|s| s.reward).sum()
    }

    /// The distribution the next [`step`](Self::step) would sample from.
    pub fn preview(&self, a1: Action, a2: Action) -> OutcomeDistribution {
        self.env.outcomes(&self.state, JointAction::new(a1, a2))
    }

    /// Apply one joint action.
    ///
    /// # Errors
    ///
    /// [`GameError::TerminalState`] once every box has been delivered.
    pub fn step(&mut self, a1: Action, a2: Action) -> Result<&StepReport, GameError> {
        let joint = JointAction::new(a1, a2);
        let transition = self.env.step(&self.state, &joint)?;

        let report = StepReport {
            state: std::mem::replace(&mut self.state, transition.next_state.clone()),
            joint,
            next_state: transition.next_state,
            reward: transition.reward,
            done: transition.done,
        };
        if report.done {
            tracing::debug!(
                steps = self.history.len() + 1,
                total_reward = self.total_reward() + report.reward,
                "episode finished"
            );
        }
        self.history.push(report);
        Ok(&self.history[self.history.len() - 1])
    }

    /// Like [`step`](Self::step), with `None` meaning [`Action::Stay`].
    pub fn step_partial(
        &mut self,
        a1: Option<Action>,
        a2: Option<Action>,
    ) -> Result<&StepReport, GameError> {
        self.step(a1.unwrap_or(Action::Stay), a2.unwrap_or(Action::Stay))
    }

    /// Back to the start state with an empty history. The sampler keeps its
    /// position, so a new episode does not replay the old one.
    pub fn reset(&mut self) {
        self.state = self.env.initial_state();
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxpush_core::{BoardGeometry, BoxHoldState, Cell};

    fn certain_corridor() -> BoxPushEnv {
        let board = BoardGeometry::new(3, 1)
            .with_boxes(vec![Cell::new(1, 0)])
            .with_goals(vec![Cell::new(2, 0)])
            .with_p_move(1.0);
        let start = WorldState::initial(&board, Cell::new(0, 0), Cell::new(0, 0));
        BoxPushEnv::new(board, start, 0).unwrap()
    }

    #[test]
    fn test_joint_delivery_episode() {
        let mut sim = Simulator::new(certain_corridor());

        sim.step(Action::Right, Action::Right).unwrap();
        sim.step(Action::Hold, Action::Hold).unwrap();
        assert_eq!(sim.state().boxes[0], BoxHoldState::WithBoth);
        sim.step(Action::Right, Action::Right).unwrap();
        let last = sim.step(Action::Unhold, Action::Unhold).unwrap();

        assert!(last.done);
        assert_eq!(last.reward, 9.0);
        assert!(sim.is_finished());
        assert_eq!(sim.total_reward(), 6.0);
        assert!(matches!(
            sim.step(Action::Stay, Action::Stay),
            Err(GameError::TerminalState)
        ));
    }

    #[test]
    fn test_missing_action_means_stay() {
        let mut sim = Simulator::new(certain_corridor());
        let report = sim.step_partial(None, Some(Action::Right)).unwrap();
        assert_eq!(report.joint, JointAction::new(Action::Stay, Action::Right));
        assert_eq!(report.next_state.a1, Cell::new(0, 0));
        assert_eq!(report.next_state.a2, Cell::new(1, 0));
    }

    #[test]
    fn test_history_links_states() {
        let mut sim = Simulator::new(certain_corridor());
        sim.step(Action::Right, Action::Stay).unwrap();
        sim.step(Action::Hold, Action::Right).unwrap();
        let history = sim.history();
        assert_eq!(history[0].next_state, history[1].state);
        assert_eq!(&history[1].next_state, sim.state());
    }

    #[test]
    fn test_preview_does_not_advance() {
        let sim = Simulator::new(certain_corridor());
        let before = sim.state().clone();
        let dist = sim.preview(Action::Right, Action::Right);
        assert!(dist.is_normalized());
        assert_eq!(sim.state(), &before);
    }
}
