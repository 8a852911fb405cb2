//! Environments: world dynamics and state transitions.
//!
//! An environment defines how the world evolves in response to actions.
//! [`BoxPushEnv`] wraps the box transport engine: it asks the engine for the
//! distribution over next states, then samples one of them.
//!
//! ```text
//!        ┌──────────┐
//!  Act ─▶│   Env    │─▶ (State', Obs, Reward)
//!        │          │
//! State ─▶│          │
//!        └──────────┘
//! ```

use std::cell::RefCell;

use rand::rngs::StdRng;
use rand::SeedableRng;

use boxpush_core::{
    BoardGeometry, JointAction, LayoutConfig, OutcomeDistribution, TransitionEngine, WorldState,
};
use boxpush_prob::{Dist, ProbError};

use crate::reward::TeamReward;
use crate::GameError;

/// Environment transition result.
#[derive(Debug, Clone)]
pub struct Transition<State, Obs> {
    /// New state after action
    pub next_state: State,
    /// Observation from the new state
    pub observation: Obs,
    /// Reward received
    pub reward: f64,
    /// Whether the episode has ended
    pub done: bool,
}

/// An environment defines world dynamics.
pub trait Env {
    /// State type
    type State: Clone;
    /// Observation type (what the agent sees)
    type Obs;
    /// Action type
    type Act;

    /// Get the initial state.
    fn initial_state(&self) -> Self::State;

    /// Get observation from a state.
    fn observe(&self, state: &Self::State) -> Self::Obs;

    /// Take a step: (state, action) → (next_state, obs, reward, done)
    fn step(
        &self,
        state: &Self::State,
        action: &Self::Act,
    ) -> Result<Transition<Self::State, Self::Obs>, GameError>;

    /// Check if state is terminal.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Reset to initial state and return observation.
    fn reset(&self) -> (Self::State, Self::Obs) {
        let state = self.initial_state();
        let obs = self.observe(&state);
        (state, obs)
    }
}

// ============================================================================
// Box Transport Environment
// ============================================================================

/// The two-agent box transport world, fully observable.
///
/// Sampling uses a seeded [`StdRng`], so two environments built with the same
/// seed replay the same episodes.
///
/// # Example
///
/// ```rust
/// use boxpush_core::{layouts, Action, JointAction};
/// use boxpush_games::{BoxPushEnv, Env};
///
/// let env = BoxPushEnv::from_layout(&layouts::open_field(), 7).unwrap();
/// let (state, _) = env.reset();
/// let step = env.step(&state, &JointAction::new(Action::Right, Action::Down)).unwrap();
/// assert_eq!(step.reward, -1.0);
/// assert!(!step.done);
/// ```
#[derive(Debug)]
pub struct BoxPushEnv {
    board: BoardGeometry,
    start: WorldState,
    reward: TeamReward,
    rng: RefCell<StdRng>,
}

impl BoxPushEnv {
    /// # Errors
    ///
    /// [`GameError::Board`] if the board fails validation,
    /// [`GameError::InvalidStart`] if `start` does not fit it.
    pub fn new(board: BoardGeometry, start: WorldState, seed: u64) -> Result<Self, GameError> {
        board.validate()?;
        if start.boxes.len() != board.boxes.len() {
            return Err(GameError::InvalidStart {
                reason: format!(
                    "{} box states for {} boxes",
                    start.boxes.len(),
                    board.boxes.len()
                ),
            });
        }
        board.check_open("agent 1 start", start.a1)?;
        board.check_open("agent 2 start", start.a2)?;

        Ok(Self {
            board,
            start,
            reward: TeamReward::default(),
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        })
    }

    pub fn from_layout(layout: &LayoutConfig, seed: u64) -> Result<Self, GameError> {
        Self::new(layout.board()?, layout.initial_state(), seed)
    }

    pub fn with_reward(mut self, reward: TeamReward) -> Self {
        self.reward = reward;
        self
    }

    pub fn board(&self) -> &BoardGeometry {
        &self.board
    }

    pub fn team_reward(&self) -> &TeamReward {
        &self.reward
    }

    /// Restart the sampler.
    pub fn reseed(&self, seed: u64) {
        *self.rng.borrow_mut() = StdRng::seed_from_u64(seed);
    }

    /// Every possible next state with its probability.
    pub fn outcomes(&self, state: &WorldState, joint: JointAction) -> OutcomeDistribution {
        TransitionEngine::new(&self.board).transition(state, joint.a1, joint.a2)
    }

    /// Draw one next state.
    pub fn sample_next(&self, state: &WorldState, joint: JointAction) -> Result<WorldState, GameError> {
        let outcomes = self.outcomes(state, joint).into_vec();
        let weights = Dist::from_weights(outcomes.iter().map(|o| o.prob).collect())?;
        let pick = weights.sample_with(&mut *self.rng.borrow_mut());
        outcomes
            .into_iter()
            .nth(pick)
            .map(|o| o.state)
            .ok_or(GameError::Prob(ProbError::IndexOutOfBounds {
                index: pick,
                size: weights.len(),
            }))
    }
}

impl Env for BoxPushEnv {
    type State = WorldState;
    type Obs = WorldState;
    type Act = JointAction;

    fn initial_state(&self) -> Self::State {
        self.start.clone()
    }

    fn observe(&self, state: &Self::State) -> Self::Obs {
        state.clone()
    }

    fn step(
        &self,
        state: &Self::State,
        action: &Self::Act,
    ) -> Result<Transition<Self::State, Self::Obs>, GameError> {
        if self.is_terminal(state) {
            return Err(GameError::TerminalState);
        }

        let reward = self.reward.reward(&self.board, state, *action);
        let next_state = self.sample_next(state, *action)?;
        let done = next_state.is_terminal();
        tracing::trace!(%state, joint = %action, next = %next_state, reward, "sampled transition");

        Ok(Transition {
            observation: next_state.clone(),
            next_state,
            reward,
            done,
        })
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        state.is_terminal()
    }
}
