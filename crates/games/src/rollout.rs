//! Episodes: play a policy against an environment and summarize the result.
//!
//! [`rollout`] is generic over [`Env`]. The summaries in [`RolloutStats`]
//! are specific to box transport: they count deliveries and measure how long
//! a team takes to clear the board.

use boxpush_core::{BoxHoldState, JointAction, WorldState};

use crate::env::{BoxPushEnv, Env, Transition};
use crate::policy::Policy;

/// One recorded step: what was seen, what was done, what it paid and where
/// it led.
#[derive(Debug, Clone)]
pub struct Step<State, Obs, Act> {
    pub state: State,
    pub observation: Obs,
    pub action: Act,
    pub reward: f64,
    pub next_state: State,
    pub next_observation: Obs,
    /// The environment reported `next_state` as terminal.
    pub done: bool,
}

/// The steps of one episode, in order.
#[derive(Debug, Clone)]
pub struct Trajectory<State, Obs, Act> {
    pub steps: Vec<Step<State, Obs, Act>>,
}

impl<State, Obs, Act> Trajectory<State, Obs, Act> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn push(&mut self, step: Step<State, Obs, Act>) {
        self.steps.push(step);
    }

    /// Undiscounted return.
    pub fn total_reward(&self) -> f64 {
        self.steps.iter().map(|s| s.reward).sum()
    }

    /// `Σ gamma^t * r_t`
    pub fn discounted_reward(&self, gamma: f64) -> f64 {
        self.steps
            .iter()
            .rev()
            .fold(0.0, |acc, step| step.reward + gamma * acc)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The episode ended in a terminal state rather than on the step budget.
    pub fn is_terminal(&self) -> bool {
        self.steps.last().map_or(false, |s| s.done)
    }

    pub fn rewards(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.reward).collect()
    }

    pub fn actions(&self) -> Vec<Act>
    where
        Act: Clone,
    {
        self.steps.iter().map(|s| s.action.clone()).collect()
    }
}

impl<State, Obs, Act> Default for Trajectory<State, Obs, Act> {
    fn default() -> Self {
        Self::new()
    }
}

/// A played box transport episode.
pub type BoxPushTrajectory = Trajectory<WorldState, WorldState, JointAction>;

impl Trajectory<WorldState, WorldState, JointAction> {
    /// Boxes that reached a goal during the episode.
    pub fn deliveries(&self) -> usize {
        self.steps.iter().map(boxes_delivered).sum()
    }

    /// Step number (1-based) on which the first box reached a goal.
    pub fn first_delivery(&self) -> Option<usize> {
        self.steps
            .iter()
            .position(|step| boxes_delivered(step) > 0)
            .map(|i| i + 1)
    }
}

fn boxes_delivered(step: &Step<WorldState, WorldState, JointAction>) -> usize {
    let at_goal = |hold: &BoxHoldState| matches!(hold, BoxHoldState::AtGoalLocation(_));
    step.state
        .boxes
        .iter()
        .zip(&step.next_state.boxes)
        .filter(|(before, after)| !at_goal(before) && at_goal(after))
        .count()
}

/// Play one episode of at most `max_steps` steps.
///
/// An environment error ends the episode early; the steps taken so far are
/// kept.
///
/// # Example
///
/// ```rust
/// use boxpush_core::layouts;
/// use boxpush_games::{rollout, BoxPushEnv, RandomJointPolicy};
///
/// let env = BoxPushEnv::from_layout(&layouts::two_box_room(), 3).unwrap();
/// let policy = RandomJointPolicy::new(3);
///
/// let trajectory = rollout(&policy, &env, 100);
/// assert!(trajectory.len() <= 100);
/// println!("{} steps, reward {:.1}", trajectory.len(), trajectory.total_reward());
/// ```
pub fn rollout<P, E>(policy: &P, env: &E, max_steps: usize) -> Trajectory<E::State, E::Obs, E::Act>
where
    E: Env,
    E::State: Clone,
    E::Obs: Clone,
    E::Act: Clone,
    P: Policy<E::Obs, E::Act>,
{
    let mut trajectory = Trajectory::new();
    let (mut state, mut obs) = env.reset();

    while trajectory.len() < max_steps && !env.is_terminal(&state) {
        let action = policy.act(&obs);
        let Transition {
            next_state,
            observation,
            reward,
            done,
        } = match env.step(&state, &action) {
            Ok(transition) => transition,
            Err(err) => {
                tracing::debug!(%err, step = trajectory.len(), "rollout stopped early");
                break;
            }
        };

        trajectory.push(Step {
            state: std::mem::replace(&mut state, next_state.clone()),
            observation: std::mem::replace(&mut obs, observation.clone()),
            action,
            reward,
            next_state,
            next_observation: observation,
            done,
        });
        if done {
            break;
        }
    }

    trajectory
}

/// Independent episodes from the same start, one trajectory each.
pub fn rollout_batch<P, E>(
    policy: &P,
    env: &E,
    num_episodes: usize,
    max_steps: usize,
) -> Vec<Trajectory<E::State, E::Obs, E::Act>>
where
    E: Env,
    E::State: Clone,
    E::Obs: Clone,
    E::Act: Clone,
    P: Policy<E::Obs, E::Act>,
{
    (0..num_episodes)
        .map(|_| rollout(policy, env, max_steps))
        .collect()
}

/// Summary of several box transport episodes.
#[derive(Debug, Clone, PartialEq)]
pub struct RolloutStats {
    pub num_episodes: usize,
    /// Mean total team reward.
    pub mean_reward: f64,
    /// Population standard deviation of total team reward.
    pub std_reward: f64,
    pub mean_length: f64,
    /// Mean number of boxes delivered per episode.
    pub mean_deliveries: f64,
    /// Episodes that ended with every box at a goal.
    pub num_completed: usize,
    /// Mean episode length over completed episodes only.
    pub mean_steps_to_clear: Option<f64>,
}

impl RolloutStats {
    /// Fraction of episodes that cleared the board.
    pub fn completion_rate(&self) -> f64 {
        if self.num_episodes == 0 {
            0.0
        } else {
            self.num_completed as f64 / self.num_episodes as f64
        }
    }

    fn from_trajectories(trajectories: &[BoxPushTrajectory]) -> Self {
        let n = trajectories.len();
        if n == 0 {
            return Self {
                num_episodes: 0,
                mean_reward: 0.0,
                std_reward: 0.0,
                mean_length: 0.0,
                mean_deliveries: 0.0,
                num_completed: 0,
                mean_steps_to_clear: None,
            };
        }

        let rewards: Vec<f64> = trajectories.iter().map(Trajectory::total_reward).collect();
        let mean_reward = rewards.iter().sum::<f64>() / n as f64;
        let variance = rewards.iter().map(|r| (r - mean_reward).powi(2)).sum::<f64>() / n as f64;
        let mean_length = trajectories.iter().map(|t| t.len() as f64).sum::<f64>() / n as f64;
        let mean_deliveries =
            trajectories.iter().map(|t| t.deliveries() as f64).sum::<f64>() / n as f64;

        let cleared: Vec<usize> = trajectories
            .iter()
            .filter(|t| t.is_terminal())
            .map(Trajectory::len)
            .collect();
        let mean_steps_to_clear = (!cleared.is_empty())
            .then(|| cleared.iter().sum::<usize>() as f64 / cleared.len() as f64);

        Self {
            num_episodes: n,
            mean_reward,
            std_reward: variance.sqrt(),
            mean_length,
            mean_deliveries,
            num_completed: cleared.len(),
            mean_steps_to_clear,
        }
    }
}

impl std::fmt::Display for RolloutStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Box transport over {} episodes:", self.num_episodes)?;
        writeln!(f, "  Team reward: {:.2} ± {:.2}", self.mean_reward, self.std_reward)?;
        writeln!(f, "  Deliveries per episode: {:.2}", self.mean_deliveries)?;
        writeln!(
            f,
            "  Cleared: {}/{} ({:.1}%)",
            self.num_completed,
            self.num_episodes,
            100.0 * self.completion_rate()
        )?;
        match self.mean_steps_to_clear {
            Some(steps) => writeln!(f, "  Steps to clear: {steps:.1} (mean length {:.1})", self.mean_length),
            None => writeln!(f, "  Steps to clear: n/a (mean length {:.1})", self.mean_length),
        }
    }
}

/// Play `num_episodes` episodes of at most `max_steps` steps each and
/// summarize them.
///
/// With `num_episodes == 0` every statistic is zero.
pub fn evaluate<P>(policy: &P, env: &BoxPushEnv, num_episodes: usize, max_steps: usize) -> RolloutStats
where
    P: Policy<WorldState, JointAction>,
{
    let trajectories = rollout_batch(policy, env, num_episodes, max_steps);
    let stats = RolloutStats::from_trajectories(&trajectories);
    tracing::debug!(
        episodes = stats.num_episodes,
        cleared = stats.num_completed,
        deliveries = stats.mean_deliveries,
        "evaluation finished"
    );
    stats
}
