//! # Box Transport Games
//!
//! This crate runs episodes of the two-agent box transport world on top of
//! the transition engine in `boxpush-core`:
//!
//! - [`Env`]: world dynamics (`(State, Act) -> (State, Obs, Reward)`)
//! - [`BoxPushEnv`]: the box transport world, sampled with a seeded generator
//! - [`Simulator`]: one interactive episode with history
//! - [`TeamReward`]: shared step penalty and delivery bonus
//! - [`Policy`]: maps observations to joint actions
//! - [`rollout()`] / [`evaluate()`]: play episodes and summarize them
//!
//! ## Example
//!
//! ```rust
//! use boxpush_core::layouts;
//! use boxpush_games::{evaluate, BoxPushEnv, RandomJointPolicy};
//!
//! let env = BoxPushEnv::from_layout(&layouts::open_field(), 0).unwrap();
//! let policy = RandomJointPolicy::new(0);
//!
//! let stats = evaluate(&policy, &env, 5, 50);
//! assert_eq!(stats.num_episodes, 5);
//! println!("{stats}");
//! ```
//!
//! ## Design
//!
//! ```text
//!          ┌──────────┐
//!    Obs ─▶│  Policy  │─▶ JointAction
//!          └──────────┘
//!               │
//!               ▼
//!          ┌──────────┐     transition()    ┌──────────────┐
//!          │   Env    │ ──────────────────▶ │ outcome dist │
//!          └──────────┘ ◀── sample (StdRng) └──────────────┘
//! ```

pub mod env;
mod error;
pub mod policy;
pub mod reward;
pub mod rollout;
pub mod simulator;

pub use env::{BoxPushEnv, Env, Transition};
pub use error::GameError;
pub use policy::{ConstantPolicy, FnPolicy, Policy, RandomJointPolicy};
pub use reward::TeamReward;
pub use rollout::{evaluate, rollout, rollout_batch, BoxPushTrajectory, RolloutStats, Step, Trajectory};
pub use simulator::{Simulator, StepReport};
