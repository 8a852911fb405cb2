//! Policies: observation → action mappings.
//!
//! A policy decides the joint action given an observation. Policies and
//! environments are independent, so the same environment can be driven by a
//! scripted, random or learned decision rule.
//!
//! ```text
//!        ┌──────────┐
//!  Obs ─▶│  Policy  │─▶ Act
//!        └──────────┘
//! ```

use std::cell::RefCell;
use std::marker::PhantomData;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use boxpush_core::{Action, JointAction};

/// A policy maps observations to actions.
pub trait Policy<Obs, Act> {
    /// Select an action given an observation.
    fn act(&self, obs: &Obs) -> Act;

    /// Optional: get action probabilities (for stochastic policies).
    fn action_probs(&self, _obs: &Obs) -> Option<Vec<f64>> {
        None
    }
}

// ============================================================================
// Random Joint Policy
// ============================================================================

/// Picks each agent's action uniformly and independently, which makes the
/// joint action uniform over all 49 pairs.
#[derive(Debug)]
pub struct RandomJointPolicy {
    rng: RefCell<StdRng>,
}

impl RandomJointPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomJointPolicy {
    fn default() -> Self {
        Self::new(42)
    }
}

impl<Obs> Policy<Obs, JointAction> for RandomJointPolicy {
    fn act(&self, _obs: &Obs) -> JointAction {
        let mut rng = self.rng.borrow_mut();
        let a1 = Action::ALL.choose(&mut *rng).copied().unwrap_or(Action::Stay);
        let a2 = Action::ALL.choose(&mut *rng).copied().unwrap_or(Action::Stay);
        JointAction::new(a1, a2)
    }

    fn action_probs(&self, _obs: &Obs) -> Option<Vec<f64>> {
        let n = Action::ALL.len() * Action::ALL.len();
        Some(vec![1.0 / n as f64; n])
    }
}

// ============================================================================
// Constant Policy
// ============================================================================

/// A policy that always returns the same action.
#[derive(Debug, Clone)]
pub struct ConstantPolicy<Act> {
    action: Act,
}

impl<Act: Clone> ConstantPolicy<Act> {
    pub fn new(action: Act) -> Self {
        Self { action }
    }
}

impl<Obs, Act: Clone> Policy<Obs, Act> for ConstantPolicy<Act> {
    fn act(&self, _obs: &Obs) -> Act {
        self.action.clone()
    }
}

// ============================================================================
// Function Policy
// ============================================================================

/// Wraps any `Fn(&Obs) -> Act` as a policy.
pub struct FnPolicy<F, Obs, Act> {
    f: F,
    _phantom: PhantomData<(Obs, Act)>,
}

impl<F, Obs, Act> FnPolicy<F, Obs, Act> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<F, Obs, Act> Policy<Obs, Act> for FnPolicy<F, Obs, Act>
where
    F: Fn(&Obs) -> Act,
{
    fn act(&self, obs: &Obs) -> Act {
        (self.f)(obs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxpush_core::{Cell, WorldState};
    use std::collections::HashSet;

    #[test]
    fn test_random_policy_covers_joint_actions() {
        let policy = RandomJointPolicy::new(5);
        let seen: HashSet<JointAction> = (0..2_000).map(|_| policy.act(&())).collect();
        assert_eq!(seen.len(), 49);
    }

    #[test]
    fn test_random_policy_is_reproducible() {
        let a = RandomJointPolicy::new(9);
        let b = RandomJointPolicy::new(9);
        for _ in 0..20 {
            assert_eq!(Policy::<(), JointAction>::act(&a, &()), b.act(&()));
        }
        let probs = Policy::<(), JointAction>::action_probs(&a, &()).unwrap();
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_policy() {
        let stay = JointAction::new(Action::Stay, Action::Stay);
        let policy = ConstantPolicy::new(stay);
        assert_eq!(policy.act(&"anything"), stay);
    }

    #[test]
    fn test_fn_policy_reads_state() {
        // Agent 1 heads for column 0, agent 2 stays put.
        let policy: FnPolicy<_, WorldState, JointAction> = FnPolicy::new(|obs: &WorldState| {
            let a1 = if obs.a1.x > 0 { Action::Left } else { Action::Stay };
            JointAction::new(a1, Action::Stay)
        });
        let state = WorldState::new(vec![], Cell::new(2, 0), Cell::new(0, 0));
        assert_eq!(policy.act(&state).a1, Action::Left);
    }
}
