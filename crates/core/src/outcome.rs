//! Outcome distributions: the engine's only output.

use crate::state::WorldState;
use crate::PROB_TOLERANCE;

/// One possible next world state and its probability.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub prob: f64,
    pub state: WorldState,
}

/// A finite distribution over next world states.
///
/// Invariants maintained by [`push`](Self::push):
/// - every probability is strictly positive
/// - no two outcomes share a structurally equal state
///
/// Normalization is the caller's job; see [`is_normalized`](Self::is_normalized).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutcomeDistribution {
    outcomes: Vec<Outcome>,
}

impl OutcomeDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// A point mass on `state`.
    pub fn certain(state: WorldState) -> Self {
        Self {
            outcomes: vec![Outcome { prob: 1.0, state }],
        }
    }

    /// Add `prob` mass on `state`, merging with an existing equal state.
    /// Zero or negative mass is dropped.
    pub fn push(&mut self, prob: f64, state: WorldState) {
        if prob <= 0.0 {
            return;
        }
        match self.outcomes.iter_mut().find(|o| o.state == state) {
            Some(existing) => existing.prob += prob,
            None => self.outcomes.push(Outcome { prob, state }),
        }
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Outcome> {
        self.outcomes.iter()
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn into_vec(self) -> Vec<Outcome> {
        self.outcomes
    }

    /// Total mass.
    pub fn total(&self) -> f64 {
        self.outcomes.iter().map(|o| o.prob).sum()
    }

    /// Mass on `state`, zero if absent.
    pub fn probability_of(&self, state: &WorldState) -> f64 {
        self.outcomes
            .iter()
            .find(|o| &o.state == state)
            .map_or(0.0, |o| o.prob)
    }

    /// Non-empty, every mass in `(0, 1]`, and total within tolerance of 1.
    pub fn is_normalized(&self) -> bool {
        !self.outcomes.is_empty()
            && self
                .outcomes
                .iter()
                .all(|o| o.prob > 0.0 && o.prob <= 1.0 + PROB_TOLERANCE)
            && (self.total() - 1.0).abs() <= PROB_TOLERANCE
    }

    /// The same distribution with every state's agents exchanged.
    pub fn mirrored(&self) -> Self {
        Self {
            outcomes: self
                .outcomes
                .iter()
                .map(|o| Outcome {
                    prob: o.prob,
                    state: o.state.mirrored(),
                })
                .collect(),
        }
    }

    /// Same support with matching masses, ignoring order.
    pub fn approx_eq(&self, other: &OutcomeDistribution) -> bool {
        self.len() == other.len()
            && self
                .outcomes
                .iter()
                .all(|o| (other.probability_of(&o.state) - o.prob).abs() <= PROB_TOLERANCE)
    }
}

impl<'a> IntoIterator for &'a OutcomeDistribution {
    type Item = &'a Outcome;
    type IntoIter = std::slice::Iter<'a, Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}
