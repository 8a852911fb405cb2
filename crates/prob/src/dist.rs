//! Probability distributions over finite sets.

use rand::Rng;

use crate::error::ProbError;
use crate::PROB_TOLERANCE;

/// A probability distribution over a finite set {0, 1, ..., n-1}.
///
/// Invariants:
/// - All probabilities are non-negative
/// - Probabilities sum to 1 (within tolerance)
///
/// # Example
///
/// ```rust
/// use boxpush_prob::Dist;
///
/// // Fair coin
/// let coin = Dist::uniform(2).unwrap();
/// assert!((coin.p[0] - 0.5).abs() < 1e-9);
///
/// // The engine's usual split: move succeeds or not
/// let attempt = Dist::new(vec![0.7, 0.3]).unwrap();
/// assert_eq!(attempt.sample(0.69), 0);
/// assert_eq!(attempt.sample(0.71), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dist {
    /// Probability vector (sums to 1).
    pub p: Vec<f64>,
}

impl Dist {
    /// Create a new distribution from a probability vector.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The vector is empty
    /// - Any probability is negative
    /// - The probabilities don't sum to 1 (within tolerance)
    pub fn new(p: Vec<f64>) -> Result<Self, ProbError> {
        if p.is_empty() {
            return Err(ProbError::EmptyDistribution);
        }

        if p.iter().any(|&x| x < -PROB_TOLERANCE) {
            return Err(ProbError::NegativeProbability);
        }

        let sum: f64 = p.iter().sum();
        if (sum - 1.0).abs() > PROB_TOLERANCE {
            return Err(ProbError::NotNormalized { sum });
        }

        Ok(Self { p })
    }

    /// Create a distribution from unnormalized weights.
    ///
    /// # Example
    ///
    /// ```rust
    /// use boxpush_prob::Dist;
    ///
    /// let d = Dist::from_weights(vec![1.0, 2.0, 3.0]).unwrap();
    /// assert!((d.p[0] - 1.0 / 6.0).abs() < 1e-9);
    /// ```
    pub fn from_weights(weights: Vec<f64>) -> Result<Self, ProbError> {
        if weights.is_empty() {
            return Err(ProbError::EmptyDistribution);
        }

        if weights.iter().any(|&x| x < 0.0) {
            return Err(ProbError::NegativeProbability);
        }

        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return Err(ProbError::ZeroWeights);
        }

        let p: Vec<f64> = weights.iter().map(|w| w / sum).collect();
        Ok(Self { p })
    }

    /// Create a uniform distribution over n elements.
    pub fn uniform(n: usize) -> Result<Self, ProbError> {
        if n == 0 {
            return Err(ProbError::EmptyDistribution);
        }
        Ok(Self {
            p: vec![1.0 / n as f64; n],
        })
    }

    /// Create a point mass at index i.
    pub fn point(n: usize, i: usize) -> Result<Self, ProbError> {
        if i >= n {
            return Err(ProbError::IndexOutOfBounds { index: i, size: n });
        }
        let mut p = vec![0.0; n];
        p[i] = 1.0;
        Ok(Self { p })
    }

    /// The number of outcomes with non-zero probability.
    pub fn support_size(&self) -> usize {
        self.p.iter().filter(|&&x| x > PROB_TOLERANCE).count()
    }

    /// The indices with non-zero probability.
    pub fn support(&self) -> Vec<usize> {
        self.p
            .iter()
            .enumerate()
            .filter(|(_, &x)| x > PROB_TOLERANCE)
            .map(|(i, _)| i)
            .collect()
    }

    /// The number of outcomes in the sample space.
    pub fn len(&self) -> usize {
        self.p.len()
    }

    pub fn is_empty(&self) -> bool {
        self.p.is_empty()
    }

    /// Get the probability of outcome i.
    pub fn prob(&self, i: usize) -> Result<f64, ProbError> {
        self.p.get(i).copied().ok_or(ProbError::IndexOutOfBounds {
            index: i,
            size: self.p.len(),
        })
    }

    /// Sample from the distribution using a uniform random value in [0, 1).
    ///
    /// This uses inverse transform sampling.
    pub fn sample(&self, u: f64) -> usize {
        let mut cumsum = 0.0;
        for (i, &p) in self.p.iter().enumerate() {
            cumsum += p;
            if u < cumsum {
                return i;
            }
        }
        // u = 1.0 or rounding
        self.p.len() - 1
    }

    /// Sample with a caller-supplied generator.
    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.sample(rng.gen::<f64>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_dist_new_valid() {
        let d = Dist::new(vec![0.3, 0.7]).unwrap();
        assert_eq!(d.p.len(), 2);
        assert!((d.p[0] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_dist_new_not_normalized() {
        let result = Dist::new(vec![0.3, 0.6]);
        assert!(matches!(result, Err(ProbError::NotNormalized { .. })));
    }

    #[test]
    fn test_dist_new_negative() {
        let result = Dist::new(vec![-0.5, 1.5]);
        assert!(matches!(result, Err(ProbError::NegativeProbability)));
    }

    #[test]
    fn test_dist_from_weights() {
        let d = Dist::from_weights(vec![0.49, 0.21, 0.21, 0.09]).unwrap();
        assert!((d.p[0] - 0.49).abs() < 1e-9);
        assert!(matches!(
            Dist::from_weights(vec![0.0, 0.0]),
            Err(ProbError::ZeroWeights)
        ));
    }

    #[test]
    fn test_dist_uniform_and_point() {
        let d = Dist::uniform(4).unwrap();
        assert!(d.p.iter().all(|p| (p - 0.25).abs() < 1e-9));
        assert!(Dist::uniform(0).is_err());

        let d = Dist::point(5, 2).unwrap();
        assert_eq!(d.support(), vec![2]);
        assert!(matches!(
            Dist::point(3, 3),
            Err(ProbError::IndexOutOfBounds { index: 3, size: 3 })
        ));
    }

    #[test]
    fn test_sample() {
        let d = Dist::new(vec![0.3, 0.7]).unwrap();
        assert_eq!(d.sample(0.0), 0);
        assert_eq!(d.sample(0.29), 0);
        assert_eq!(d.sample(0.31), 1);
        assert_eq!(d.sample(1.0), 1);
    }

    #[test]
    fn test_sample_with_matches_frequencies() {
        let d = Dist::new(vec![0.7, 0.3]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let n = 20_000;
        let hits = (0..n).filter(|_| d.sample_with(&mut rng) == 0).count();
        let freq = hits as f64 / n as f64;
        assert!((freq - 0.7).abs() < 0.02, "frequency {freq}");
    }
}
