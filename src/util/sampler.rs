use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws an index with probability proportional to its weight.
pub trait WeightedSampler {
    /// `None` when no weight is positive or some weight is not finite.
    fn sample(&mut self, weights: &[f64]) -> Option<usize>;
}

pub struct RandSampler<R: Rng> {
    rng: R,
}

impl<R: Rng> RandSampler<R> {
    pub fn new(rng: R) -> Self {
        RandSampler { rng }
    }
}

impl RandSampler<StdRng> {
    /// Seeded runs are reproducible; `None` seeds from the OS.
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        RandSampler { rng }
    }
}

impl<R: Rng> WeightedSampler for RandSampler<R> {
    fn sample(&mut self, weights: &[f64]) -> Option<usize> {
        if weights.iter().any(|w| !w.is_finite()) {
            return None;
        }
        WeightedIndex::new(weights)
            .ok()
            .map(|dist| dist.sample(&mut self.rng))
    }
}

/// Always takes the heaviest weight, the lowest index on ties.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedySampler;

impl WeightedSampler for GreedySampler {
    fn sample(&mut self, weights: &[f64]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &w) in weights.iter().enumerate() {
            if !w.is_finite() {
                return None;
            }
            if w > 0.0 && best.map_or(true, |(_, b)| w > b) {
                best = Some((i, w));
            }
        }
        best.map(|(i, _)| i)
    }
}
