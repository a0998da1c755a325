//! Sampling primitives: uniform and multinomial draws over an explicit,
//! seedable PRNG.
//!
//! Reference upstream: `src/summarizer/sampling.h`, `src/sampling.cc`,
//! `src/sampling_test.cc`. Upstream keeps a process-global generator seeded
//! once by the caller; here the generator is an explicit field threaded
//! into the samplers that need it, which gives the same determinism under
//! a caller-supplied seed without the global state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A seedable PRNG wrapper shared by the Gibbs sampler and KLSum.
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    /// Construct a sampler seeded deterministically from `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Construct a sampler seeded from OS entropy (non-deterministic).
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Draw a uniform integer in `[0, k)`.
    pub fn sample_uniform(&mut self, k: usize) -> usize {
        assert!(k > 0, "sample_uniform requires a positive range");
        self.rng.gen_range(0..k)
    }

    /// Draw an index from a (not necessarily normalised) multinomial
    /// distribution `p` of length `k`: draw `x` in `[0, 1)`, walk the
    /// running cumulative sum, and return the first index whose
    /// cumulative weight is `>= x`. Falls back to `k - 1` if numerical
    /// slack leaves the cumulative sum short of `x`.
    pub fn sample_multinomial(&mut self, p: &[f64]) -> usize {
        let k = p.len();
        assert!(k > 0, "sample_multinomial requires a non-empty distribution");
        let x: f64 = self.rng.gen_range(0.0..1.0);
        let mut cumulative = 0.0;
        for (i, &weight) in p.iter().enumerate() {
            cumulative += weight;
            if cumulative >= x {
                return i;
            }
        }
        k - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sampler_is_deterministic() {
        let mut a = Sampler::from_seed(42);
        let mut b = Sampler::from_seed(42);
        let draws_a: Vec<usize> = (0..20).map(|_| a.sample_uniform(10)).collect();
        let draws_b: Vec<usize> = (0..20).map(|_| b.sample_uniform(10)).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn uniform_stays_in_range() {
        let mut s = Sampler::from_seed(7);
        for _ in 0..200 {
            assert!(s.sample_uniform(5) < 5);
        }
    }

    #[test]
    fn multinomial_respects_heavily_skewed_distribution() {
        let mut s = Sampler::from_seed(1);
        let p = vec![0.0, 1.0, 0.0];
        for _ in 0..50 {
            assert_eq!(s.sample_multinomial(&p), 1);
        }
    }

    #[test]
    fn multinomial_falls_back_to_last_index_on_short_sum() {
        let mut s = Sampler::from_seed(1);
        // Sum < 1: for a draw x close to 1, no prefix reaches x, so we must
        // fall back to the last index.
        let p = vec![0.01, 0.01];
        let mut saw_fallback = false;
        for _ in 0..500 {
            if s.sample_multinomial(&p) == 1 {
                saw_fallback = true;
                break;
            }
        }
        assert!(saw_fallback);
    }
}
