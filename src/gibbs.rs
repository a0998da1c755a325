//! Generic collapsed Gibbs sampler skeleton.
//!
//! Reference upstream: `src/summarizer/gibbs.h`, `src/gibbs.cc`. Upstream
//! models this as a base class that subclasses override; here it's a
//! `GibbsModel` trait driven by a free `train` function, so there is no
//! inheritance and no virtual dispatch overhead for the per-iteration hot
//! path.

use crate::sampling::Sampler;

/// Hyperparameters governing one `train` run.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct GibbsConfig {
    pub iterations: usize,
    pub burnin: usize,
    pub lag: usize,
    pub track_likelihood: bool,
}

/// One recorded (iteration, likelihood) point, only populated when
/// `track_likelihood` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LikelihoodSample {
    pub iteration: usize,
    pub likelihood: f64,
}

/// Behaviour a concrete sampler (e.g. `TopicSumSampler`) must supply.
pub trait GibbsModel {
    /// Allocate counters and clear parameter accumulators.
    fn init(&mut self);

    /// Assign an initial topic to every token occurrence and update
    /// counters accordingly.
    fn initial_assignment(&mut self, sampler: &mut Sampler);

    /// Run one full sweep over all token occurrences.
    fn iteration(&mut self, sampler: &mut Sampler);

    /// Add one point estimate of the model's parameters into the running
    /// accumulators (the caller tracks how many samples have been taken).
    fn calculate_params(&mut self);

    /// Scale the parameter accumulators by `factor` — used both to turn
    /// running sums into means (factor = 1/count) and to restore sums
    /// before the next `calculate_params` call (factor = count).
    fn multiply_params(&mut self, factor: f64);

    /// Log-likelihood of the training data under the current parameter
    /// estimates (expected to be called on means, not sums).
    fn model_likelihood(&self) -> f64;
}

/// Run the authoritative train loop from the Gibbs sampler skeleton:
/// `init`, `initial_assignment`, then `burnin + iterations` sweeps, taking
/// a parameter sample whenever not in burn-in and the lag gate passes.
/// Accumulators are converted from sums to means exactly once, after the
/// loop.
pub fn train<M: GibbsModel>(
    model: &mut M,
    sampler: &mut Sampler,
    config: &GibbsConfig,
) -> Vec<LikelihoodSample> {
    model.init();
    model.initial_assignment(sampler);

    let total = config.burnin + config.iterations;
    let mut samples_taken: usize = 0;
    let mut likelihoods = Vec::new();

    for i in 0..total {
        // Burn-in is "i <= B"; B == 0 means burn-in never applies, per the
        // skeleton's own (ambiguous but preserved) wording.
        let burnin = i <= config.burnin && config.burnin > 0;
        model.iteration(sampler);

        let lag_ok = config.lag == 0 || i % config.lag == 0;
        if !burnin && lag_ok {
            model.calculate_params();
            samples_taken += 1;
            tracing::debug!(iteration = i, samples_taken, "gibbs sample taken");

            if config.track_likelihood {
                model.multiply_params(1.0 / samples_taken as f64);
                let likelihood = model.model_likelihood();
                model.multiply_params(samples_taken as f64);
                likelihoods.push(LikelihoodSample {
                    iteration: i,
                    likelihood,
                });
            }
        } else {
            tracing::debug!(iteration = i, burnin, "gibbs iteration (no sample)");
        }
    }

    if samples_taken > 0 {
        model.multiply_params(1.0 / samples_taken as f64);
    }

    likelihoods
}
