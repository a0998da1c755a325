//! Declarative configuration types for the facade, mirroring the option
//! groups of the external interface one-for-one: article inputs,
//! `topicsum_options`, `klsum_options`, `news_postprocessor_options`, and
//! the summary length/debug request.
//!
//! Reference upstream: the option protobufs implied by
//! `src/summarizer.cc`/`src/example.cc` (no `.proto` survived filtering,
//! but the field names are stable across the `run_*` drivers and tests).
//! serde mirrors the teacher crate's own `Config` (`core/src/lib.rs`) in
//! spirit: plain derived structs, no builder boilerplate.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SummarizerError};
use crate::gibbs::GibbsConfig;
use crate::postprocessor::NewsPostprocessorOptions;

/// One article's raw XML content plus any caller-supplied sentence prior
/// scores (must match the article's sentence count once parsed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleInput {
    pub content: String,
    #[serde(default)]
    pub scores: Vec<f64>,
}

/// `topicsum_options`: hyperparameters plus Gibbs sampling schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSumOptions {
    pub lambda: [f64; 3],
    pub gamma: [f64; 3],
    pub gibbs_sampling_options: GibbsConfig,
}

impl TopicSumOptions {
    /// Parse `lambda`/`gamma` from comma-separated triples, e.g. `"0.1,0.1,0.1"`.
    pub fn from_triples(
        lambda: &str,
        gamma: &str,
        gibbs_sampling_options: GibbsConfig,
    ) -> Result<Self> {
        Ok(Self {
            lambda: parse_triple(lambda)?,
            gamma: parse_triple(gamma)?,
            gibbs_sampling_options,
        })
    }
}

fn parse_triple(s: &str) -> Result<[f64; 3]> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(SummarizerError::Configuration(format!(
            "expected exactly 3 comma-separated values, got {} in {s:?}",
            parts.len()
        )));
    }
    let mut out = [0.0; 3];
    for (i, part) in parts.iter().enumerate() {
        out[i] = part.parse::<f64>().map_err(|e| {
            SummarizerError::Configuration(format!("invalid hyperparameter {part:?}: {e}"))
        })?;
    }
    Ok(out)
}

/// Optimisation strategy selector for `klsum_options.optimization_strategy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStrategy {
    Greedy,
    SentenceRanking,
}

/// `klsum_options`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KlSumOptions {
    pub optimization_strategy: OptimizationStrategy,
    pub redundancy_removal: bool,
    pub sentence_position: bool,
    pub postprocessor_name: String,
    #[serde(default)]
    pub news_postprocessor_options: NewsPostprocessorOptions,
    pub summary_weight: f64,
    pub prior_weight: f64,
}

impl Default for KlSumOptions {
    fn default() -> Self {
        Self {
            optimization_strategy: OptimizationStrategy::Greedy,
            redundancy_removal: false,
            sentence_position: false,
            postprocessor_name: "None".to_string(),
            news_postprocessor_options: NewsPostprocessorOptions::default(),
            summary_weight: 1.0,
            prior_weight: 0.0,
        }
    }
}

/// Unit in which a summary length budget is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LengthUnit {
    Token,
    Sentence,
    Character,
}

/// A summary length budget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SummaryLength {
    pub unit: LengthUnit,
    pub length: usize,
}

/// Top-level `Summarize` request options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeOptions {
    pub length: SummaryLength,
    #[serde(default)]
    pub generate_debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_triple_accepts_well_formed_input() {
        assert_eq!(parse_triple("0.1,0.1,0.1").unwrap(), [0.1, 0.1, 0.1]);
        assert_eq!(parse_triple(" 2, 3 , 0 ").unwrap(), [2.0, 3.0, 0.0]);
    }

    #[test]
    fn parse_triple_rejects_wrong_arity() {
        assert!(parse_triple("0.1,0.1").is_err());
        assert!(parse_triple("0.1,0.1,0.1,0.1").is_err());
    }

    #[test]
    fn parse_triple_rejects_non_numeric() {
        assert!(parse_triple("a,b,c").is_err());
    }

    #[test]
    fn topicsum_options_round_trip_through_toml() {
        let opts = TopicSumOptions::from_triples(
            "0.1,0.1,0.1",
            "2,3,0",
            GibbsConfig {
                iterations: 100,
                burnin: 10,
                lag: 1,
                track_likelihood: false,
            },
        )
        .unwrap();
        let serialized = toml::to_string(&opts).unwrap();
        let restored: TopicSumOptions = toml::from_str(&serialized).unwrap();
        assert_eq!(restored.lambda, opts.lambda);
        assert_eq!(restored.gamma, opts.gamma);
    }
}
