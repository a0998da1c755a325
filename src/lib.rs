//! Extractive multi-document summarisation: KLSum over a direct term
//! frequency distribution, or over a distribution estimated by a
//! three-topic TopicSum Gibbs sampler.

pub mod distribution;
pub mod document;
pub mod error;
pub mod facade;
pub mod gibbs;
pub mod klsum;
pub mod lexicon;
pub mod options;
pub mod postprocessor;
pub mod sampling;
pub mod topicsum;
pub mod xml;

pub use distribution::{kl_divergence, DenseVector, SparseDistribution};
pub use document::{Collection, Document, Sentence, Token};
pub use error::{Result, SummarizerError};
pub use facade::Summarizer;
pub use gibbs::{train, GibbsConfig, GibbsModel, LikelihoodSample};
pub use klsum::KlSum;
pub use lexicon::Lexicon;
pub use options::{
    ArticleInput, KlSumOptions, LengthUnit, OptimizationStrategy, SummarizeOptions, SummaryLength,
    TopicSumOptions,
};
pub use postprocessor::{Compressed, NewsPostprocessorOptions, PostProcessor};
pub use sampling::Sampler;
pub use topicsum::TopicSumSampler;
