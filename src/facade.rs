//! Facade composing ingestion with KLSum, directly or via a trained
//! TopicSum collection distribution.
//!
//! Reference upstream: `src/summarizer.cc`'s `Summarizer` driver, which
//! wires article ingestion to either the plain KLSum path or the
//! TopicSum-then-KLSum path and tracks the last recoverable error for the
//! caller.

use crate::distribution::SparseDistribution;
use crate::document::{Collection, Document};
use crate::error::{Result, SummarizerError};
use crate::gibbs::train;
use crate::klsum::KlSum;
use crate::options::{ArticleInput, KlSumOptions, SummarizeOptions, TopicSumOptions};
use crate::sampling::Sampler;
use crate::topicsum::TopicSumSampler;
use crate::xml;

/// Entry point composing article ingestion with one of the two
/// summarisation strategies. Owns the last recoverable error so callers
/// can inspect it after a failed call without threading a `Result`
/// through every layer themselves.
#[derive(Debug, Default)]
pub struct Summarizer {
    last_error: Option<String>,
}

impl Summarizer {
    pub fn new() -> Self {
        Self { last_error: None }
    }

    /// Message of the most recent recoverable (`Configuration`/`Input`/
    /// `Transient`) error, if any call has failed so far.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn record(&mut self, err: SummarizerError) -> SummarizerError {
        if !matches!(err, SummarizerError::Invariant(_)) {
            self.last_error = Some(err.to_string());
        }
        err
    }

    fn build_collection(&mut self, articles: &[ArticleInput]) -> Result<Collection> {
        let mut documents = Vec::new();
        for article in articles {
            let mut document = match xml::parse_article(&article.content) {
                Ok(d) => d,
                Err(e) => return Err(self.record(e)),
            };

            if !article.scores.is_empty() {
                if article.scores.len() != document.sentence_count() {
                    return Err(self.record(SummarizerError::Input(format!(
                        "article {:?} has {} scores but {} sentences",
                        document.id(),
                        article.scores.len(),
                        document.sentence_count()
                    ))));
                }
                for (sentence, &score) in document.sentences_mut().iter_mut().zip(article.scores.iter()) {
                    *sentence = std::mem::take(sentence).with_prior_score(score);
                }
            }

            documents.push(document);
        }
        Ok(Collection::new(documents))
    }

    /// Plain KLSum: the collection distribution is the direct term
    /// frequency over the ingested articles.
    pub fn summarize_direct(
        &mut self,
        articles: &[ArticleInput],
        klsum_options: KlSumOptions,
        summarize_options: SummarizeOptions,
    ) -> Result<(Document, Option<String>)> {
        let collection = self.build_collection(articles)?;
        let engine = match KlSum::from_term_frequency(collection, klsum_options) {
            Ok(e) => e,
            Err(e) => return Err(self.record(e)),
        };
        engine
            .summarize(summarize_options.length, summarize_options.generate_debug)
            .map_err(|e| self.record(e))
    }

    /// TopicSum-backed KLSum: train a single-collection TopicSum sampler,
    /// then run KLSum against its `collection_distribution(0)`.
    pub fn summarize_topicsum(
        &mut self,
        articles: &[ArticleInput],
        topicsum_options: TopicSumOptions,
        klsum_options: KlSumOptions,
        summarize_options: SummarizeOptions,
        seed: u64,
        fixed_background: Option<&SparseDistribution>,
    ) -> Result<(Document, Option<String>)> {
        let collection = self.build_collection(articles)?;
        let collections = [collection.clone()];

        let mut sampler = match TopicSumSampler::new(
            &collections,
            topicsum_options.lambda,
            topicsum_options.gamma,
            fixed_background,
        ) {
            Ok(s) => s,
            Err(e) => return Err(self.record(e)),
        };

        let mut rng = Sampler::from_seed(seed);
        train(&mut sampler, &mut rng, &topicsum_options.gibbs_sampling_options);
        let collection_distribution = sampler.collection_distribution(0);

        let engine = match KlSum::new(collection, collection_distribution, klsum_options) {
            Ok(e) => e,
            Err(e) => return Err(self.record(e)),
        };
        engine
            .summarize(summarize_options.length, summarize_options.generate_debug)
            .map_err(|e| self.record(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gibbs::GibbsConfig;
    use crate::options::{LengthUnit, SummaryLength};

    fn article(id: &str, sentences: &[&str]) -> String {
        let body: String = sentences
            .iter()
            .map(|s| {
                let tokens: String = s
                    .split_whitespace()
                    .map(|t| format!("<token pos=\"NN\">{t}</token>"))
                    .collect();
                format!("<sentence><plainText>{s}</plainText><tokens>{tokens}</tokens></sentence>")
            })
            .collect();
        format!(
            "<article id=\"{id}\"><title>T</title><body><item><text><p>{body}</p></text></item></body></article>"
        )
    }

    #[test]
    fn direct_mode_returns_a_summary() {
        let mut summarizer = Summarizer::new();
        let articles = vec![ArticleInput {
            content: article(
                "a1",
                &[
                    "the cat sat on the mat",
                    "the dog barked loudly outside",
                    "a bird flew over the house",
                ],
            ),
            scores: vec![],
        }];
        let (summary, _) = summarizer
            .summarize_direct(
                &articles,
                KlSumOptions::default(),
                SummarizeOptions {
                    length: SummaryLength {
                        unit: LengthUnit::Sentence,
                        length: 2,
                    },
                    generate_debug: false,
                },
            )
            .unwrap();
        assert_eq!(summary.sentence_count(), 2);
        assert!(summarizer.last_error().is_none());
    }

    #[test]
    fn mismatched_score_count_is_recorded_as_last_error() {
        let mut summarizer = Summarizer::new();
        let articles = vec![ArticleInput {
            content: article("a1", &["the cat sat on the mat"]),
            scores: vec![1.0, 2.0],
        }];
        let result = summarizer.summarize_direct(
            &articles,
            KlSumOptions::default(),
            SummarizeOptions {
                length: SummaryLength {
                    unit: LengthUnit::Sentence,
                    length: 1,
                },
                generate_debug: false,
            },
        );
        assert!(result.is_err());
        assert!(summarizer.last_error().is_some());
    }

    #[test]
    fn topicsum_mode_trains_and_summarizes() {
        let mut summarizer = Summarizer::new();
        let articles = vec![ArticleInput {
            content: article(
                "a1",
                &[
                    "apple iphone ipad company",
                    "apple banana fruit company",
                    "apple iphone company profits",
                ],
            ),
            scores: vec![],
        }];
        let topicsum_options = TopicSumOptions::from_triples(
            "0.1,0.1,0.1",
            "2,3,0",
            GibbsConfig {
                iterations: 20,
                burnin: 5,
                lag: 1,
                track_likelihood: false,
            },
        )
        .unwrap();
        let (summary, _) = summarizer
            .summarize_topicsum(
                &articles,
                topicsum_options,
                KlSumOptions::default(),
                SummarizeOptions {
                    length: SummaryLength {
                        unit: LengthUnit::Sentence,
                        length: 2,
                    },
                    generate_debug: false,
                },
                0,
                None,
            )
            .unwrap();
        assert_eq!(summary.sentence_count(), 2);
    }
}
