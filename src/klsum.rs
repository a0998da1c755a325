//! KLSum: greedy and ranking sentence selection minimising KL divergence
//! between a running summary vector and a collection distribution.
//!
//! Reference upstream: `src/summarizer/klsum.h`, `src/klsum.cc`,
//! `src/klsum_test.cc`.

use crate::distribution::{kl_divergence, DenseVector, SparseDistribution, DEFAULT_SMOOTHING};
use crate::document::{Collection, Document, Sentence};
use crate::error::{Result, SummarizerError};
use crate::lexicon::Lexicon;
use crate::options::{KlSumOptions, LengthUnit, OptimizationStrategy, SummaryLength};
use crate::postprocessor::{Compressed, PostProcessor};

/// One candidate sentence surviving initial filtering (non-empty, valid
/// under the installed post-processor), with its dense count vector
/// aligned to the engine's lexicon.
struct Candidate {
    vector: DenseVector,
    sentence: Sentence,
    document_id: Option<String>,
    /// 1-based position of the sentence within its source document.
    position: usize,
}

/// Greedy KL-divergence sentence selector over one collection.
pub struct KlSum {
    collection: Collection,
    lexicon: Lexicon,
    collection_dense: DenseVector,
    options: KlSumOptions,
    postprocessor: PostProcessor,
}

impl KlSum {
    /// Build an engine whose collection distribution is the direct term
    /// frequency over `collection` (plain KLSum mode).
    pub fn from_term_frequency(collection: Collection, options: KlSumOptions) -> Result<Self> {
        let counts = collection.term_freq();
        let mut dist = SparseDistribution::new();
        for (token, count) in counts {
            dist.set(&token, count as f64);
        }
        dist.normalize();
        Self::new(collection, dist, options)
    }

    /// Build an engine whose collection distribution is supplied directly
    /// (the TopicSum wrapper's `collection_distribution(0)`).
    pub fn new(
        collection: Collection,
        collection_distribution: SparseDistribution,
        options: KlSumOptions,
    ) -> Result<Self> {
        if collection.is_empty() {
            return Err(SummarizerError::Input(
                "KLSum requires a non-empty collection".to_string(),
            ));
        }

        let mut lexicon = Lexicon::new();
        for document in collection.documents() {
            for sentence in document.sentences() {
                for token in sentence.tokens() {
                    lexicon.add(token);
                }
            }
        }

        let mut collection_dense = DenseVector::zeros(lexicon.size());
        for (token, weight) in collection_distribution.iter() {
            if lexicon.contains(token) {
                collection_dense.weights[lexicon.id_of(token)] = weight;
            }
        }
        if collection_dense.sum() <= 0.0 {
            return Err(SummarizerError::Transient(
                "effective collection distribution is all zero".to_string(),
            ));
        }

        let postprocessor =
            PostProcessor::by_name(&options.postprocessor_name, options.news_postprocessor_options);

        Ok(Self {
            collection,
            lexicon,
            collection_dense,
            options,
            postprocessor,
        })
    }

    /// Filter the collection's sentences down to non-empty,
    /// post-processor-valid candidates with dense count vectors.
    fn build_candidates(&self) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for document in self.collection.documents() {
            for (si, sentence) in document.sentences().iter().enumerate() {
                if sentence.is_empty() {
                    continue;
                }
                if !self.postprocessor.is_valid(sentence) {
                    continue;
                }
                let mut vector = DenseVector::zeros(self.lexicon.size());
                for (token, count) in sentence.term_freq() {
                    let id = self.lexicon.id_of(&token);
                    vector.weights[id] = count as f64;
                }
                candidates.push(Candidate {
                    vector,
                    sentence: sentence.clone(),
                    document_id: document.id().map(String::from),
                    position: si + 1,
                });
            }
        }
        candidates
    }

    /// Value at rank `W - t` of the collection's weights, ascending, or the
    /// minimum element if `W - t <= 0`.
    fn top_words_threshold(&self, t: usize) -> f64 {
        let mut sorted = self.collection_dense.weights.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let w = sorted.len();
        if w == 0 {
            return 0.0;
        }
        let rank = w as isize - t as isize;
        if rank <= 0 {
            sorted[0]
        } else {
            sorted[(rank as usize).min(w - 1)]
        }
    }

    fn score(&self, summary: &DenseVector, candidate: &Candidate) -> f64 {
        let combined = summary.add(&candidate.vector);
        let normalized = combined.normalized();
        let mut kl = kl_divergence(&self.collection_dense.weights, &normalized.weights, DEFAULT_SMOOTHING);
        if self.options.sentence_position {
            kl *= 1.0 + (candidate.position as f64).ln();
        }
        self.options.summary_weight * kl + self.options.prior_weight * candidate.sentence.prior_score()
    }

    fn is_redundant(&self, summary: &DenseVector, candidate: &DenseVector, threshold: f64) -> bool {
        let mut n_tokens = 0usize;
        let mut n_coll = 0usize;
        let mut n_new_coll = 0usize;
        for i in 0..candidate.len() {
            if candidate.weights[i] == 0.0 {
                continue;
            }
            n_tokens += 1;
            if self.collection_dense.weights[i] > threshold {
                n_coll += 1;
                if summary.weights[i] == 0.0 {
                    n_new_coll += 1;
                }
            }
        }
        if n_new_coll < 1 {
            return true;
        }
        if (n_new_coll as f64 / n_tokens as f64) < 0.25 {
            return true;
        }
        if n_coll > 0 && (n_new_coll as f64 / n_coll as f64) < 0.67 {
            return true;
        }
        false
    }

    fn accumulated_length(&self, unit: LengthUnit, summary: &DenseVector, sentence_count: usize) -> f64 {
        match unit {
            LengthUnit::Token => summary.sum(),
            LengthUnit::Sentence => sentence_count as f64,
            LengthUnit::Character => unreachable!("CHARACTER is rejected before selection starts"),
        }
    }

    fn finish_sentence(&self, candidate: Candidate, score: f64) -> Sentence {
        let compressed = self.postprocessor.compress(candidate.sentence.clone());
        let mut sentence = match compressed {
            Compressed::Modified(s) | Compressed::Unchanged(s) => s,
            Compressed::Dropped => candidate.sentence,
        };
        sentence.set_score(score);
        if let Some(id) = candidate.document_id {
            sentence.set_source_document(id);
        }
        sentence
    }

    /// Run selection and return the produced summary document plus, if
    /// `generate_debug` is set, a human-readable trace.
    pub fn summarize(&self, length: SummaryLength, generate_debug: bool) -> Result<(Document, Option<String>)> {
        if length.unit == LengthUnit::Character {
            return Err(SummarizerError::Configuration(
                "KLSum does not support the CHARACTER length unit".to_string(),
            ));
        }

        let t = match length.unit {
            LengthUnit::Token => length.length,
            LengthUnit::Sentence => 15 * length.length,
            LengthUnit::Character => unreachable!(),
        };
        let threshold = self.top_words_threshold(t);

        let mut candidates: Vec<Option<Candidate>> = self.build_candidates().into_iter().map(Some).collect();
        let mut summary_vec = DenseVector::zeros(self.lexicon.size());
        let mut summary_sentences: Vec<Sentence> = Vec::new();
        let mut debug_lines = Vec::new();

        match self.options.optimization_strategy {
            OptimizationStrategy::Greedy => {
                loop {
                    if self.accumulated_length(length.unit, &summary_vec, summary_sentences.len()) >= length.length as f64
                    {
                        break;
                    }

                    let mut best: Option<(usize, f64)> = None;
                    for (i, slot) in candidates.iter().enumerate() {
                        let Some(candidate) = slot else { continue };
                        let score = self.score(&summary_vec, candidate);
                        if best.map(|(_, b)| score < b).unwrap_or(true) {
                            best = Some((i, score));
                        }
                    }
                    let Some((i, score)) = best else {
                        break;
                    };

                    let candidate = candidates[i].take().expect("index chosen from a live slot");
                    if self.options.redundancy_removal
                        && self.is_redundant(&summary_vec, &candidate.vector, threshold)
                    {
                        tracing::debug!(position = candidate.position, "skipping redundant candidate");
                        if generate_debug {
                            debug_lines.push(format!("reject (redundant): {}", candidate.sentence.joined_text()));
                        }
                        continue;
                    }

                    tracing::debug!(score, position = candidate.position, "accepting candidate");
                    if generate_debug {
                        debug_lines.push(format!("accept (score {score:.4}): {}", candidate.sentence.joined_text()));
                    }
                    summary_vec.add_in_place(&candidate.vector);
                    summary_sentences.push(self.finish_sentence(candidate, score));
                }
            }
            OptimizationStrategy::SentenceRanking => {
                let mut scored: Vec<(f64, Candidate)> = candidates
                    .into_iter()
                    .flatten()
                    .map(|c| {
                        let score = self.score(&summary_vec, &c);
                        (score, c)
                    })
                    .collect();
                scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

                for (score, candidate) in scored {
                    if self.accumulated_length(length.unit, &summary_vec, summary_sentences.len()) >= length.length as f64
                    {
                        break;
                    }
                    tracing::debug!(score, position = candidate.position, "ranked candidate accepted");
                    if generate_debug {
                        debug_lines.push(format!("accept (score {score:.4}): {}", candidate.sentence.joined_text()));
                    }
                    summary_vec.add_in_place(&candidate.vector);
                    summary_sentences.push(self.finish_sentence(candidate, score));
                }
            }
        }

        let document = Document::new(summary_sentences);
        let debug_string = if generate_debug {
            let mut s = format!(
                "collection distribution:\n{}",
                self.collection_distribution().to_printable(4)
            );
            s.push_str("selection trace:\n");
            for line in debug_lines {
                s.push_str(&line);
                s.push('\n');
            }
            Some(s)
        } else {
            None
        };

        Ok((document, debug_string))
    }

    /// The engine's collection distribution, recovered from the dense
    /// working vector for display/debugging purposes.
    pub fn collection_distribution(&self) -> SparseDistribution {
        let mut dist = SparseDistribution::new();
        for (id, &weight) in self.collection_dense.weights.iter().enumerate() {
            if weight > 0.0 {
                dist.set(self.lexicon.token_of(id), weight);
            }
        }
        dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document as Doc, Sentence as Sent};

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn sample_collection() -> Collection {
        let doc = Doc::new(vec![
            Sent::new(toks(&["the", "cat", "sat", "on", "the", "mat"])).with_raw("the cat sat on the mat"),
            Sent::new(toks(&["the", "dog", "barked", "loudly", "outside"])).with_raw("the dog barked loudly outside"),
            Sent::new(toks(&["a", "bird", "flew", "over", "the", "house"])).with_raw("a bird flew over the house"),
        ])
        .with_id("doc1");
        Collection::new(vec![doc])
    }

    #[test]
    fn character_unit_is_rejected() {
        let engine = KlSum::from_term_frequency(sample_collection(), KlSumOptions::default()).unwrap();
        let result = engine.summarize(
            SummaryLength {
                unit: LengthUnit::Character,
                length: 10,
            },
            false,
        );
        assert!(matches!(result, Err(SummarizerError::Configuration(_))));
    }

    #[test]
    fn large_limit_returns_every_sentence() {
        let engine = KlSum::from_term_frequency(sample_collection(), KlSumOptions::default()).unwrap();
        let (summary, _) = engine
            .summarize(
                SummaryLength {
                    unit: LengthUnit::Token,
                    length: 1000,
                },
                false,
            )
            .unwrap();
        assert_eq!(summary.sentence_count(), 3);
    }

    #[test]
    fn sentence_ranking_scores_are_non_decreasing() {
        let options = KlSumOptions {
            optimization_strategy: OptimizationStrategy::SentenceRanking,
            ..KlSumOptions::default()
        };
        let engine = KlSum::from_term_frequency(sample_collection(), options).unwrap();
        let (summary, _) = engine
            .summarize(
                SummaryLength {
                    unit: LengthUnit::Sentence,
                    length: 3,
                },
                false,
            )
            .unwrap();
        let scores: Vec<f64> = summary.sentences().iter().map(|s| s.score().unwrap()).collect();
        for pair in scores.windows(2) {
            assert!(pair[0] <= pair[1] + 1e-9);
        }
    }

    #[test]
    fn greedy_limit_of_one_sentence_picks_a_single_best_candidate() {
        let engine = KlSum::from_term_frequency(sample_collection(), KlSumOptions::default()).unwrap();
        let (summary, _) = engine
            .summarize(
                SummaryLength {
                    unit: LengthUnit::Sentence,
                    length: 1,
                },
                false,
            )
            .unwrap();
        assert_eq!(summary.sentence_count(), 1);
    }

    #[test]
    fn debug_string_is_populated_when_requested() {
        let engine = KlSum::from_term_frequency(sample_collection(), KlSumOptions::default()).unwrap();
        let (_, debug) = engine
            .summarize(
                SummaryLength {
                    unit: LengthUnit::Sentence,
                    length: 2,
                },
                true,
            )
            .unwrap();
        assert!(debug.is_some());
        assert!(debug.unwrap().contains("selection trace"));
    }

    #[test]
    fn empty_collection_is_rejected() {
        let empty = Collection::new(vec![]);
        let result = KlSum::from_term_frequency(empty, KlSumOptions::default());
        assert!(matches!(result, Err(SummarizerError::Input(_))));
    }
}
