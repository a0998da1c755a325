//! TopicSum: a three-topic (background / collection / document) collapsed
//! Gibbs sampler over a set of collections, used to estimate each
//! collection's word distribution for KLSum.
//!
//! Reference upstream: `src/summarizer/topicsum.h`, `src/topicsum.cc`,
//! `src/summarizer/topicsumgibbs.h`, `src/topicsumgibbs.cc`,
//! `src/topicsum_test.cc`.
//!
//! Counter bookkeeping follows the design-notes guidance to flatten the
//! ragged `[collection][document][sentence][topic]` structure into
//! contiguous, offset-indexed vectors (see `Topology`) rather than nested
//! `Vec<Vec<Vec<_>>>` trees, for cache behaviour and to make the
//! `(c, d, s) -> base index` mapping explicit and testable.

use crate::distribution::SparseDistribution;
use crate::document::Collection;
use crate::error::{Result, SummarizerError};
use crate::gibbs::GibbsModel;
use crate::lexicon::Lexicon;
use crate::sampling::Sampler;

/// Topic labels. Stored as `u8` (not an enum) so the hot Gibbs loop can
/// index counter arrays directly; an out-of-range value here would be an
/// invariant violation, not a data condition.
const BKG: u8 = 0;
const COL: u8 = 1;
const DOC: u8 = 2;
const NUM_TOPICS: usize = 3;

/// Precomputed `(collection, document, sentence) -> offset` structure
/// flattening the ragged collection/document/sentence hierarchy.
struct Topology {
    /// Number of collections.
    num_collections: usize,
    /// `doc_offset[c]` = global document index of collection c's first
    /// document; `doc_offset[num_collections]` = total document count.
    doc_offset: Vec<usize>,
    /// `sent_offset[gd]` = global sentence index of document gd's first
    /// sentence; `sent_offset[total_docs]` = total sentence count.
    sent_offset: Vec<usize>,
    /// `token_offset[gs]` = global token index of sentence gs's first
    /// token; `token_offset[total_sentences]` = total token count.
    token_offset: Vec<usize>,
    /// For each global sentence, which collection it belongs to.
    sent_collection: Vec<usize>,
    /// For each global sentence, its global document index.
    sent_document: Vec<usize>,
    /// Flat array of lexicon ids, one per token occurrence, in document
    /// order.
    words: Vec<usize>,
}

impl Topology {
    fn num_documents(&self) -> usize {
        self.doc_offset[self.num_collections]
    }

    fn num_sentences(&self) -> usize {
        self.sent_offset[self.num_documents()]
    }

    fn num_tokens(&self) -> usize {
        self.token_offset[self.num_sentences()]
    }

}

fn build_topology(collections: &[Collection], lexicon: &mut Lexicon) -> Topology {
    let num_collections = collections.len();
    let mut doc_offset = Vec::with_capacity(num_collections + 1);
    let mut sent_offset = Vec::new();
    let mut token_offset = Vec::new();
    let mut sent_collection = Vec::new();
    let mut sent_document = Vec::new();
    let mut words = Vec::new();

    doc_offset.push(0);
    sent_offset.push(0);
    let mut gd = 0usize;
    for collection in collections {
        for document in collection.documents() {
            for sentence in document.sentences() {
                sent_collection.push(doc_offset.len() - 1);
                sent_document.push(gd);
                token_offset.push(words.len());
                for token in sentence.tokens() {
                    words.push(lexicon.add(token));
                }
            }
            sent_offset.push(sent_collection.len());
            gd += 1;
        }
        doc_offset.push(gd);
    }
    token_offset.push(words.len());

    Topology {
        num_collections,
        doc_offset,
        sent_offset,
        token_offset,
        sent_collection,
        sent_document,
        words,
    }
}

/// A three-topic collapsed Gibbs sampler over background / collection /
/// document topics, trained jointly across one or more collections.
pub struct TopicSumSampler {
    lambda: [f64; 3],
    gamma: [f64; 3],
    lexicon: Lexicon,
    topology: Topology,
    vocab_size: usize,
    clamped_background: bool,

    // Counters (leave-one-out, "rest" counts during sampling).
    nwb: Vec<u32>,
    nb: u32,
    nwc: Vec<Vec<u32>>,
    nc: Vec<u32>,
    nwd: Vec<Vec<u32>>,
    nd: Vec<u32>,
    nzs: Vec<[u32; NUM_TOPICS]>,
    last_z: Vec<u8>,

    // Parameter accumulators (sums during training, means after `train`
    // completes per the skeleton's single end-of-run conversion).
    phi_b: Vec<f64>,
    phi_c: Vec<Vec<f64>>,
    phi_d: Vec<Vec<f64>>,
    psi: Vec<[f64; NUM_TOPICS]>,
}

impl TopicSumSampler {
    /// Build a sampler over `collections`, jointly training one
    /// background topic, one collection topic per collection, and one
    /// document topic per document.
    ///
    /// `fixed_background`, if given, clamps the background word
    /// distribution to the supplied (normalised) weights instead of
    /// estimating it from the data.
    pub fn new(
        collections: &[Collection],
        lambda: [f64; 3],
        gamma: [f64; 3],
        fixed_background: Option<&SparseDistribution>,
    ) -> Result<Self> {
        if collections.is_empty() {
            return Err(SummarizerError::Input(
                "TopicSum requires at least one collection".to_string(),
            ));
        }

        let mut lexicon = Lexicon::new();
        let topology = build_topology(collections, &mut lexicon);
        if topology.num_tokens() == 0 {
            return Err(SummarizerError::Input(
                "TopicSum requires at least one non-empty sentence".to_string(),
            ));
        }

        if let Some(bg) = fixed_background {
            for (token, _) in bg.iter() {
                lexicon.add(token);
            }
        }

        let vocab_size = lexicon.size();
        let num_docs = topology.num_documents();
        let num_sentences = topology.num_sentences();

        let mut sampler = Self {
            lambda,
            gamma,
            lexicon,
            topology,
            vocab_size,
            clamped_background: fixed_background.is_some(),
            nwb: vec![0; vocab_size],
            nb: 0,
            nwc: vec![vec![0; vocab_size]; collections.len()],
            nc: vec![0; collections.len()],
            nwd: vec![vec![0; vocab_size]; num_docs],
            nd: vec![0; num_docs],
            nzs: vec![[0; NUM_TOPICS]; num_sentences],
            last_z: vec![0; 0],
            phi_b: vec![0.0; vocab_size],
            phi_c: vec![vec![0.0; vocab_size]; collections.len()],
            phi_d: vec![vec![0.0; vocab_size]; num_docs],
            psi: vec![[0.0; NUM_TOPICS]; num_sentences],
        };

        if let Some(bg) = fixed_background {
            let mut normalized = bg.clone();
            normalized.normalize();
            let gamma_sum: f64 = gamma.iter().sum();
            let aw = sampler.topology.num_tokens() as f64;
            for (token, weight) in normalized.iter() {
                let id = sampler.lexicon.id_of(token);
                sampler.phi_b[id] = weight;
                sampler.nwb[id] = ((weight * aw * gamma[0] / gamma_sum).floor()).max(0.0) as u32;
            }
            sampler.nb = sampler.nwb.iter().map(|&c| c as u64).sum::<u64>() as u32;
        }

        Ok(sampler)
    }

    fn ns(&self, gs: usize) -> u32 {
        self.nzs[gs].iter().sum()
    }

    fn gamma_sum(&self) -> f64 {
        self.gamma.iter().sum()
    }

    fn decrement(&mut self, c: usize, gd: usize, word: usize, z: u8) {
        match z {
            BKG => {
                if !self.clamped_background {
                    self.nwb[word] -= 1;
                    self.nb -= 1;
                }
            }
            COL => {
                self.nwc[c][word] -= 1;
                self.nc[c] -= 1;
            }
            DOC => {
                self.nwd[gd][word] -= 1;
                self.nd[gd] -= 1;
            }
            other => unreachable!("invalid topic label {other}"),
        }
    }

    fn increment(&mut self, c: usize, gd: usize, word: usize, z: u8) {
        match z {
            BKG => {
                if !self.clamped_background {
                    self.nwb[word] += 1;
                    self.nb += 1;
                }
            }
            COL => {
                self.nwc[c][word] += 1;
                self.nc[c] += 1;
            }
            DOC => {
                self.nwd[gd][word] += 1;
                self.nd[gd] += 1;
            }
            other => unreachable!("invalid topic label {other}"),
        }
    }

    /// Conditional `p(k | rest)` over the three topics for `word` at
    /// sentence `gs` (collection `c`, global document `gd`), given the
    /// current leave-one-out counters.
    fn conditional(&self, c: usize, gd: usize, gs: usize, word: usize) -> [f64; NUM_TOPICS] {
        let w = self.vocab_size as f64;
        let gamma_sum = self.gamma_sum();
        let ns = self.ns(gs) as f64;

        let word_term = |nwz: u32, nz: u32, lambda: f64| -> f64 {
            (nwz as f64 + lambda) / (nz as f64 + w * lambda)
        };
        let topic_term = |k: usize, gamma_k: f64| -> f64 {
            (self.nzs[gs][k] as f64 + gamma_k) / (ns + gamma_sum)
        };

        let p_bkg = word_term(self.nwb[word], self.nb, self.lambda[0]) * topic_term(0, self.gamma[0]);
        let p_col =
            word_term(self.nwc[c][word], self.nc[c], self.lambda[1]) * topic_term(1, self.gamma[1]);
        let p_doc =
            word_term(self.nwd[gd][word], self.nd[gd], self.lambda[2]) * topic_term(2, self.gamma[2]);

        let mut p = [p_bkg, p_col, p_doc];
        let total: f64 = p.iter().sum();
        if total > 0.0 {
            for v in p.iter_mut() {
                *v /= total;
            }
        }
        p
    }

    /// Copy of `phi_C[c]` as a normalised sparse distribution over tokens
    /// with positive weight.
    pub fn collection_distribution(&self, c: usize) -> SparseDistribution {
        let mut dist = SparseDistribution::new();
        for (word_id, &weight) in self.phi_c[c].iter().enumerate() {
            if weight > 0.0 {
                dist.set(self.lexicon.token_of(word_id), weight);
            }
        }
        dist.normalize();
        dist
    }

    /// Copy of `phi_B` as a normalised sparse distribution.
    pub fn background_distribution(&self) -> SparseDistribution {
        let mut dist = SparseDistribution::new();
        for (word_id, &weight) in self.phi_b.iter().enumerate() {
            if weight > 0.0 {
                dist.set(self.lexicon.token_of(word_id), weight);
            }
        }
        dist.normalize();
        dist
    }

    /// Bucket weights for how often `term`'s occurrences were last
    /// assigned to the background topic, to each collection's topic, and
    /// (aggregated) to any document topic. `None` if `term` was never
    /// added to the lexicon.
    pub fn posterior(&self, term: &str) -> Option<SparseDistribution> {
        let target = self.lexicon.id_of(term);
        if target == crate::lexicon::NOT_PRESENT {
            return None;
        }

        let mut dist = SparseDistribution::new();
        for gs in 0..self.topology.num_sentences() {
            let c = self.topology.sent_collection[gs];
            let start = self.topology.token_offset[gs];
            let end = self.topology.token_offset[gs + 1];
            for idx in start..end {
                if self.topology.words[idx] != target {
                    continue;
                }
                match self.last_z[idx] {
                    BKG => dist.add("background", 1.0),
                    COL => dist.add(&c.to_string(), 1.0),
                    DOC => dist.add("document", 1.0),
                    other => unreachable!("invalid topic label {other}"),
                }
            }
        }
        dist.normalize();
        Some(dist)
    }
}

impl GibbsModel for TopicSumSampler {
    fn init(&mut self) {
        for v in self.nwc.iter_mut() {
            v.iter_mut().for_each(|c| *c = 0);
        }
        self.nc.iter_mut().for_each(|c| *c = 0);
        for v in self.nwd.iter_mut() {
            v.iter_mut().for_each(|c| *c = 0);
        }
        self.nd.iter_mut().for_each(|c| *c = 0);
        self.nzs.iter_mut().for_each(|z| *z = [0; NUM_TOPICS]);

        if !self.clamped_background {
            self.nwb.iter_mut().for_each(|c| *c = 0);
            self.nb = 0;
        }

        self.phi_c.iter_mut().for_each(|v| v.iter_mut().for_each(|p| *p = 0.0));
        self.phi_d.iter_mut().for_each(|v| v.iter_mut().for_each(|p| *p = 0.0));
        self.psi.iter_mut().for_each(|p| *p = [0.0; NUM_TOPICS]);
        if !self.clamped_background {
            self.phi_b.iter_mut().for_each(|p| *p = 0.0);
        }

        self.last_z = vec![0; self.topology.num_tokens()];
    }

    fn initial_assignment(&mut self, sampler: &mut Sampler) {
        for gs in 0..self.topology.num_sentences() {
            let c = self.topology.sent_collection[gs];
            let gd = self.topology.sent_document[gs];
            let start = self.topology.token_offset[gs];
            let end = self.topology.token_offset[gs + 1];
            for idx in start..end {
                let word = self.topology.words[idx];
                let z = sampler.sample_uniform(NUM_TOPICS) as u8;
                self.increment(c, gd, word, z);
                self.nzs[gs][z as usize] += 1;
                self.last_z[idx] = z;
            }
        }
    }

    fn iteration(&mut self, sampler: &mut Sampler) {
        for gs in 0..self.topology.num_sentences() {
            let c = self.topology.sent_collection[gs];
            let gd = self.topology.sent_document[gs];
            let start = self.topology.token_offset[gs];
            let end = self.topology.token_offset[gs + 1];
            for idx in start..end {
                let word = self.topology.words[idx];
                let z = self.last_z[idx];

                self.decrement(c, gd, word, z);
                self.nzs[gs][z as usize] -= 1;

                let p = self.conditional(c, gd, gs, word);
                let z_new = sampler.sample_multinomial(&p) as u8;

                self.increment(c, gd, word, z_new);
                self.nzs[gs][z_new as usize] += 1;
                self.last_z[idx] = z_new;
            }
        }
    }

    fn calculate_params(&mut self) {
        let gamma_sum = self.gamma_sum();
        for gs in 0..self.topology.num_sentences() {
            let ns = self.ns(gs) as f64;
            for k in 0..NUM_TOPICS {
                self.psi[gs][k] += (self.nzs[gs][k] as f64 + self.gamma[k]) / (ns + gamma_sum);
            }
        }

        if !self.clamped_background {
            let w = self.vocab_size as f64;
            for word in 0..self.vocab_size {
                self.phi_b[word] += (self.nwb[word] as f64 + self.lambda[0]) / (self.nb as f64 + w * self.lambda[0]);
            }
        }

        let w = self.vocab_size as f64;
        for c in 0..self.nwc.len() {
            for word in 0..self.vocab_size {
                self.phi_c[c][word] +=
                    (self.nwc[c][word] as f64 + self.lambda[1]) / (self.nc[c] as f64 + w * self.lambda[1]);
            }
        }
        for d in 0..self.nwd.len() {
            for word in 0..self.vocab_size {
                self.phi_d[d][word] +=
                    (self.nwd[d][word] as f64 + self.lambda[2]) / (self.nd[d] as f64 + w * self.lambda[2]);
            }
        }
    }

    fn multiply_params(&mut self, factor: f64) {
        if !self.clamped_background {
            self.phi_b.iter_mut().for_each(|p| *p *= factor);
        }
        self.phi_c.iter_mut().for_each(|v| v.iter_mut().for_each(|p| *p *= factor));
        self.phi_d.iter_mut().for_each(|v| v.iter_mut().for_each(|p| *p *= factor));
        self.psi.iter_mut().for_each(|p| p.iter_mut().for_each(|v| *v *= factor));
    }

    fn model_likelihood(&self) -> f64 {
        let mut total = 0.0;
        for gs in 0..self.topology.num_sentences() {
            let c = self.topology.sent_collection[gs];
            let gd = self.topology.sent_document[gs];
            let start = self.topology.token_offset[gs];
            let end = self.topology.token_offset[gs + 1];
            for idx in start..end {
                let word = self.topology.words[idx];
                let p_word = self.psi[gs][0] * self.phi_b[word]
                    + self.psi[gs][1] * self.phi_c[c][word]
                    + self.psi[gs][2] * self.phi_d[gd][word];
                if p_word > 0.0 {
                    total += p_word.ln();
                }
            }
        }
        total
    }
}
