//! Distribution utilities: sparse token->weight maps, dense index->weight
//! vectors, normalisation and KL divergence.
//!
//! Reference upstream: `src/summarizer/distribution.h`, `src/distribution.cc`.

use std::collections::HashMap;

/// Default additive (Laplace) smoothing applied to the reference
/// distribution in `kl_divergence`.
pub const DEFAULT_SMOOTHING: f64 = 1e-7;

/// A sparse token -> non-negative weight mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseDistribution {
    weights: HashMap<String, f64>,
}

impl SparseDistribution {
    pub fn new() -> Self {
        Self {
            weights: HashMap::new(),
        }
    }

    pub fn from_map(weights: HashMap<String, f64>) -> Self {
        Self { weights }
    }

    pub fn get(&self, token: &str) -> f64 {
        self.weights.get(token).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, token: &str, weight: f64) {
        self.weights.insert(token.to_string(), weight);
    }

    pub fn add(&mut self, token: &str, delta: f64) {
        *self.weights.entry(token.to_string()).or_insert(0.0) += delta;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Scale weights in place so they sum to 1, unless the sum is already 1
    /// or is not strictly positive (the zero distribution is left alone).
    pub fn normalize(&mut self) {
        let total = self.sum();
        if total > 0.0 && (total - 1.0).abs() > f64::EPSILON {
            for w in self.weights.values_mut() {
                *w /= total;
            }
        }
    }

    /// Entries sorted descending by weight, ties broken by token for
    /// determinism.
    pub fn to_sorted_vec(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> =
            self.weights.iter().map(|(k, &v)| (k.clone(), v)).collect();
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap().then_with(|| a.0.cmp(&b.0)));
        entries
    }

    /// Reconstruct a distribution from a sorted (word, value) sequence, the
    /// form used by `to_sorted_vec` and by the persisted/printable forms.
    pub fn from_sorted_vec(entries: Vec<(String, f64)>) -> Self {
        Self::from_map(entries.into_iter().collect())
    }

    /// Tab-separated "word\tvalue" printable form, one entry per line,
    /// descending by weight, rounded to `precision` decimals. Entries that
    /// round to zero are omitted and terminate the listing (matches the
    /// upstream printable-distribution cutoff).
    pub fn to_printable(&self, precision: usize) -> String {
        let mut out = String::new();
        for (word, value) in self.to_sorted_vec() {
            let rounded = format!("{:.*}", precision, value);
            if rounded.trim_start_matches(['0', '.', '-']).is_empty() {
                break;
            }
            out.push_str(&word);
            out.push('\t');
            out.push_str(&rounded);
            out.push('\n');
        }
        out
    }
}

/// A fixed-length dense vector indexed by lexicon id.
///
/// `top_words_threshold` is meaningful only on the collection vector, used
/// by the KLSum redundancy check; per-sentence vectors leave it at 0 and
/// instead carry `sentence_ref`/`document_ref`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseVector {
    pub weights: Vec<f64>,
    pub top_words_threshold: f64,
    pub sentence_ref: Option<usize>,
    pub document_ref: Option<usize>,
}

impl DenseVector {
    pub fn zeros(len: usize) -> Self {
        Self {
            weights: vec![0.0; len],
            top_words_threshold: 0.0,
            sentence_ref: None,
            document_ref: None,
        }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Element-wise sum of `self` and `other`, returned as a new vector.
    /// Carries `self`'s back-references and threshold.
    pub fn add(&self, other: &DenseVector) -> DenseVector {
        debug_assert_eq!(self.len(), other.len());
        let weights = self
            .weights
            .iter()
            .zip(other.weights.iter())
            .map(|(a, b)| a + b)
            .collect();
        DenseVector {
            weights,
            top_words_threshold: self.top_words_threshold,
            sentence_ref: self.sentence_ref,
            document_ref: self.document_ref,
        }
    }

    /// Element-wise difference `self - other`, returned as a new vector.
    pub fn sub(&self, other: &DenseVector) -> DenseVector {
        debug_assert_eq!(self.len(), other.len());
        let weights = self
            .weights
            .iter()
            .zip(other.weights.iter())
            .map(|(a, b)| a - b)
            .collect();
        DenseVector {
            weights,
            top_words_threshold: self.top_words_threshold,
            sentence_ref: self.sentence_ref,
            document_ref: self.document_ref,
        }
    }

    pub fn add_in_place(&mut self, other: &DenseVector) {
        debug_assert_eq!(self.len(), other.len());
        for (a, b) in self.weights.iter_mut().zip(other.weights.iter()) {
            *a += b;
        }
    }

    pub fn sub_in_place(&mut self, other: &DenseVector) {
        debug_assert_eq!(self.len(), other.len());
        for (a, b) in self.weights.iter_mut().zip(other.weights.iter()) {
            *a -= b;
        }
    }

    /// A copy scaled to sum to 1 (or left as-is if the sum isn't positive).
    pub fn normalized(&self) -> DenseVector {
        let total = self.sum();
        let mut out = self.clone();
        if total > 0.0 {
            for w in out.weights.iter_mut() {
                *w /= total;
            }
        }
        out
    }
}

/// KL divergence of `reference` (smoothed) from `summary`:
/// `sum_i summary_i * log(summary_i / smoothed_reference_i)`.
///
/// `reference` receives additive-Laplace smoothing: `(b_i + s) / (1 + L*s)`.
/// Terms where `summary_i == 0` contribute 0 rather than `0 * -inf = NaN`.
pub fn kl_divergence(summary: &[f64], reference: &[f64], smoothing: f64) -> f64 {
    assert_eq!(summary.len(), reference.len());
    let len = summary.len() as f64;
    let denom = 1.0 + len * smoothing;
    summary
        .iter()
        .zip(reference.iter())
        .map(|(&a, &b)| {
            if a == 0.0 {
                0.0
            } else {
                let b_smoothed = (b + smoothing) / denom;
                a * (a / b_smoothed).ln()
            }
        })
        .sum()
}
