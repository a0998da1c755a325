//! Error model for the summariser.
//!
//! Reference upstream: `src/summarizer/*.h` report failures either as a
//! C++ `bool` return plus an appended log line, or (array/lexicon misuse)
//! as a `CHECK`-style fatal abort. We collapse both into one discriminated
//! type so the public API has a single `Result` alias to propagate with `?`.

use thiserror::Error;

/// The four error kinds a caller of this crate can observe.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SummarizerError {
    /// Bad or missing configuration: wrong hyperparameter arity, unsupported
    /// length unit, missing summary length. Recoverable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Bad input data: XML parse failure, score/sentence count mismatch,
    /// empty collection. Recoverable.
    #[error("input error: {0}")]
    Input(String),

    /// A programming-error condition: negative index, out-of-range token
    /// id, unknown topic label. Not meant to be recovered from, but still
    /// surfaced as a typed error rather than a panic at the public boundary.
    #[error("invariant violation: {0}")]
    Invariant(String),

    /// A transient/data condition, e.g. an effective collection
    /// distribution that is all-zero. Recoverable.
    #[error("transient error: {0}")]
    Transient(String),
}

pub type Result<T> = std::result::Result<T, SummarizerError>;
