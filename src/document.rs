//! Document model: Sentence, Document, Collection value types plus
//! term-frequency aggregation.
//!
//! Reference upstream: `src/summarizer/document.h`, `src/document.cc`,
//! `src/document_test.cc`.

use std::collections::HashMap;

/// A non-empty string token. Tokens are not permitted to contain
/// whitespace (the join/split round trip in `Sentence::joined_text`
/// depends on that).
pub type Token = String;

/// An ordered sequence of tokens, with optional POS tags, raw text, prior
/// score, summariser score, and source-document id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sentence {
    tokens: Vec<Token>,
    pos_tags: Vec<String>,
    raw: Option<String>,
    prior_score: Option<f64>,
    score: Option<f64>,
    source_document: Option<String>,
    /// Set when this sentence is a `fit_to_size` tail cut off from its
    /// original tokens. Rendering-only: does not count towards `len()`.
    truncated: bool,
}

impl Sentence {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos_tags: Vec::new(),
            raw: None,
            prior_score: None,
            score: None,
            source_document: None,
            truncated: false,
        }
    }

    pub fn with_pos_tags(mut self, pos_tags: Vec<String>) -> Self {
        self.pos_tags = pos_tags;
        self
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    pub fn with_prior_score(mut self, prior: f64) -> Self {
        self.prior_score = Some(prior);
        self
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn pos_tags(&self) -> &[String] {
        &self.pos_tags
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn prior_score(&self) -> f64 {
        self.prior_score.unwrap_or(0.0)
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn set_score(&mut self, score: f64) {
        self.score = Some(score);
    }

    pub fn source_document(&self) -> Option<&str> {
        self.source_document.as_deref()
    }

    pub fn set_source_document(&mut self, id: impl Into<String>) {
        self.source_document = Some(id.into());
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Marks this sentence as truncated by `fit_to_size`: `joined_text`
    /// will render a trailing `[...]` marker, but `len()` and `term_freq`
    /// are unaffected since no token is added.
    pub fn set_truncated(&mut self) {
        self.truncated = true;
    }

    /// Whether POS tags, if present, line up 1:1 with tokens.
    pub fn pos_tags_valid(&self) -> bool {
        self.pos_tags.is_empty() || self.pos_tags.len() == self.tokens.len()
    }

    /// Tokens joined by a single space; re-splitting on whitespace
    /// reconstructs the original token list (tokens must not contain
    /// spaces, per the type's contract).
    pub fn joined_text(&self) -> String {
        if self.truncated {
            let mut text = self.tokens.join(" ");
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str("[...]");
            text
        } else {
            self.tokens.join(" ")
        }
    }

    /// Per-sentence term frequency: token -> occurrence count.
    pub fn term_freq(&self) -> HashMap<Token, u64> {
        let mut counts = HashMap::new();
        for tok in &self.tokens {
            *counts.entry(tok.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// An ordered sequence of sentences with a cached token count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    sentences: Vec<Sentence>,
    token_count: usize,
    id: Option<String>,
    title: Option<String>,
}

impl Document {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        let token_count = sentences.iter().map(Sentence::len).sum();
        Self {
            sentences,
            token_count,
            id: None,
            title: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn sentences_mut(&mut self) -> &mut Vec<Sentence> {
        &mut self.sentences
    }

    pub fn push_sentence(&mut self, sentence: Sentence) {
        self.token_count += sentence.len();
        self.sentences.push(sentence);
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Aggregated term frequency over every sentence in the document.
    pub fn term_freq(&self) -> HashMap<Token, u64> {
        let mut counts = HashMap::new();
        for sentence in &self.sentences {
            for (tok, c) in sentence.term_freq() {
                *counts.entry(tok).or_insert(0) += c;
            }
        }
        counts
    }

    /// Summary rendered as sentences joined by newlines, each sentence's
    /// tokens joined by a single space. Used for the CHARACTER length unit.
    pub fn rendered_text(&self) -> String {
        self.sentences
            .iter()
            .map(Sentence::joined_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn rendered_char_count(&self) -> usize {
        self.rendered_text().chars().count()
    }

    /// Truncate to exactly `n` tokens, rendering a trailing `"[...]"`
    /// marker on the last kept sentence. The marker is display-only and
    /// does not count towards `token_count`. A no-op if the document
    /// already has `n` or fewer tokens.
    pub fn fit_to_size(&self, n: usize) -> Document {
        if self.token_count <= n {
            return self.clone();
        }

        let mut kept = Vec::new();
        let mut remaining = n;
        for sentence in &self.sentences {
            if remaining == 0 {
                break;
            }
            if sentence.len() <= remaining {
                remaining -= sentence.len();
                kept.push(sentence.clone());
            } else {
                let tokens: Vec<Token> = sentence.tokens()[..remaining].to_vec();
                kept.push(Sentence::new(tokens));
                remaining = 0;
            }
        }
        if let Some(last) = kept.last_mut() {
            last.set_truncated();
        }

        let mut truncated = Document::new(kept);
        if let Some(id) = &self.id {
            truncated = truncated.with_id(id.clone());
        }
        if let Some(title) = &self.title {
            truncated = truncated.with_title(title.clone());
        }
        truncated
    }
}

/// An ordered sequence of documents with a cached sentence count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    documents: Vec<Document>,
    sentence_count: usize,
    id: Option<String>,
}

impl Collection {
    pub fn new(documents: Vec<Document>) -> Self {
        let sentence_count = documents.iter().map(Document::sentence_count).sum();
        Self {
            documents,
            sentence_count,
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn push_document(&mut self, document: Document) {
        self.sentence_count += document.sentence_count();
        self.documents.push(document);
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentence_count
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Aggregated term frequency over every document in the collection.
    pub fn term_freq(&self) -> HashMap<Token, u64> {
        let mut counts = HashMap::new();
        for document in &self.documents {
            for (tok, c) in document.term_freq() {
                *counts.entry(tok).or_insert(0) += c;
            }
        }
        counts
    }
}
