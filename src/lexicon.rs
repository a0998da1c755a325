//! Lexicon — append-only bijection between string tokens and dense ids.
//!
//! Reference upstream implementation: `src/summarizer/lexicon.h`,
//! `src/lexicon.cc`.
//!
//! Ids are assigned in insertion order starting at 0. `add` is idempotent:
//! re-adding a known token returns its existing id rather than allocating a
//! new one.

use std::collections::HashMap;

/// Sentinel returned by `id_of` for a token that hasn't been added yet.
pub const NOT_PRESENT: usize = usize::MAX;

/// Append-only token <-> id bijection.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    token_to_id: HashMap<String, usize>,
    id_to_token: Vec<String>,
}

impl Lexicon {
    /// Create an empty lexicon.
    pub fn new() -> Self {
        Self {
            token_to_id: HashMap::new(),
            id_to_token: Vec::new(),
        }
    }

    /// Insert `token` if not already present; return its id either way.
    pub fn add(&mut self, token: &str) -> usize {
        if let Some(&id) = self.token_to_id.get(token) {
            return id;
        }
        let id = self.id_to_token.len();
        self.id_to_token.push(token.to_string());
        self.token_to_id.insert(token.to_string(), id);
        id
    }

    /// Look up the id of `token`, or `NOT_PRESENT` if it was never added.
    pub fn id_of(&self, token: &str) -> usize {
        self.token_to_id.get(token).copied().unwrap_or(NOT_PRESENT)
    }

    /// Look up the token for `id`.
    ///
    /// # Panics
    /// `id` must be a valid id previously returned by `add`. Calling with an
    /// out-of-range id is a programming error, not a data condition, and is
    /// fatal (matches the upstream `CHECK` on out-of-range lookups).
    pub fn token_of(&self, id: usize) -> &str {
        &self.id_to_token[id]
    }

    /// Number of distinct tokens added so far.
    pub fn size(&self) -> usize {
        self.id_to_token.len()
    }

    /// Whether `token` has been added.
    pub fn contains(&self, token: &str) -> bool {
        self.token_to_id.contains_key(token)
    }

    /// Whether the lexicon holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_assigns_ids_in_insertion_order() {
        let mut lex = Lexicon::new();
        assert_eq!(lex.add("toto"), 0);
        assert_eq!(lex.add("le"), 1);
        assert_eq!(lex.add("heros"), 2);

        assert_eq!(lex.token_of(2), "heros");
        assert_eq!(lex.id_of("le"), 1);

        for tok in ["la", "vie", "de", "toto"] {
            lex.add(tok);
        }

        assert_eq!(lex.token_of(4), "vie");
        assert_eq!(lex.id_of("toto"), 0);
        assert_eq!(lex.size(), 6);
    }

    #[test]
    fn add_is_idempotent() {
        let mut lex = Lexicon::new();
        let a = lex.add("cat");
        let b = lex.add("cat");
        assert_eq!(a, b);
        assert_eq!(lex.size(), 1);
    }

    #[test]
    fn id_of_unknown_is_not_present() {
        let lex = Lexicon::new();
        assert_eq!(lex.id_of("nope"), NOT_PRESENT);
        assert!(!lex.contains("nope"));
    }

    #[test]
    fn token_round_trips_through_id() {
        let mut lex = Lexicon::new();
        for tok in ["alpha", "beta", "gamma", "alpha"] {
            let id = lex.add(tok);
            assert_eq!(lex.token_of(lex.id_of(tok)), tok);
            assert!(id < lex.size());
        }
    }

    #[test]
    #[should_panic]
    fn token_of_invalid_id_is_fatal() {
        let lex = Lexicon::new();
        let _ = lex.token_of(0);
    }
}
