//! Relevance scoring strategies.
//!
//! The searcher delegates per-document scoring to a [`Scorer`]. Cosine similarity over
//! TF-IDF vectors is the default; weighted token overlap is a cheaper alternative that
//! ignores corpus statistics.

use crate::corpus::{DocId, TokenCategory};
use crate::search::index::{IndexSnapshot, QueryVector};
use crate::search::tokenize::TokenSet;
use serde::{Deserialize, Serialize};

/// Minimum cosine similarity for a document to be returned.
pub const COSINE_FLOOR: f64 = 0.01;

/// Minimum weighted overlap for a document to be returned.
pub const OVERLAP_FLOOR: f64 = 0.15;

/// A query as seen by a scorer: its raw tokens and its vector in the snapshot's space.
#[derive(Debug)]
pub struct Query<'a> {
    pub tokens: &'a TokenSet,
    pub vector: QueryVector,
}

/// Scores one candidate document against a query.
pub trait Scorer: Send + Sync + std::fmt::Debug {
    fn score(&self, snapshot: &IndexSnapshot, query: &Query<'_>, doc: DocId) -> f64;

    /// Scores at or below this value are never returned.
    fn default_floor(&self) -> f64;
}

/// Selectable scoring strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    #[default]
    Cosine,
    Overlap,
}

impl ScoringMode {
    pub fn scorer(self) -> Box<dyn Scorer> {
        match self {
            Self::Cosine => Box::new(CosineScorer),
            Self::Overlap => Box::new(OverlapScorer),
        }
    }
}

/// Cosine similarity between the query vector and a document's TF-IDF vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineScorer;

impl Scorer for CosineScorer {
    fn score(&self, snapshot: &IndexSnapshot, query: &Query<'_>, doc: DocId) -> f64 {
        snapshot.document_vector(doc).map_or(0.0, |vector| {
            cosine_similarity(
                query.vector.dot(vector),
                query.vector.norm(),
                snapshot.document_norm(doc),
            )
        })
    }

    fn default_floor(&self) -> f64 {
        COSINE_FLOOR
    }
}

/// `dot / (|q| * |d|)`, defined as 0 when either norm is 0 and clamped to `[0, 1]`.
pub fn cosine_similarity(dot: f64, query_norm: f64, doc_norm: f64) -> f64 {
    if query_norm == 0.0 || doc_norm == 0.0 {
        return 0.0;
    }
    (dot / (query_norm * doc_norm)).clamp(0.0, 1.0)
}

/// Sum over token categories of `weight * |q ∩ c| / |q ∪ c|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapScorer;

impl Scorer for OverlapScorer {
    fn score(&self, snapshot: &IndexSnapshot, query: &Query<'_>, doc: DocId) -> f64 {
        let Some(document) = snapshot.corpus().get(doc) else {
            return 0.0;
        };
        TokenCategory::ALL
            .iter()
            .map(|&category| category.weight() * jaccard(query.tokens, document.tokens(category)))
            .sum()
    }

    fn default_floor(&self) -> f64 {
        OVERLAP_FLOOR
    }
}

/// Jaccard index of two token sets; 0 when either is empty.
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.iter().filter(|token| b.contains(*token)).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn set(tokens: &[&str]) -> TokenSet {
        tokens.iter().map(|t| (*t).to_string()).collect()
    }

    #[rstest]
    #[case(1.0, 0.0, 1.0)]
    #[case(1.0, 1.0, 0.0)]
    #[case(0.0, 0.0, 0.0)]
    fn test_cosine_zero_norm_is_zero(#[case] dot: f64, #[case] q: f64, #[case] d: f64) {
        let score = cosine_similarity(dot, q, d);
        check!(score == 0.0);
        check!(!score.is_nan());
    }

    #[test]
    fn test_cosine_bounds() {
        check!(cosine_similarity(2.0, 1.0, 2.0) == 1.0);
        check!(cosine_similarity(2.0 + 1e-12, 1.0, 2.0) == 1.0);
        check!((cosine_similarity(0.5, 1.0, 1.0) - 0.5).abs() < 1e-12);
    }

    #[rstest]
    #[case(&["a", "b"], &["a", "b"], 1.0)]
    #[case(&["a", "b"], &["b", "c"], 1.0 / 3.0)]
    #[case(&["a"], &["b"], 0.0)]
    #[case(&[], &["b"], 0.0)]
    fn test_jaccard(#[case] a: &[&str], #[case] b: &[&str], #[case] expected: f64) {
        check!((jaccard(&set(a), &set(b)) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_mode_floors() {
        check!(ScoringMode::Cosine.scorer().default_floor() == COSINE_FLOOR);
        check!(ScoringMode::Overlap.scorer().default_floor() == OVERLAP_FLOOR);
        check!(ScoringMode::default() == ScoringMode::Cosine);
    }
}
