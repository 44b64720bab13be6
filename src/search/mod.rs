//! Lexical search engine over code identifiers.
//!
//! This module provides tokenization, a TF-IDF vector-space index, pluggable relevance
//! scoring and top-K ranked retrieval.

pub mod index;
pub mod prompt;
pub mod scoring;
pub mod searcher;
pub mod tokenize;

pub use index::{IndexSnapshot, InvertedIndex, QueryVector, TermVector};
pub use prompt::analyze_prompt;
pub use scoring::{CosineScorer, OverlapScorer, Scorer, ScoringMode};
pub use searcher::{ScoredDocument, Searcher};
pub use tokenize::{TokenSet, Tokenizer};
