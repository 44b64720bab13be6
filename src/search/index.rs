//! TF-IDF vector-space index over a corpus.
//!
//! An [`IndexSnapshot`] is an immutable, mutually consistent set of postings, IDF values,
//! document vectors and norms for one corpus. [`InvertedIndex`] publishes snapshots by
//! swapping an `Arc`, so concurrent readers always observe one complete snapshot.

use crate::corpus::{Corpus, DocId, TokenCategory};
use crate::error::IndexError;
use crate::search::tokenize::TokenSet;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::{collections::BTreeSet, sync::Arc};

/// Sparse token → weight vector.
pub type TermVector = AHashMap<String, f64>;

/// Euclidean length of a sparse vector.
pub fn l2_norm(vector: &TermVector) -> f64 {
    vector.values().map(|w| w * w).sum::<f64>().sqrt()
}

/// Smoothed inverse document frequency: `ln((N + 1) / (df + 1)) + 1`.
///
/// Strictly positive for every `df <= N` and strictly decreasing in `df`.
pub fn smoothed_idf(total_docs: usize, doc_freq: usize) -> f64 {
    ((total_docs as f64 + 1.0) / (doc_freq as f64 + 1.0)).ln() + 1.0
}

/// A query expressed in the index's vector space.
#[derive(Debug, Clone, Default)]
pub struct QueryVector {
    weights: TermVector,
    norm: f64,
}

impl QueryVector {
    pub fn new(weights: TermVector) -> Self {
        let norm = l2_norm(&weights);
        Self { weights, norm }
    }

    pub fn weights(&self) -> &TermVector {
        &self.weights
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// True when no query token is in the vocabulary.
    pub fn is_zero(&self) -> bool {
        self.norm == 0.0
    }

    /// Dot product against a document vector.
    pub fn dot(&self, document: &TermVector) -> f64 {
        self.weights
            .iter()
            .filter_map(|(token, weight)| document.get(token).map(|d| weight * d))
            .sum()
    }
}

/// One built index. Never mutated after construction.
#[derive(Debug)]
pub struct IndexSnapshot {
    corpus: Arc<Corpus>,
    /// Token → documents containing it in any category, ascending by id
    postings: AHashMap<String, Vec<DocId>>,
    idf: AHashMap<String, f64>,
    /// Indexed by `DocId`
    vectors: Vec<TermVector>,
    norms: Vec<f64>,
}

impl IndexSnapshot {
    /// Build postings, IDF table, document vectors and norms for `corpus`.
    pub fn build(corpus: Arc<Corpus>) -> Self {
        let start = std::time::Instant::now();

        let mut postings: AHashMap<String, Vec<DocId>> = AHashMap::new();
        for (id, doc) in corpus.iter() {
            for category in TokenCategory::ALL {
                for token in doc.tokens(category) {
                    if let Some(docs) = postings.get_mut(token.as_str()) {
                        // Documents arrive in id order, so a repeat is always the last entry
                        if docs.last() != Some(&id) {
                            docs.push(id);
                        }
                    } else {
                        postings.insert(token.clone(), vec![id]);
                    }
                }
            }
        }

        let total_docs = corpus.len();
        let idf: AHashMap<String, f64> = postings
            .iter()
            .map(|(token, docs)| (token.clone(), smoothed_idf(total_docs, docs.len())))
            .collect();

        let vectors: Vec<TermVector> = corpus
            .iter()
            .map(|(_, doc)| {
                let mut term_freqs: AHashMap<&str, f64> = AHashMap::new();
                for category in TokenCategory::ALL {
                    for token in doc.tokens(category) {
                        *term_freqs.entry(token.as_str()).or_insert(0.0) += category.weight();
                    }
                }
                let total: f64 = term_freqs.values().sum();

                term_freqs
                    .into_iter()
                    .filter_map(|(token, freq)| {
                        let tf_idf = freq / total * idf.get(token).copied().unwrap_or(0.0);
                        (tf_idf > 0.0).then(|| (token.to_owned(), tf_idf))
                    })
                    .collect()
            })
            .collect();

        let norms = vectors.iter().map(l2_norm).collect();

        tracing::info!(
            "Built search index: {} unique tokens, {} documents in {:?}",
            postings.len(),
            total_docs,
            start.elapsed()
        );

        Self {
            corpus,
            postings,
            idf,
            vectors,
            norms,
        }
    }

    /// The corpus this snapshot was built from.
    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    pub fn vocabulary_size(&self) -> usize {
        self.postings.len()
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.postings.contains_key(token)
    }

    /// Documents containing `token`, ascending by id. Empty for unknown tokens.
    pub fn postings(&self, token: &str) -> &[DocId] {
        match self.postings.get(token) {
            Some(docs) => docs,
            None => &[],
        }
    }

    /// Union of the postings of every query token in the vocabulary.
    pub fn candidates(&self, query_tokens: &TokenSet) -> BTreeSet<DocId> {
        query_tokens
            .iter()
            .flat_map(|token| self.postings(token).iter().copied())
            .collect()
    }

    /// Binary-presence query weighted by IDF; out-of-vocabulary tokens are dropped.
    pub fn query_vector(&self, query_tokens: &TokenSet) -> QueryVector {
        let weights = query_tokens
            .iter()
            .filter_map(|token| {
                let idf = self.idf(token);
                (idf > 0.0).then(|| (token.clone(), idf))
            })
            .collect();
        QueryVector::new(weights)
    }

    pub fn document_vector(&self, doc: DocId) -> Option<&TermVector> {
        self.vectors.get(doc.index())
    }

    /// L2 norm of a document vector, or 0 for unknown documents.
    pub fn document_norm(&self, doc: DocId) -> f64 {
        self.norms.get(doc.index()).copied().unwrap_or(0.0)
    }

    /// IDF of a token, or 0 for tokens outside the vocabulary.
    pub fn idf(&self, token: &str) -> f64 {
        self.idf.get(token).copied().unwrap_or(0.0)
    }
}

/// Holder of the current index snapshot.
///
/// Starts unbuilt; reads before the first [`InvertedIndex::build`] fail with
/// [`IndexError::InvalidState`]. A build constructs the new snapshot without holding the
/// lock and publishes it with a single pointer swap.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    current: RwLock<Option<Arc<IndexSnapshot>>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot with one built from `corpus`.
    pub fn build(&self, corpus: Arc<Corpus>) -> Arc<IndexSnapshot> {
        tracing::info!("Building inverted index for {} code elements", corpus.len());
        let snapshot = Arc::new(IndexSnapshot::build(corpus));
        *self.current.write() = Some(Arc::clone(&snapshot));
        snapshot
    }

    pub fn is_built(&self) -> bool {
        self.current.read().is_some()
    }

    /// The current snapshot, held independently of later rebuilds.
    pub fn snapshot(&self) -> Result<Arc<IndexSnapshot>, IndexError> {
        self.current.read().clone().ok_or(IndexError::InvalidState)
    }

    pub fn get_candidates(&self, query_tokens: &TokenSet) -> Result<BTreeSet<DocId>, IndexError> {
        Ok(self.snapshot()?.candidates(query_tokens))
    }

    pub fn build_query_vector(&self, query_tokens: &TokenSet) -> Result<QueryVector, IndexError> {
        Ok(self.snapshot()?.query_vector(query_tokens))
    }

    /// Document vector, empty when the index is unbuilt or the document unknown.
    pub fn get_document_vector(&self, doc: DocId) -> TermVector {
        self.snapshot()
            .ok()
            .and_then(|s| s.document_vector(doc).cloned())
            .unwrap_or_default()
    }

    pub fn get_document_norm(&self, doc: DocId) -> f64 {
        self.snapshot().map_or(0.0, |s| s.document_norm(doc))
    }

    pub fn get_token_idf(&self, token: &str) -> f64 {
        self.snapshot().map_or(0.0, |s| s.idf(token))
    }
}
