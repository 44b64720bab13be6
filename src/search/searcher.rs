//! Ranked retrieval over an inverted index.

use super::index::{IndexSnapshot, InvertedIndex};
use super::scoring::{CosineScorer, Query, Scorer};
use super::tokenize::TokenSet;
use crate::corpus::{Corpus, DocId, Document};
use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    sync::Arc,
};

/// A document paired with its relevance score.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document: Arc<Document>,
    pub doc_id: DocId,
    pub score: f64,
}

/// Ranks documents against query tokens.
///
/// The index is built lazily for the first corpus searched and reused for as long as the
/// same `Arc<Corpus>` is passed. Handing over a different corpus, or calling
/// [`Searcher::rebuild`], publishes a fresh snapshot.
#[derive(Debug)]
pub struct Searcher {
    index: InvertedIndex,
    scorer: Box<dyn Scorer>,
    min_score: Option<f64>,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(Box::new(CosineScorer))
    }
}

impl Searcher {
    pub fn new(scorer: Box<dyn Scorer>) -> Self {
        Self {
            index: InvertedIndex::new(),
            scorer,
            min_score: None,
        }
    }

    /// Override the scorer's default relevance floor.
    #[must_use]
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// The relevance floor in effect: returned scores are strictly above it.
    pub fn min_score(&self) -> f64 {
        self.min_score
            .unwrap_or_else(|| self.scorer.default_floor())
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Explicitly rebuild the index for `corpus`.
    pub fn rebuild(&self, corpus: &Arc<Corpus>) -> Arc<IndexSnapshot> {
        self.index.build(Arc::clone(corpus))
    }

    fn snapshot_for(&self, corpus: &Arc<Corpus>) -> Arc<IndexSnapshot> {
        match self.index.snapshot() {
            Ok(snapshot) if Arc::ptr_eq(snapshot.corpus(), corpus) => snapshot,
            _ => self.rebuild(corpus),
        }
    }

    /// Return up to `max_results` documents scoring above the floor, best first.
    ///
    /// Equal scores are ordered by corpus position. Empty query tokens, a query with no
    /// vocabulary overlap and `max_results == 0` all yield an empty list.
    pub fn search(
        &self,
        query_tokens: &TokenSet,
        corpus: &Arc<Corpus>,
        max_results: usize,
    ) -> Vec<ScoredDocument> {
        if query_tokens.is_empty() {
            tracing::warn!("No query tokens provided for search");
            return vec![];
        }

        let snapshot = self.snapshot_for(corpus);

        let query = Query {
            tokens: query_tokens,
            vector: snapshot.query_vector(query_tokens),
        };
        if query.vector.is_zero() {
            tracing::warn!("Query vector has zero norm, no query token is in the vocabulary");
            return vec![];
        }

        let candidates = snapshot.candidates(query_tokens);
        tracing::debug!(
            "Scoring {} of {} documents for {} query tokens",
            candidates.len(),
            corpus.len(),
            query_tokens.len()
        );

        // No more than the candidates can be returned
        let mut top = TopK::new(max_results.min(candidates.len()), self.min_score());
        for doc_id in candidates {
            top.offer(self.scorer.score(&snapshot, &query, doc_id), doc_id);
        }

        let results: Vec<ScoredDocument> = top
            .into_ranked()
            .into_iter()
            .filter_map(|ranked| {
                snapshot.corpus().get(ranked.doc).map(|document| ScoredDocument {
                    document: Arc::clone(document),
                    doc_id: ranked.doc,
                    score: ranked.score,
                })
            })
            .collect();

        tracing::info!("Found {} matching elements", results.len());
        results
    }
}

/// A scored candidate, ordered so that "greater" means "ranks higher".
#[derive(Debug, Clone, Copy)]
struct Ranked {
    score: f64,
    doc: DocId,
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.doc.cmp(&self.doc))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

/// Bounded min-heap of the best candidates seen so far.
///
/// Once full, the floor rises to the weakest retained score: nothing at or below it can
/// enter the final top-K. Candidates must be offered in ascending `DocId` order for
/// equal-score ties to resolve towards the earlier document.
struct TopK {
    capacity: usize,
    floor: f64,
    heap: BinaryHeap<Reverse<Ranked>>,
}

impl TopK {
    fn new(capacity: usize, floor: f64) -> Self {
        Self {
            capacity,
            floor,
            heap: BinaryHeap::with_capacity(capacity.saturating_add(1)),
        }
    }

    fn offer(&mut self, score: f64, doc: DocId) {
        if self.capacity == 0 || !(score > self.floor) {
            return;
        }

        self.heap.push(Reverse(Ranked { score, doc }));
        if self.heap.len() > self.capacity {
            self.heap.pop();
            if let Some(Reverse(weakest)) = self.heap.peek() {
                self.floor = weakest.score;
            }
        }
    }

    /// Best first.
    fn into_ranked(self) -> Vec<Ranked> {
        // Ascending order of `Reverse` is descending rank
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(ranked)| ranked)
            .collect()
    }
}
