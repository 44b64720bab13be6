//! The searchable corpus: structural records, their tokenized documents, and ingestion.

pub mod document;
pub mod element;
pub mod ingest;

pub use document::{Document, TokenCategory};
pub use element::{CodeElement, Method};

use crate::search::tokenize::Tokenizer;
use std::sync::Arc;

/// Position of a document within its corpus. Doubles as the identity key for index
/// structures and as the tie-break order for equal scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocId(usize);

impl DocId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// An ordered, immutable snapshot of documents.
///
/// Corpora are shared behind `Arc`; the searcher reuses a built index for as long as it is
/// handed the same `Arc<Corpus>`.
#[derive(Debug, Default)]
pub struct Corpus {
    documents: Vec<Arc<Document>>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents: documents.into_iter().map(Arc::new).collect(),
        }
    }

    /// Tokenize each element into a document, preserving input order.
    pub fn from_elements(
        elements: impl IntoIterator<Item = CodeElement>,
        tokenizer: &Tokenizer,
    ) -> Self {
        Self::new(
            elements
                .into_iter()
                .map(|element| Document::new(element, tokenizer))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: DocId) -> Option<&Arc<Document>> {
        self.documents.get(id.0)
    }

    /// Documents paired with their ids, in corpus order.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &Arc<Document>)> {
        self.documents
            .iter()
            .enumerate()
            .map(|(i, doc)| (DocId(i), doc))
    }
}
