//! Ranked retrieval of code elements for natural-language prompts.
//!
//! Structural records (classes with their packages, methods and imports) are tokenized
//! into [`Document`]s, indexed into a TF-IDF vector space and ranked by cosine similarity
//! against a prompt's tokens.

pub mod config;
pub mod corpus;
pub mod error;
pub mod format;
pub mod search;
pub mod server;
pub mod state;
pub mod tracing;

pub use config::Config;
pub use corpus::{CodeElement, Corpus, DocId, Document, Method, TokenCategory};
pub use error::{IndexError, LoadError};
pub use search::{ScoredDocument, Searcher, Tokenizer};
pub use state::EngineState;
