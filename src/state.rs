//! Shared engine state behind the MCP tools.
//!
//! Holds the current corpus and the long-lived tokenizer and searcher. Tokenizing a corpus
//! and building its index are CPU-bound, so they run on the blocking pool.

use crate::config::Config;
use crate::corpus::{Corpus, ingest};
use crate::error::Result;
use crate::format::render_context;
use crate::search::{Searcher, Tokenizer, analyze_prompt};
use anyhow::{Context, bail};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Counts describing the loaded corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusSummary {
    pub documents: usize,
    pub vocabulary: usize,
}

/// Counts describing the engine as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub corpus: Option<CorpusSummary>,
    pub cached_inputs: usize,
}

pub struct EngineState {
    config: Config,
    tokenizer: Arc<Tokenizer>,
    searcher: Arc<Searcher>,
    /// Current corpus (if loaded)
    corpus: RwLock<Option<Arc<Corpus>>>,
}

impl std::fmt::Debug for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineState")
            .field("config", &self.config)
            .field("tokenizer", &self.tokenizer)
            .field("index_built", &self.searcher.index().is_built())
            .finish()
    }
}

impl EngineState {
    pub fn new(config: Config) -> Self {
        let mut searcher = Searcher::new(config.scoring.scorer());
        if let Some(min_score) = config.min_score {
            searcher = searcher.with_min_score(min_score);
        }

        Self {
            tokenizer: Arc::new(Tokenizer::with_capacity(config.cache_capacity)),
            searcher: Arc::new(searcher),
            corpus: RwLock::new(None),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the current corpus.
    pub async fn corpus(&self) -> Option<Arc<Corpus>> {
        self.corpus.read().await.clone()
    }

    /// Ingest an analysis file, build its index and make it the current corpus.
    pub async fn load_corpus(&self, path: &Path) -> Result<CorpusSummary> {
        let elements = ingest::load_elements(path).await?;
        let tokenizer = Arc::clone(&self.tokenizer);
        let searcher = Arc::clone(&self.searcher);

        let (corpus, summary) = tokio::task::spawn_blocking(move || {
            let corpus = Arc::new(Corpus::from_elements(elements, &tokenizer));
            let snapshot = searcher.rebuild(&corpus);
            let summary = CorpusSummary {
                documents: corpus.len(),
                vocabulary: snapshot.vocabulary_size(),
            };
            (corpus, summary)
        })
        .await
        .context("Corpus indexing task panicked")?;

        *self.corpus.write().await = Some(corpus);
        tracing::info!(
            "Loaded corpus from {}: {} documents, {} tokens",
            path.display(),
            summary.documents,
            summary.vocabulary
        );
        Ok(summary)
    }

    /// Rebuild the index of the current corpus.
    pub async fn rebuild_index(&self) -> Result<CorpusSummary> {
        let Some(corpus) = self.corpus().await else {
            bail!("No corpus loaded. Use load_corpus first.");
        };
        let searcher = Arc::clone(&self.searcher);

        tokio::task::spawn_blocking(move || {
            let snapshot = searcher.rebuild(&corpus);
            CorpusSummary {
                documents: corpus.len(),
                vocabulary: snapshot.vocabulary_size(),
            }
        })
        .await
        .context("Index rebuild task panicked")
    }

    /// Search the current corpus and render the results as context text.
    pub async fn search(&self, prompt: &str, limit: Option<usize>) -> Result<String> {
        let Some(corpus) = self.corpus().await else {
            bail!("No corpus loaded. Use load_corpus first.");
        };

        let tokens = analyze_prompt(&self.tokenizer, prompt);
        let limit = limit.unwrap_or(self.config.max_results);
        let results = self.searcher.search(&tokens, &corpus, limit);

        Ok(render_context(
            prompt,
            &results,
            self.config.max_imports_shown,
        ))
    }

    pub async fn stats(&self) -> EngineStats {
        let corpus = self.corpus().await;
        let vocabulary = self
            .searcher
            .index()
            .snapshot()
            .ok()
            .filter(|s| corpus.as_ref().is_some_and(|c| Arc::ptr_eq(s.corpus(), c)))
            .map_or(0, |s| s.vocabulary_size());

        EngineStats {
            corpus: corpus.map(|c| CorpusSummary {
                documents: c.len(),
                vocabulary,
            }),
            cached_inputs: self.tokenizer.cache_len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::NO_RESULTS_MESSAGE;
    use assert2::{check, let_assert};

    const ANALYSIS: &str = r#"[
        {"className": ["UserService"], "package": ["com.example.auth"],
         "methods": ["boolean authenticateUser(String name)", "void login()"]},
        {"className": ["DataProcessor"], "package": ["com.example.data"],
         "methods": ["void processData()"]}
    ]"#;

    async fn loaded_state() -> (EngineState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        std::fs::write(&path, ANALYSIS).unwrap();

        let state = EngineState::new(Config::default());
        let_assert!(Ok(summary) = state.load_corpus(&path).await);
        check!(summary.documents == 2);
        (state, dir)
    }

    #[tokio::test]
    async fn test_search_requires_corpus() {
        let state = EngineState::new(Config::default());
        check!(state.search("user", None).await.is_err());
        check!(state.rebuild_index().await.is_err());
        check!(state.stats().await.corpus.is_none());
    }

    #[tokio::test]
    async fn test_load_and_search() {
        let (state, _dir) = loaded_state().await;

        let_assert!(Ok(context) = state.search("user authentication", Some(5)).await);
        check!(context.contains("Class: UserService"));

        let_assert!(Ok(context) = state.search("   ", None).await);
        check!(context == NO_RESULTS_MESSAGE);
    }

    #[tokio::test]
    async fn test_rebuild_and_stats() {
        let (state, _dir) = loaded_state().await;

        let stats = state.stats().await;
        let_assert!(Some(summary) = stats.corpus);
        check!(summary.documents == 2);
        check!(summary.vocabulary > 0);
        check!(stats.cached_inputs > 0);

        let_assert!(Ok(rebuilt) = state.rebuild_index().await);
        check!(rebuilt == summary);
    }
}
