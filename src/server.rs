//! MCP server exposing corpus loading and ranked code search.

use crate::config::Config;
use crate::state::{CorpusSummary, EngineState};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars, tool, tool_handler, tool_router,
};
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

/// Parameters for the load_corpus tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct LoadCorpusRequest {
    /// Path to a JSON analysis file (array of per-file structural records)
    pub path: String,
}

/// Parameters for the search_code tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SearchCodeRequest {
    /// Free-text description of the code you are looking for
    pub prompt: String,
    /// Maximum number of results to return (default from configuration)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// MCP server for code-context queries
#[derive(Clone)]
pub struct ContextServer {
    /// Shared engine state (corpus, tokenizer, index)
    state: Arc<EngineState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for ContextServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl ContextServer {
    pub fn new(config: Config) -> Self {
        Self {
            state: Arc::new(EngineState::new(config)),
            tool_router: Self::tool_router(),
        }
    }

    /// Get a reference to the shared engine state.
    pub fn state(&self) -> &Arc<EngineState> {
        &self.state
    }

    #[tool(
        description = "Load a structural analysis JSON file (classes, packages, methods, imports per source file) as the searchable corpus. Replaces any previously loaded corpus and builds its search index."
    )]
    async fn load_corpus(
        &self,
        Parameters(LoadCorpusRequest { path }): Parameters<LoadCorpusRequest>,
    ) -> std::result::Result<String, String> {
        let path = expand_tilde(&path);
        let summary = self
            .state
            .load_corpus(Path::new(path.as_ref()))
            .await
            .map_err(|e| format!("Failed to load corpus: {:#}", e))?;

        Ok(format!(
            "Loaded {} code elements from {} ({} unique tokens indexed).",
            summary.documents, path, summary.vocabulary
        ))
    }

    #[tool(
        description = "Find the code elements most relevant to a natural-language prompt using TF-IDF ranking over class, method, package and import identifiers. Returns a context summary of the top matches."
    )]
    async fn search_code(
        &self,
        Parameters(SearchCodeRequest { prompt, limit }): Parameters<SearchCodeRequest>,
    ) -> std::result::Result<String, String> {
        self.state
            .search(&prompt, limit)
            .await
            .map_err(|e| e.to_string())
    }

    #[tool(
        description = "Rebuild the search index of the currently loaded corpus from scratch."
    )]
    async fn rebuild_index(&self) -> std::result::Result<String, String> {
        let summary = self
            .state
            .rebuild_index()
            .await
            .map_err(|e| e.to_string())?;
        Ok(format_summary("Rebuilt index", summary))
    }

    #[tool(description = "Show statistics about the loaded corpus and search index.")]
    async fn corpus_stats(&self) -> std::result::Result<String, String> {
        let stats = self.state.stats().await;
        let corpus = stats.corpus.map_or_else(
            || "No corpus loaded.".to_string(),
            |summary| format_summary("Corpus", summary),
        );
        Ok(format!(
            "{}\nTokenizer cache: {} distinct inputs",
            corpus, stats.cached_inputs
        ))
    }
}

#[tool_handler]
impl ServerHandler for ContextServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "code-context: ranked lexical search over a repository's classes, methods, \
                 packages and imports. Load an analysis file with load_corpus, then describe \
                 what you need with search_code."
                    .to_string(),
            )
    }
}

fn format_summary(label: &str, summary: CorpusSummary) -> String {
    format!(
        "{}: {} documents, {} unique tokens",
        label, summary.documents, summary.vocabulary
    )
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("/abs/path")]
    #[case("relative/path")]
    #[case("~user/path")]
    fn test_expand_tilde_passthrough(#[case] path: &str) {
        check!(expand_tilde(path) == path);
    }

    #[test]
    fn test_expand_tilde_home() {
        if let Some(home) = dirs::home_dir() {
            check!(expand_tilde("~") == home.display().to_string());
            check!(expand_tilde("~/x.json") == home.join("x.json").display().to_string());
        }
    }
}
