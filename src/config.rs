//! Runtime configuration loaded from TOML.

use crate::error::Result;
use crate::search::ScoringMode;
use crate::search::tokenize::DEFAULT_CACHE_CAPACITY;
use anyhow::Context;
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "CODE_CONTEXT_CONFIG";

/// Engine and server settings. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Bound on each tokenizer cache (distinct inputs remembered)
    pub cache_capacity: NonZeroUsize,
    /// Results returned by `search_code` when the caller gives no limit
    pub max_results: usize,
    pub scoring: ScoringMode,
    /// Overrides the scorer's default relevance floor
    pub min_score: Option<f64>,
    /// Analysis file loaded at startup
    pub corpus: Option<PathBuf>,
    /// Imports listed per result in rendered context
    pub max_imports_shown: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_results: 10,
            scoring: ScoringMode::default(),
            min_score: None,
            corpus: None,
            max_imports_shown: 5,
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read configuration at {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Load from the file named by [`CONFIG_ENV_VAR`], or fall back to defaults.
    pub async fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                let path = PathBuf::from(path);
                tracing::info!("Loading configuration from {}", path.display());
                Self::load(&path).await
            }
            None => Ok(Self::default()),
        }
    }
}
