//! Free-text prompt analysis.

use super::tokenize::{TokenSet, Tokenizer};

/// Turn a user prompt into query tokens using the same tokenizer as the corpus.
///
/// A blank prompt yields an empty token set, which searches treat as "no results".
pub fn analyze_prompt(tokenizer: &Tokenizer, prompt: &str) -> TokenSet {
    if prompt.trim().is_empty() {
        tracing::warn!("Empty prompt provided");
        return TokenSet::new();
    }

    let tokens = tokenizer.tokenize(prompt);
    tracing::debug!("Extracted {} tokens from prompt: {:?}", tokens.len(), tokens);
    tokens
}
