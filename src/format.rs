//! Rendering of ranked results as LLM-ready context.

use crate::corpus::CodeElement;
use crate::search::ScoredDocument;
use std::fmt::Write as _;

/// Returned instead of a context block when nothing matched.
pub const NO_RESULTS_MESSAGE: &str = "No relevant code elements found for the given prompt.";

/// Render search results for `prompt` as a plain-text context block.
///
/// Each result lists its relevance, class, package, methods (with parameters when known)
/// and at most `max_imports` imports.
pub fn render_context(prompt: &str, results: &[ScoredDocument], max_imports: usize) -> String {
    if results.is_empty() {
        tracing::info!("No search results to generate context from");
        return NO_RESULTS_MESSAGE.to_string();
    }

    let mut output = format!("Based on your prompt: \"{}\"\n\n", prompt);
    output.push_str("Here are the most relevant code elements from the repository:\n\n");

    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(
            output,
            "=== Result {} (Relevance: {:.2}) ===",
            i + 1,
            result.score
        );
        render_element(&mut output, result.document.element(), max_imports);
        output.push('\n');
    }

    output.push_str(
        "Use this context to provide more accurate and relevant responses about the codebase.",
    );

    tracing::info!("Generated context with {} code elements", results.len());
    output
}

fn render_element(output: &mut String, element: &CodeElement, max_imports: usize) {
    if !element.class_name.is_empty() {
        let _ = writeln!(output, "Class: {}", element.class_name);
    }
    if !element.package_name.is_empty() {
        let _ = writeln!(output, "Package: {}", element.package_name);
    }
    if let Some(parent) = &element.extends {
        let _ = writeln!(output, "Extends: {}", parent);
    }
    if !element.implements.is_empty() {
        let _ = writeln!(output, "Implements: {}", element.implements.join(", "));
    }

    if !element.methods.is_empty() {
        output.push_str("Methods:\n");
        for method in &element.methods {
            let _ = write!(output, "  - {}", method.name);
            if !method.parameters.is_empty() {
                let _ = write!(output, "({})", method.parameters.join(", "));
            }
            output.push('\n');
        }
    }

    if !element.imports.is_empty() && max_imports > 0 {
        let shown: Vec<&str> = element
            .imports
            .iter()
            .take(max_imports)
            .map(String::as_str)
            .collect();
        let _ = writeln!(output, "Key Imports: {}", shown.join(", "));
    }
}
