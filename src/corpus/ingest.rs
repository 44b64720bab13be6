//! Ingestion of structural analysis files into code elements.
//!
//! An analysis file is a JSON array with one record per source file, as produced by an
//! external parser. Every list field may be missing or `null`; both read as empty.

use super::element::{CodeElement, Method};
use crate::error::{LoadError, Result};
use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Return type recorded when a signature names none (constructors, bare names).
const DEFAULT_RETURN_TYPE: &str = "void";

/// One record of an analysis file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileAnalysis {
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub relative_path: Option<String>,
    #[serde(rename = "package", deserialize_with = "null_as_empty")]
    pub package_name: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub class_name: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub imports: Vec<String>,
    /// Bare method declarations, used when no full signatures are present
    #[serde(deserialize_with = "null_as_empty")]
    pub methods: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub constructors: Vec<String>,
    /// Full signatures like `String getName(int id, boolean active)`
    #[serde(deserialize_with = "null_as_empty")]
    pub method_signatures: Vec<String>,
    #[serde(rename = "extends", deserialize_with = "null_as_empty")]
    pub extends_classes: Vec<String>,
    #[serde(rename = "implements", deserialize_with = "null_as_empty")]
    pub implements_interfaces: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<FileAnalysis> for CodeElement {
    fn from(analysis: FileAnalysis) -> Self {
        let mut methods: Vec<Method> = if analysis.method_signatures.is_empty() {
            analysis
                .methods
                .iter()
                .map(|m| Method::named(extract_method_name(m)))
                .collect()
        } else {
            analysis
                .method_signatures
                .iter()
                .map(|s| parse_method_signature(s))
                .collect()
        };
        methods.extend(
            analysis
                .constructors
                .iter()
                .map(|c| Method::named(extract_method_name(c))),
        );

        Self {
            class_name: analysis.class_name.into_iter().next().unwrap_or_default(),
            package_name: analysis.package_name.into_iter().next().unwrap_or_default(),
            methods,
            imports: analysis.imports,
            extends: analysis.extends_classes.into_iter().next(),
            implements: analysis.implements_interfaces,
            file_path: analysis.file_path.or(analysis.relative_path),
        }
    }
}

/// Parse a signature like `String getName(int id, boolean active)`.
///
/// Text without parentheses is taken as the method name.
pub fn parse_method_signature(signature: &str) -> Method {
    let Some(open) = signature.find('(') else {
        return Method::named(signature.trim());
    };

    let before_params = signature[..open].trim();
    let params = match signature.rfind(')') {
        Some(close) if close > open => signature[open + 1..close].trim(),
        _ => "",
    };

    let mut words = before_params.split_whitespace().rev();
    let name = words.next().unwrap_or_default();
    let return_type = words.next().unwrap_or(DEFAULT_RETURN_TYPE);

    let parameters = if params.is_empty() {
        Vec::new()
    } else {
        params.split(',').map(|p| p.trim().to_owned()).collect()
    };

    Method::new(name, return_type, parameters)
}

/// Extract the bare name from a declaration like `void parseGitProject(String)`.
pub fn extract_method_name(signature: &str) -> &str {
    let Some(open) = signature.find('(') else {
        return signature;
    };
    let before_params = signature[..open].trim();
    match before_params.rfind(' ') {
        Some(space) => &before_params[space + 1..],
        None => before_params,
    }
}

/// Parse an analysis document into code elements, preserving record order.
pub fn parse_elements(json: &str) -> serde_json::Result<Vec<CodeElement>> {
    let records: Vec<FileAnalysis> = serde_json::from_str(json)?;
    Ok(records.into_iter().map(CodeElement::from).collect())
}

/// Load and parse an analysis file.
pub async fn load_elements(path: &Path) -> Result<Vec<CodeElement>> {
    let exists = tokio::fs::try_exists(path)
        .await
        .with_context(|| format!("Failed to access corpus file {}", path.display()))?;
    if !exists {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read corpus file {}", path.display()))?;

    let elements = parse_elements(&content).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    tracing::debug!(
        "Loaded {} code elements from {}",
        elements.len(),
        path.display()
    );
    Ok(elements)
}
