//! Structural records describing one code element (typically a class).

use serde::{Deserialize, Serialize};

/// A method declared by a code element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    /// Declared return type, when a full signature was available
    pub return_type: Option<String>,
    /// Parameter declarations as written, e.g. `int id`
    pub parameters: Vec<String>,
}

impl Method {
    /// A method known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn new(
        name: impl Into<String>,
        return_type: impl Into<String>,
        parameters: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            return_type: Some(return_type.into()),
            parameters,
        }
    }
}

/// Structural facts extracted from one source element.
///
/// Absent facts are empty collections or empty strings, never missing values, so that
/// tokenization never has to branch on presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeElement {
    pub class_name: String,
    pub package_name: String,
    pub methods: Vec<Method>,
    /// Fully qualified imports, e.g. `java.util.List`
    pub imports: Vec<String>,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    /// Source file the element was extracted from, if known
    pub file_path: Option<String>,
}

impl CodeElement {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_package(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = package_name.into();
        self
    }

    /// Add methods known only by name.
    #[must_use]
    pub fn with_methods<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods.extend(names.into_iter().map(Method::named));
        self
    }

    #[must_use]
    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports.extend(imports.into_iter().map(Into::into));
        self
    }
}
