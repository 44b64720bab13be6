//! Pre-tokenized search documents.

use super::element::CodeElement;
use crate::search::tokenize::{TokenSet, Tokenizer};

/// The field a token was drawn from. Each category carries a fixed ranking weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Class,
    Method,
    Package,
    Import,
}

impl TokenCategory {
    pub const ALL: [Self; 4] = [Self::Class, Self::Method, Self::Package, Self::Import];

    /// Contribution of one occurrence to a document's weighted term frequency.
    pub const fn weight(self) -> f64 {
        match self {
            Self::Class => 3.0,
            Self::Method => 2.0,
            Self::Package => 1.0,
            Self::Import => 0.5,
        }
    }
}

/// A unit of search: one code element plus its categorized token sets.
///
/// Token sets are fixed at construction. The original element stays reachable so results
/// can be rendered with their class, package, methods and imports.
#[derive(Debug, Clone)]
pub struct Document {
    element: CodeElement,
    class_tokens: TokenSet,
    method_tokens: TokenSet,
    package_tokens: TokenSet,
    import_tokens: TokenSet,
    all_tokens: TokenSet,
}

impl Document {
    /// Tokenize every field of `element`.
    ///
    /// Imports contribute only their last `.`-separated segment (`java.util.List` → `List`).
    pub fn new(element: CodeElement, tokenizer: &Tokenizer) -> Self {
        let class_tokens = tokenizer.tokenize(&element.class_name);
        let method_tokens = element
            .methods
            .iter()
            .flat_map(|method| tokenizer.tokenize(&method.name))
            .collect();
        let package_tokens = tokenizer.tokenize(&element.package_name);
        let import_tokens = element
            .imports
            .iter()
            .flat_map(|import| tokenizer.tokenize(last_segment(import)))
            .collect();

        Self::from_tokens(
            element,
            class_tokens,
            method_tokens,
            package_tokens,
            import_tokens,
        )
    }

    /// Assemble a document from already-tokenized fields.
    pub fn from_tokens(
        element: CodeElement,
        class_tokens: TokenSet,
        method_tokens: TokenSet,
        package_tokens: TokenSet,
        import_tokens: TokenSet,
    ) -> Self {
        let all_tokens = class_tokens
            .iter()
            .chain(&method_tokens)
            .chain(&package_tokens)
            .chain(&import_tokens)
            .cloned()
            .collect();

        Self {
            element,
            class_tokens,
            method_tokens,
            package_tokens,
            import_tokens,
            all_tokens,
        }
    }

    pub fn element(&self) -> &CodeElement {
        &self.element
    }

    pub fn tokens(&self, category: TokenCategory) -> &TokenSet {
        match category {
            TokenCategory::Class => &self.class_tokens,
            TokenCategory::Method => &self.method_tokens,
            TokenCategory::Package => &self.package_tokens,
            TokenCategory::Import => &self.import_tokens,
        }
    }

    pub fn class_tokens(&self) -> &TokenSet {
        &self.class_tokens
    }

    pub fn method_tokens(&self) -> &TokenSet {
        &self.method_tokens
    }

    pub fn package_tokens(&self) -> &TokenSet {
        &self.package_tokens
    }

    pub fn import_tokens(&self) -> &TokenSet {
        &self.import_tokens
    }

    /// Union of the four categorized token sets.
    pub fn all_tokens(&self) -> &TokenSet {
        &self.all_tokens
    }
}

fn last_segment(import: &str) -> &str {
    import.rsplit('.').next().unwrap_or(import)
}
