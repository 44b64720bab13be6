//! Shared test fixtures for integration tests.
//!
//! # Available Fixtures
//!
//! - `tokenizer`: a fresh tokenizer with default cache bounds
//! - `sample_corpus`: a small service-layer corpus built with that tokenizer
//! - `analysis_file`: the same corpus serialized as an analysis JSON file on disk

use code_context::{CodeElement, Corpus, Tokenizer};
use rstest::fixture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

#[allow(dead_code)] // Used in ingest_test.rs
/// Analysis JSON mirroring [`sample_elements`].
pub const SAMPLE_ANALYSIS: &str = r#"[
    {
        "fileName": "UserService.java",
        "package": ["com.example.auth"],
        "className": ["UserService"],
        "imports": ["java.util.Optional", "com.example.model.User"],
        "methodSignatures": ["boolean authenticateUser(String name, String password)", "void login(User user)"]
    },
    {
        "fileName": "DataProcessor.java",
        "package": ["com.example.data"],
        "className": ["DataProcessor"],
        "methods": ["void processData(List rows)"]
    },
    {
        "fileName": "ReportGenerator.java",
        "package": ["com.example.report"],
        "className": ["ReportGenerator"],
        "imports": ["com.example.data.DataProcessor"],
        "methods": ["String generateReport()", "byte[] exportPdf()"],
        "constructors": ["ReportGenerator(DataProcessor processor)"]
    },
    {
        "fileName": "HttpClientFactory.java",
        "package": ["com.example.net"],
        "className": ["HttpClientFactory"],
        "imports": ["java.net.http.HttpClient"],
        "methods": ["HttpClient createClient()", "void configureTimeout(int seconds)"]
    }
]"#;

#[allow(dead_code)] // Used across different integration test crates
pub fn sample_elements() -> Vec<CodeElement> {
    vec![
        CodeElement::new("UserService")
            .with_package("com.example.auth")
            .with_methods(["authenticateUser", "login"])
            .with_imports(["java.util.Optional", "com.example.model.User"]),
        CodeElement::new("DataProcessor")
            .with_package("com.example.data")
            .with_methods(["processData"]),
        CodeElement::new("ReportGenerator")
            .with_package("com.example.report")
            .with_methods(["generateReport", "exportPdf", "ReportGenerator"])
            .with_imports(["com.example.data.DataProcessor"]),
        CodeElement::new("HttpClientFactory")
            .with_package("com.example.net")
            .with_methods(["createClient", "configureTimeout"])
            .with_imports(["java.net.http.HttpClient"]),
    ]
}

#[fixture]
pub fn tokenizer() -> Tokenizer {
    Tokenizer::default()
}

#[fixture]
pub fn sample_corpus(tokenizer: Tokenizer) -> (Tokenizer, Arc<Corpus>) {
    let corpus = Arc::new(Corpus::from_elements(sample_elements(), &tokenizer));
    (tokenizer, corpus)
}

#[allow(dead_code)] // Used in ingest_test.rs
/// A temporary directory holding `analysis.json`, removed on drop.
pub struct AnalysisFile {
    _temp: TempDir,
    path: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl AnalysisFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[allow(dead_code)] // Used in ingest_test.rs
#[fixture]
pub fn analysis_file() -> AnalysisFile {
    let temp = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp.path().join("analysis.json");
    std::fs::write(&path, SAMPLE_ANALYSIS).expect("Failed to write analysis file");
    AnalysisFile { _temp: temp, path }
}
