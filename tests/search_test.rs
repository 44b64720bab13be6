mod common;

use assert2::{check, let_assert};
use code_context::search::scoring::{COSINE_FLOOR, OverlapScorer};
use code_context::search::{InvertedIndex, TokenSet, analyze_prompt};
use code_context::{CodeElement, Corpus, IndexError, Searcher, Tokenizer};
use common::sample_corpus;
use rstest::rstest;
use std::collections::BTreeSet;
use std::sync::Arc;

fn class_names(results: &[code_context::ScoredDocument]) -> Vec<&str> {
    results
        .iter()
        .map(|r| r.document.element().class_name.as_str())
        .collect()
}

/// Test: the canonical user/authentication query prefers the service over the processor.
#[test]
fn user_authentication_ranks_user_service_first() {
    let tokenizer = Tokenizer::default();
    let corpus = Arc::new(Corpus::from_elements(
        [
            CodeElement::new("UserService").with_methods(["authenticateUser", "login"]),
            CodeElement::new("DataProcessor").with_methods(["processData"]),
        ],
        &tokenizer,
    ));

    let query = analyze_prompt(&tokenizer, "user authentication");
    let results = Searcher::default().search(&query, &corpus, 10);

    let names = class_names(&results);
    let_assert!(Some(first) = names.first());
    check!(*first == "UserService");
    if let Some(processor) = results.iter().find(|r| r.document.element().class_name == "DataProcessor") {
        check!(processor.score < results[0].score);
    }
}

#[rstest]
#[case("http client")]
#[case("generate a pdf report")]
#[case("process data rows")]
#[case("login")]
fn results_are_bounded_sorted_and_above_floor(
    sample_corpus: (Tokenizer, Arc<Corpus>),
    #[case] prompt: &str,
) {
    let (tokenizer, corpus) = sample_corpus;
    let searcher = Searcher::default();
    let query = analyze_prompt(&tokenizer, prompt);

    for k in 0..=5 {
        let results = searcher.search(&query, &corpus, k);
        check!(results.len() <= k);
        for result in &results {
            check!(result.score > COSINE_FLOOR);
            check!(result.score <= 1.0);
        }
        for pair in results.windows(2) {
            check!(pair[0].score >= pair[1].score);
        }
    }
}

#[rstest]
#[case("http client", "HttpClientFactory")]
#[case("generate a pdf report", "ReportGenerator")]
#[case("process data", "DataProcessor")]
fn best_match_per_prompt(
    sample_corpus: (Tokenizer, Arc<Corpus>),
    #[case] prompt: &str,
    #[case] expected: &str,
) {
    let (tokenizer, corpus) = sample_corpus;
    let results = Searcher::default().search(&analyze_prompt(&tokenizer, prompt), &corpus, 3);
    let names = class_names(&results);
    check!(names.first() == Some(&expected), "{prompt}: {names:?}");
}

/// Test: larger limits only ever extend the result list.
#[rstest]
fn top_k_is_prefix_of_larger_k(sample_corpus: (Tokenizer, Arc<Corpus>)) {
    let (tokenizer, corpus) = sample_corpus;
    let searcher = Searcher::default();
    let query = analyze_prompt(&tokenizer, "example data user report client");

    let all = searcher.search(&query, &corpus, 10);
    for k in 0..all.len() {
        let top = searcher.search(&query, &corpus, k);
        let top_ids: Vec<_> = top.iter().map(|r| r.doc_id).collect();
        let prefix: Vec<_> = all.iter().take(k).map(|r| r.doc_id).collect();
        check!(top_ids == prefix);
    }
}

#[rstest]
fn empty_and_zero_limit_searches_succeed_empty(sample_corpus: (Tokenizer, Arc<Corpus>)) {
    let (tokenizer, corpus) = sample_corpus;
    let searcher = Searcher::default();

    for k in [0, 1, 10] {
        check!(searcher.search(&TokenSet::new(), &corpus, k).is_empty());
    }
    check!(searcher.search(&analyze_prompt(&tokenizer, "user"), &corpus, 0).is_empty());
    check!(searcher.search(&analyze_prompt(&tokenizer, "zzz qqq"), &corpus, 10).is_empty());
}

#[test]
fn empty_corpus_yields_no_results() {
    let tokenizer = Tokenizer::default();
    let corpus = Arc::new(Corpus::default());
    let results = Searcher::default().search(&tokenizer.tokenize("user"), &corpus, 10);
    check!(results.is_empty());
}

#[rstest]
fn candidates_equal_union_of_postings(sample_corpus: (Tokenizer, Arc<Corpus>)) {
    let (_tokenizer, corpus) = sample_corpus;
    let index = InvertedIndex::new();
    check!(index.get_candidates(&TokenSet::new()) == Err(IndexError::InvalidState));

    let snapshot = index.build(Arc::clone(&corpus));
    let query: TokenSet = ["user", "pdf", "notavocabularytoken"]
        .into_iter()
        .map(String::from)
        .collect();

    let expected: BTreeSet<_> = query
        .iter()
        .flat_map(|t| snapshot.postings(t).iter().copied())
        .collect();
    let_assert!(Ok(candidates) = index.get_candidates(&query));
    check!(candidates == expected);
    check!(snapshot.postings("notavocabularytoken").is_empty());

    // Every candidate really contains one of the query tokens
    for id in &candidates {
        let_assert!(Some(doc) = corpus.get(*id));
        check!(query.iter().any(|t| doc.all_tokens().contains(t)));
    }
}

#[rstest]
fn rebuild_reproduces_idf_and_vectors(sample_corpus: (Tokenizer, Arc<Corpus>)) {
    let (_tokenizer, corpus) = sample_corpus;
    let index = InvertedIndex::new();

    let first = index.build(Arc::clone(&corpus));
    let second = index.build(Arc::clone(&corpus));
    check!(!Arc::ptr_eq(&first, &second));
    check!(first.vocabulary_size() == second.vocabulary_size());

    for (id, doc) in corpus.iter() {
        check!(first.document_vector(id) == second.document_vector(id));
        check!(first.document_norm(id) == second.document_norm(id));
        for token in doc.all_tokens() {
            check!(first.idf(token) == second.idf(token));
            check!(first.idf(token) > 0.0);
        }
    }
}

/// Test: searches running while the index is rebuilt always see a complete snapshot.
#[rstest]
fn concurrent_searches_during_rebuild(sample_corpus: (Tokenizer, Arc<Corpus>)) {
    let (tokenizer, corpus) = sample_corpus;
    let searcher = Searcher::default();
    let query = analyze_prompt(&tokenizer, "user login");
    let expected = searcher.search(&query, &corpus, 5);
    check!(!expected.is_empty());

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..50 {
                    let results = searcher.search(&query, &corpus, 5);
                    let ids: Vec<_> = results.iter().map(|r| r.doc_id).collect();
                    let expected_ids: Vec<_> = expected.iter().map(|r| r.doc_id).collect();
                    assert_eq!(ids, expected_ids);
                }
            });
        }
        scope.spawn(|| {
            for _ in 0..20 {
                searcher.rebuild(&corpus);
            }
        });
    });
}

#[rstest]
fn overlap_scorer_is_an_alternative(sample_corpus: (Tokenizer, Arc<Corpus>)) {
    let (tokenizer, corpus) = sample_corpus;
    let searcher = Searcher::new(Box::new(OverlapScorer));

    let results = searcher.search(&analyze_prompt(&tokenizer, "HttpClientFactory"), &corpus, 5);
    let names = class_names(&results);
    check!(names.first() == Some(&"HttpClientFactory"));
    check!(results.iter().all(|r| r.score > searcher.min_score()));
}
