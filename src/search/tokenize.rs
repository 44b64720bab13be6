//! Identifier tokenization for indexing and query analysis.
//!
//! Every input string is decomposed by five independent strategies whose outputs are
//! unioned into one lowercase token set:
//!
//! 1. **Separators**: `parse_json.value` → `parse`, `json`, `value`
//! 2. **CamelCase**: `XMLHttpRequest` → `xml`, `http`, `request`
//! 3. **Letter/digit boundaries**: `test123method` → `test`, `method`
//! 4. **Acronym runs**: `loadURL` → `url`
//! 5. **Shingles**: every alphabetic substring of length 3..=6 (`user` → `use`, `ser`, `user`)
//!
//! Splitting is ASCII-oriented. Characters outside `[A-Za-z0-9]` are treated as symbols and
//! stripped, so an identifier made only of non-ASCII characters produces no tokens.

use ahash::AHashSet;
use lru::LruCache;
use parking_lot::Mutex;
use regex::Regex;
use std::{num::NonZeroUsize, sync::LazyLock};

/// A set of normalized lowercase tokens.
pub type TokenSet = AHashSet<String>;

/// Default number of distinct inputs remembered by each tokenizer cache.
pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::new(10_000).unwrap();

/// Tokens shorter than this are discarded by every strategy except shingles.
const MIN_TOKEN_LENGTH: usize = 2;

/// Shingle lengths emitted for fuzzy matching.
const MIN_SHINGLE_LENGTH: usize = 3;
const MAX_SHINGLE_LENGTH: usize = 6;

static SEPARATOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[._|\-\s$@]+").expect("valid separator pattern"));
static CAMEL_LOWER_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid camel-case pattern"));
static CAMEL_ACRONYM_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z+])([A-Z][a-z])").expect("valid acronym pattern"));
static LETTER_DIGIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-zA-Z])([0-9])|([0-9])([a-zA-Z])").expect("valid numeric pattern")
});
static SYMBOLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("valid symbol pattern"));

/// Memoized results, keyed by the exact input string.
struct TokenCaches {
    tokens: LruCache<String, TokenSet>,
    separators: LruCache<String, Vec<String>>,
    camel_case: LruCache<String, String>,
}

/// Multi-strategy identifier tokenizer with bounded, caller-owned caches.
///
/// Identical identifiers recur heavily across a corpus, so final token sets (and the
/// intermediate separator and camel-case forms) are kept in LRU caches bounded by the
/// capacity given at construction. Callers receive a copy of the cached set and may
/// mutate it freely.
pub struct Tokenizer {
    caches: Mutex<TokenCaches>,
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("cached_inputs", &self.cache_len())
            .finish()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl Tokenizer {
    /// Create a tokenizer whose caches each hold at most `capacity` inputs.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            caches: Mutex::new(TokenCaches {
                tokens: LruCache::new(capacity),
                separators: LruCache::new(capacity),
                camel_case: LruCache::new(capacity),
            }),
        }
    }

    /// Tokenize `text` into its canonical lowercase token set.
    ///
    /// Empty input yields an empty set. The result is deterministic for a given input.
    pub fn tokenize(&self, text: &str) -> TokenSet {
        if text.is_empty() {
            return TokenSet::new();
        }

        if let Some(cached) = self.caches.lock().tokens.get(text) {
            return cached.clone();
        }

        let mut tokens = TokenSet::new();
        add_separator_tokens(&self.separator_parts(text), &mut tokens);
        add_camel_case_tokens(&self.camel_case_form(text), &mut tokens);
        add_numeric_tokens(text, &mut tokens);
        add_acronym_tokens(text, &mut tokens);
        add_shingles(text, &mut tokens);

        self.caches
            .lock()
            .tokens
            .put(text.to_owned(), tokens.clone());
        tokens
    }

    /// Number of distinct inputs currently memoized.
    pub fn cache_len(&self) -> usize {
        self.caches.lock().tokens.len()
    }

    /// Drop every memoized entry.
    pub fn clear_cache(&self) {
        let mut caches = self.caches.lock();
        caches.tokens.clear();
        caches.separators.clear();
        caches.camel_case.clear();
    }

    fn separator_parts(&self, text: &str) -> Vec<String> {
        if let Some(parts) = self.caches.lock().separators.get(text) {
            return parts.clone();
        }
        let parts = split_separators(text);
        self.caches
            .lock()
            .separators
            .put(text.to_owned(), parts.clone());
        parts
    }

    fn camel_case_form(&self, text: &str) -> String {
        if let Some(form) = self.caches.lock().camel_case.get(text) {
            return form.clone();
        }
        let form = split_camel_case(text);
        self.caches
            .lock()
            .camel_case
            .put(text.to_owned(), form.clone());
        form
    }
}

fn split_separators(text: &str) -> Vec<String> {
    SEPARATOR_PATTERN
        .split(text)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Insert spaces at camel-case boundaries, keeping leading acronym runs together.
fn split_camel_case(text: &str) -> String {
    let spaced = CAMEL_LOWER_UPPER.replace_all(text, "${1} ${2}");
    CAMEL_ACRONYM_WORD
        .replace_all(&spaced, "${1} ${2}")
        .into_owned()
}

fn strip_symbols(text: &str) -> String {
    SYMBOLS.replace_all(text, "").into_owned()
}

fn is_alphabetic(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_alphabetic())
}

fn add_separator_tokens(parts: &[String], tokens: &mut TokenSet) {
    for part in parts {
        let clean = strip_symbols(part);
        if clean.len() >= MIN_TOKEN_LENGTH && is_alphabetic(&clean) {
            tokens.insert(clean.to_ascii_lowercase());
        }
    }
}

fn add_camel_case_tokens(camel_form: &str, tokens: &mut TokenSet) {
    for part in camel_form.split_whitespace() {
        let clean = strip_symbols(part);
        if clean.len() >= MIN_TOKEN_LENGTH {
            tokens.insert(clean.to_ascii_lowercase());
        }
    }
}

fn add_numeric_tokens(text: &str, tokens: &mut TokenSet) {
    let spaced = LETTER_DIGIT.replace_all(text, "${1}${3} ${2}${4}");
    for part in spaced.split_whitespace() {
        // Purely numeric parts fail the alphabetic check along with mixed symbols.
        if part.len() >= MIN_TOKEN_LENGTH && is_alphabetic(part) {
            tokens.insert(part.to_ascii_lowercase());
        }
    }
}

fn add_acronym_tokens(text: &str, tokens: &mut TokenSet) {
    let mut run = String::new();
    for c in text.chars() {
        if c.is_ascii_uppercase() {
            run.push(c);
        } else {
            if run.len() >= MIN_TOKEN_LENGTH {
                tokens.insert(run.to_ascii_lowercase());
            }
            run.clear();
        }
    }
    if run.len() >= MIN_TOKEN_LENGTH {
        tokens.insert(run.to_ascii_lowercase());
    }
}

fn add_shingles(text: &str, tokens: &mut TokenSet) {
    // Only ASCII alphanumerics survive, so byte offsets are char offsets.
    let clean = strip_symbols(text).to_ascii_lowercase();
    if clean.len() < MIN_SHINGLE_LENGTH {
        return;
    }

    for len in MIN_SHINGLE_LENGTH..=clean.len().min(MAX_SHINGLE_LENGTH) {
        for start in 0..=clean.len() - len {
            let shingle = &clean[start..start + len];
            if shingle.bytes().all(|b| b.is_ascii_lowercase()) {
                tokens.insert(shingle.to_owned());
            }
        }
    }
}
