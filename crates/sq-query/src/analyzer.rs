//! Analyzer capability used to turn query text into terms.
//!
//! The parser only ever asks an analyzer to split text into terms for a field. The built-in
//! analyzers are tantivy tokenizer pipelines:
//!
//! - `standard` / `simple`: split on non-alphanumerics, lowercase, drop tokens over 40 bytes
//! - `whitespace`: split on whitespace only, case preserved
//! - `keyword`: the whole text as one term
//! - a language name (`english`, `french`, ...): `standard` followed by that language's stemmer

use std::{fmt, sync::Arc};

use tantivy::tokenizer::{
    Language, LowerCaser, RawTokenizer, RemoveLongFilter, SimpleTokenizer, Stemmer, TextAnalyzer,
    TokenStream, WhitespaceTokenizer,
};

use crate::error::{AnalysisError, QueryError};

/// Maximum token length in bytes before filtering.
const MAX_TOKEN_LENGTH: usize = 40;

/// Name of the analyzer used when a request names none.
pub const DEFAULT_ANALYZER: &str = "standard";

/// Splits text into terms for a field.
pub trait Analyzer: Send + Sync {
    /// Analyzes `text` as it would be indexed in `field`.
    fn analyze(&self, field: &str, text: &str) -> Result<Vec<String>, AnalysisError>;
}

/// Resolves analyzer names.
pub trait AnalyzerLookup {
    /// Returns the analyzer registered under `name`, if any.
    fn analyzer(&self, name: &str) -> Option<Arc<dyn Analyzer>>;
}

/// An [`Analyzer`] backed by a tantivy [`TextAnalyzer`] pipeline.
#[derive(Clone)]
pub struct TokenizerAnalyzer {
    /// Name the analyzer was built from.
    name: String,
    /// The tokenizer pipeline.
    inner: TextAnalyzer,
}

impl TokenizerAnalyzer {
    /// Wraps a tantivy pipeline under a name.
    pub fn new(name: impl Into<String>, inner: TextAnalyzer) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    /// The name the analyzer was built from.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for TokenizerAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenizerAnalyzer")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Analyzer for TokenizerAnalyzer {
    fn analyze(&self, _field: &str, text: &str) -> Result<Vec<String>, AnalysisError> {
        let mut analyzer = self.inner.clone();
        let mut stream = analyzer.token_stream(text);
        let mut terms = Vec::new();
        while let Some(token) = stream.next() {
            terms.push(token.text.clone());
        }
        Ok(terms)
    }
}

/// Parses a stemmer language name into a tantivy `Language`.
fn parse_language(name: &str) -> Option<Language> {
    match name {
        "arabic" => Some(Language::Arabic),
        "danish" => Some(Language::Danish),
        "dutch" => Some(Language::Dutch),
        "english" => Some(Language::English),
        "finnish" => Some(Language::Finnish),
        "french" => Some(Language::French),
        "german" => Some(Language::German),
        "greek" => Some(Language::Greek),
        "hungarian" => Some(Language::Hungarian),
        "italian" => Some(Language::Italian),
        "norwegian" => Some(Language::Norwegian),
        "portuguese" => Some(Language::Portuguese),
        "romanian" => Some(Language::Romanian),
        "russian" => Some(Language::Russian),
        "spanish" => Some(Language::Spanish),
        "swedish" => Some(Language::Swedish),
        "tamil" => Some(Language::Tamil),
        "turkish" => Some(Language::Turkish),
        _ => None,
    }
}

/// Builds one of the built-in analyzers by name (case-insensitive).
pub fn build_analyzer_from_name(name: &str) -> Result<TokenizerAnalyzer, QueryError> {
    let lower = name.to_lowercase();
    let inner = match lower.as_str() {
        "standard" | "simple" => TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(LowerCaser)
            .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
            .build(),
        "whitespace" => TextAnalyzer::builder(WhitespaceTokenizer::default()).build(),
        "keyword" => TextAnalyzer::builder(RawTokenizer::default()).build(),
        other => {
            let language =
                parse_language(other).ok_or_else(|| QueryError::UnknownAnalyzer(name.to_string()))?;
            TextAnalyzer::builder(SimpleTokenizer::default())
                .filter(LowerCaser)
                .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
                .filter(Stemmer::new(language))
                .build()
        }
    };

    Ok(TokenizerAnalyzer::new(lower, inner))
}

/// Looks analyzers up among the built-in pipelines.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinAnalyzers;

impl AnalyzerLookup for BuiltinAnalyzers {
    fn analyzer(&self, name: &str) -> Option<Arc<dyn Analyzer>> {
        build_analyzer_from_name(name)
            .ok()
            .map(|analyzer| Arc::new(analyzer) as Arc<dyn Analyzer>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(name: &str, text: &str) -> Vec<String> {
        build_analyzer_from_name(name)
            .unwrap()
            .analyze("body", text)
            .unwrap()
    }

    #[test]
    fn standard_lowercases_and_splits_punctuation() {
        assert_eq!(
            analyze("standard", "Hello, World! foo-bar"),
            vec!["hello", "world", "foo", "bar"]
        );
    }

    #[test]
    fn standard_removes_long_tokens() {
        let long = "a".repeat(50);
        assert_eq!(analyze("simple", &format!("short {long} word")), vec!["short", "word"]);
    }

    #[test]
    fn whitespace_preserves_text() {
        assert_eq!(analyze("whitespace", "Term-1  term*1"), vec!["Term-1", "term*1"]);
    }

    #[test]
    fn keyword_is_one_term() {
        assert_eq!(analyze("keyword", "new york"), vec!["new york"]);
    }

    #[test]
    fn language_analyzer_stems() {
        assert_eq!(analyze("English", "handling running"), vec!["handl", "run"]);
    }

    #[test]
    fn unknown_analyzer() {
        let err = build_analyzer_from_name("klingon").unwrap_err();
        assert_eq!(err, QueryError::UnknownAnalyzer("klingon".into()));
    }

    #[test]
    fn builtin_lookup() {
        assert!(BuiltinAnalyzers.analyzer("whitespace").is_some());
        assert!(BuiltinAnalyzers.analyzer("nope").is_none());
    }
}
