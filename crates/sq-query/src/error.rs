//! Error types for flag resolution and query construction.
//!
//! Grammar problems in the query text never surface here: the scanner and parser demote
//! anything they cannot interpret to literal text. These errors cover the configuration that
//! drives the parser and the analyzer it calls out to.

use thiserror::Error;

/// Failure to resolve a list of flag names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// A named token did not match any known flag.
    #[error("unknown simple_query_string flag [{0}]")]
    Unknown(String),
}

/// Failure raised by an analyzer while turning text into terms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to analyze [{text}] for field [{field}]: {message}")]
pub struct AnalysisError {
    /// Field the text was analyzed for.
    pub field: String,
    /// The text that was rejected.
    pub text: String,
    /// Analyzer-specific reason.
    pub message: String,
}

impl AnalysisError {
    /// Creates an analysis error for a field and text.
    pub fn new(field: impl Into<String>, text: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            text: text.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur while building a query parser or a query tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// The analyzer rejected query text and the parser is not lenient.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// No analyzer is registered under the requested name.
    #[error("analyzer [{0}] not found")]
    UnknownAnalyzer(String),

    /// The locale identifier could not be parsed.
    #[error("invalid locale [{0}]")]
    InvalidLocale(String),

    /// The field weight map was empty.
    #[error("at least one field is required")]
    NoFields,

    /// A field weight was not a positive finite number.
    #[error("invalid boost [{boost}] for field [{field}]")]
    InvalidBoost {
        /// Field carrying the boost.
        field: String,
        /// The rejected boost value.
        boost: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_flag_names_the_token() {
        let err = FlagError::Unknown("BOGUS".into());
        assert_eq!(err.to_string(), "unknown simple_query_string flag [BOGUS]");
    }

    #[test]
    fn analysis_error_is_transparent() {
        let err = QueryError::from(AnalysisError::new("price", "abc", "not a number"));
        let display = err.to_string();
        assert!(display.contains("[abc]"));
        assert!(display.contains("[price]"));
        assert!(display.contains("not a number"));
    }

    #[test]
    fn invalid_boost_display() {
        let err = QueryError::InvalidBoost {
            field: "title".into(),
            boost: -1.0,
        };
        assert_eq!(err.to_string(), "invalid boost [-1] for field [title]");
    }
}
