//! Error types for request and similarity configuration.

use std::{io, path::PathBuf};

use sq_query::{FlagError, QueryError};
use sq_similarity::SimilarityError;
use thiserror::Error;
use toml::de;

/// Errors that stop a request before any parsing or scoring happens.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration or request file.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The request was not valid JSON, or named an unsupported field.
    #[error("failed to parse query request: {0}")]
    ParseJson(#[from] serde_json::Error),

    /// Failed to parse TOML similarity settings.
    #[error("failed to parse similarity settings: {0}")]
    ParseToml(#[from] de::Error),

    /// The request carried no query text.
    #[error("query text missing")]
    MissingQuery,

    /// A flag name was not recognized.
    #[error(transparent)]
    Flag(#[from] FlagError),

    /// No analyzer is registered under the requested name.
    #[error("analyzer [{0}] not found")]
    UnknownAnalyzer(String),

    /// The default operator was neither `and` nor `or`.
    #[error("default operator [{0}] is not allowed")]
    InvalidDefaultOperator(String),

    /// A `field^boost` entry had a boost that is not a number.
    #[error("invalid boost [{boost}] for field [{field}]")]
    InvalidFieldBoost {
        /// Field name before the `^`.
        field: String,
        /// Text after the `^`.
        boost: String,
    },

    /// Field weights or locale were rejected by the parser configuration.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Similarity settings named unknown strategies.
    #[error(transparent)]
    Similarity(#[from] SimilarityError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_library_errors() {
        let err: ConfigError = FlagError::Unknown("BOGUS".into()).into();
        assert_eq!(err.to_string(), "unknown simple_query_string flag [BOGUS]");

        let err: ConfigError = SimilarityError::UnsupportedLambda("x".into()).into();
        assert_eq!(err.to_string(), "unsupported lambda [x]");
    }

    #[test]
    fn messages_name_the_value() {
        assert_eq!(
            ConfigError::InvalidDefaultOperator("xor".into()).to_string(),
            "default operator [xor] is not allowed"
        );
        assert_eq!(
            ConfigError::InvalidFieldBoost {
                field: "title".into(),
                boost: "high".into()
            }
            .to_string(),
            "invalid boost [high] for field [title]"
        );
    }
}
