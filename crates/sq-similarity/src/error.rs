//! Error types for building a similarity from settings.
//!
//! Scoring itself never fails: missing norms and payloads fall back to neutral values.

use thiserror::Error;

/// Failure to assemble a similarity from named strategies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimilarityError {
    /// No distribution is registered under the name.
    #[error("unsupported distribution [{0}]")]
    UnsupportedDistribution(String),

    /// No lambda is registered under the name.
    #[error("unsupported lambda [{0}]")]
    UnsupportedLambda(String),

    /// No normalization is registered under the name.
    #[error("unsupported normalization [{0}]")]
    UnsupportedNormalization(String),

    /// A required setting was not given.
    #[error("missing similarity setting [{0}]")]
    MissingSetting(&'static str),
}
