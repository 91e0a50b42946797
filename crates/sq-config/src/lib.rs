//! Configuration for simple payload queries.
//!
//! Two kinds of configuration feed the library crates:
//!
//! - **Query requests** (JSON): query text, fields and boosts, flags, default operator,
//!   analyzer, locale and leniency. [`QueryRequest::resolve`] validates them in one step into a
//!   [`ResolvedQuery`] ready to parse.
//! - **Similarity settings** (TOML): the names of the distribution, lambda and
//!   normalization to score with, resolved through a [`SimilarityProvider`].
//!
//! Only configuration can fail a request; query text never does.
//!
//! [`SimilarityProvider`]: sq_similarity::SimilarityProvider

#![warn(missing_docs)]

mod error;
mod request;
mod similarity;

pub use error::ConfigError;
pub use request::{FlagsSpec, QueryRequest, ResolvedQuery, parse_field};
pub use similarity::{build_similarity, load_similarity_settings, parse_similarity_settings};
