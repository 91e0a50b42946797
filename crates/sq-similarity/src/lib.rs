//! Relevance scoring for simple payload queries.
//!
//! Documents are scored with an information-based model whose three parts (distribution,
//! lambda, normalization) are supplied by the caller. On top of the model:
//!
//! - **Payload weights**: each term occurrence may carry a 4-byte big-endian float that
//!   scales its contribution; a missing payload weighs 1.0
//! - **Proximity**: a sloppy match counts `1 / (distance + 1)` towards the frequency
//! - **Multi-term clauses**: phrases and multi-field expansions score as the sum of their terms
//! - **Explanations**: every score can be broken down with the same arithmetic
//!
//! Statistics are resolved once per query into a [`SimWeight`]; a [`SimScorer`] is then
//! created per segment and called per document without allocating.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use sq_similarity::{
//!     BasicStats, CollectionStatistics, DocScorer, Distribution, Lambda, NoNorms,
//!     NoNormalization, PayloadIbSimilarity, TermStatistics,
//! };
//!
//! struct Ll;
//! impl Distribution for Ll {
//!     fn score(&self, _: &BasicStats, tfn: f32, lambda: f32) -> f32 {
//!         -(lambda / (tfn + lambda)).ln()
//!     }
//!     fn name(&self) -> &str {
//!         "LL"
//!     }
//! }
//!
//! struct Df;
//! impl Lambda for Df {
//!     fn lambda(&self, stats: &BasicStats) -> f32 {
//!         (stats.doc_freq as f32 + 1.0) / (stats.number_of_documents as f32 + 1.0)
//!     }
//!     fn name(&self) -> &str {
//!         "DF"
//!     }
//! }
//!
//! let similarity = PayloadIbSimilarity::new(Arc::new(Ll), Arc::new(Df), Arc::new(NoNormalization));
//! let collection = CollectionStatistics::new("body", 100);
//! let weight = similarity
//!     .compute_weight(1.0, &collection, &[TermStatistics::new("rust", 10, None)])
//!     .unwrap();
//!
//! let scorer = similarity.sim_scorer(&weight, &NoNorms);
//! assert!(scorer.score(0, 2.0) > scorer.score(0, 1.0));
//! ```

#![warn(missing_docs)]

mod error;
mod explain;
mod model;
mod norms;
mod payload;
mod provider;
mod scorer;
mod similarity;
mod span;
mod stats;

#[cfg(test)]
mod test_support;

pub use error::SimilarityError;
pub use explain::Explanation;
pub use model::{Distribution, Lambda, NoNormalization, Normalization};
pub use norms::{
    FieldInvertState, NoNorms, NormSource, NormValues, byte_to_float, decode_norm_value,
    encode_norm_value, float_to_byte,
};
pub use payload::{PAYLOAD_LEN, PayloadBytes, PayloadFunction, encode_float, payload_weight};
pub use provider::{NO_NORMALIZATION, SimilarityProvider, SimilaritySettings};
pub use scorer::{BasicSimScorer, DocScorer, MultiSimScorer, SimScorer};
pub use similarity::{PayloadIbSimilarity, slop_factor};
pub use span::{PayloadSpanScorer, SpanFreq, SpanMatch};
pub use stats::{BasicStats, CollectionStatistics, MultiStats, SimWeight, TermStatistics};
