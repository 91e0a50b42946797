//! Pluggable parts of the information-based model.
//!
//! The model scores a term as `distribution(stats, tfn, lambda)`, where `tfn` is the term
//! frequency normalized for document length and `lambda` is a collection-level parameter.
//! The concrete functions are supplied by the embedding application; this crate only
//! composes them.

use crate::{explain::Explanation, stats::BasicStats};

/// Probabilistic distribution turning a normalized frequency into a score.
pub trait Distribution: Send + Sync {
    /// Scores a normalized term frequency.
    fn score(&self, stats: &BasicStats, tfn: f32, lambda: f32) -> f32;

    /// Short name used in descriptions.
    fn name(&self) -> &str;

    /// Explains [`Distribution::score`].
    fn explain(&self, stats: &BasicStats, tfn: f32, lambda: f32) -> Explanation {
        Explanation::new(self.score(stats, tfn, lambda), self.name())
    }
}

/// Collection-level parameter of the distribution.
pub trait Lambda: Send + Sync {
    /// Computes lambda for the term.
    fn lambda(&self, stats: &BasicStats) -> f32;

    /// Short name used in descriptions.
    fn name(&self) -> &str;

    /// Explains [`Lambda::lambda`].
    fn explain(&self, stats: &BasicStats) -> Explanation {
        Explanation::new(self.lambda(stats), self.name())
    }
}

/// Document length normalization of the raw term frequency.
pub trait Normalization: Send + Sync {
    /// Normalizes `tf` for a document of length `len`.
    fn tfn(&self, stats: &BasicStats, tf: f32, len: f32) -> f32;

    /// Short name used in descriptions. Empty for no normalization.
    fn name(&self) -> &str;

    /// Explains [`Normalization::tfn`].
    fn explain(&self, stats: &BasicStats, tf: f32, len: f32) -> Explanation {
        Explanation::with_details(
            self.tfn(stats, tf, len),
            format!("{}, computed from:", self.name()),
            vec![
                Explanation::new(stats.avg_field_length, "avgFieldLength"),
                Explanation::new(len, "len"),
            ],
        )
    }
}

/// Leaves the term frequency unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNormalization;

impl Normalization for NoNormalization {
    fn tfn(&self, _stats: &BasicStats, tf: f32, _len: f32) -> f32 {
        tf
    }

    fn name(&self) -> &str {
        ""
    }

    fn explain(&self, _stats: &BasicStats, tf: f32, _len: f32) -> Explanation {
        Explanation::new(tf, "no normalization")
    }
}
