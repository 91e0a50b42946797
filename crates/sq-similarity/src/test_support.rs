//! Strategy doubles shared across unit tests.
//!
//! Kept behind `cfg(test)`: real strategies are supplied by the embedding application.

use crate::{
    model::{Distribution, Lambda, Normalization},
    stats::BasicStats,
};

/// `-ln(lambda / (tfn + lambda))`.
pub struct LogDistribution;

impl Distribution for LogDistribution {
    fn score(&self, _stats: &BasicStats, tfn: f32, lambda: f32) -> f32 {
        -(lambda / (tfn + lambda)).ln()
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// `(doc_freq + 1) / (documents + 1)`.
pub struct DocFreqLambda;

impl Lambda for DocFreqLambda {
    fn lambda(&self, stats: &BasicStats) -> f32 {
        (stats.doc_freq as f32 + 1.0) / (stats.number_of_documents as f32 + 1.0)
    }

    fn name(&self) -> &str {
        "df"
    }
}

/// `tf * avg_field_length / len`.
pub struct LengthRatio;

impl Normalization for LengthRatio {
    fn tfn(&self, stats: &BasicStats, tf: f32, len: f32) -> f32 {
        tf * stats.avg_field_length / len
    }

    fn name(&self) -> &str {
        "ratio"
    }
}
