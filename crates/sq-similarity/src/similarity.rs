//! The payload-aware information-based similarity.
//!
//! A term scores `boost * distribution(stats, tfn, lambda)` with
//! `tfn = normalization(stats, freq, doc_len)`. The query boost is applied last, as a plain
//! multiplier, so it never enters the statistical formula. On top of the base score every
//! occurrence carries a payload weight and every sloppy match a proximity factor.

use std::{fmt, sync::Arc};

use crate::{
    explain::Explanation,
    model::{Distribution, Lambda, Normalization},
    norms::{FieldInvertState, NormSource, encode_norm_value},
    payload::{PayloadBytes, payload_weight},
    scorer::{BasicSimScorer, MultiSimScorer, SimScorer},
    stats::{BasicStats, CollectionStatistics, SimWeight, TermStatistics},
};

/// Proximity factor of a match `distance` positions away from exact adjacency.
///
/// 1.0 for an exact match, decaying as `1 / (distance + 1)`.
pub fn slop_factor(distance: u32) -> f32 {
    1.0 / (distance as f32 + 1.0)
}

/// Information-based similarity with payload weighting.
#[derive(Clone)]
pub struct PayloadIbSimilarity {
    /// Distribution of informative content.
    distribution: Arc<dyn Distribution>,
    /// Collection-level parameter.
    lambda: Arc<dyn Lambda>,
    /// Term frequency normalization.
    normalization: Arc<dyn Normalization>,
    /// Whether overlapping tokens are left out of the field length.
    discount_overlaps: bool,
}

impl PayloadIbSimilarity {
    /// Composes a similarity from its three strategies.
    pub fn new(
        distribution: Arc<dyn Distribution>,
        lambda: Arc<dyn Lambda>,
        normalization: Arc<dyn Normalization>,
    ) -> Self {
        Self {
            distribution,
            lambda,
            normalization,
            discount_overlaps: true,
        }
    }

    /// Sets whether overlapping tokens count towards the field length.
    pub fn with_discount_overlaps(mut self, discount_overlaps: bool) -> Self {
        self.discount_overlaps = discount_overlaps;
        self
    }

    /// The distribution strategy.
    pub fn distribution(&self) -> &dyn Distribution {
        self.distribution.as_ref()
    }

    /// The lambda strategy.
    pub fn lambda(&self) -> &dyn Lambda {
        self.lambda.as_ref()
    }

    /// The normalization strategy.
    pub fn normalization(&self) -> &dyn Normalization {
        self.normalization.as_ref()
    }

    /// Computes the norm byte stored for a field at index time.
    pub fn compute_norm(&self, state: &FieldInvertState) -> u8 {
        let length = if self.discount_overlaps {
            state.length.saturating_sub(state.num_overlap)
        } else {
            state.length
        };
        encode_norm_value(state.boost, length as f32)
    }

    /// Builds the query-level weight of a clause. See [`SimWeight::compute`].
    pub fn compute_weight(
        &self,
        query_boost: f32,
        collection: &CollectionStatistics,
        terms: &[TermStatistics],
    ) -> Option<SimWeight> {
        SimWeight::compute(query_boost, collection, terms)
    }

    /// Scores `freq` occurrences in a document of length `doc_len`.
    pub fn score(&self, stats: &BasicStats, freq: f32, doc_len: f32) -> f32 {
        stats.total_boost
            * self.distribution.score(
                stats,
                self.normalization.tfn(stats, freq, doc_len),
                self.lambda.lambda(stats),
            )
    }

    /// Explains [`PayloadIbSimilarity::score`].
    pub fn explain(
        &self,
        stats: &BasicStats,
        doc: u32,
        freq: Explanation,
        doc_len: f32,
    ) -> Explanation {
        let tf = freq.value;
        let mut result = Explanation::with_details(
            self.score(stats, tf, doc_len),
            format!("score({self}, doc={doc}, freq={tf}), computed from:"),
            vec![freq],
        );

        if stats.total_boost != 1.0 {
            result.push(Explanation::new(stats.total_boost, "boost"));
        }
        let normalization = self.normalization.explain(stats, tf, doc_len);
        let lambda = self.lambda.explain(stats);
        let distribution = self
            .distribution
            .explain(stats, normalization.value, lambda.value);
        result.push(normalization);
        result.push(lambda);
        result.push(distribution);
        result
    }

    /// Weight of one occurrence from its payload.
    pub fn payload_factor(&self, payload: Option<PayloadBytes<'_>>) -> f32 {
        payload_weight(payload)
    }

    /// Creates the per-segment scorer for a clause.
    ///
    /// Norms are looked up once per field here; a field without norms scores with document
    /// length 1.0.
    pub fn sim_scorer<'a>(&'a self, weight: &'a SimWeight, norms: &'a dyn NormSource) -> SimScorer<'a> {
        match weight {
            SimWeight::Single(stats) => {
                SimScorer::Basic(BasicSimScorer::new(self, stats, norms.norm_values(&stats.field)))
            }
            SimWeight::Multi(multi) => SimScorer::Multi(MultiSimScorer::new(
                multi
                    .sub_stats()
                    .iter()
                    .map(|stats| BasicSimScorer::new(self, stats, norms.norm_values(&stats.field)))
                    .collect(),
            )),
        }
    }
}

impl fmt::Debug for PayloadIbSimilarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadIbSimilarity")
            .field("distribution", &self.distribution.name())
            .field("lambda", &self.lambda.name())
            .field("normalization", &self.normalization.name())
            .field("discount_overlaps", &self.discount_overlaps)
            .finish()
    }
}

impl fmt::Display for PayloadIbSimilarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IB {}-{}", self.distribution.name(), self.lambda.name())?;
        match self.normalization.name() {
            "" => Ok(()),
            name => write!(f, "-{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::NoNormalization,
        test_support::{DocFreqLambda, LogDistribution, LengthRatio},
    };

    fn similarity() -> PayloadIbSimilarity {
        PayloadIbSimilarity::new(
            Arc::new(LogDistribution),
            Arc::new(DocFreqLambda),
            Arc::new(LengthRatio),
        )
    }

    fn stats(boost: f32) -> BasicStats {
        BasicStats::new(
            boost,
            &CollectionStatistics::new("body", 100).with_sum_total_term_freq(1000),
            &TermStatistics::new("rust", 9, Some(20)),
        )
    }

    #[test]
    fn slop_factor_decays() {
        assert_eq!(slop_factor(0), 1.0);
        assert_eq!(slop_factor(1), 0.5);
        assert_eq!(slop_factor(3), 0.25);
        let mut previous = slop_factor(0);
        for distance in 1..50 {
            let next = slop_factor(distance);
            assert!(next < previous && next > 0.0);
            previous = next;
        }
    }

    #[test]
    fn composes_strategies() {
        let sim = similarity();
        let s = stats(1.0);
        let tfn = LengthRatio.tfn(&s, 2.0, 5.0);
        let lambda = DocFreqLambda.lambda(&s);
        assert_eq!(sim.score(&s, 2.0, 5.0), LogDistribution.score(&s, tfn, lambda));
    }

    #[test]
    fn boost_is_a_final_multiplier() {
        let sim = similarity();
        assert_eq!(
            sim.score(&stats(3.0), 2.0, 5.0),
            3.0 * sim.score(&stats(1.0), 2.0, 5.0)
        );
    }

    #[test]
    fn explain_matches_score() {
        let sim = similarity();
        let s = stats(2.0);
        let expl = sim.explain(&s, 7, Explanation::new(3.0, "termFreq=3"), 12.0);
        assert_eq!(expl.value, sim.score(&s, 3.0, 12.0));
        assert_eq!(
            expl.description,
            "score(IB log-df-ratio, doc=7, freq=3), computed from:"
        );
        let descriptions: Vec<_> = expl.details.iter().map(|d| d.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["termFreq=3", "boost", "ratio, computed from:", "df", "log"]
        );
    }

    #[test]
    fn explain_omits_unit_boost() {
        let expl = similarity().explain(&stats(1.0), 0, Explanation::new(1.0, "termFreq=1"), 1.0);
        assert!(expl.details.iter().all(|d| d.description != "boost"));
    }

    #[test]
    fn norms_discount_overlaps() {
        let state = FieldInvertState {
            length: 6,
            num_overlap: 2,
            boost: 1.0,
        };
        let sim = similarity();
        assert_eq!(sim.compute_norm(&state), encode_norm_value(1.0, 4.0));
        assert_eq!(
            sim.with_discount_overlaps(false).compute_norm(&state),
            encode_norm_value(1.0, 6.0)
        );
    }

    #[test]
    fn display_names_strategies() {
        let sim = PayloadIbSimilarity::new(
            Arc::new(LogDistribution),
            Arc::new(DocFreqLambda),
            Arc::new(NoNormalization),
        );
        assert_eq!(sim.to_string(), "IB log-df");
    }
}
