//! Per-document scorers.
//!
//! A scorer is created once per clause and segment, then called for every candidate
//! document. Scoring allocates nothing and never fails.

use crate::{
    explain::Explanation,
    norms::{NormValues, decode_norm_value},
    payload::{PayloadBytes, payload_weight},
    similarity::{PayloadIbSimilarity, slop_factor},
    stats::BasicStats,
};

/// Scores documents for one clause.
pub trait DocScorer {
    /// Scores `doc` given the (possibly slop-weighted) occurrence frequency.
    fn score(&self, doc: u32, freq: f32) -> f32;

    /// Explains [`DocScorer::score`], with `freq` describing the frequency.
    fn explain(&self, doc: u32, freq: Explanation) -> Explanation;

    /// Proximity factor of a sloppy match.
    fn slop_factor(&self, distance: u32) -> f32;

    /// Weight of one occurrence spanning `start..end` in `doc`.
    fn payload_factor(
        &self,
        doc: u32,
        start: u32,
        end: u32,
        payload: Option<PayloadBytes<'_>>,
    ) -> f32;
}

/// Scores one term in one field.
#[derive(Clone, Copy)]
pub struct BasicSimScorer<'a> {
    /// Similarity supplying the formula.
    similarity: &'a PayloadIbSimilarity,
    /// Statistics of the term.
    stats: &'a BasicStats,
    /// Norms of the field, if stored.
    norms: Option<&'a dyn NormValues>,
}

impl<'a> BasicSimScorer<'a> {
    /// Creates a scorer for one term.
    pub fn new(
        similarity: &'a PayloadIbSimilarity,
        stats: &'a BasicStats,
        norms: Option<&'a dyn NormValues>,
    ) -> Self {
        Self {
            similarity,
            stats,
            norms,
        }
    }

    /// Length of the field in `doc`, or 1.0 without norms.
    fn doc_len(&self, doc: u32) -> f32 {
        self.norms
            .and_then(|norms| norms.norm(doc))
            .map_or(1.0, decode_norm_value)
    }
}

impl DocScorer for BasicSimScorer<'_> {
    fn score(&self, doc: u32, freq: f32) -> f32 {
        self.similarity.score(self.stats, freq, self.doc_len(doc))
    }

    fn explain(&self, doc: u32, freq: Explanation) -> Explanation {
        self.similarity
            .explain(self.stats, doc, freq, self.doc_len(doc))
    }

    fn slop_factor(&self, distance: u32) -> f32 {
        slop_factor(distance)
    }

    fn payload_factor(
        &self,
        _doc: u32,
        _start: u32,
        _end: u32,
        payload: Option<PayloadBytes<'_>>,
    ) -> f32 {
        self.similarity.payload_factor(payload)
    }
}

/// Scores a multi-term clause as the sum of its terms' scores.
///
/// Every matching term adds to the score, approximating a boolean query over the terms.
pub struct MultiSimScorer<'a> {
    /// One scorer per term, in query order.
    sub_scorers: Vec<BasicSimScorer<'a>>,
}

impl<'a> MultiSimScorer<'a> {
    /// Creates a summing scorer.
    pub fn new(sub_scorers: Vec<BasicSimScorer<'a>>) -> Self {
        Self { sub_scorers }
    }

    /// The per-term scorers.
    pub fn sub_scorers(&self) -> &[BasicSimScorer<'a>] {
        &self.sub_scorers
    }
}

impl DocScorer for MultiSimScorer<'_> {
    fn score(&self, doc: u32, freq: f32) -> f32 {
        self.sub_scorers
            .iter()
            .map(|scorer| scorer.score(doc, freq))
            .sum()
    }

    fn explain(&self, doc: u32, freq: Explanation) -> Explanation {
        let details = self
            .sub_scorers
            .iter()
            .map(|scorer| scorer.explain(doc, freq.clone()))
            .collect();
        Explanation::with_details(self.score(doc, freq.value), "sum of:", details)
    }

    // Proximity and payload factors come from the first term.

    fn slop_factor(&self, distance: u32) -> f32 {
        self.sub_scorers
            .first()
            .map_or_else(|| slop_factor(distance), |s| s.slop_factor(distance))
    }

    fn payload_factor(
        &self,
        doc: u32,
        start: u32,
        end: u32,
        payload: Option<PayloadBytes<'_>>,
    ) -> f32 {
        self.sub_scorers.first().map_or_else(
            || payload_weight(payload),
            |s| s.payload_factor(doc, start, end, payload),
        )
    }
}

/// A clause scorer: one term or a sum over several.
pub enum SimScorer<'a> {
    /// Single term.
    Basic(BasicSimScorer<'a>),
    /// Several terms.
    Multi(MultiSimScorer<'a>),
}

impl DocScorer for SimScorer<'_> {
    fn score(&self, doc: u32, freq: f32) -> f32 {
        match self {
            Self::Basic(scorer) => scorer.score(doc, freq),
            Self::Multi(scorer) => scorer.score(doc, freq),
        }
    }

    fn explain(&self, doc: u32, freq: Explanation) -> Explanation {
        match self {
            Self::Basic(scorer) => scorer.explain(doc, freq),
            Self::Multi(scorer) => scorer.explain(doc, freq),
        }
    }

    fn slop_factor(&self, distance: u32) -> f32 {
        match self {
            Self::Basic(scorer) => scorer.slop_factor(distance),
            Self::Multi(scorer) => scorer.slop_factor(distance),
        }
    }

    fn payload_factor(
        &self,
        doc: u32,
        start: u32,
        end: u32,
        payload: Option<PayloadBytes<'_>>,
    ) -> f32 {
        match self {
            Self::Basic(scorer) => scorer.payload_factor(doc, start, end, payload),
            Self::Multi(scorer) => scorer.payload_factor(doc, start, end, payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use super::*;
    use crate::{
        norms::{NoNorms, encode_norm_value},
        payload::encode_float,
        stats::{CollectionStatistics, SimWeight, TermStatistics},
        test_support::{DocFreqLambda, LengthRatio, LogDistribution},
    };

    fn similarity() -> PayloadIbSimilarity {
        PayloadIbSimilarity::new(
            Arc::new(LogDistribution),
            Arc::new(DocFreqLambda),
            Arc::new(LengthRatio),
        )
    }

    fn weight(terms: &[(&str, u64)]) -> SimWeight {
        let collection = CollectionStatistics::new("body", 50).with_sum_total_term_freq(600);
        let terms: Vec<_> = terms
            .iter()
            .map(|&(term, df)| TermStatistics::new(term, df, None))
            .collect();
        SimWeight::compute(1.0, &collection, &terms).unwrap()
    }

    fn norms() -> HashMap<String, Vec<u8>> {
        HashMap::from([(
            "body".to_string(),
            vec![encode_norm_value(1.0, 4.0), encode_norm_value(1.0, 16.0)],
        )])
    }

    #[test]
    fn norms_feed_document_length() {
        let sim = similarity();
        let weight = weight(&[("a", 5)]);
        let norms = norms();
        let scorer = sim.sim_scorer(&weight, &norms);
        let SimWeight::Single(stats) = &weight else {
            panic!("expected single stats");
        };

        assert_eq!(scorer.score(0, 2.0), sim.score(stats, 2.0, 4.0));
        assert_eq!(scorer.score(1, 2.0), sim.score(stats, 2.0, 16.0));
        assert!(scorer.score(0, 2.0) > scorer.score(1, 2.0));
    }

    #[test]
    fn missing_norms_use_unit_length() {
        let sim = similarity();
        let weight = weight(&[("a", 5)]);
        let SimWeight::Single(stats) = &weight else {
            panic!("expected single stats");
        };

        let scorer = sim.sim_scorer(&weight, &NoNorms);
        assert_eq!(scorer.score(3, 1.0), sim.score(stats, 1.0, 1.0));

        // A document past the end of the norms is treated the same way.
        let norms = norms();
        let scorer = sim.sim_scorer(&weight, &norms);
        assert_eq!(scorer.score(99, 1.0), sim.score(stats, 1.0, 1.0));
    }

    #[test]
    fn multi_scorer_sums_exactly() {
        let sim = similarity();
        let weight = weight(&[("a", 1), ("b", 7), ("c", 30)]);
        let norms = norms();
        let scorer = sim.sim_scorer(&weight, &norms);
        let SimScorer::Multi(multi) = &scorer else {
            panic!("expected multi scorer");
        };

        let parts: Vec<f32> = multi
            .sub_scorers()
            .iter()
            .map(|s| s.score(1, 3.0))
            .collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(scorer.score(1, 3.0), parts[0] + parts[1] + parts[2]);
    }

    #[test]
    fn multi_explain_matches_score() {
        let sim = similarity();
        let weight = weight(&[("a", 1), ("b", 7)]);
        let scorer = sim.sim_scorer(&weight, &NoNorms);

        let expl = scorer.explain(0, Explanation::new(2.0, "phraseFreq=2"));
        assert_eq!(expl.value, scorer.score(0, 2.0));
        assert_eq!(expl.description, "sum of:");
        assert_eq!(expl.details.len(), 2);
        assert_eq!(expl.details[1].value, {
            let SimScorer::Multi(multi) = &scorer else {
                panic!("expected multi scorer");
            };
            multi.sub_scorers()[1].score(0, 2.0)
        });
    }

    #[test]
    fn factors_delegate() {
        let sim = similarity();
        let payload = encode_float(0.25);

        for weight in [weight(&[("a", 1)]), weight(&[("a", 1), ("b", 2)])] {
            let scorer = sim.sim_scorer(&weight, &NoNorms);
            assert_eq!(scorer.slop_factor(0), 1.0);
            assert_eq!(scorer.slop_factor(4), 0.2);
            assert_eq!(
                scorer.payload_factor(0, 0, 1, Some(PayloadBytes::new(&payload))),
                0.25
            );
            assert_eq!(scorer.payload_factor(0, 0, 1, None), 1.0);
        }
    }

    #[test]
    fn empty_multi_scorer_is_neutral() {
        let scorer = MultiSimScorer::new(Vec::new());
        assert_eq!(scorer.score(0, 1.0), 0.0);
        assert_eq!(scorer.slop_factor(1), 0.5);
        assert_eq!(scorer.payload_factor(0, 0, 1, None), 1.0);
    }
}
