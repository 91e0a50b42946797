//! Corpus statistics consumed by the scorer.
//!
//! Collection and term statistics come from the index. They are folded into [`BasicStats`]
//! once per query, before any document is scored.

/// Field-level statistics for one index segment or shard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStatistics {
    /// Field the statistics describe.
    pub field: String,
    /// Number of documents, including those without the field.
    pub max_doc: u64,
    /// Number of documents with at least one term in the field, if known.
    pub doc_count: Option<u64>,
    /// Total number of term occurrences in the field, if known.
    pub sum_total_term_freq: Option<u64>,
    /// Sum of document frequencies over all terms in the field, if known.
    pub sum_doc_freq: Option<u64>,
}

impl CollectionStatistics {
    /// Statistics with only the document count known.
    pub fn new(field: impl Into<String>, max_doc: u64) -> Self {
        Self {
            field: field.into(),
            max_doc,
            doc_count: None,
            sum_total_term_freq: None,
            sum_doc_freq: None,
        }
    }

    /// Sets the total term occurrence count.
    pub fn with_sum_total_term_freq(mut self, value: u64) -> Self {
        self.sum_total_term_freq = Some(value);
        self
    }
}

/// Statistics for one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermStatistics {
    /// The term text.
    pub term: String,
    /// Number of documents containing the term.
    pub doc_freq: u64,
    /// Number of occurrences of the term, if known.
    pub total_term_freq: Option<u64>,
}

impl TermStatistics {
    /// Creates term statistics.
    pub fn new(term: impl Into<String>, doc_freq: u64, total_term_freq: Option<u64>) -> Self {
        Self {
            term: term.into(),
            doc_freq,
            total_term_freq,
        }
    }
}

/// Statistics for one term in one field, with the query-time boost.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicStats {
    /// Field the term is searched in.
    pub field: String,
    /// Number of documents in the collection.
    pub number_of_documents: u64,
    /// Number of tokens in the field across the collection.
    pub number_of_field_tokens: u64,
    /// Average field length in tokens.
    pub avg_field_length: f32,
    /// Number of documents containing the term.
    pub doc_freq: u64,
    /// Number of occurrences of the term.
    pub total_term_freq: u64,
    /// Boost given to the clause by the query.
    pub query_boost: f32,
    /// Query boost times the boost of the enclosing query.
    pub total_boost: f32,
}

impl BasicStats {
    /// Derives statistics for a term.
    ///
    /// An unknown total term frequency is taken to be the document frequency. When the field
    /// token count is unknown (or zero) the document frequency stands in for it and the average
    /// field length is 1.
    pub fn new(
        query_boost: f32,
        collection: &CollectionStatistics,
        term: &TermStatistics,
    ) -> Self {
        let number_of_documents = collection.max_doc;
        let doc_freq = term.doc_freq;
        let total_term_freq = term.total_term_freq.unwrap_or(doc_freq);

        let (number_of_field_tokens, avg_field_length) = match collection.sum_total_term_freq {
            Some(sum) if sum > 0 => (sum, sum as f32 / number_of_documents.max(1) as f32),
            _ => (doc_freq, 1.0),
        };

        Self {
            field: collection.field.clone(),
            number_of_documents,
            number_of_field_tokens,
            avg_field_length,
            doc_freq,
            total_term_freq,
            query_boost,
            total_boost: query_boost,
        }
    }

    /// Squared raw boost, used by the caller to compute a query norm.
    pub fn value_for_normalization(&self) -> f32 {
        self.query_boost * self.query_boost
    }

    /// Applies the boost of the enclosing query.
    pub fn with_top_level_boost(mut self, top_level_boost: f32) -> Self {
        self.total_boost = self.query_boost * top_level_boost;
        self
    }
}

/// Statistics for every term of a multi-term clause, in query order.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiStats(pub Vec<BasicStats>);

impl MultiStats {
    /// The per-term statistics.
    pub fn sub_stats(&self) -> &[BasicStats] {
        &self.0
    }
}

/// Query-level scoring state for one clause: one term or several.
#[derive(Debug, Clone, PartialEq)]
pub enum SimWeight {
    /// A single term.
    Single(BasicStats),
    /// Several terms scored as a sum (phrases, multi-field expansions).
    Multi(MultiStats),
}

impl SimWeight {
    /// Builds the weight for a clause from its collection and term statistics.
    ///
    /// Returns `None` when no terms are given.
    pub fn compute(
        query_boost: f32,
        collection: &CollectionStatistics,
        terms: &[TermStatistics],
    ) -> Option<Self> {
        match terms {
            [] => None,
            [term] => Some(Self::Single(BasicStats::new(query_boost, collection, term))),
            _ => Some(Self::Multi(MultiStats(
                terms
                    .iter()
                    .map(|term| BasicStats::new(query_boost, collection, term))
                    .collect(),
            ))),
        }
    }

    /// Sum of the squared boosts of every term.
    pub fn value_for_normalization(&self) -> f32 {
        match self {
            Self::Single(stats) => stats.value_for_normalization(),
            Self::Multi(multi) => multi
                .sub_stats()
                .iter()
                .map(BasicStats::value_for_normalization)
                .sum(),
        }
    }

    /// Applies the boost of the enclosing query to every term.
    pub fn with_top_level_boost(self, top_level_boost: f32) -> Self {
        match self {
            Self::Single(stats) => Self::Single(stats.with_top_level_boost(top_level_boost)),
            Self::Multi(MultiStats(stats)) => Self::Multi(MultiStats(
                stats
                    .into_iter()
                    .map(|s| s.with_top_level_boost(top_level_boost))
                    .collect(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> CollectionStatistics {
        CollectionStatistics::new("body", 10).with_sum_total_term_freq(250)
    }

    #[test]
    fn derives_field_averages() {
        let stats = BasicStats::new(2.0, &collection(), &TermStatistics::new("a", 4, Some(9)));
        assert_eq!(stats.field, "body");
        assert_eq!(stats.number_of_documents, 10);
        assert_eq!(stats.number_of_field_tokens, 250);
        assert_eq!(stats.avg_field_length, 25.0);
        assert_eq!(stats.doc_freq, 4);
        assert_eq!(stats.total_term_freq, 9);
        assert_eq!(stats.total_boost, 2.0);
    }

    #[test]
    fn unknown_frequencies_fall_back_to_doc_freq() {
        let stats = BasicStats::new(
            1.0,
            &CollectionStatistics::new("body", 10),
            &TermStatistics::new("a", 4, None),
        );
        assert_eq!(stats.total_term_freq, 4);
        assert_eq!(stats.number_of_field_tokens, 4);
        assert_eq!(stats.avg_field_length, 1.0);
    }

    #[test]
    fn one_term_is_single_several_are_multi() {
        let a = TermStatistics::new("a", 1, None);
        let b = TermStatistics::new("b", 2, None);

        assert!(SimWeight::compute(1.0, &collection(), &[]).is_none());
        assert!(matches!(
            SimWeight::compute(1.0, &collection(), &[a.clone()]),
            Some(SimWeight::Single(_))
        ));
        match SimWeight::compute(1.0, &collection(), &[a, b]) {
            Some(SimWeight::Multi(multi)) => assert_eq!(multi.sub_stats().len(), 2),
            other => panic!("expected multi stats, got {other:?}"),
        }
    }

    #[test]
    fn top_level_boost_multiplies() {
        let weight = SimWeight::compute(
            3.0,
            &collection(),
            &[TermStatistics::new("a", 1, None), TermStatistics::new("b", 1, None)],
        )
        .unwrap();
        assert_eq!(weight.value_for_normalization(), 18.0);

        let SimWeight::Multi(multi) = weight.with_top_level_boost(0.5) else {
            panic!("expected multi stats");
        };
        assert!(multi.sub_stats().iter().all(|s| s.total_boost == 1.5));
    }
}
