//! Payload-weighted span scoring.
//!
//! Term and near queries over payload fields collect, per document, every span match with
//! its positions and the payloads of the terms inside it. Matches add to the frequency by
//! their proximity; payloads are folded by a [`PayloadFunction`]. The document score is the
//! clause score times the payload factor.

use crate::{
    explain::Explanation,
    payload::{PayloadBytes, PayloadFunction},
    scorer::DocScorer,
};

/// One span match in a document.
#[derive(Debug, Clone, Copy)]
pub struct SpanMatch<'a> {
    /// First position of the span.
    pub start: u32,
    /// Position after the last term of the span.
    pub end: u32,
    /// Payload of every term occurrence in the span, `None` where absent.
    pub payloads: &'a [Option<PayloadBytes<'a>>],
}

/// Frequency and payload state accumulated over a document's matches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanFreq {
    /// Sum of the slop factors of every match.
    pub freq: f32,
    /// Number of matches.
    pub matches: u32,
    /// Running payload score.
    pub payload_score: f32,
    /// Number of payload weights folded into `payload_score`.
    pub payloads_seen: u32,
}

/// Scores documents from their span matches.
pub struct PayloadSpanScorer<'s, S> {
    /// Clause scorer.
    scorer: &'s S,
    /// Payload aggregation.
    function: PayloadFunction,
    /// Number of terms in the clause; a match this long has distance 0.
    term_count: u32,
    /// Whether the clause score is multiplied in, or only the payload factor is used.
    include_span_score: bool,
}

impl<'s, S: DocScorer> PayloadSpanScorer<'s, S> {
    /// Creates a span scorer for a clause of `term_count` terms.
    pub fn new(scorer: &'s S, function: PayloadFunction, term_count: u32) -> Self {
        Self {
            scorer,
            function,
            term_count,
            include_span_score: true,
        }
    }

    /// Sets whether the clause score is part of the document score.
    pub fn with_span_score(mut self, include: bool) -> Self {
        self.include_span_score = include;
        self
    }

    /// Accumulates the matches of `doc`.
    pub fn accumulate<'p>(
        &self,
        doc: u32,
        matches: impl IntoIterator<Item = SpanMatch<'p>>,
    ) -> SpanFreq {
        let mut acc = SpanFreq {
            freq: 0.0,
            matches: 0,
            payload_score: 0.0,
            payloads_seen: 0,
        };

        for span in matches {
            let distance = span
                .end
                .saturating_sub(span.start)
                .saturating_sub(self.term_count);
            acc.freq += self.scorer.slop_factor(distance);
            acc.matches += 1;

            for &payload in span.payloads {
                let weight = self
                    .scorer
                    .payload_factor(doc, span.start, span.end, payload);
                acc.payload_score =
                    self.function
                        .current_score(acc.payloads_seen, acc.payload_score, weight);
                acc.payloads_seen += 1;
            }
        }

        acc
    }

    /// Scores `doc` from its matches.
    pub fn score<'p>(&self, doc: u32, matches: impl IntoIterator<Item = SpanMatch<'p>>) -> f32 {
        let acc = self.accumulate(doc, matches);
        let payload = self.function.doc_score(acc.payloads_seen, acc.payload_score);
        if self.include_span_score {
            self.scorer.score(doc, acc.freq) * payload
        } else {
            payload
        }
    }

    /// Explains [`PayloadSpanScorer::score`].
    pub fn explain<'p>(
        &self,
        doc: u32,
        matches: impl IntoIterator<Item = SpanMatch<'p>>,
    ) -> Explanation {
        let acc = self.accumulate(doc, matches);
        let payload = self.function.explain(acc.payloads_seen, acc.payload_score);

        if !self.include_span_score {
            return Explanation::with_details(
                payload.value,
                "btq(includeSpanScore=false), result of:",
                vec![payload],
            );
        }

        let span = self.scorer.explain(
            doc,
            Explanation::new(acc.freq, format!("phraseFreq={}", acc.freq)),
        );
        Explanation::with_details(span.value * payload.value, "btq, product of:", vec![span, payload])
    }
}
