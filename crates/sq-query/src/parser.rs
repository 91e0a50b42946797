//! Query parser.
//!
//! Builds a [`QueryNode`] tree from the token stream. The parser is forgiving: whatever the
//! input, it returns the best tree it can (possibly none) and never reports a grammar error.
//!
//! # Precedence
//!
//! There is no precedence between `+` and `|`. Clauses are combined from right to left, so
//! the rightmost operator binds first:
//!
//! ```text
//! a | b + c   =>   a OR (b AND c)
//! a + b | c   =>   a AND (b OR c)
//! a b c       =>   a OR b OR c        (default operator OR)
//! ```
//!
//! Parenthesized groups are parsed as a single clause. Adjacent clauses without an operator
//! are joined with the default operator, except that a negated clause (`-term`) is always
//! joined to its neighbor with AND. Only the first operator between two clauses counts;
//! operators with nothing on their left are ignored.
//!
//! # Field fan-out
//!
//! Every term, phrase, prefix and fuzzy clause is expanded into one boosted sub-clause per
//! configured field, joined with SHOULD. With a single field the wrapper disappears.

use std::{fmt, mem, sync::Arc};

use tracing::{debug, trace};

use crate::{
    analyzer::Analyzer,
    ast::{Occur, QueryNode},
    error::{AnalysisError, QueryError},
    lexer::{Token, tokenize},
    settings::ParserConfig,
};

/// Largest supported fuzzy edit distance.
pub const MAX_EDIT_DISTANCE: u8 = 2;

/// A parsed clause waiting to be combined with its neighbors.
struct Clause {
    /// Explicit operator written between the previous clause and this one.
    op: Option<Occur>,
    /// Whether the clause carried an odd number of `-` prefixes.
    negated: bool,
    /// The clause, already wrapped in `MustNot` if negated.
    node: QueryNode,
}

/// Clauses of one nesting level, with the operator and negations seen since the last clause.
#[derive(Default)]
struct Frame {
    /// Clauses parsed so far at this level.
    clauses: Vec<Clause>,
    /// First explicit operator since the previous clause.
    pending: Option<Occur>,
    /// Count of `-` prefixes since the previous clause.
    negations: u32,
}

/// Parses simple query strings against a fixed configuration and analyzer.
///
/// A parser holds only immutable state and can be shared across threads.
#[derive(Clone)]
pub struct QueryParser {
    /// Analyzer used for term and phrase text.
    analyzer: Arc<dyn Analyzer>,
    /// Fields, flags, default operator and settings.
    config: ParserConfig,
}

impl fmt::Debug for QueryParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryParser")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QueryParser {
    /// Creates a parser.
    pub fn new(analyzer: Arc<dyn Analyzer>, config: ParserConfig) -> Self {
        debug!(
            flags = %config.flags,
            default_operator = %config.default_operator,
            fields = config.fields.len(),
            "created query parser"
        );
        Self { analyzer, config }
    }

    /// The parser configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses query text into a tree.
    ///
    /// Returns `Ok(None)` when the text holds nothing to search for. The only error is an
    /// analyzer failure when the parser is not lenient.
    pub fn parse(&self, text: &str) -> Result<Option<QueryNode>, QueryError> {
        let tokens = tokenize(text, self.config.flags);
        let mut builder = TreeBuilder {
            parser: self,
            tokens,
            position: 0,
        };
        let tree = builder.parse_sequence()?;
        debug!(
            nodes = tree.as_ref().map_or(0, QueryNode::node_count),
            "parsed query"
        );
        Ok(tree)
    }

    /// Analyzes `text` for `field`, swallowing the failure when lenient.
    fn analyze(&self, field: &str, text: &str) -> Result<Vec<String>, AnalysisError> {
        match self.analyzer.analyze(field, text) {
            Ok(terms) => Ok(terms),
            Err(err) if self.config.settings.lenient => {
                trace!(%err, "lenient: dropped clause");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Lower-cases prefix and fuzzy text when configured to.
    fn fold_expanded(&self, text: &str) -> String {
        if self.config.settings.lowercase_expanded_terms {
            self.config.settings.locale.to_lowercase(text)
        } else {
            text.to_string()
        }
    }

    /// Joins per-field clauses with SHOULD.
    fn fan_out(
        &self,
        mut per_field: impl FnMut(&str, f32) -> Result<Option<QueryNode>, AnalysisError>,
    ) -> Result<Option<QueryNode>, QueryError> {
        let mut clauses = Vec::with_capacity(self.config.fields.len());
        for (field, boost) in self.config.fields.iter() {
            if let Some(node) = per_field(field, boost)? {
                clauses.push(node);
            }
        }
        Ok(QueryNode::boolean(Occur::Should, clauses))
    }

    /// Builds the clause for a plain term.
    ///
    /// When the analyzer splits the text, the pieces are joined with the default operator.
    pub fn new_default_query(&self, text: &str) -> Result<Option<QueryNode>, QueryError> {
        let occur = self.config.default_operator.occur();
        self.fan_out(|field, boost| {
            let terms = self
                .analyze(field, text)?
                .into_iter()
                .map(|term| QueryNode::term(field, term).with_boost(boost))
                .collect();
            Ok(QueryNode::boolean(occur, terms))
        })
    }

    /// Builds the clause for a phrase. A phrase that analyzes to one term is a term query.
    pub fn new_phrase_query(&self, text: &str, slop: u32) -> Result<Option<QueryNode>, QueryError> {
        self.fan_out(|field, boost| {
            let mut terms = self.analyze(field, text)?;
            Ok(match terms.len() {
                0 => None,
                1 => terms.pop().map(|term| QueryNode::term(field, term).with_boost(boost)),
                _ => Some(QueryNode::Phrase {
                    field: field.to_string(),
                    terms,
                    slop,
                    boost,
                }),
            })
        })
    }

    /// Builds the clause for a prefix. Prefix text is not analyzed.
    pub fn new_prefix_query(&self, text: &str) -> Result<Option<QueryNode>, QueryError> {
        let text = self.fold_expanded(text);
        self.fan_out(|field, boost| {
            Ok(Some(QueryNode::Prefix {
                field: field.to_string(),
                text: text.clone(),
                boost,
            }))
        })
    }

    /// Builds the clause for a fuzzy term. The distance is clamped to [`MAX_EDIT_DISTANCE`].
    pub fn new_fuzzy_query(
        &self,
        text: &str,
        distance: u32,
    ) -> Result<Option<QueryNode>, QueryError> {
        let distance = u8::try_from(distance)
            .unwrap_or(MAX_EDIT_DISTANCE)
            .min(MAX_EDIT_DISTANCE);
        if distance == 0 {
            return self.new_default_query(text);
        }

        let text = self.fold_expanded(text);
        self.fan_out(|field, boost| {
            Ok(Some(QueryNode::Fuzzy {
                field: field.to_string(),
                text: text.clone(),
                distance,
                boost,
            }))
        })
    }
}

/// Walks the token stream of one parse.
struct TreeBuilder<'p> {
    /// Parser supplying configuration and clause factories.
    parser: &'p QueryParser,
    /// Tokens of the whole query.
    tokens: Vec<Token>,
    /// Index of the next token.
    position: usize,
}

impl TreeBuilder<'_> {
    /// Parses the whole token stream.
    ///
    /// Groups are handled with an explicit stack of frames, so nesting depth is bounded only
    /// by memory. `(` saves the enclosing frame; the matching `)` closes the group into a
    /// single clause of the restored frame.
    fn parse_sequence(&mut self) -> Result<Option<QueryNode>, QueryError> {
        let mut open: Vec<Frame> = Vec::new();
        let mut frame = Frame::default();

        loop {
            let node = match self.next() {
                None => {
                    let tree = self.combine(mem::take(&mut frame.clauses));
                    match open.pop() {
                        Some(outer) => {
                            frame = outer;
                            tree
                        }
                        None => return Ok(tree),
                    }
                }
                Some(Token::RParen) => match open.pop() {
                    Some(outer) => {
                        let inner = mem::replace(&mut frame, outer);
                        self.combine(inner.clauses)
                    }
                    None => continue,
                },
                Some(Token::LParen) => {
                    open.push(mem::take(&mut frame));
                    continue;
                }
                Some(Token::Not) => {
                    frame.negations += 1;
                    continue;
                }
                Some(token @ (Token::And | Token::Or)) => {
                    if frame.pending.is_none() && !frame.clauses.is_empty() {
                        frame.pending = Some(if matches!(token, Token::And) {
                            Occur::Must
                        } else {
                            Occur::Should
                        });
                    }
                    frame.negations = 0;
                    continue;
                }
                Some(Token::Term(text)) => self.parser.new_default_query(&text)?,
                Some(Token::Prefix(text)) => self.parser.new_prefix_query(&text)?,
                Some(Token::Fuzzy { text, distance }) => {
                    self.parser.new_fuzzy_query(&text, distance)?
                }
                Some(Token::Phrase { text, slop }) => self.parser.new_phrase_query(&text, slop)?,
            };

            let negated = frame.negations % 2 == 1;
            frame.negations = 0;

            // A clause that produced nothing leaves the pending operator for the next one.
            if let Some(node) = node {
                frame.clauses.push(Clause {
                    op: frame.pending.take(),
                    negated,
                    node: if negated { node.negate() } else { node },
                });
            }
        }
    }

    /// Combines clauses from right to left.
    ///
    /// Runs of the same operator share one boolean node; a change of operator closes the run
    /// built so far and makes it a single clause of the new one.
    fn combine(&self, clauses: Vec<Clause>) -> Option<QueryNode> {
        let default = self.parser.config.default_operator.occur();
        let mut clauses = clauses.into_iter().rev();

        let last = clauses.next()?;
        let mut link = last.op;
        let mut right_negated = last.negated;
        // Built right to left, reversed when closed.
        let mut run = vec![last.node];
        let mut run_occur: Option<Occur> = None;

        for clause in clauses {
            let occur = link.unwrap_or(if clause.negated || right_negated {
                Occur::Must
            } else {
                default
            });

            if let Some(current) = run_occur
                && current != occur
            {
                run = vec![close_run(Some(current), run)];
            }
            run_occur = Some(occur);
            run.push(clause.node);

            link = clause.op;
            right_negated = clause.negated;
        }

        Some(close_run(run_occur, run))
    }

    /// Returns the next token.
    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }
}

/// Turns a reversed run of clauses into a node.
fn close_run(occur: Option<Occur>, mut run: Vec<QueryNode>) -> QueryNode {
    run.reverse();
    match (occur, run.len()) {
        (Some(occur), n) if n > 1 => QueryNode::Boolean {
            occur,
            children: run,
        },
        _ => run.swap_remove(0),
    }
}
