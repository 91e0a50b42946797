//! Query tree.
//!
//! The parser produces a [`QueryNode`] tree once per request. The tree is immutable and is read
//! concurrently by scoring passes; leaves carry the field and boost they were expanded for.

use std::fmt;

use serde::Serialize;

/// How a boolean node's children participate in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Occur {
    /// Every child must match.
    Must,
    /// Any child may match; more matches score higher.
    Should,
    /// No child may match. A node holding only `MustNot` children matches every other document.
    MustNot,
}

impl fmt::Display for Occur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Must => f.write_str("MUST"),
            Self::Should => f.write_str("SHOULD"),
            Self::MustNot => f.write_str("MUST_NOT"),
        }
    }
}

/// A parsed query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryNode {
    /// A single analyzed term.
    Term {
        /// Field searched.
        field: String,
        /// Term text.
        text: String,
        /// Clause weight.
        boost: f32,
    },

    /// An ordered run of terms, optionally allowing positional slack.
    Phrase {
        /// Field searched.
        field: String,
        /// Terms in order.
        terms: Vec<String>,
        /// Permitted positional distance; 0 requires exact adjacency.
        slop: u32,
        /// Clause weight.
        boost: f32,
    },

    /// Every term starting with `text`.
    Prefix {
        /// Field searched.
        field: String,
        /// The prefix, without the `*` marker.
        text: String,
        /// Clause weight.
        boost: f32,
    },

    /// Terms within an edit distance of `text`.
    Fuzzy {
        /// Field searched.
        field: String,
        /// Term text.
        text: String,
        /// Maximum edit distance (1 or 2).
        distance: u8,
        /// Clause weight.
        boost: f32,
    },

    /// A combination of child clauses sharing one occurrence.
    Boolean {
        /// How the children participate.
        occur: Occur,
        /// Child clauses, in query order.
        children: Vec<Self>,
    },
}

impl QueryNode {
    /// Creates a term clause with weight 1.0.
    pub fn term(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Term {
            field: field.into(),
            text: text.into(),
            boost: 1.0,
        }
    }

    /// Creates a boolean node, collapsing a single `Must`/`Should` child into the child itself.
    ///
    /// Returns `None` when there are no children.
    pub fn boolean(occur: Occur, children: Vec<Self>) -> Option<Self> {
        match (occur, children.len()) {
            (_, 0) => None,
            (Occur::Must | Occur::Should, 1) => children.into_iter().next(),
            _ => Some(Self::Boolean { occur, children }),
        }
    }

    /// Wraps this node in a `MustNot` boolean.
    pub fn negate(self) -> Self {
        Self::Boolean {
            occur: Occur::MustNot,
            children: vec![self],
        }
    }

    /// Returns a copy with the leaf boost replaced. Boolean nodes are returned unchanged.
    pub fn with_boost(self, weight: f32) -> Self {
        match self {
            Self::Term { field, text, .. } => Self::Term {
                field,
                text,
                boost: weight,
            },
            Self::Phrase {
                field, terms, slop, ..
            } => Self::Phrase {
                field,
                terms,
                slop,
                boost: weight,
            },
            Self::Prefix { field, text, .. } => Self::Prefix {
                field,
                text,
                boost: weight,
            },
            Self::Fuzzy {
                field,
                text,
                distance,
                ..
            } => Self::Fuzzy {
                field,
                text,
                distance,
                boost: weight,
            },
            other @ Self::Boolean { .. } => other,
        }
    }

    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::Boolean { .. })
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Boolean { children, .. } => 1 + children.iter().map(Self::node_count).sum::<usize>(),
            _ => 1,
        }
    }

    /// Visits every leaf in query order.
    pub fn for_each_leaf<'a>(&'a self, f: &mut impl FnMut(&'a Self)) {
        match self {
            Self::Boolean { children, .. } => {
                for child in children {
                    child.for_each_leaf(f);
                }
            }
            leaf => f(leaf),
        }
    }

    /// Formats the node as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Term { field, text, boost } => {
                writeln!(f, "{prefix}Term({field}:{text:?}){}", fmt_boost(*boost))
            }
            Self::Phrase {
                field,
                terms,
                slop,
                boost,
            } => {
                write!(f, "{prefix}Phrase({field}:{terms:?}")?;
                if *slop > 0 {
                    write!(f, "~{slop}")?;
                }
                writeln!(f, "){}", fmt_boost(*boost))
            }
            Self::Prefix { field, text, boost } => {
                writeln!(f, "{prefix}Prefix({field}:{text:?}){}", fmt_boost(*boost))
            }
            Self::Fuzzy {
                field,
                text,
                distance,
                boost,
            } => writeln!(
                f,
                "{prefix}Fuzzy({field}:{text:?}~{distance}){}",
                fmt_boost(*boost)
            ),
            Self::Boolean { occur, children } => {
                writeln!(f, "{prefix}{occur}")?;
                for child in children {
                    child.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Renders a non-default boost suffix.
fn fmt_boost(boost: f32) -> String {
    if boost == 1.0 {
        String::new()
    } else {
        format!("^{boost}")
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
