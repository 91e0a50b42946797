//! Score explanations.
//!
//! An [`Explanation`] mirrors one score computation as a tree of values with descriptions.
//! Every value in it is produced by the same code path as the score it explains.

use std::fmt;

use serde::Serialize;

/// A node in a score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    /// Value contributed by this node.
    pub value: f32,
    /// What the value is.
    pub description: String,
    /// Values this one was computed from.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Self>,
}

impl Explanation {
    /// Creates a leaf explanation.
    pub fn new(value: f32, description: impl Into<String>) -> Self {
        Self {
            value,
            description: description.into(),
            details: Vec::new(),
        }
    }

    /// Creates an explanation with details.
    pub fn with_details(value: f32, description: impl Into<String>, details: Vec<Self>) -> Self {
        Self {
            value,
            description: description.into(),
            details,
        }
    }

    /// Appends a detail.
    pub fn push(&mut self, detail: Self) {
        self.details.push(detail);
    }

    /// Formats this node and its details at the given depth.
    fn fmt_depth(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{}{} = {}", "  ".repeat(depth), self.value, self.description)?;
        for detail in &self.details {
            detail.fmt_depth(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_depth(f, 0)
    }
}
