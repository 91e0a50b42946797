//! Payload codec and payload aggregation.
//!
//! A payload is a 4-byte big-endian IEEE-754 float stored with a term occurrence. An
//! occurrence without a payload, or with fewer than four bytes, weighs 1.0.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::explain::Explanation;

/// Size of an encoded payload weight.
pub const PAYLOAD_LEN: usize = 4;

/// Payload bytes of one term occurrence, borrowed from the postings layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadBytes<'a> {
    /// Backing buffer.
    pub bytes: &'a [u8],
    /// Start of the payload in `bytes`.
    pub offset: usize,
    /// Payload length.
    pub length: usize,
}

impl<'a> PayloadBytes<'a> {
    /// A payload spanning the whole buffer.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            length: bytes.len(),
        }
    }

    /// A payload at `offset..offset + length` of a shared buffer.
    pub fn slice(bytes: &'a [u8], offset: usize, length: usize) -> Self {
        Self {
            bytes,
            offset,
            length,
        }
    }

    /// Decodes the float at the start of the payload.
    ///
    /// Returns `None` when the payload is shorter than four bytes or lies outside the buffer.
    pub fn decode_float(&self) -> Option<f32> {
        if self.length < PAYLOAD_LEN {
            return None;
        }
        let end = self.offset.checked_add(PAYLOAD_LEN)?;
        let raw: [u8; PAYLOAD_LEN] = self.bytes.get(self.offset..end)?.try_into().ok()?;
        Some(f32::from_be_bytes(raw))
    }
}

/// The weight of an occurrence: its decoded payload, or 1.0.
pub fn payload_weight(payload: Option<PayloadBytes<'_>>) -> f32 {
    payload.and_then(|p| p.decode_float()).unwrap_or(1.0)
}

/// Encodes a weight as a payload.
pub fn encode_float(value: f32) -> [u8; PAYLOAD_LEN] {
    value.to_be_bytes()
}

/// Folds the payload weights of a document's occurrences into one factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFunction {
    /// Arithmetic mean.
    #[default]
    Average,
    /// Smallest weight.
    Min,
    /// Largest weight.
    Max,
}

impl PayloadFunction {
    /// Combines the running score with the next weight. `seen` counts the weights folded so
    /// far.
    pub fn current_score(self, seen: u32, current: f32, weight: f32) -> f32 {
        match self {
            Self::Average => current + weight,
            Self::Min if seen == 0 => weight,
            Self::Min => current.min(weight),
            Self::Max if seen == 0 => weight,
            Self::Max => current.max(weight),
        }
    }

    /// The document's payload factor after `seen` weights. 1.0 when none were seen.
    pub fn doc_score(self, seen: u32, score: f32) -> f32 {
        if seen == 0 {
            return 1.0;
        }
        match self {
            Self::Average => score / seen as f32,
            Self::Min | Self::Max => score,
        }
    }

    /// Explains [`PayloadFunction::doc_score`].
    pub fn explain(self, seen: u32, score: f32) -> Explanation {
        Explanation::new(
            self.doc_score(seen, score),
            format!("{self} of {seen} payloads"),
        )
    }
}

impl fmt::Display for PayloadFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Average => f.write_str("average"),
            Self::Min => f.write_str("min"),
            Self::Max => f.write_str("max"),
        }
    }
}
