//! Encoder and decoder configuration.

use serde::{Deserialize, Serialize};

/// Options for [`TabpackEncoder`](crate::TabpackEncoder).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Maximum table nesting; a top-level table is depth 1. `None` leaves
    /// nesting bounded only by the output capacity.
    pub max_depth: Option<usize>,
}

/// Options for [`TabpackDecoder`](crate::TabpackDecoder).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// Maximum table nesting; a top-level table is depth 1. `None` leaves
    /// nesting bounded only by the input length.
    pub max_depth: Option<usize>,
}
