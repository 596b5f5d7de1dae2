use tabpack_buffers::BufferError;

use crate::Kind;

/// Errors returned by the encoder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The output region is too small for the next write.
    #[error("exceeded buffer size at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    BufferExhausted {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    /// A table key of a kind the wire format cannot carry.
    #[error("unsupported {kind} table key at offset {offset}")]
    UnsupportedType { kind: Kind, offset: usize },
    /// Tables nest deeper than the configured `max_depth`.
    #[error("table nesting exceeds depth limit {limit} at offset {offset}")]
    DepthLimitExceeded { limit: usize, offset: usize },
}

impl EncodeError {
    /// Output offset at which encoding stopped.
    pub fn offset(&self) -> usize {
        match self {
            EncodeError::BufferExhausted { offset, .. }
            | EncodeError::UnsupportedType { offset, .. }
            | EncodeError::DepthLimitExceeded { offset, .. } => *offset,
        }
    }
}

impl From<BufferError> for EncodeError {
    fn from(e: BufferError) -> Self {
        match e {
            BufferError::EndOfBuffer {
                offset,
                needed,
                remaining,
            }
            | BufferError::Overflow {
                offset,
                needed,
                remaining,
            } => EncodeError::BufferExhausted {
                offset,
                needed,
                remaining,
            },
        }
    }
}

/// Errors returned by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The input ends before a required field.
    #[error("truncated input at byte {offset}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    /// A byte that is not a valid tag in its position.
    #[error("invalid type {tag:#04x} encountered at byte {offset}")]
    InvalidTag { tag: u8, offset: usize },
    /// Tables nest deeper than the configured `max_depth`.
    #[error("table nesting exceeds depth limit {limit} at byte {offset}")]
    DepthLimitExceeded { limit: usize, offset: usize },
}

impl DecodeError {
    /// Input offset of the byte that could not be decoded.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::Truncated { offset, .. }
            | DecodeError::InvalidTag { offset, .. }
            | DecodeError::DepthLimitExceeded { offset, .. } => *offset,
        }
    }
}

impl From<BufferError> for DecodeError {
    fn from(e: BufferError) -> Self {
        match e {
            BufferError::EndOfBuffer {
                offset,
                needed,
                remaining,
            }
            | BufferError::Overflow {
                offset,
                needed,
                remaining,
            } => DecodeError::Truncated {
                offset,
                needed,
                remaining,
            },
        }
    }
}
