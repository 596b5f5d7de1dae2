//! tabpack-buffers - bounds-checked byte cursors.
//!
//! [`Reader`] walks an input slice up to an exclusive end bound and
//! [`SliceWriter`] fills a caller-allocated, fixed-capacity region. Neither
//! grows, panics on short input, or writes past its end: every access is
//! checked first and reported as a [`BufferError`].
//!
//! Multi-byte fields use the host's native byte order and word size.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::SliceWriter;

/// Byte width of a native `usize` length field.
pub const USIZE_WIDTH: usize = std::mem::size_of::<usize>();

/// A cursor ran into its end bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// A read needed more bytes than the input has left.
    #[error("end of buffer at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    EndOfBuffer {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    /// A write needed more room than the output region has left.
    #[error("buffer full at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    Overflow {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
}

impl BufferError {
    /// Cursor position at which the access was refused.
    pub fn offset(&self) -> usize {
        match self {
            BufferError::EndOfBuffer { offset, .. } | BufferError::Overflow { offset, .. } => *offset,
        }
    }
}
