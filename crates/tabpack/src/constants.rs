//! Wire tags and field widths shared by the encoder and decoder.

use tabpack_buffers::USIZE_WIDTH;

/// One-byte type tag that starts every encoded unit.
///
/// The numbering is fixed; there is no version byte, so renumbering breaks
/// every buffer encoded before the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    Absence = 0,
    Boolean = 1,
    Number = 2,
    Text = 3,
    Table = 4,
}

impl Tag {
    pub fn from_u8(byte: u8) -> Option<Tag> {
        match byte {
            0 => Some(Tag::Absence),
            1 => Some(Tag::Boolean),
            2 => Some(Tag::Number),
            3 => Some(Tag::Text),
            4 => Some(Tag::Table),
            _ => None,
        }
    }
}

/// Width of the tag byte.
pub const TAG_WIDTH: usize = 1;

/// Width of a `Number` payload.
pub const NUMBER_WIDTH: usize = 8;

/// Width of a `Text` length or `Table` entry count: the host's `usize`.
pub const LEN_WIDTH: usize = USIZE_WIDTH;

/// Smallest encoded table entry: a `Number` or empty `Text` key followed by
/// an `Absence` value.
pub const MIN_ENTRY_WIDTH: usize = TAG_WIDTH
    + if NUMBER_WIDTH < LEN_WIDTH {
        NUMBER_WIDTH
    } else {
        LEN_WIDTH
    }
    + TAG_WIDTH;

/// Scratch capacity used when the caller does not choose one.
pub const DEFAULT_CAPACITY: usize = 1024;
