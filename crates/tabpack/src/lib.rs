//! Tagged binary encoding for a small dynamic value model.
//!
//! A [`Value`] is absence, a boolean, a double, a byte string, or a
//! [`Table`] of key/value entries that may nest. [`encode_into`] writes a
//! value into a caller-allocated region of fixed capacity; [`decode`] reads
//! it back.
//!
//! Length and count fields use the host's native `usize` width and byte
//! order, as do numbers. Encoded bytes are only meant to be read back on a
//! platform with the same word size and endianness.

pub mod constants;
mod decoder;
mod encoder;
mod error;
pub mod host;
mod options;
mod size;
mod value;

pub use constants::{Tag, DEFAULT_CAPACITY};
pub use decoder::TabpackDecoder;
pub use encoder::TabpackEncoder;
pub use error::{DecodeError, EncodeError};
pub use options::{DecoderOptions, EncoderOptions};
pub use size::encoded_len;
pub use value::{Kind, Table, Value};

/// Encodes `value` at the start of `buf` and returns the number of bytes
/// written.
pub fn encode_into(value: &Value, buf: &mut [u8]) -> Result<usize, EncodeError> {
    TabpackEncoder::new(buf).encode(value)
}

/// Encodes `value` into a vector sized with [`encoded_len`].
pub fn encode_to_vec(value: &Value) -> Result<Vec<u8>, EncodeError> {
    let mut buf = vec![0u8; encoded_len(value)?];
    let n = encode_into(value, &mut buf)?;
    buf.truncate(n);
    Ok(buf)
}

/// Decodes the value at the start of `input`.
pub fn decode(input: &[u8]) -> Result<Value, DecodeError> {
    TabpackDecoder::new().decode(input)
}

/// Decodes the value at the start of `input`, also returning how many bytes
/// it took.
pub fn decode_with_consumed(input: &[u8]) -> Result<(Value, usize), DecodeError> {
    TabpackDecoder::new().decode_with_consumed(input)
}
