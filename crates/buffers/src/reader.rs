//! Binary buffer reader with cursor tracking.

use crate::{BufferError, USIZE_WIDTH};

/// A binary buffer reader over a byte slice.
///
/// The reader keeps a cursor `x` and an exclusive end bound `end`. Every read
/// checks the remaining span first; a read that does not fit leaves the
/// cursor where it was.
///
/// # Example
///
/// ```
/// use tabpack_buffers::Reader;
///
/// let data = [0x07, 0x01, 0x02];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.try_u8(), Ok(0x07));
/// assert_eq!(reader.try_buf(2), Ok(&[0x01, 0x02][..]));
/// assert!(reader.try_u8().is_err());
/// ```
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        let end = uint8.len();
        Self { uint8, x: 0, end }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.end.saturating_sub(self.x)
    }

    /// Checks that `n` more bytes are available from the current cursor.
    #[inline]
    pub fn check(&self, n: usize) -> Result<(), BufferError> {
        let remaining = self.size();
        if n > remaining {
            Err(BufferError::EndOfBuffer {
                offset: self.x,
                needed: n,
                remaining,
            })
        } else {
            Ok(())
        }
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn try_u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Reads a fixed-size byte array.
    #[inline]
    pub fn try_array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        self.check(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.uint8[self.x..self.x + N]);
        self.x += N;
        Ok(out)
    }

    /// Reads a native-endian 64-bit float, bit for bit.
    #[inline]
    pub fn try_f64_ne(&mut self) -> Result<f64, BufferError> {
        self.try_array::<8>().map(f64::from_ne_bytes)
    }

    /// Reads a native-endian, native-width `usize`.
    #[inline]
    pub fn try_usize_ne(&mut self) -> Result<usize, BufferError> {
        self.try_array::<USIZE_WIDTH>().map(usize::from_ne_bytes)
    }

    /// Reads `size` raw bytes and advances the cursor.
    pub fn try_buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let x = self.x;
        let end = x + size;
        let bin = &self.uint8[x..end];
        self.x = end;
        Ok(bin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_u8_success() {
        let data = [0x42u8];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_u8(), Ok(0x42));
        assert_eq!(reader.x, 1);
        assert_eq!(reader.size(), 0);
    }

    #[test]
    fn test_try_u8_end_of_buffer() {
        let data: [u8; 0] = [];
        let mut reader = Reader::new(&data);
        assert_eq!(
            reader.try_u8(),
            Err(BufferError::EndOfBuffer {
                offset: 0,
                needed: 1,
                remaining: 0
            })
        );
        // Cursor must not advance on error
        assert_eq!(reader.x, 0);
    }

    #[test]
    fn test_try_f64_ne_is_bit_exact() {
        let val = f64::from_bits(0x7ff8_0000_dead_beef);
        let data = val.to_ne_bytes();
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_f64_ne().map(f64::to_bits), Ok(val.to_bits()));
    }

    #[test]
    fn test_try_usize_ne() {
        let data = 513usize.to_ne_bytes();
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_usize_ne(), Ok(513));
        assert_eq!(reader.x, USIZE_WIDTH);
    }

    #[test]
    fn test_try_usize_ne_partial() {
        let data = [0u8; USIZE_WIDTH - 1];
        let mut reader = Reader::new(&data);
        assert!(reader.try_usize_ne().is_err());
        assert_eq!(reader.x, 0);
    }

    #[test]
    fn test_end_bound_is_respected() {
        let data = [1u8, 2, 3, 4];
        let mut reader = Reader::new(&data);
        reader.x = 1;
        reader.end = 3;
        assert_eq!(reader.try_buf(2), Ok(&[2u8, 3][..]));
        assert_eq!(
            reader.try_u8(),
            Err(BufferError::EndOfBuffer {
                offset: 3,
                needed: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn test_huge_length_does_not_overflow() {
        let data = [0u8; 4];
        let mut reader = Reader::new(&data);
        reader.x = 2;
        assert!(reader.try_buf(usize::MAX).is_err());
        assert_eq!(reader.x, 2);
    }
}
