//! Binary buffer writer over a fixed-capacity region.

use crate::{BufferError, USIZE_WIDTH};

/// A binary writer that fills a caller-allocated byte slice.
///
/// The writer never grows. Each write checks `x + n <= end` before touching
/// the buffer, so a refused write leaves both the cursor and the bytes
/// already written untouched.
///
/// # Example
///
/// ```
/// use tabpack_buffers::SliceWriter;
///
/// let mut buf = [0u8; 3];
/// let mut writer = SliceWriter::new(&mut buf);
/// writer.try_u8(0x01).unwrap();
/// writer.try_buf(&[0x02, 0x03]).unwrap();
/// assert!(writer.try_u8(0x04).is_err());
/// assert_eq!(writer.written(), [0x01, 0x02, 0x03]);
/// ```
pub struct SliceWriter<'a> {
    /// The underlying byte buffer.
    pub uint8: &'a mut [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> SliceWriter<'a> {
    /// Creates a writer covering the whole slice.
    pub fn new(uint8: &'a mut [u8]) -> Self {
        let end = uint8.len();
        Self { uint8, x: 0, end }
    }

    /// Returns the number of bytes still available.
    pub fn size(&self) -> usize {
        self.end.saturating_sub(self.x)
    }

    /// Checks that `n` more bytes fit before the end bound.
    #[inline]
    pub fn check(&self, n: usize) -> Result<(), BufferError> {
        let remaining = self.size();
        if n > remaining {
            Err(BufferError::Overflow {
                offset: self.x,
                needed: n,
                remaining,
            })
        } else {
            Ok(())
        }
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn try_u8(&mut self, val: u8) -> Result<(), BufferError> {
        self.check(1)?;
        self.uint8[self.x] = val;
        self.x += 1;
        Ok(())
    }

    /// Writes a byte slice.
    pub fn try_buf(&mut self, buf: &[u8]) -> Result<(), BufferError> {
        let length = buf.len();
        self.check(length)?;
        self.uint8[self.x..self.x + length].copy_from_slice(buf);
        self.x += length;
        Ok(())
    }

    /// Writes a native-endian 64-bit float, bit for bit.
    #[inline]
    pub fn try_f64_ne(&mut self, val: f64) -> Result<(), BufferError> {
        self.try_buf(&val.to_ne_bytes())
    }

    /// Writes a native-endian, native-width `usize`.
    #[inline]
    pub fn try_usize_ne(&mut self, val: usize) -> Result<(), BufferError> {
        self.try_buf(&val.to_ne_bytes())
    }

    /// Skips `n` bytes to be filled in later and returns where they start.
    pub fn try_reserve(&mut self, n: usize) -> Result<usize, BufferError> {
        self.check(n)?;
        let at = self.x;
        self.x += n;
        Ok(at)
    }

    /// Overwrites a `usize` field at `at`, which must lie inside bytes
    /// already written or reserved.
    pub fn patch_usize_ne(&mut self, at: usize, val: usize) -> Result<(), BufferError> {
        if at.checked_add(USIZE_WIDTH).map_or(true, |stop| stop > self.x) {
            return Err(BufferError::Overflow {
                offset: at,
                needed: USIZE_WIDTH,
                remaining: self.x.saturating_sub(at),
            });
        }
        self.uint8[at..at + USIZE_WIDTH].copy_from_slice(&val.to_ne_bytes());
        Ok(())
    }

    /// Bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.uint8[..self.x]
    }
}
