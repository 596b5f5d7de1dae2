//! `TabpackDecoder` rebuilds values from the bytes written by
//! [`TabpackEncoder`](crate::TabpackEncoder).

use tabpack_buffers::Reader;

use crate::constants::{Tag, MIN_ENTRY_WIDTH};
use crate::{DecodeError, DecoderOptions, Table, Value};

/// Stateless decoder; all cursor state lives in the [`Reader`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TabpackDecoder {
    options: DecoderOptions,
}

impl TabpackDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self { options }
    }

    /// Decodes the value at the start of `input`. Bytes after it are ignored.
    pub fn decode(&self, input: &[u8]) -> Result<Value, DecodeError> {
        self.decode_with_consumed(input).map(|(value, _)| value)
    }

    /// Decodes the value at the start of `input` and returns how many bytes
    /// it took.
    pub fn decode_with_consumed(&self, input: &[u8]) -> Result<(Value, usize), DecodeError> {
        let mut reader = Reader::new(input);
        let value = self.read_any(&mut reader)?;
        Ok((value, reader.x))
    }

    /// Reads one value at the reader's cursor.
    pub fn read_any(&self, r: &mut Reader<'_>) -> Result<Value, DecodeError> {
        self.read_value(r, 0)
    }

    fn read_value(&self, r: &mut Reader<'_>, depth: usize) -> Result<Value, DecodeError> {
        let offset = r.x;
        let byte = r.try_u8()?;
        match Tag::from_u8(byte) {
            Some(Tag::Absence) => Ok(Value::Absence),
            // any non-zero byte reads as true
            Some(Tag::Boolean) => Ok(Value::Boolean(r.try_u8()? != 0)),
            Some(Tag::Number) => Ok(Value::Number(r.try_f64_ne()?)),
            Some(Tag::Text) => self.read_text(r).map(Value::Text),
            Some(Tag::Table) => self.read_table(r, depth, offset).map(Value::Table),
            None => Err(DecodeError::InvalidTag { tag: byte, offset }),
        }
    }

    fn read_text(&self, r: &mut Reader<'_>) -> Result<Vec<u8>, DecodeError> {
        let len = r.try_usize_ne()?;
        Ok(r.try_buf(len)?.to_vec())
    }

    fn read_key(&self, r: &mut Reader<'_>) -> Result<Value, DecodeError> {
        let offset = r.x;
        let byte = r.try_u8()?;
        match Tag::from_u8(byte) {
            Some(Tag::Number) => Ok(Value::Number(r.try_f64_ne()?)),
            Some(Tag::Text) => self.read_text(r).map(Value::Text),
            _ => Err(DecodeError::InvalidTag { tag: byte, offset }),
        }
    }

    /// Reads a table body. A table holding fewer entries than its declared
    /// count is an error, never a shorter table.
    fn read_table(
        &self,
        r: &mut Reader<'_>,
        depth: usize,
        offset: usize,
    ) -> Result<Table, DecodeError> {
        if let Some(limit) = self.options.max_depth {
            if depth >= limit {
                return Err(DecodeError::DepthLimitExceeded { limit, offset });
            }
        }
        let count = r.try_usize_ne()?;
        let needed = count.saturating_mul(MIN_ENTRY_WIDTH);
        if needed > r.size() {
            return Err(DecodeError::Truncated {
                offset: r.x,
                needed,
                remaining: r.size(),
            });
        }
        // count is untrusted; grow as entries arrive
        let mut table = Table::new();
        for _ in 0..count {
            let key = self.read_key(r)?;
            let value = self.read_value(r, depth + 1)?;
            table.insert(key, value);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabpack_buffers::USIZE_WIDTH;

    fn table_header(count: usize) -> Vec<u8> {
        let mut out = vec![Tag::Table as u8];
        out.extend_from_slice(&count.to_ne_bytes());
        out
    }

    fn text_unit(s: &[u8]) -> Vec<u8> {
        let mut out = vec![Tag::Text as u8];
        out.extend_from_slice(&s.len().to_ne_bytes());
        out.extend_from_slice(s);
        out
    }

    #[test]
    fn scalars() {
        let dec = TabpackDecoder::new();
        assert_eq!(dec.decode(&[0x00]), Ok(Value::Absence));
        assert_eq!(dec.decode(&[0x01, 0x01]), Ok(Value::Boolean(true)));
        assert_eq!(dec.decode(&[0x01, 0x00]), Ok(Value::Boolean(false)));
        assert_eq!(dec.decode(&[0x01, 0x07]), Ok(Value::Boolean(true)));

        let mut number = vec![0x02];
        number.extend_from_slice(&(-0.0f64).to_ne_bytes());
        assert_eq!(dec.decode(&number), Ok(Value::Number(-0.0)));

        assert_eq!(
            dec.decode(&text_unit(b"a\0b")),
            Ok(Value::Text(b"a\0b".to_vec()))
        );
    }

    #[test]
    fn consumed_excludes_trailing_bytes() {
        let dec = TabpackDecoder::new();
        assert_eq!(
            dec.decode_with_consumed(&[0x01, 0x01, 0xff, 0xff]),
            Ok((Value::Boolean(true), 2))
        );
    }

    #[test]
    fn empty_input_is_truncated() {
        assert_eq!(
            TabpackDecoder::new().decode(&[]),
            Err(DecodeError::Truncated {
                offset: 0,
                needed: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn unknown_tag_reports_its_offset() {
        let dec = TabpackDecoder::new();
        assert_eq!(
            dec.decode(&[0x05]),
            Err(DecodeError::InvalidTag { tag: 5, offset: 0 })
        );

        let mut bytes = table_header(1);
        bytes.extend(text_unit(b"k"));
        let value_at = bytes.len();
        bytes.push(0x09);
        assert_eq!(
            dec.decode(&bytes),
            Err(DecodeError::InvalidTag {
                tag: 9,
                offset: value_at
            })
        );
    }

    #[test]
    fn key_tags_are_restricted() {
        let dec = TabpackDecoder::new();
        for bad in [Tag::Absence, Tag::Boolean, Tag::Table] {
            let mut bytes = table_header(1);
            bytes.push(bad as u8);
            bytes.extend_from_slice(&[0u8; 16]);
            assert_eq!(
                dec.decode(&bytes),
                Err(DecodeError::InvalidTag {
                    tag: bad as u8,
                    offset: 1 + USIZE_WIDTH
                })
            );
        }
    }

    #[test]
    fn text_length_past_end_is_truncated() {
        let mut bytes = text_unit(b"abc");
        bytes.pop();
        assert!(matches!(
            TabpackDecoder::new().decode(&bytes),
            Err(DecodeError::Truncated { needed: 3, .. })
        ));
    }

    #[test]
    fn short_table_is_an_error() {
        // declares two entries but carries one
        let mut bytes = table_header(2);
        bytes.extend(text_unit(b"k"));
        bytes.push(Tag::Absence as u8);
        assert!(matches!(
            TabpackDecoder::new().decode(&bytes),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn count_larger_than_input_is_rejected_early() {
        let bytes = table_header(usize::MAX);
        assert_eq!(
            TabpackDecoder::new().decode(&bytes),
            Err(DecodeError::Truncated {
                offset: 1 + USIZE_WIDTH,
                needed: usize::MAX,
                remaining: 0
            })
        );
    }

    #[test]
    fn count_is_checked_against_the_smallest_entry() {
        // one entry declared, one byte short of the smallest possible entry
        let mut bytes = table_header(1);
        bytes.resize(bytes.len() + MIN_ENTRY_WIDTH - 1, 0);
        assert_eq!(
            TabpackDecoder::new().decode(&bytes),
            Err(DecodeError::Truncated {
                offset: 1 + USIZE_WIDTH,
                needed: MIN_ENTRY_WIDTH,
                remaining: MIN_ENTRY_WIDTH - 1
            })
        );
    }

    #[test]
    fn nested_tables_with_inflated_counts_fail_fast() {
        // each level claims as many entries as there are bytes left, and
        // nests the next level under an empty text key
        let levels = 1000;
        let mut bytes = Vec::new();
        for level in 0..levels {
            let remaining = (levels - level) * (1 + 2 * USIZE_WIDTH) - (1 + USIZE_WIDTH);
            bytes.extend(table_header(remaining));
            bytes.extend(text_unit(b""));
        }
        assert!(matches!(
            TabpackDecoder::new().decode(&bytes),
            Err(DecodeError::Truncated { offset, .. }) if offset == 1 + USIZE_WIDTH
        ));
    }

    #[test]
    fn duplicate_keys_keep_the_last_value() {
        let mut bytes = table_header(2);
        bytes.extend(text_unit(b"k"));
        bytes.extend_from_slice(&[0x01, 0x00]);
        bytes.extend(text_unit(b"k"));
        bytes.extend_from_slice(&[0x01, 0x01]);

        let value = TabpackDecoder::new().decode(&bytes).unwrap();
        let table = value.as_table().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&Value::from("k")), Some(&Value::Boolean(true)));
    }

    #[test]
    fn depth_limit() {
        // {"t": {}}
        let mut bytes = table_header(1);
        bytes.extend(text_unit(b"t"));
        bytes.extend(table_header(0));

        let strict = TabpackDecoder::with_options(DecoderOptions { max_depth: Some(1) });
        assert_eq!(
            strict.decode(&bytes),
            Err(DecodeError::DepthLimitExceeded {
                limit: 1,
                offset: 1 + USIZE_WIDTH + 1 + USIZE_WIDTH + 1
            })
        );
        let relaxed = TabpackDecoder::with_options(DecoderOptions { max_depth: Some(2) });
        assert!(relaxed.decode(&bytes).is_ok());
    }
}
