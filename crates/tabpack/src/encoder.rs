//! `TabpackEncoder` writes values into a fixed-capacity byte region.
//!
//! Wire format, one unit per value:
//! - Absence: `0x00`
//! - Boolean: `0x01 <0|1>`
//! - Number:  `0x02 <f64, native endian>`
//! - Text:    `0x03 <usize len, native> <len bytes>`
//! - Table:   `0x04 <usize count, native> (<key unit> <value unit>){count}`
//!
//! Table keys are bare Number or Text units.

use tabpack_buffers::SliceWriter;

use crate::constants::{Tag, LEN_WIDTH, NUMBER_WIDTH, TAG_WIDTH};
use crate::{EncodeError, EncoderOptions, Table, Value};

pub struct TabpackEncoder<'a> {
    pub writer: SliceWriter<'a>,
    options: EncoderOptions,
    depth: usize,
}

impl<'a> TabpackEncoder<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self::with_options(buf, EncoderOptions::default())
    }

    pub fn with_options(buf: &'a mut [u8], options: EncoderOptions) -> Self {
        Self {
            writer: SliceWriter::new(buf),
            options,
            depth: 0,
        }
    }

    /// Encodes `value` at the cursor and returns the new cursor position.
    pub fn encode(&mut self, value: &Value) -> Result<usize, EncodeError> {
        self.write_any(value)?;
        Ok(self.writer.x)
    }

    pub fn write_any(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Absence => self.write_absence(),
            Value::Boolean(b) => self.write_boolean(*b),
            Value::Number(n) => self.write_number(*n),
            Value::Text(t) => self.write_text(t),
            Value::Table(t) => self.write_table(t),
        }
    }

    pub fn write_absence(&mut self) -> Result<(), EncodeError> {
        self.writer.try_u8(Tag::Absence as u8)?;
        Ok(())
    }

    pub fn write_boolean(&mut self, b: bool) -> Result<(), EncodeError> {
        self.writer.check(TAG_WIDTH + 1)?;
        self.writer.try_u8(Tag::Boolean as u8)?;
        self.writer.try_u8(u8::from(b))?;
        Ok(())
    }

    pub fn write_number(&mut self, n: f64) -> Result<(), EncodeError> {
        self.writer.check(TAG_WIDTH + NUMBER_WIDTH)?;
        self.writer.try_u8(Tag::Number as u8)?;
        self.writer.try_f64_ne(n)?;
        Ok(())
    }

    pub fn write_text(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.writer
            .check((TAG_WIDTH + LEN_WIDTH).saturating_add(bytes.len()))?;
        self.writer.try_u8(Tag::Text as u8)?;
        self.writer.try_usize_ne(bytes.len())?;
        self.writer.try_buf(bytes)?;
        Ok(())
    }

    /// Writes the table header, then each entry, then back-fills the entry
    /// count.
    pub fn write_table(&mut self, table: &Table) -> Result<(), EncodeError> {
        if let Some(limit) = self.options.max_depth {
            if self.depth >= limit {
                return Err(EncodeError::DepthLimitExceeded {
                    limit,
                    offset: self.writer.x,
                });
            }
        }
        self.writer.check(TAG_WIDTH + LEN_WIDTH)?;
        self.writer.try_u8(Tag::Table as u8)?;
        let count_at = self.writer.try_reserve(LEN_WIDTH)?;

        self.depth += 1;
        let written = self.write_entries(table);
        self.depth -= 1;

        self.writer.patch_usize_ne(count_at, written?)?;
        Ok(())
    }

    fn write_entries(&mut self, table: &Table) -> Result<usize, EncodeError> {
        let mut count = 0usize;
        for (key, value) in table.iter() {
            self.write_key(key)?;
            self.write_any(value)?;
            count += 1;
        }
        Ok(count)
    }

    fn write_key(&mut self, key: &Value) -> Result<(), EncodeError> {
        match key {
            Value::Number(n) => self.write_number(*n),
            Value::Text(t) => self.write_text(t),
            other => Err(EncodeError::UnsupportedType {
                kind: other.kind(),
                offset: self.writer.x,
            }),
        }
    }
}
