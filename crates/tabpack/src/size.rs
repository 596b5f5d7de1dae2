//! Exact encoded size of a value, computed without writing it.

use crate::constants::{LEN_WIDTH, NUMBER_WIDTH, TAG_WIDTH};
use crate::{EncodeError, Value};

/// Returns how many bytes [`encode_into`](crate::encode_into) needs for
/// `value`.
///
/// Fails with [`EncodeError::UnsupportedType`] on the same keys the encoder
/// rejects; the reported offset is where that key would have been written.
pub fn encoded_len(value: &Value) -> Result<usize, EncodeError> {
    let mut size = 0usize;
    add_value(value, &mut size)?;
    Ok(size)
}

fn add_value(value: &Value, size: &mut usize) -> Result<(), EncodeError> {
    match value {
        Value::Absence => *size += TAG_WIDTH,
        Value::Boolean(_) => *size += TAG_WIDTH + 1,
        Value::Number(_) => *size += TAG_WIDTH + NUMBER_WIDTH,
        Value::Text(t) => *size = size.saturating_add(TAG_WIDTH + LEN_WIDTH + t.len()),
        Value::Table(table) => {
            *size += TAG_WIDTH + LEN_WIDTH;
            for (key, val) in table.iter() {
                if !key.is_key() {
                    return Err(EncodeError::UnsupportedType {
                        kind: key.kind(),
                        offset: *size,
                    });
                }
                add_value(key, size)?;
                add_value(val, size)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Table;

    #[test]
    fn scalar_sizes() {
        assert_eq!(encoded_len(&Value::Absence), Ok(1));
        assert_eq!(encoded_len(&Value::Boolean(true)), Ok(2));
        assert_eq!(encoded_len(&Value::Number(3.5)), Ok(9));
        assert_eq!(encoded_len(&Value::from("ab")), Ok(1 + LEN_WIDTH + 2));
    }

    #[test]
    fn table_size_counts_keys_and_values() {
        let table: Table = [("x", Value::from(1.0)), ("y", Value::from("z"))]
            .into_iter()
            .collect();
        let expected = (1 + LEN_WIDTH) // table header
            + (1 + LEN_WIDTH + 1) + 9 // "x" -> 1.0
            + (1 + LEN_WIDTH + 1) + (1 + LEN_WIDTH + 1); // "y" -> "z"
        assert_eq!(encoded_len(&Value::Table(table)), Ok(expected));
    }

    #[test]
    fn rejects_boolean_key() {
        let mut table = Table::new();
        table.push(true, 1.0);
        assert!(matches!(
            encoded_len(&Value::Table(table)),
            Err(EncodeError::UnsupportedType { .. })
        ));
    }
}
