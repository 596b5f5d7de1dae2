//! JSON host binding.
//!
//! Converts between `serde_json::Value` and [`Value`], and provides the
//! logic behind the `tabpack pack` / `tabpack unpack` commands:
//! - null → Absence, bool → Boolean, number → Number, string → Text
//! - array → Table keyed by Number `1..=n`
//! - object → Table keyed by Text
//!
//! Going back, a table whose keys are exactly `1..=n` becomes an array, any
//! other non-empty table an object. The empty table becomes `{}`. Text that
//! is not UTF-8 is written as a base64 `data:` URI. Keys that render to the
//! same JSON name (`1` and `"1"`) collapse to the later entry.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as Json};
use tracing::{debug, trace};

use crate::constants::DEFAULT_CAPACITY;
use crate::{
    encoded_len, DecodeError, DecoderOptions, EncodeError, EncoderOptions, Table, TabpackDecoder,
    TabpackEncoder, Value,
};

const BINARY_URI_PREFIX: &str = "data:application/octet-stream;base64,";

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

// ── Options ───────────────────────────────────────────────────────────────

/// Options for [`pack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackOptions {
    /// Size of the output region handed to the encoder.
    pub capacity: usize,
    /// On `BufferExhausted`, retry once with a region of the exact size.
    pub grow: bool,
    #[serde(flatten)]
    pub encoder: EncoderOptions,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            grow: false,
            encoder: EncoderOptions::default(),
        }
    }
}

// ── JSON → Value ──────────────────────────────────────────────────────────

pub fn from_json(json: &Json) -> Value {
    match json {
        Json::Null => Value::Absence,
        Json::Bool(b) => Value::Boolean(*b),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => Value::Text(s.as_bytes().to_vec()),
        Json::Array(arr) => {
            let mut table = Table::with_capacity(arr.len());
            for (i, item) in arr.iter().enumerate() {
                table.push((i + 1) as f64, from_json(item));
            }
            Value::Table(table)
        }
        Json::Object(obj) => {
            let mut table = Table::with_capacity(obj.len());
            for (k, v) in obj {
                table.push(k.as_str(), from_json(v));
            }
            Value::Table(table)
        }
    }
}

// ── Value → JSON ──────────────────────────────────────────────────────────

pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Absence => Json::Null,
        Value::Boolean(b) => Json::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::Text(bytes) => Json::String(text_to_string(bytes)),
        Value::Table(table) => match sequence(table) {
            Some(items) => Json::Array(items.into_iter().map(to_json).collect()),
            None => {
                let mut map = Map::with_capacity(table.keys().len());
                for (k, v) in table.latest() {
                    let name = key_to_string(k);
                    if map.insert(name.clone(), to_json(v)).is_some() {
                        debug!(
                            key = %name,
                            kind = %k.kind(),
                            "JSON key collision, keeping the later entry"
                        );
                    }
                }
                Json::Object(map)
            }
        },
    }
}

/// Integral doubles within the exact-integer range are written as JSON
/// integers; NaN and infinities become null.
fn number_to_json(n: f64) -> Json {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT && !(n == 0.0 && n.is_sign_negative()) {
        return Json::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map(Json::Number).unwrap_or(Json::Null)
}

fn text_to_string(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_owned(),
        Err(_) => format!("{BINARY_URI_PREFIX}{}", STANDARD.encode(bytes)),
    }
}

fn key_to_string(key: &Value) -> String {
    match key {
        Value::Text(bytes) => text_to_string(bytes),
        Value::Number(n) => match number_to_json(*n) {
            Json::Number(num) => num.to_string(),
            _ => n.to_string(),
        },
        other => other.kind().to_string(),
    }
}

/// Values in key order when the distinct keys are exactly `1..=n`.
fn sequence(table: &Table) -> Option<Vec<&Value>> {
    let n = table.keys().len();
    if n == 0 {
        return None;
    }
    let mut slots: Vec<Option<&Value>> = vec![None; n];
    for (key, value) in table.latest() {
        let idx = key.as_number()?;
        if idx.fract() != 0.0 || idx < 1.0 || idx > n as f64 {
            return None;
        }
        slots[idx as usize - 1] = Some(value);
    }
    slots.into_iter().collect()
}

// ── pack / unpack ─────────────────────────────────────────────────────────

/// Encodes a value into a fresh region of `options.capacity` bytes.
pub fn pack_value(value: &Value, options: &PackOptions) -> Result<Vec<u8>, HostError> {
    match encode_with_capacity(value, options.capacity, options.encoder) {
        Err(EncodeError::BufferExhausted { needed, .. }) if options.grow => {
            let exact = encoded_len(value)?;
            debug!(
                capacity = options.capacity,
                needed, exact, "output region too small, retrying at exact size"
            );
            Ok(encode_with_capacity(value, exact, options.encoder)?)
        }
        other => Ok(other?),
    }
}

fn encode_with_capacity(
    value: &Value,
    capacity: usize,
    options: EncoderOptions,
) -> Result<Vec<u8>, EncodeError> {
    let mut buf = vec![0u8; capacity];
    let n = TabpackEncoder::with_options(&mut buf, options).encode(value)?;
    buf.truncate(n);
    Ok(buf)
}

/// Parses a JSON document and encodes it.
pub fn pack(json: &str, options: &PackOptions) -> Result<Vec<u8>, HostError> {
    let parsed: Json = serde_json::from_str(json)?;
    let value = from_json(&parsed);
    let bytes = pack_value(&value, options)?;
    trace!(json_len = json.len(), encoded_len = bytes.len(), "packed");
    Ok(bytes)
}

/// Decodes bytes into a JSON value.
pub fn unpack_json(bytes: &[u8], options: &DecoderOptions) -> Result<Json, HostError> {
    let (value, consumed) = TabpackDecoder::with_options(*options).decode_with_consumed(bytes)?;
    if consumed < bytes.len() {
        debug!(
            consumed,
            trailing = bytes.len() - consumed,
            "ignoring bytes after the first value"
        );
    }
    Ok(to_json(&value))
}

/// Decodes bytes and renders them as pretty-printed JSON.
pub fn unpack(bytes: &[u8], options: &DecoderOptions) -> Result<String, HostError> {
    Ok(serde_json::to_string_pretty(&unpack_json(bytes, options)?)?)
}
