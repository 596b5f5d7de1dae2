//! [`Value`]: the dynamically-typed value model encoded by tabpack.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

use indexmap::IndexMap;

/// A dynamically-typed value.
///
/// Equality is structural: numbers compare bit for bit (so `NaN == NaN` when
/// the payloads match, and `0.0 != -0.0`), text compares byte for byte, and
/// tables compare as unordered key/value sets with last-write-wins on
/// duplicate keys.
#[derive(Debug, Clone)]
pub enum Value {
    /// No value.
    Absence,
    /// Boolean value
    Boolean(bool),
    /// IEEE-754 double, kept bit-exact
    Number(f64),
    /// Byte string; not required to be UTF-8
    Text(Vec<u8>),
    /// Key/value table
    Table(Table),
}

/// The variant of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Absence,
    Boolean,
    Number,
    Text,
    Table,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Absence => "absence",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::Text => "text",
            Kind::Table => "table",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Absence => Kind::Absence,
            Value::Boolean(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::Text(_) => Kind::Text,
            Value::Table(_) => Kind::Table,
        }
    }

    /// Whether this value may be used as a table key on the wire.
    pub fn is_key(&self) -> bool {
        matches!(self, Value::Number(_) | Value::Text(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&[u8]> {
        match self {
            Value::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Absence, Value::Absence) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Table(a), Value::Table(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Value::Absence => {}
            Value::Boolean(b) => b.hash(state),
            Value::Number(n) => n.to_bits().hash(state),
            Value::Text(t) => t.hash(state),
            // must agree with unordered equality
            Value::Table(t) => t.index.len().hash(state),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Text(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Text(b)
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Value::Table(t)
    }
}

/// An ordered list of key/value entries.
///
/// Entries keep insertion order, which is the order the encoder emits them
/// in. [`Table::insert`] replaces the value of an existing key in place;
/// [`Table::push`] appends unconditionally, so a table built with `push` can
/// carry duplicate keys, and keys of kinds the wire format rejects.
///
/// Lookups go through a hash index of distinct keys, so `insert` and `get`
/// do not scan the entries.
#[derive(Clone, Default)]
pub struct Table {
    entries: Vec<(Value, Value)>,
    /// Distinct keys in first-seen order, each pointing at its latest entry.
    index: IndexMap<Value, usize>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: IndexMap::with_capacity(capacity),
        }
    }

    /// Sets `key` to `value`, overwriting the latest entry with an equal key.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&at) => self.entries[at].1 = value,
            None => self.push(key, value),
        }
    }

    /// Appends an entry without looking for an existing key.
    pub fn push(&mut self, key: impl Into<Value>, value: impl Into<Value>) {
        let key = key.into();
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value.into()));
    }

    /// The value last written for `key`.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.index.get(key).map(|&at| &self.entries[at].1)
    }

    /// Number of entries, counting duplicates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order, duplicates included.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Distinct keys in first-seen order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.index.keys()
    }

    /// Distinct keys in first-seen order, each with its last written value.
    pub fn latest(&self) -> impl ExactSizeIterator<Item = (&Value, &Value)> {
        self.index.iter().map(move |(k, &at)| (k, &self.entries[at].1))
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.index.len() == other.index.len()
            && self.latest().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for Table {}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Table {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Table::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}
