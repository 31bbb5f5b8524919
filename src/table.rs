//! A TOML table: an insertion-ordered mapping from string keys to [`Value`]s.

use alloc::string::String;
use alloc::vec::Vec;

use crate::Value;

/// A TOML table.
///
/// Iteration order is insertion order, which the data model treats as
/// load-bearing: the encoder walks a table's entries in the order they
/// were inserted, and a document decoded then re-encoded must reproduce
/// that order.
///
/// `Table` carries two fields beyond what's visible through its public
/// API: a private `explicit` flag, set by the decoder when a table is
/// created directly by an `[header]` line (used only to detect a second
/// `[header]` targeting the same table — table redefinition, a decode
/// error), and a private `sealed` flag, set for tables created by inline
/// `{ ... }` syntax (used only to reject a later dotted-key or header
/// extension of them). Callers building a `Table` by hand never need to
/// think about either; both start unset and neither affects [`PartialEq`]
/// or [`core::fmt::Debug`].
#[derive(Debug, Default, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    entries: Vec<(String, Value)>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) explicit: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) sealed: bool,
}

impl Table {
    /// Create a new, empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key-value pair into the table.
    ///
    /// If the key is already present, its value is replaced and the
    /// previous value is returned; this does *not* implement TOML's
    /// duplicate-key rejection (that check happens in the decoder, which
    /// needs to report it as a [`crate::DecodeError`] with position info).
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(core::mem::replace(&mut slot.1, value.into()));
        }
        self.entries.push((key, value.into()));
        None
    }

    /// `true` if the table already contains `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Get the value for the given key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Get a mutable reference to the value for the given key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// The number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// An iterator over the key-value pairs, in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            iter: self.entries.iter(),
        }
    }

    pub(crate) fn entry_or_insert_table(&mut self, key: &str) -> &mut Value {
        if !self.contains_key(key) {
            self.entries.push((key.into(), Value::Table(Table::new())));
        }
        self.get_mut(key).expect("just inserted")
    }

    pub(crate) fn entry_or_insert_array(&mut self, key: &str) -> &mut Value {
        if !self.contains_key(key) {
            self.entries
                .push((key.into(), Value::Array(crate::Array::new())));
        }
        self.get_mut(key).expect("just inserted")
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K, V> FromIterator<(K, V)> for Table
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Table::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

impl<'t> IntoIterator for &'t Table {
    type Item = (&'t str, &'t Value);
    type IntoIter = Iter<'t>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the key-value pairs of a [`Table`], in insertion order.
#[derive(Debug)]
pub struct Iter<'t> {
    iter: core::slice::Iter<'t, (String, Value)>,
}

impl<'t> Iterator for Iter<'t> {
    type Item = (&'t str, &'t Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(k, v)| (k.as_str(), v))
    }
}
