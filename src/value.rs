//! The TOML value model shared by the decoder and the encoder.

use alloc::string::String;
use alloc::vec::Vec;

use crate::datetime::{Date, LocalDatetime, OffsetDatetime, Time};
use crate::{Array, Table};

/// A decoded (or to-be-encoded) TOML value.
///
/// This is the tagged union exchanged between [`crate::decode_from_str`] /
/// [`crate::decode_from_reader`] and [`crate::encode_to_string`] /
/// [`crate::encode_to_writer`]. Every variant except [`Value::None`] can
/// come out of a decode; [`Value::None`] exists purely so that callers
/// building a tree for encoding have something to hand the encoder's
/// `none_substitute` option (see [`crate::encode::EncodeOptions`]) instead
/// of.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Value {
    /// A Unicode scalar string.
    String(String),
    /// A signed 64-bit integer.
    Integer(i64),
    /// An IEEE-754 double, including `inf`/`-inf`/`nan`.
    Float(f64),
    /// A boolean.
    Boolean(bool),
    /// An offset date-time: a date, a time, and a UTC offset.
    Datetime(OffsetDatetime),
    /// A local date-time: a date and a time, with no relation to a UTC offset.
    LocalDatetime(LocalDatetime),
    /// A local date with no time component.
    Date(Date),
    /// A local time with no date component.
    Time(Time),
    /// An ordered sequence of values.
    ///
    /// At the value-model level nothing distinguishes an array written
    /// `[1, 2, 3]` from one built up by `[[header]]` table-array syntax;
    /// both are `Value::Array`. The decoder keeps a transient, private flag
    /// on [`Array`] to implement the "cannot extend a statically declared
    /// array" rule, but that flag plays no part in equality or `Debug`
    /// output observed through this enum.
    Array(Array),
    /// A mapping from string keys to values, insertion-ordered.
    Table(Table),
    /// No value. Never produced by a decode; only meaningful to the
    /// encoder, which errors on it unless a `none_substitute` or `default`
    /// hook is configured (see [`crate::encode::EncodeOptions`]).
    None,
}

impl Value {
    /// The value as a string slice, if it is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The value as an `i64`, if it is a [`Value::Integer`].
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The value as an `f64`, if it is a [`Value::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The value as a `bool`, if it is a [`Value::Boolean`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as an [`Array`], if it is a [`Value::Array`].
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The value as a [`Table`], if it is a [`Value::Table`].
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// `true` if this value is [`Value::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Value::Table(t)
    }
}

impl<V> FromIterator<V> for Value
where
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let values: Vec<Value> = iter.into_iter().map(Into::into).collect();
        Value::Array(values.into_iter().collect())
    }
}
