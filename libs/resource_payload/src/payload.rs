//! The output container and the values it holds.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::{IntoIter, Iter};
use serde::{Serialize, Serializer};

use crate::error::Result;

/// A single serialized value.
///
/// This only ever holds kinds a JSON encoder can represent: scalars, nested
/// mappings, and ordered sequences.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Float32(f32),
    String(String),
    List(Vec<Value>),
    Map(Payload),
}

impl Value {
    /// Gets a short description of the kind of value, for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "a bool",
            Self::Int(_) | Self::Uint(_) => "an integer",
            Self::Float(_) | Self::Float32(_) => "a float",
            Self::String(_) => "a string",
            Self::List(_) => "a list",
            Self::Map(_) => "a mapping",
        }
    }

    /// Gets the nested mapping, if this is one.
    #[must_use]
    pub const fn as_map(&self) -> Option<&Payload> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Gets the nested mapping, replacing any other kind of value with an
    /// empty one.
    fn as_map_mut_or_insert(&mut self) -> &mut Payload {
        match self {
            Self::Map(map) => map,
            other => {
                *other = Self::Map(Payload::new());
                other.as_map_mut_or_insert()
            },
        }
    }

    /// Gets the elements, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Gets the string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Uint(v) => serializer.serialize_u64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Float32(v) => serializer.serialize_f32(*v),
            Self::String(v) => serializer.serialize_str(v),
            Self::List(v) => v.serialize(serializer),
            Self::Map(v) => v.serialize(serializer),
        }
    }
}

/// Writes scalars as their plain text, which is what gets spliced into
/// `href` values. Lists and mappings are written as JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::Int(v) => fmt::Display::fmt(v, f),
            Self::Uint(v) => fmt::Display::fmt(v, f),
            Self::Float(v) => fmt::Display::fmt(v, f),
            Self::Float32(v) => fmt::Display::fmt(v, f),
            Self::String(v) => f.write_str(v),
            Self::List(_) | Self::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            },
        }
    }
}

macro_rules! impl_from {
    ($($variant:ident($target:ty) <- $($source:ty),*;)*) => {
        $($(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Self::$variant(<$target>::from(value))
                }
            }
        )*)*
    };
}

impl_from! {
    Bool(bool) <- bool;
    Int(i64) <- i8, i16, i32, i64;
    Uint(u64) <- u8, u16, u32, u64;
    Float(f64) <- f64;
    Float32(f32) <- f32;
    String(String) <- String, &str, char;
    List(Vec<Value>) <- Vec<Value>;
    Map(Payload) <- Payload;
}

/// String-keyed mapping built up by the compiler.
///
/// Keys stay in insertion order, which for compiled records is the field
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    entries: IndexMap<String, Value>,
}

impl Payload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the one previously stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Gets the nested mapping stored under `key`.
    #[must_use]
    pub fn get_map(&self, key: &str) -> Option<&Self> {
        self.get(key).and_then(Value::as_map)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Gets the nested mapping under `key`, inserting an empty one first if
    /// there is none.
    ///
    /// A value of any other kind stored under `key` is replaced.
    pub fn map_entry(&mut self, key: &str) -> &mut Self {
        let slot = self
            .entries
            .entry(key.to_owned())
            .or_insert_with(|| Value::Map(Self::new()));

        if !matches!(slot, Value::Map(_)) {
            log::debug!("Replacing {} under reserved key `{key}`.", slot.kind_name());
        }

        slot.as_map_mut_or_insert()
    }

    /// Encodes the payload as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`](crate::Error::Encode) if `serde_json` fails.
    pub fn marshal(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Encodes the payload as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`](crate::Error::Encode) if `serde_json` fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Converts the payload into a [`serde_json::Value`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`](crate::Error::Encode) if `serde_json` fails.
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Serialize for Payload {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.entries.serialize(serializer)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Payload {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Payload {
    type Item = (String, Value);
    type IntoIter = IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Payload {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
