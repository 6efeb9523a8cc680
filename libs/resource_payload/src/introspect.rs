//! Resolves values to their concrete kind without runtime reflection.
//!
//! Types opt into serialization by implementing [`Resource`]. Records, that
//! is, structs, additionally implement [`Record`] to enumerate their fields.
//! Both are usually derived via [`derive@crate::Resource`].

use std::fmt;

use crate::error::{Error, Result};
use crate::payload::Value;

mod impls;

/// The concrete kind of a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Kind {
    Bool,
    Int,
    Uint,
    Float,
    String,
    Struct,
    Collection,
    Map,
    Pointer,
    Channel,
    Function,
    Invalid,
}

/// The coarse classification of a [`Kind`] the compiler branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindClass {
    Scalar,
    Record,
    Collection,
    Unsupported,
}

impl Kind {
    #[must_use]
    pub const fn class(self) -> KindClass {
        match self {
            Self::Bool | Self::Int | Self::Uint | Self::Float | Self::String => KindClass::Scalar,
            Self::Struct => KindClass::Record,
            Self::Collection => KindClass::Collection,
            Self::Map | Self::Pointer | Self::Channel | Self::Function | Self::Invalid => {
                KindClass::Unsupported
            },
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::String => "string",
            Self::Struct => "struct",
            Self::Collection => "collection",
            Self::Map => "map",
            Self::Pointer => "ptr",
            Self::Channel => "chan",
            Self::Function => "func",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value with all indirection removed.
pub enum Resolved<'a> {
    /// A boolean, numeric, or string value, already in its serialized form.
    Scalar(Value),
    /// A struct.
    Record(&'a dyn Record),
    /// An ordered sequence.
    Collection(Vec<&'a dyn Resource>),
    /// A value whose shape cannot be serialized.
    Unsupported(Kind),
    /// A layer of indirection that could not be unwrapped. Holds the name of
    /// the type of that layer.
    Unresolvable(&'static str),
}

impl Resolved<'_> {
    /// Gets the kind of the resolved value.
    ///
    /// Unresolvable values are reported as [`Kind::Invalid`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Scalar(Value::Bool(_)) => Kind::Bool,
            Self::Scalar(Value::Int(_)) => Kind::Int,
            Self::Scalar(Value::Uint(_)) => Kind::Uint,
            Self::Scalar(Value::Float(_) | Value::Float32(_)) => Kind::Float,
            Self::Scalar(Value::String(_)) => Kind::String,
            Self::Record(_) | Self::Scalar(Value::Map(_)) => Kind::Struct,
            Self::Collection(_) | Self::Scalar(Value::List(_)) => Kind::Collection,
            Self::Unsupported(kind) => *kind,
            Self::Unresolvable(_) => Kind::Invalid,
        }
    }
}

impl fmt::Debug for Resolved<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            Self::Record(_) => f.write_str("Record(..)"),
            Self::Collection(items) => write!(f, "Collection(len = {})", items.len()),
            Self::Unsupported(kind) => f.debug_tuple("Unsupported").field(kind).finish(),
            Self::Unresolvable(ty) => f.debug_tuple("Unresolvable").field(ty).finish(),
        }
    }
}

/// A value that can be compiled into a payload.
///
/// Implementations exist for scalars, collections, and common pointer types.
/// Structs implement this via [`derive@crate::Resource`]. Types that can never
/// be serialized, like maps or raw pointers, implement this trait to report
/// [`Resolved::Unsupported`] so the failure names the offending field.
pub trait Resource {
    /// Resolves through any indirection to the concrete value.
    fn resolve(&self) -> Resolved<'_>;

    /// Gets the short name of the record type this value holds, looking
    /// through indirection and collection element types.
    ///
    /// Returns [`None`] if no record is ever reached.
    fn type_name(&self) -> Option<&'static str>;

    /// Static counterpart to [`Resource::type_name`], used when no value is
    /// available, f.e. for empty collections.
    fn record_name() -> Option<&'static str>
    where
        Self: Sized,
    {
        None
    }
}

impl fmt::Debug for dyn Resource + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_name() {
            Some(name) => write!(f, "Resource({name})"),
            None => f.write_str("Resource(..)"),
        }
    }
}

/// A struct whose fields can be enumerated in declaration order.
pub trait Record {
    /// The short name of the record type.
    fn name(&self) -> &'static str;

    /// Gets all fields, in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;
}

/// Metadata tags attached to a field.
///
/// For derived records, these are specified via `#[resource(...)]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tags(&'static [(&'static str, &'static str)]);

impl Tags {
    /// Creates a new tag set from key-value pairs.
    #[must_use]
    pub const fn new(tags: &'static [(&'static str, &'static str)]) -> Self {
        Self(tags)
    }

    /// Gets the value of the tag named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    /// Whether the tag named `key` is set to `"true"`.
    #[must_use]
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }

    pub fn iter(&self) -> TagsIter {
        self.0.iter().copied()
    }
}

pub type TagsIter = std::iter::Copied<std::slice::Iter<'static, (&'static str, &'static str)>>;

impl IntoIterator for &Tags {
    type Item = (&'static str, &'static str);
    type IntoIter = TagsIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Static information about a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    name: &'static str,
    tags: Tags,
}

impl FieldInfo {
    #[must_use]
    pub const fn new(name: &'static str, tags: Tags) -> Self {
        Self { name, tags }
    }

    /// The unformatted field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn tags(&self) -> Tags {
        self.tags
    }

    /// Shorthand for `self.tags().get(key)`.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags.get(key)
    }
}

/// A field of a record, as visited by the compiler.
#[derive(Clone, Copy)]
pub struct Field<'a> {
    info: FieldInfo,
    value: Option<&'a dyn Resource>,
}

impl<'a> Field<'a> {
    /// Creates a field that holds a visitable value.
    #[must_use]
    pub const fn new(info: FieldInfo, value: &'a dyn Resource) -> Self {
        Self {
            info,
            value: Some(value),
        }
    }

    /// Creates a field whose value is not visitable. Compiling it fails unless
    /// the strategy skips it.
    #[must_use]
    pub const fn opaque(info: FieldInfo) -> Self {
        Self { info, value: None }
    }

    #[must_use]
    pub const fn info(&self) -> &FieldInfo {
        &self.info
    }

    #[must_use]
    pub const fn value(&self) -> Option<&'a dyn Resource> {
        self.value
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("info", &self.info)
            .field("opaque", &self.value.is_none())
            .finish()
    }
}

/// Resolves a value, turning unresolvable and unsupported values into
/// errors.
///
/// # Errors
///
/// Returns [`Error::UnresolvableValue`] or [`Error::UnsupportedKind`].
pub fn resolve(value: &dyn Resource) -> Result<Resolved<'_>> {
    match value.resolve() {
        Resolved::Unresolvable(type_name) => Err(Error::UnresolvableValue {
            type_name,
            path: "<value>".to_owned(),
        }),
        Resolved::Unsupported(kind) => Err(Error::UnsupportedKind {
            kind,
            serializer: "introspect",
            path: "<value>".to_owned(),
        }),
        resolved => Ok(resolved),
    }
}

/// Resolves the short name of the record type a value holds.
///
/// # Errors
///
/// Returns [`Error::InvalidKind`] if no record type is ever reached.
pub fn type_name(value: &dyn Resource) -> Result<&'static str> {
    value.type_name().ok_or_else(|| {
        let kind = match value.resolve() {
            // an empty collection of scalars still isn't nameable
            Resolved::Collection(items) => items
                .first()
                .map_or(Kind::Collection, |item| item.resolve().kind()),
            resolved => resolved.kind(),
        };
        Error::InvalidKind { kind }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::*;
    use crate::Resource;

    #[derive(Resource)]
    #[resource(crate = "crate")]
    struct Sample {
        id: u32,
    }

    #[test]
    fn dereference_struct() {
        let sample = Sample { id: 1 };
        let boxed = Box::new(&sample);
        let nested = Rc::new(Some(&boxed));

        for value in [&sample as &dyn Resource, &boxed, &nested] {
            assert_eq!(
                value.resolve().kind(),
                Kind::Struct,
                "failed to dereference to a struct"
            );
        }
    }

    #[test]
    fn dereference_scalar() {
        let a = 1i64;
        let b = &a;
        let c = Box::new(b);

        for value in [&a as &dyn Resource, &b, &c] {
            match value.resolve() {
                Resolved::Scalar(v) => assert_eq!(v, Value::Int(1), "incorrect scalar"),
                other => panic!("expected scalar, got {other:?}"),
            }
        }
    }

    #[test]
    fn dereference_collection() {
        let samples = vec![Sample { id: 1 }, Sample { id: 2 }];
        let boxed: Vec<Box<Sample>> = Vec::new();

        assert_eq!(samples.resolve().kind(), Kind::Collection, "vec is a collection");
        assert_eq!(Box::new(&boxed).resolve().kind(), Kind::Collection, "boxed vec is a collection");
        assert_eq!([1u8, 2].resolve().kind(), Kind::Collection, "array is a collection");
    }

    #[test]
    fn empty_option_is_unresolvable() {
        let value: Option<Sample> = None;

        let err = resolve(&value).expect_err("empty option must not resolve");
        assert!(
            matches!(err, Error::UnresolvableValue { .. }),
            "incorrect error: {err:?}"
        );
    }

    #[test]
    fn kind_classes() {
        let sample = Sample { id: 1 };
        let list = vec![1u8];
        let map: HashMap<String, u32> = HashMap::new();

        assert_eq!(0.1f32.resolve().kind().class(), KindClass::Scalar, "float is a scalar");
        assert_eq!("text".resolve().kind().class(), KindClass::Scalar, "str is a scalar");
        assert_eq!(sample.resolve().kind().class(), KindClass::Record, "struct is a record");
        assert_eq!(list.resolve().kind().class(), KindClass::Collection, "vec is a collection");
        assert_eq!(map.resolve().kind().class(), KindClass::Unsupported, "map is unsupported");
        assert_eq!(Kind::Invalid.class(), KindClass::Unsupported, "invalid is unsupported");
    }

    #[test]
    fn map_is_unsupported() {
        let value: HashMap<String, u32> = HashMap::new();

        let err = resolve(&value).expect_err("maps must not resolve");
        assert!(
            matches!(err, Error::UnsupportedKind { kind: Kind::Map, .. }),
            "incorrect error: {err:?}"
        );
    }

    #[test]
    fn type_names() {
        let sample = Sample { id: 1 };
        let empty: Vec<Box<Sample>> = Vec::new();
        let nested = Box::new(vec![Rc::new(Sample { id: 2 })]);

        assert_eq!(type_name(&sample).ok(), Some("Sample"), "simple struct");
        assert_eq!(type_name(&&sample).ok(), Some("Sample"), "pointer struct");
        assert_eq!(type_name(&empty).ok(), Some("Sample"), "empty collection");
        assert_eq!(type_name(&nested).ok(), Some("Sample"), "pointer collection");
    }

    #[test]
    fn scalar_type_name_is_invalid() {
        let err = type_name(&5u32).expect_err("scalars have no record name");
        assert!(
            matches!(err, Error::InvalidKind { kind: Kind::Uint }),
            "incorrect error: {err:?}"
        );

        let err = type_name(&vec!["a"]).expect_err("string lists have no record name");
        assert!(
            matches!(err, Error::InvalidKind { kind: Kind::String }),
            "incorrect error: {err:?}"
        );
    }
}
