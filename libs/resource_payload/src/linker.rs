//! Describes linked fields to a [`Strategy`](crate::Strategy).

use std::slice;

use crate::error::{Error, Result};
use crate::introspect::{self, FieldInfo, Resource};
use crate::payload::Value;

/// The identifiers of a link target.
#[derive(Debug, Clone, PartialEq)]
pub enum Identifier {
    /// The identifier of a single record.
    Single(Value),
    /// The identifiers of each element of a collection, in order.
    Multiple(Vec<Value>),
}

impl Identifier {
    /// Iterates over all contained identifiers.
    pub fn iter(&self) -> slice::Iter<'_, Value> {
        match self {
            Self::Single(id) => slice::from_ref(id).iter(),
            Self::Multiple(ids) => ids.iter(),
        }
    }

    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }
}

impl<'a> IntoIterator for &'a Identifier {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Identifier> for Value {
    fn from(value: Identifier) -> Self {
        match value {
            Identifier::Single(id) => id,
            Identifier::Multiple(ids) => Self::List(ids),
        }
    }
}

/// A field selected for linking.
///
/// Strategies receive this in [`Strategy::link_field`](crate::Strategy::link_field)
/// to render the link entry.
pub trait Linker {
    /// Whether the link target is a collection, in which case
    /// [`Linker::identifiers`] returns [`Identifier::Multiple`].
    fn is_collection_link(&self) -> bool;

    /// Extracts the identifiers from the compiled link target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingIdentifier`] if a target has no identifier and
    /// [`Error::UnlinkableType`] if the target did not compile to a mapping.
    fn identifiers(&self) -> Result<Identifier>;

    /// The unformatted name of the linked field.
    fn field_name(&self) -> &'static str;

    /// Resolves the unformatted type name of the link target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKind`] if the target is not a record or a
    /// collection of records.
    fn type_name(&self) -> Result<&'static str>;

    /// The unformatted type name of the record holding the field.
    fn owner_type_name(&self) -> &'static str;

    /// Gets a tag attached to the linked field.
    fn field_tag(&self, key: &str) -> Option<&'static str>;
}

/// The [`Linker`] the compiler passes to strategies.
#[derive(Debug, Clone, Copy)]
pub struct Link<'a> {
    info: &'a FieldInfo,
    owner: &'static str,
    target: &'a dyn Resource,
    compiled: &'a Value,
    id_key: &'a str,
}

impl<'a> Link<'a> {
    /// Creates a new link.
    ///
    /// `compiled` is the already compiled `target`, from which identifiers are
    /// read under `id_key`.
    #[must_use]
    pub fn new(
        info: &'a FieldInfo,
        owner: &'static str,
        target: &'a dyn Resource,
        compiled: &'a Value,
        id_key: &'a str,
    ) -> Self {
        Self {
            info,
            owner,
            target,
            compiled,
            id_key,
        }
    }

    fn identifier(&self, value: &Value) -> Result<Value> {
        let map = value.as_map().ok_or_else(|| Error::UnlinkableType {
            found: value.kind_name(),
        })?;

        match map.get(self.id_key) {
            Some(id) => Ok(id.clone()),
            None => Err(Error::MissingIdentifier {
                type_name: self.type_name()?,
                key: self.id_key.to_owned(),
            }),
        }
    }
}

impl Linker for Link<'_> {
    fn is_collection_link(&self) -> bool {
        matches!(self.compiled, Value::List(_))
    }

    fn identifiers(&self) -> Result<Identifier> {
        match self.compiled {
            Value::List(items) => items
                .iter()
                .map(|item| self.identifier(item))
                .collect::<Result<Vec<_>>>()
                .map(Identifier::Multiple),
            value => self.identifier(value).map(Identifier::Single),
        }
    }

    fn field_name(&self) -> &'static str {
        self.info.name()
    }

    fn type_name(&self) -> Result<&'static str> {
        introspect::type_name(self.target)
    }

    fn owner_type_name(&self) -> &'static str {
        self.owner
    }

    fn field_tag(&self, key: &str) -> Option<&'static str> {
        self.info.tag(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::Tags;
    use crate::payload::Payload;
    use crate::Resource;

    #[derive(Resource)]
    #[resource(crate = "crate")]
    struct Comment {
        id: u32,
    }

    const INFO: FieldInfo = FieldInfo::new("comments", Tags::new(&[("link", "true")]));

    fn compiled(id: Option<u32>) -> Value {
        let mut map = Payload::new();
        if let Some(id) = id {
            map.insert("id", id);
        }
        map.insert("body", "text");
        Value::Map(map)
    }

    #[test]
    fn single_identifier() {
        let target = Comment { id: 3 };
        let value = compiled(Some(3));
        let link = Link::new(&INFO, "Post", &target, &value, "id");

        assert!(!link.is_collection_link(), "single record is not a collection");
        assert_eq!(
            link.identifiers().ok(),
            Some(Identifier::Single(Value::Uint(3))),
            "incorrect identifier"
        );
        assert_eq!(link.type_name().ok(), Some("Comment"), "incorrect type name");
        assert_eq!(link.owner_type_name(), "Post", "incorrect owner");
        assert_eq!(link.field_tag("link"), Some("true"), "tags must be forwarded");
    }

    #[test]
    fn collection_identifiers() {
        let target = vec![Comment { id: 1 }, Comment { id: 2 }];
        let value = Value::List(vec![compiled(Some(1)), compiled(Some(2))]);
        let link = Link::new(&INFO, "Post", &target, &value, "id");

        assert!(link.is_collection_link(), "list must be a collection link");
        assert_eq!(
            link.identifiers().ok(),
            Some(Identifier::Multiple(vec![Value::Uint(1), Value::Uint(2)])),
            "incorrect identifiers"
        );
    }

    #[test]
    fn missing_identifier_aborts() {
        let target = vec![Comment { id: 1 }, Comment { id: 2 }];
        let value = Value::List(vec![compiled(Some(1)), compiled(None)]);
        let link = Link::new(&INFO, "Post", &target, &value, "id");

        let err = link.identifiers().expect_err("second element has no id");
        assert!(
            matches!(err, Error::MissingIdentifier { type_name: "Comment", .. }),
            "incorrect error: {err:?}"
        );
    }

    #[test]
    fn scalar_is_unlinkable() {
        let target = 5u32;
        let value = Value::Uint(5);
        let link = Link::new(&INFO, "Post", &target, &value, "id");

        let err = link.identifiers().expect_err("scalars cannot be linked");
        assert!(
            matches!(err, Error::UnlinkableType { found: "an integer" }),
            "incorrect error: {err:?}"
        );
    }

    #[test]
    fn identifier_into_value() {
        let ids = Identifier::Multiple(vec![Value::Uint(1)]);
        assert_eq!(
            Value::from(ids),
            Value::List(vec![Value::Uint(1)]),
            "multiple identifiers become a list"
        );
    }
}
