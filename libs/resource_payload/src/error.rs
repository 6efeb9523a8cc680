//! Error handling types.
//!
//! Every failure aborts the whole compile call, so there is one shared error
//! type for the compiler, the linker, and the strategies. And also a result
//! type.

use crate::introspect::Kind;

pub type Result<T> = std::result::Result<T, Error>;

/// Potential errors to encounter when compiling a payload.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A layer of indirection could not be unwrapped to a concrete value,
    /// f.e. an empty [`Option`].
    #[error("value `{path}` of type `{type_name}` could not be resolved to a concrete value")]
    UnresolvableValue {
        type_name: &'static str,
        path: String,
    },
    /// The value has a shape that cannot be serialized.
    #[error("value `{path}` has kind `{kind}`, which is unsupported by the serializer `{serializer}`")]
    UnsupportedKind {
        kind: Kind,
        serializer: &'static str,
        path: String,
    },
    /// A record or collection was nested past the inline depth ceiling
    /// without being marked for linking.
    #[error("value `{path}` is a nested record or collection which is unlinked, this is unsupported")]
    UnlinkedResource { path: String },
    /// A value selected for linking has no identifier.
    #[error("type with name `{type_name}` is missing its identifier field `{key}`")]
    MissingIdentifier {
        type_name: &'static str,
        key: String,
    },
    /// Type name resolution never reached a record type.
    #[error("type name resolution reached kind `{kind}`, which is not a record")]
    InvalidKind { kind: Kind },
    /// The value handed to link resolution was not a compiled mapping.
    #[error("received invalid value to link, expected a mapping or a list of mappings, was {found}")]
    UnlinkableType { found: &'static str },

    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    /// The payload could not be encoded as JSON.
    #[error(transparent)]
    Encode(#[from] serde_json::Error),
    /// Another reason provided by a [`Strategy`](crate::Strategy)
    /// implementation.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Constructs a new [`Error::Custom`] variant.
    pub fn custom(msg: impl std::fmt::Display) -> Self {
        Self::Custom(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlinked_resource_message() {
        let err = Error::UnlinkedResource {
            path: "Post.author".to_owned(),
        };

        assert_eq!(
            err.to_string(),
            "value `Post.author` is a nested record or collection which is unlinked, this is unsupported",
            "incorrect error message"
        );
    }

    #[test]
    fn unsupported_kind_message() {
        let err = Error::UnsupportedKind {
            kind: Kind::Map,
            serializer: "StandardStrategy",
            path: "Post.extra".to_owned(),
        };

        assert_eq!(
            err.to_string(),
            "value `Post.extra` has kind `map`, which is unsupported by the serializer `StandardStrategy`",
            "incorrect error message"
        );
    }

    #[test]
    fn missing_identifier_message() {
        let err = Error::MissingIdentifier {
            type_name: "Comment",
            key: "id".to_owned(),
        };

        assert_eq!(
            err.to_string(),
            "type with name `Comment` is missing its identifier field `id`",
            "incorrect error message"
        );
    }
}
