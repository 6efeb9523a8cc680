//! The recursive walker that turns resources into payloads.

use std::fmt;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::introspect::{self, FieldInfo, Kind, KindClass, Record, Resolved, Resource};
use crate::linker::Link;
use crate::payload::{Payload, Value};
use crate::strategy::{StandardStrategy, Strategy};

/// Compiles resources into payloads, as directed by a [`Strategy`].
///
/// Every struct field is either skipped, linked, or inlined:
///
/// - Skipped fields are omitted without looking at their value.
/// - Linked fields are compiled on their own, within
///   [`Strategy::max_link_depth`], and then rendered by
///   [`Strategy::link_field`]. Links within link targets are followed until
///   more than [`Strategy::max_link_depth`] links were followed in a row; any
///   further ones are omitted.
/// - Inlined fields are compiled in place. Scalars are always inlined. Records
///   and collections may only be inlined within [`Strategy::max_map_depth`]
///   levels of nesting, otherwise compilation fails with
///   [`Error::UnlinkedResource`].
///
/// Any error aborts the whole compile call.
#[derive(Debug, Clone, Default)]
pub struct Compiler<S> {
    strategy: S,
}

impl Compiler<StandardStrategy> {
    /// Creates a compiler with a [`StandardStrategy`] built from `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(StandardStrategy::from_config(config))
    }
}

impl<S: Strategy> Compiler<S> {
    #[must_use]
    pub const fn new(strategy: S) -> Self {
        Self { strategy }
    }

    #[must_use]
    pub const fn strategy(&self) -> &S {
        &self.strategy
    }

    #[must_use]
    pub fn into_strategy(self) -> S {
        self.strategy
    }

    /// Compiles a record or collection of records into a new payload, stored
    /// under the strategy's top level namespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKind`] if `value` does not hold a record, and
    /// any error encountered while compiling. No payload is returned then.
    pub fn compile_payload(&self, value: &dyn Resource) -> Result<Payload> {
        let type_name = introspect::type_name(value)?;
        let namespace = self.strategy.top_level_namespace(type_name);
        log::trace!("Compiling `{type_name}` into namespace `{namespace}`.");

        let mut root = Payload::new();
        self.strategy.set_payload_root(&mut root);

        let compiled = self.compile_root(value, type_name)?;
        if let Some(replaced) = root.insert(namespace.as_str(), compiled) {
            log::debug!(
                "Namespace `{namespace}` replaced {} set on the payload root.",
                replaced.kind_name()
            );
        }

        log::trace!("Compiled `{type_name}`.");
        Ok(root)
    }

    /// Compiles any value without wrapping it in a namespace.
    ///
    /// Unlike [`Compiler::compile_payload`], this also accepts scalars.
    ///
    /// # Errors
    ///
    /// Returns any error encountered while compiling.
    pub fn compile(&self, value: &dyn Resource) -> Result<Value> {
        self.compile_root(value, value.type_name().unwrap_or("<root>"))
    }

    fn compile_root(&self, value: &dyn Resource, name: &'static str) -> Result<Value> {
        let at = Traversal::new(self.strategy.max_map_depth());
        self.compile_resolved(value.resolve(), Path::Root(name), at)
    }

    fn compile_resolved(
        &self,
        resolved: Resolved<'_>,
        path: Path<'_>,
        at: Traversal,
    ) -> Result<Value> {
        match resolved {
            Resolved::Scalar(value) => Ok(value),
            Resolved::Record(record) => self.compile_record(record, path, at).map(Value::Map),
            Resolved::Collection(items) => {
                self.compile_collection(&items, path, at).map(Value::List)
            },
            Resolved::Unsupported(kind) => Err(self.unsupported(kind, path)),
            Resolved::Unresolvable(type_name) => Err(Error::UnresolvableValue {
                type_name,
                path: path.to_string(),
            }),
        }
    }

    /// Compiles a value nested within a record or collection.
    fn compile_nested(&self, value: &dyn Resource, path: Path<'_>, at: Traversal) -> Result<Value> {
        let resolved = value.resolve();
        match resolved.kind().class() {
            KindClass::Record | KindClass::Collection => {
                let Some(at) = at.descend() else {
                    return Err(Error::UnlinkedResource {
                        path: path.to_string(),
                    });
                };

                self.compile_resolved(resolved, path, at)
            },
            KindClass::Scalar | KindClass::Unsupported => self.compile_resolved(resolved, path, at),
        }
    }

    fn compile_record(
        &self,
        record: &dyn Record,
        path: Path<'_>,
        at: Traversal,
    ) -> Result<Payload> {
        let owner = record.name();
        let mut payload = Payload::new();

        for field in record.fields() {
            let info = field.info();
            let field_path = Path::Field(&path, info.name());

            if self.strategy.should_skip_field(info) {
                log::trace!("Skipping field `{field_path}`.");
                continue;
            }

            let Some(value) = field.value() else {
                return Err(self.unsupported(Kind::Invalid, field_path));
            };

            if self.strategy.should_link_field(info) {
                self.link_field(&mut payload, owner, info, value, field_path, at)?;
            } else {
                let compiled = self.compile_nested(value, field_path, at)?;
                payload.insert(self.strategy.format_attribute_name(info.name()), compiled);
            }
        }

        Ok(payload)
    }

    fn compile_collection(
        &self,
        items: &[&dyn Resource],
        path: Path<'_>,
        at: Traversal,
    ) -> Result<Vec<Value>> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.compile_nested(*item, Path::Index(&path, index), at))
            .collect()
    }

    fn link_field(
        &self,
        payload: &mut Payload,
        owner: &'static str,
        info: &FieldInfo,
        value: &dyn Resource,
        path: Path<'_>,
        at: Traversal,
    ) -> Result<()> {
        let max_link_depth = self.strategy.max_link_depth();
        let Some(at) = at.follow_link(max_link_depth) else {
            log::debug!("Omitting link `{path}`, {max_link_depth} links were already followed.");
            return Ok(());
        };

        let compiled = self.compile_resolved(value.resolve(), path, at)?;
        let id_key = &self.strategy.reserved_words().id;
        let link = Link::new(info, owner, value, &compiled, id_key);
        self.strategy.link_field(payload, &link)
    }

    fn unsupported(&self, kind: Kind, path: Path<'_>) -> Error {
        Error::UnsupportedKind {
            kind,
            serializer: self.strategy.name(),
            path: path.to_string(),
        }
    }
}

/// Position within the value graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Traversal {
    depth: usize,
    ceiling: usize,
    hops: usize,
}

impl Traversal {
    const fn new(ceiling: usize) -> Self {
        Self {
            depth: 0,
            ceiling,
            hops: 0,
        }
    }

    /// Descends into a nested record or collection, if the ceiling allows it.
    fn descend(self) -> Option<Self> {
        (self.depth < self.ceiling).then_some(Self {
            depth: self.depth + 1,
            ..self
        })
    }

    /// Starts over at depth 0 for a link target, if not too many links were
    /// followed already.
    fn follow_link(self, ceiling: usize) -> Option<Self> {
        (self.hops <= ceiling).then_some(Self {
            depth: 0,
            ceiling,
            hops: self.hops + 1,
        })
    }
}

/// Path to a value, used in error messages, like `Post.comments[1]`.
#[derive(Debug, Clone, Copy)]
enum Path<'p> {
    Root(&'static str),
    Field(&'p Path<'p>, &'static str),
    Index(&'p Path<'p>, usize),
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root(name) => f.write_str(name),
            Self::Field(parent, name) => write!(f, "{parent}.{name}"),
            Self::Index(parent, index) => write!(f, "{parent}[{index}]"),
        }
    }
}
