//! Pluggable policy for naming, depth limits, and link rendering.

use crate::config::Config;
use crate::error::Result;
use crate::format::{HrefFormatter, NamingFormatter};
use crate::introspect::FieldInfo;
use crate::linker::{Identifier, Linker};
use crate::payload::Payload;

/// Tag that marks a field as skipped.
pub const SKIP_TAG: &str = "skip";
/// Tag that marks a field as linked.
pub const LINK_TAG: &str = "link";
/// Tag that holds the href template of a linked field.
pub const HREF_TAG: &str = "href";

/// The protocol vocabulary, passed through the attribute formatter once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedWords {
    pub id: String,
    pub ids: String,
    pub links: String,
    pub linked: String,
    pub meta: String,
    pub data: String,
    pub type_: String,
    pub href: String,
}

impl ReservedWords {
    pub const ID: &str = "id";
    pub const IDS: &str = "ids";
    pub const LINKS: &str = "links";
    pub const LINKED: &str = "linked";
    pub const META: &str = "meta";
    pub const DATA: &str = "data";
    pub const TYPE: &str = "type";
    pub const HREF: &str = "href";

    /// Formats every reserved word with `formatter`, or leaves them unchanged
    /// if there is none.
    #[must_use]
    pub fn new(formatter: Option<&dyn NamingFormatter>) -> Self {
        let format = |word: &str| match formatter {
            Some(formatter) => formatter.format_name(word),
            None => word.to_owned(),
        };

        Self {
            id: format(Self::ID),
            ids: format(Self::IDS),
            links: format(Self::LINKS),
            linked: format(Self::LINKED),
            meta: format(Self::META),
            data: format(Self::DATA),
            type_: format(Self::TYPE),
            href: format(Self::HREF),
        }
    }
}

impl Default for ReservedWords {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Controls how the [`Compiler`](crate::Compiler) names, bounds, and links
/// values.
///
/// All methods take `&self`, so one strategy may be shared by many compile
/// calls, including across threads if the implementation allows it.
pub trait Strategy {
    /// Called once with every fresh root payload, before anything is compiled
    /// into it.
    fn set_payload_root(&self, root: &mut Payload) {
        _ = root;
    }

    /// How many levels of records and collections may be inlined.
    fn max_map_depth(&self) -> usize;

    /// How many levels may be inlined within a link target. This also bounds
    /// how many links are followed in a row.
    fn max_link_depth(&self) -> usize;

    /// The key the root value is stored under.
    fn top_level_namespace(&self, type_name: &str) -> String {
        self.format_type_name(type_name)
    }

    fn format_attribute_name(&self, name: &str) -> String;

    fn format_type_name(&self, name: &str) -> String;

    /// The reserved words, formatted with [`Strategy::format_attribute_name`].
    fn reserved_words(&self) -> &ReservedWords;

    /// Whether to omit a field. Checked before [`Strategy::should_link_field`].
    fn should_skip_field(&self, field: &FieldInfo) -> bool {
        field.tags().is_set(SKIP_TAG)
    }

    /// Whether to render a field as a link rather than inlining it.
    fn should_link_field(&self, field: &FieldInfo) -> bool {
        field.tags().is_set(LINK_TAG)
    }

    /// Renders a linked field into the payload of the record holding it.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be resolved. The payload should be
    /// left unchanged in that case.
    fn link_field(&self, payload: &mut Payload, link: &dyn Linker) -> Result<()>;

    /// The name reported in [`Error::UnsupportedKind`](crate::Error::UnsupportedKind).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

type BoxNamingFormatter = Box<dyn NamingFormatter + Send + Sync>;
type BoxHrefFormatter = Box<dyn HrefFormatter + Send + Sync>;

/// The default [`Strategy`].
///
/// Links are rendered into the reserved `links` mapping as
/// `{ type, id | ids, href? }`, keyed by the formatted field name.
///
/// ```
/// use resource_payload::{NamingConvention, StandardStrategy};
///
/// let strategy = StandardStrategy::new()
///     .with_max_map_depth(2)
///     .with_attribute_formatter(NamingConvention::CamelCase);
/// ```
pub struct StandardStrategy {
    max_map_depth: usize,
    max_link_depth: usize,
    namespace: Option<String>,
    attribute_formatter: Option<BoxNamingFormatter>,
    type_formatter: Option<BoxNamingFormatter>,
    href_formatter: Option<BoxHrefFormatter>,
    meta: Option<Payload>,
    reserved: ReservedWords,
}

impl StandardStrategy {
    /// Creates a strategy with both depth ceilings at 1 and no formatters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_map_depth: 1,
            max_link_depth: 1,
            namespace: None,
            attribute_formatter: None,
            type_formatter: None,
            href_formatter: None,
            meta: None,
            reserved: ReservedWords::new(None),
        }
    }

    /// Creates a strategy from loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut strategy = Self::new()
            .with_max_map_depth(config.max_map_depth)
            .with_max_link_depth(config.max_link_depth);

        if let Some(namespace) = &config.top_level_namespace {
            strategy = strategy.with_namespace(namespace.clone());
        }
        if let Some(case) = config.attribute_case {
            strategy = strategy.with_attribute_formatter(case);
        }
        if let Some(case) = config.type_case {
            strategy = strategy.with_type_formatter(case);
        }
        if let Some(style) = config.href {
            strategy = strategy.with_href_formatter(style);
        }

        strategy
    }

    #[must_use]
    pub fn with_max_map_depth(mut self, depth: usize) -> Self {
        self.max_map_depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_link_depth(mut self, depth: usize) -> Self {
        self.max_link_depth = depth;
        self
    }

    /// Stores the root value under `namespace` instead of its type name.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the attribute name formatter. This also reformats the reserved
    /// words.
    #[must_use]
    pub fn with_attribute_formatter(
        mut self,
        formatter: impl NamingFormatter + Send + Sync + 'static,
    ) -> Self {
        self.reserved = ReservedWords::new(Some(&formatter));
        self.attribute_formatter = Some(Box::new(formatter));
        self
    }

    #[must_use]
    pub fn with_type_formatter(
        mut self,
        formatter: impl NamingFormatter + Send + Sync + 'static,
    ) -> Self {
        self.type_formatter = Some(Box::new(formatter));
        self
    }

    /// Sets the formatter for `href` templates. Without one, templates are
    /// emitted unchanged.
    #[must_use]
    pub fn with_href_formatter(
        mut self,
        formatter: impl HrefFormatter + Send + Sync + 'static,
    ) -> Self {
        self.href_formatter = Some(Box::new(formatter));
        self
    }

    /// Sets a payload that is added to every root under the reserved `meta`
    /// key.
    #[must_use]
    pub fn with_meta(mut self, meta: Payload) -> Self {
        self.meta = Some(meta);
        self
    }

    fn format_href(&self, template: &str, owner: &str, child: &str, ids: &Identifier) -> String {
        match &self.href_formatter {
            Some(formatter) => formatter.format_href(template, owner, child, ids),
            None => template.to_owned(),
        }
    }
}

impl Default for StandardStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StandardStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandardStrategy")
            .field("max_map_depth", &self.max_map_depth)
            .field("max_link_depth", &self.max_link_depth)
            .field("namespace", &self.namespace)
            .field("reserved", &self.reserved)
            .finish_non_exhaustive()
    }
}

impl Strategy for StandardStrategy {
    fn set_payload_root(&self, root: &mut Payload) {
        if let Some(meta) = &self.meta {
            root.insert(self.reserved.meta.as_str(), meta.clone());
        }
    }

    fn max_map_depth(&self) -> usize {
        self.max_map_depth
    }

    fn max_link_depth(&self) -> usize {
        self.max_link_depth
    }

    fn top_level_namespace(&self, type_name: &str) -> String {
        match &self.namespace {
            Some(namespace) => namespace.clone(),
            None => self.format_type_name(type_name),
        }
    }

    fn format_attribute_name(&self, name: &str) -> String {
        match &self.attribute_formatter {
            Some(formatter) => formatter.format_name(name),
            None => name.to_owned(),
        }
    }

    fn format_type_name(&self, name: &str) -> String {
        match &self.type_formatter {
            Some(formatter) => formatter.format_name(name),
            None => name.to_owned(),
        }
    }

    fn reserved_words(&self) -> &ReservedWords {
        &self.reserved
    }

    fn link_field(&self, payload: &mut Payload, link: &dyn Linker) -> Result<()> {
        let reserved = &self.reserved;

        // resolve everything first so a failure leaves no partial entry
        let ids = link.identifiers()?;
        let type_name = self.format_type_name(link.type_name()?);
        let href = link.field_tag(HREF_TAG).map(|template| {
            let owner = self.format_type_name(link.owner_type_name());
            self.format_href(template, &owner, &type_name, &ids)
        });

        let id_key = if link.is_collection_link() {
            &reserved.ids
        } else {
            &reserved.id
        };

        let mut details = Payload::new();
        details.insert(reserved.type_.as_str(), type_name);
        details.insert(id_key.as_str(), ids);
        if let Some(href) = href {
            details.insert(reserved.href.as_str(), href);
        }

        let attr = self.format_attribute_name(link.field_name());
        payload.map_entry(&reserved.links).insert(attr, details);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "StandardStrategy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::format::{HrefStyle, NamingConvention};
    use crate::introspect::Tags;
    use crate::payload::Value;

    struct FakeLink {
        ids: Option<Identifier>,
        href: Option<&'static str>,
    }

    impl Linker for FakeLink {
        fn is_collection_link(&self) -> bool {
            self.ids.as_ref().is_some_and(Identifier::is_multiple)
        }

        fn identifiers(&self) -> Result<Identifier> {
            self.ids.clone().ok_or_else(|| Error::MissingIdentifier {
                type_name: "Person",
                key: "id".to_owned(),
            })
        }

        fn field_name(&self) -> &'static str {
            "blog_author"
        }

        fn type_name(&self) -> Result<&'static str> {
            Ok("BlogPerson")
        }

        fn owner_type_name(&self) -> &'static str {
            "BlogPost"
        }

        fn field_tag(&self, key: &str) -> Option<&'static str> {
            (key == HREF_TAG).then_some(self.href).flatten()
        }
    }

    #[test]
    fn reserved_words_are_formatted() {
        let strategy = StandardStrategy::new().with_attribute_formatter(NamingConvention::Uppercase);
        let reserved = strategy.reserved_words();

        assert_eq!(reserved.id, "ID", "id must be formatted");
        assert_eq!(reserved.links, "LINKS", "links must be formatted");
        assert_eq!(reserved.type_, "TYPE", "type must be formatted");
        assert_eq!(
            StandardStrategy::new().reserved_words(),
            &ReservedWords::default(),
            "no formatter must leave words unchanged"
        );
    }

    #[test]
    fn namespace() {
        let strategy = StandardStrategy::new().with_type_formatter(NamingConvention::SnakeCase);
        assert_eq!(strategy.top_level_namespace("BlogPost"), "blog_post", "formatted type name");

        let strategy = strategy.with_namespace("data");
        assert_eq!(strategy.top_level_namespace("BlogPost"), "data", "explicit namespace");
    }

    #[test]
    fn field_tags() {
        let strategy = StandardStrategy::new();
        let skip = FieldInfo::new("secret", Tags::new(&[("skip", "true")]));
        let link = FieldInfo::new("author", Tags::new(&[("link", "true")]));
        let off = FieldInfo::new("body", Tags::new(&[("link", "false")]));

        assert!(strategy.should_skip_field(&skip), "skip tag");
        assert!(!strategy.should_link_field(&skip), "skip is not link");
        assert!(strategy.should_link_field(&link), "link tag");
        assert!(!strategy.should_link_field(&off), "only `true` links");
    }

    #[test]
    fn link_single() {
        let strategy = StandardStrategy::new()
            .with_attribute_formatter(NamingConvention::CamelCase)
            .with_href_formatter(HrefStyle::CommaSeparated);
        let link = FakeLink {
            ids: Some(Identifier::Single(Value::Uint(1))),
            href: Some("/api/people"),
        };

        let mut payload = Payload::new();
        strategy.link_field(&mut payload, &link).expect("link must render");

        assert_eq!(
            payload.to_json_value().ok(),
            Some(serde_json::json!({
                "links": {
                    "blogAuthor": { "type": "BlogPerson", "id": 1, "href": "/api/people/1" }
                }
            })),
            "incorrect link entry"
        );
    }

    #[test]
    fn link_collection_without_href_formatter() {
        let strategy = StandardStrategy::new();
        let link = FakeLink {
            ids: Some(Identifier::Multiple(vec![Value::Uint(1), Value::Uint(2)])),
            href: Some("/api/people/"),
        };

        let mut payload = Payload::new();
        strategy.link_field(&mut payload, &link).expect("link must render");

        assert_eq!(
            payload.to_json_value().ok(),
            Some(serde_json::json!({
                "links": {
                    "blog_author": { "type": "BlogPerson", "ids": [1, 2], "href": "/api/people/" }
                }
            })),
            "template must be kept unchanged"
        );
    }

    #[test]
    fn failed_link_leaves_payload() {
        let strategy = StandardStrategy::new();
        let link = FakeLink {
            ids: None,
            href: None,
        };

        let mut payload = Payload::new();
        let err = strategy
            .link_field(&mut payload, &link)
            .expect_err("missing identifier must fail");

        assert!(matches!(err, Error::MissingIdentifier { .. }), "incorrect error: {err:?}");
        assert!(payload.is_empty(), "no links mapping may be created");
    }

    #[test]
    fn meta_on_root() {
        let meta: Payload = [("version", 2)].into_iter().collect();
        let strategy = StandardStrategy::new().with_meta(meta.clone());

        let mut root = Payload::new();
        strategy.set_payload_root(&mut root);

        assert_eq!(root.get("meta"), Some(&Value::Map(meta)), "meta must be inserted");
    }

    #[test]
    fn from_config() {
        let config = Config {
            max_map_depth: 3,
            max_link_depth: 2,
            top_level_namespace: Some("data".to_owned()),
            attribute_case: Some(NamingConvention::KebabCase),
            type_case: None,
            href: None,
        };

        let strategy = StandardStrategy::from_config(&config);
        assert_eq!(strategy.max_map_depth(), 3, "map depth");
        assert_eq!(strategy.max_link_depth(), 2, "link depth");
        assert_eq!(strategy.top_level_namespace("Post"), "data", "namespace");
        assert_eq!(strategy.format_attribute_name("authorId"), "author-id", "attribute case");
        assert_eq!(strategy.format_type_name("BlogPost"), "BlogPost", "type case");
    }
}
