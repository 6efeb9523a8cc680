//! Compiles object graphs into "resource + links" payloads, in the style of
//! JSON API documents.
//!
//! Records are compiled into mappings of their fields. Fields can be inlined,
//! skipped, or replaced with a link descriptor holding the type name and
//! identifiers of the linked records, so related records are referenced
//! rather than embedded:
//!
//! ```
//! use resource_payload::{Compiler, HrefStyle, Resource, StandardStrategy};
//!
//! #[derive(Resource)]
//! struct Person {
//!     id: u32,
//!     name: String,
//! }
//!
//! #[derive(Resource)]
//! struct Post {
//!     id: u32,
//!     title: String,
//!     #[resource(link, href = "/api/people")]
//!     author: Person,
//! }
//!
//! let post = Post {
//!     id: 7,
//!     title: "Hello".to_owned(),
//!     author: Person {
//!         id: 1,
//!         name: "Ann".to_owned(),
//!     },
//! };
//!
//! let strategy = StandardStrategy::new().with_href_formatter(HrefStyle::CommaSeparated);
//! let payload = Compiler::new(strategy).compile_payload(&post)?;
//!
//! assert_eq!(
//!     payload.to_json_value()?,
//!     serde_json::json!({
//!         "Post": {
//!             "id": 7,
//!             "title": "Hello",
//!             "links": {
//!                 "author": { "type": "Person", "id": 1, "href": "/api/people/1" }
//!             }
//!         }
//!     })
//! );
//! # Ok::<(), resource_payload::Error>(())
//! ```
//!
//! How names are formatted, how deep values may nest, and how links are
//! rendered is controlled by a [`Strategy`]. [`StandardStrategy`] covers the
//! common cases and can be loaded from a TOML [`Config`].
//!
//! # Derive
//!
//! [`derive@Resource`] supports structs with named fields and unit structs.
//!
//! On the struct:
//!
//! - `#[resource(name = "...")]`: overrides the type name.
//! - `#[resource(crate = "...")]`: path to this crate, if it was renamed.
//!
//! On fields:
//!
//! - `#[resource(skip)]`: omits the field. Its type does not need to implement
//!   [`Resource`].
//! - `#[resource(link)]`: renders the field as a link.
//! - `#[resource(href = "...")]`: href template for a linked field.
//! - `#[resource(rename = "...")]`: overrides the field name.
//! - `#[resource(tag(key = "value"))]`: adds custom tags for use by a
//!   strategy, see [`FieldInfo::tag`].

mod compiler;
mod config;
mod error;
pub mod format;
pub mod introspect;
mod linker;
mod payload;
pub mod strategy;

pub use compiler::Compiler;
pub use config::Config;
pub use error::{Error, Result};
pub use format::{HrefFormatter, HrefStyle, NamingConvention, NamingFormatter};
pub use introspect::{Field, FieldInfo, Kind, Record, Resolved, Resource, Tags};
pub use linker::{Identifier, Link, Linker};
pub use payload::{Payload, Value};
pub use resource_payload_macros::Resource;
pub use strategy::{ReservedWords, StandardStrategy, Strategy};
