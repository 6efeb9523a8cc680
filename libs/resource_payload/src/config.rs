//! TOML-loadable settings for [`StandardStrategy`](crate::StandardStrategy).

use serde::Deserialize;

use crate::error::Result;
use crate::format::{HrefStyle, NamingConvention};

const fn default_depth() -> usize {
    1
}

/// Configuration for a [`StandardStrategy`](crate::StandardStrategy).
///
/// ```toml
/// max_map_depth = 1
/// max_link_depth = 1
/// top_level_namespace = "data"
/// attribute_case = "snake_case"
/// type_case = "snake_case"
/// href = "comma_separated"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_depth")]
    pub max_map_depth: usize,
    #[serde(default = "default_depth")]
    pub max_link_depth: usize,
    /// Overrides the key the root value is stored under.
    #[serde(default)]
    pub top_level_namespace: Option<String>,
    #[serde(default)]
    pub attribute_case: Option<NamingConvention>,
    #[serde(default)]
    pub type_case: Option<NamingConvention>,
    #[serde(default)]
    pub href: Option<HrefStyle>,
}

impl Config {
    /// Parses the configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the text is not valid
    /// TOML or does not match the expected shape.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_map_depth: default_depth(),
            max_link_depth: default_depth(),
            top_level_namespace: None,
            attribute_case: None,
            type_case: None,
            href: None,
        }
    }
}
