use std::collections::HashMap;

use syn::Path;

#[derive(Debug, darling::FromDeriveInput)]
#[darling(attributes(resource))]
pub struct ResourceArgs {
    pub name: Option<String>,
    #[darling(rename = "crate", default = "default_crate")]
    pub crate_: Path,
}

#[derive(Debug, Default, darling::FromAttributes)]
#[darling(attributes(resource))]
pub struct FieldArgs {
    #[darling(default)]
    pub skip: bool,
    #[darling(default)]
    pub link: bool,
    pub href: Option<String>,
    pub rename: Option<String>,
    #[darling(default)]
    pub tag: HashMap<String, String>,
}

fn default_crate() -> Path {
    syn::parse_quote!(::resource_payload)
}
