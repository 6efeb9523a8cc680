//! Proc macros for the `resource_payload` crate.

use proc_macro::TokenStream as StdTokenStream;
use syn::DeriveInput;

mod args;
mod derive_resource;

/// Derives `Resource` and `Record` for a struct.
///
/// See the docs on the `resource_payload` crate for the supported attributes.
#[proc_macro_derive(Resource, attributes(resource))]
pub fn derive_resource(input: StdTokenStream) -> StdTokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    derive_resource::entry_point(input)
        .unwrap_or_else(|e| e.write_errors())
        .into()
}
