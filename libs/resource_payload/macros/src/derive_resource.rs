use darling::{Error, FromAttributes as _, FromDeriveInput as _};
use proc_macro2::TokenStream;
use syn::ext::IdentExt as _;
use syn::{Data, Fields};

use crate::args::{FieldArgs, ResourceArgs};

/// Tags with dedicated field options.
const BUILTIN_TAGS: &[&str] = &["skip", "link", "href"];

pub fn entry_point(input: syn::DeriveInput) -> darling::Result<TokenStream> {
    let args = ResourceArgs::from_derive_input(&input)?;
    let crate_ = &args.crate_;

    let Data::Struct(data) = &input.data else {
        let err = Error::custom("resources must be structs");
        return Err(err.with_span(&input));
    };

    let named: Vec<&syn::Field> = match &data.fields {
        Fields::Named(fields) => fields.named.iter().collect(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(fields) => {
            let err = Error::custom("resources must have named fields");
            return Err(err.with_span(fields));
        },
    };

    let mut acc = Error::accumulator();
    let mut fields = Vec::new();
    let mut skipped = Vec::new();

    for field in named {
        let Some(ident) = &field.ident else {
            continue;
        };

        let Some(attrs) = acc.handle(FieldArgs::from_attributes(&field.attrs)) else {
            continue;
        };

        if attrs.skip && attrs.link {
            let err = Error::custom("a field cannot be both skipped and linked");
            acc.push(err.with_span(ident));
        }

        if attrs.href.is_some() && !attrs.link {
            let err = Error::custom("`href` requires `link`");
            acc.push(err.with_span(ident));
        }

        let mut tags = Vec::new();
        if attrs.skip {
            tags.push(("skip".to_owned(), "true".to_owned()));
        }
        if attrs.link {
            tags.push(("link".to_owned(), "true".to_owned()));
        }
        if let Some(href) = attrs.href {
            tags.push(("href".to_owned(), href));
        }

        // sorted so the expansion is deterministic
        let mut custom: Vec<_> = attrs.tag.into_iter().collect();
        custom.sort();

        for (key, value) in custom {
            if BUILTIN_TAGS.contains(&key.as_str()) {
                let err = Error::custom(format!("use the `{key}` option instead of a tag"));
                acc.push(err.with_span(ident));
            } else {
                tags.push((key, value));
            }
        }

        let name = attrs.rename.unwrap_or_else(|| ident.unraw().to_string());
        let keys = tags.iter().map(|(k, _)| k);
        let values = tags.iter().map(|(_, v)| v);

        let info = quote::quote! {
            #crate_::FieldInfo::new(#name, #crate_::Tags::new(&[#((#keys, #values)),*]))
        };

        fields.push(if attrs.skip {
            skipped.push(ident);
            quote::quote! { #crate_::Field::opaque(#info) }
        } else {
            quote::quote! { #crate_::Field::new(#info, &self.#ident) }
        });
    }

    let ty_name = &input.ident;
    let name = args.name.unwrap_or_else(|| ty_name.unraw().to_string());

    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(syn::parse_quote!(#crate_::Resource));
    }

    let (impl_gen, ty_gen, where_clause) = generics.split_for_impl();

    let errors = acc.finish().err().map(|e| e.write_errors());
    Ok(quote::quote! {
        #[automatically_derived]
        impl #impl_gen #crate_::Resource for #ty_name #ty_gen #where_clause {
            fn resolve(&self) -> #crate_::Resolved<'_> {
                #crate_::Resolved::Record(self)
            }

            fn type_name(&self) -> ::std::option::Option<&'static str> {
                ::std::option::Option::Some(#name)
            }

            fn record_name() -> ::std::option::Option<&'static str> {
                ::std::option::Option::Some(#name)
            }
        }

        #[automatically_derived]
        impl #impl_gen #crate_::Record for #ty_name #ty_gen #where_clause {
            fn name(&self) -> &'static str {
                #name
            }

            fn fields(&self) -> ::std::vec::Vec<#crate_::Field<'_>> {
                // skipped fields are only visited as metadata
                #( _ = &self.#skipped; )*
                ::std::vec![#(#fields),*]
            }
        }

        #errors
    })
}
