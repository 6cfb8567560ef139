//! Derive macro for error enums.
//!
//! Generates `std::fmt::Display` and `std::error::Error`, in the spirit of `thiserror`.
//!
//! # Usage
//!
//! ```ignore
//! use chasm_derive::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum DatabaseError {
//!     #[error("database is not open")]
//!     NotOpen,
//!
//!     #[error("backend failure: {0}")]
//!     Backend(String),
//!
//!     #[error("record {key} is corrupted: {source}")]
//!     Corrupted { key: Hash, source: DecodeError },
//! }
//! ```
//!
//! A named field called `source` is returned from `Error::source`, so wrapped errors keep
//! their chain. Positional arguments `{0}`, `{1}` refer to tuple fields.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, parse_macro_input};

pub fn derive_error(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let data = match &input.data {
        Data::Enum(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Error derive supports enums only",
            ));
        }
    };

    let mut display_arms = Vec::with_capacity(data.variants.len());
    let mut source_arms = Vec::new();

    for variant in &data.variants {
        let ident = &variant.ident;
        let message = error_message(&variant.attrs, variant)?;

        match &variant.fields {
            Fields::Unit => {
                display_arms.push(quote! { Self::#ident => f.write_str(#message), });
            }
            Fields::Unnamed(fields) => {
                let format = positional_to_named(&message.value(), fields.unnamed.len());
                let mut patterns = Vec::with_capacity(fields.unnamed.len());
                let mut used = Vec::new();
                for i in 0..fields.unnamed.len() {
                    let binding = format_ident!("f{}", i);
                    if mentions(&format, &binding.to_string()) {
                        patterns.push(quote! { #binding });
                        used.push(binding);
                    } else {
                        patterns.push(quote! { _ });
                    }
                }
                display_arms.push(quote! {
                    Self::#ident(#(#patterns),*) => write!(f, #format, #(#used = #used),*),
                });
            }
            Fields::Named(fields) => {
                let names: Vec<_> = fields.named.iter().filter_map(|f| f.ident.as_ref()).collect();
                // Only bind fields the message mentions so unused ones don't warn.
                let text = message.value();
                let used: Vec<_> = names
                    .iter()
                    .filter(|n| mentions(&text, &n.to_string()))
                    .collect();
                display_arms.push(quote! {
                    Self::#ident { #(#used,)* .. } => write!(f, #message, #(#used = #used),*),
                });

                if names.iter().any(|n| *n == "source") {
                    source_arms.push(quote! {
                        Self::#ident { source, .. } => Some(source as &(dyn ::std::error::Error + 'static)),
                    });
                }
            }
        }
    }

    let source_fn = if source_arms.is_empty() {
        TokenStream2::new()
    } else {
        quote! {
            fn source(&self) -> Option<&(dyn ::std::error::Error + 'static)> {
                match self {
                    #(#source_arms)*
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };

    Ok(quote! {
        impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    #(#display_arms)*
                }
            }
        }

        impl #impl_generics ::std::error::Error for #name #ty_generics #where_clause {
            #source_fn
        }
    })
}

/// Reads the string literal out of `#[error("...")]`.
fn error_message(attrs: &[Attribute], variant: &syn::Variant) -> syn::Result<LitStr> {
    let attr = attrs
        .iter()
        .find(|a| a.path().is_ident("error"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &variant.ident,
                format!(
                    "missing #[error(\"...\")] on variant `{}`; every error variant declares its message",
                    variant.ident
                ),
            )
        })?;

    attr.parse_args::<LitStr>().map_err(|_| {
        syn::Error::new_spanned(
            &attr.meta,
            "expected a string literal, e.g. #[error(\"unexpected end of input\")]",
        )
    })
}

/// True when the format string interpolates `name`, as `{name}` or `{name:...}`.
fn mentions(format: &str, name: &str) -> bool {
    format.contains(&format!("{{{}}}", name)) || format.contains(&format!("{{{}:", name))
}

/// Rewrites `{0}`, `{1:?}` into `{f0}`, `{f1:?}` so tuple fields can be passed by name.
fn positional_to_named(format: &str, count: usize) -> String {
    let mut out = format.to_string();
    for i in (0..count).rev() {
        out = out
            .replace(&format!("{{{}}}", i), &format!("{{f{}}}", i))
            .replace(&format!("{{{}:", i), &format!("{{f{}:", i));
    }
    out
}
