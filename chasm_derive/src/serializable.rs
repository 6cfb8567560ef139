//! Derive macro for codec classification.
//!
//! Three shapes are accepted:
//!
//! - **Compound structs**: `#[class(tag = tags::TXO)]` on the type. Fields are written in
//!   declaration order after the class tag. A single field may be marked `#[class(base)]`;
//!   the type then derives from that field's type and its encoding embeds the base's full
//!   encoding between its own tag and its own fields.
//! - **Transparent newtypes**: `#[class(transparent)]` on a single-field struct. Encodes
//!   exactly as the wrapped field, no tag.
//! - **Sum types**: enums whose variants each wrap one compound type, e.g.
//!   `enum TxOutput { Simple(SimpleOutput), Fee(FeeOutput) }`. Encoding writes the wrapped
//!   value; decoding peeks the next class tag and dispatches on it.
//!
//! Unions are not supported.
//!
//! # Example
//!
//! ```ignore
//! #[derive(Serializable)]
//! #[class(tag = tags::FEE_OUTPUT)]
//! pub struct FeeOutput {
//!     #[class(base)]
//!     pub output: Output,
//!     pub offer_hash: Hash,
//! }
//! ```
//!
//! # Generated Code
//!
//! ```ignore
//! impl Compound for FeeOutput {
//!     const CLASS_TAG: ClassTag = tags::FEE_OUTPUT;
//!     type Lineage = DerivedFrom<Output>;
//!
//!     fn write_fields<S: EncodeSink>(&self, w: &mut Writer<S>) -> Result<(), EncodeError> {
//!         w.write(&self.offer_hash)?;
//!         Ok(())
//!     }
//!
//!     fn read_fields(base: Output, r: &mut Reader<'_>) -> Result<Self, DecodeError> {
//!         Ok(Self { output: base, offer_hash: r.read()? })
//!     }
//! }
//!
//! impl Extends<Output> for FeeOutput {
//!     fn base(&self) -> &Output { &self.output }
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DataEnum, DeriveInput, Fields, Ident, Member, Type, parse_macro_input};

/// What the type-level `#[class(...)]` attribute asked for.
enum ClassKind {
    Tagged(syn::Expr),
    Transparent,
    Unspecified,
}

pub fn derive_serializable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let kind = parse_class_kind(input)?;

    match (&input.data, kind) {
        (Data::Struct(data), ClassKind::Tagged(tag)) => expand_compound(input, &data.fields, tag),
        (Data::Struct(data), ClassKind::Transparent) => expand_transparent(input, &data.fields),
        (Data::Struct(_), ClassKind::Unspecified) => Err(syn::Error::new_spanned(
            &input.ident,
            "missing #[class(tag = ...)] or #[class(transparent)] on a Serializable struct",
        )),
        (Data::Enum(data), ClassKind::Unspecified) => expand_sum(input, data),
        (Data::Enum(_), _) => Err(syn::Error::new_spanned(
            &input.ident,
            "sum types take their tags from their variants; remove #[class(...)] from the enum",
        )),
        (Data::Union(_), _) => Err(syn::Error::new_spanned(
            input,
            "Serializable derive does not support unions",
        )),
    }
}

fn parse_class_kind(input: &DeriveInput) -> syn::Result<ClassKind> {
    let mut kind = ClassKind::Unspecified;

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("class")) {
        attr.parse_nested_meta(|meta| {
            if !matches!(kind, ClassKind::Unspecified) {
                return Err(meta.error("only one of `tag` or `transparent` may be given"));
            }
            if meta.path.is_ident("tag") {
                kind = ClassKind::Tagged(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("transparent") {
                kind = ClassKind::Transparent;
                Ok(())
            } else {
                Err(meta.error("expected `tag = <expr>` or `transparent`"))
            }
        })?;
    }

    Ok(kind)
}

/// Returns true when the field carries `#[class(base)]`.
fn is_base_field(field: &syn::Field) -> syn::Result<bool> {
    let mut base = false;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("class")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("base") {
                base = true;
                Ok(())
            } else {
                Err(meta.error("the only field-level option is `base`"))
            }
        })?;
    }
    Ok(base)
}

fn members(fields: &Fields) -> Vec<Member> {
    fields
        .iter()
        .enumerate()
        .map(|(i, f)| match &f.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(syn::Index::from(i)),
        })
        .collect()
}

fn expand_compound(input: &DeriveInput, fields: &Fields, tag: syn::Expr) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let members = members(fields);

    let mut base: Option<(usize, &Type)> = None;
    for (i, field) in fields.iter().enumerate() {
        if is_base_field(field)? {
            if base.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "a serializable type derives from at most one base; multiple inheritance is not supported",
                ));
            }
            base = Some((i, &field.ty));
        }
    }

    let own: Vec<&Member> = members
        .iter()
        .enumerate()
        .filter(|(i, _)| base.map(|(b, _)| b != *i).unwrap_or(true))
        .map(|(_, m)| m)
        .collect();

    let write_fields = own.iter().map(|m| quote! { w.write(&self.#m)?; });

    // Field initializers in declaration order so reads happen in wire order.
    let inits: Vec<TokenStream2> = members
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if base.map(|(b, _)| b == i).unwrap_or(false) {
                quote! { base }
            } else {
                quote! { r.read()? }
            }
        })
        .collect();

    let construct = match fields {
        Fields::Named(_) => {
            let names = members.iter();
            quote! { Self { #(#names: #inits),* } }
        }
        Fields::Unnamed(_) => quote! { Self(#(#inits),*) },
        Fields::Unit => quote! { Self },
    };

    let (lineage, base_param, extends) = match base {
        Some((index, base_ty)) => {
            let member = &members[index];
            (
                quote! { ::chasm::types::class::DerivedFrom<#base_ty> },
                quote! { base },
                quote! {
                    impl #impl_generics ::chasm::types::class::Extends<#base_ty> for #name #ty_generics #where_clause {
                        fn base(&self) -> &#base_ty {
                            &self.#member
                        }
                    }
                },
            )
        }
        None => (
            quote! { ::chasm::types::class::Root },
            quote! { _base },
            TokenStream2::new(),
        ),
    };

    let codec = codec_impls(name, &input.generics);

    Ok(quote! {
        impl #impl_generics ::chasm::types::class::Compound for #name #ty_generics #where_clause {
            const CLASS_TAG: ::chasm::types::class::ClassTag = #tag;
            type Lineage = #lineage;

            #[allow(unused_variables)]
            fn write_fields<S: ::chasm::types::writer::EncodeSink>(
                &self,
                w: &mut ::chasm::types::writer::Writer<S>,
            ) -> ::core::result::Result<(), ::chasm::types::writer::EncodeError> {
                #(#write_fields)*
                Ok(())
            }

            #[allow(unused_variables)]
            fn read_fields(
                #base_param: <Self::Lineage as ::chasm::types::class::Lineage<Self>>::Base,
                r: &mut ::chasm::types::reader::Reader<'_>,
            ) -> ::core::result::Result<Self, ::chasm::types::reader::DecodeError> {
                Ok(#construct)
            }
        }

        #extends

        #codec
    })
}

/// `Encode`/`Decode` impls that route through the compound rules.
fn codec_impls(name: &Ident, generics: &syn::Generics) -> TokenStream2 {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    quote! {
        impl #impl_generics ::chasm::types::writer::Encode for #name #ty_generics #where_clause {
            fn encode<S: ::chasm::types::writer::EncodeSink>(
                &self,
                w: &mut ::chasm::types::writer::Writer<S>,
            ) -> ::core::result::Result<(), ::chasm::types::writer::EncodeError> {
                ::chasm::types::class::write_compound(self, w)
            }
        }

        impl #impl_generics ::chasm::types::reader::Decode for #name #ty_generics #where_clause {
            fn decode(
                r: &mut ::chasm::types::reader::Reader<'_>,
            ) -> ::core::result::Result<Self, ::chasm::types::reader::DecodeError> {
                ::chasm::types::class::read_compound(r)
            }
        }
    }
}

fn expand_transparent(input: &DeriveInput, fields: &Fields) -> syn::Result<TokenStream2> {
    if fields.len() != 1 {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[class(transparent)] requires exactly one field",
        ));
    }
    for field in fields.iter() {
        if is_base_field(field)? {
            return Err(syn::Error::new_spanned(
                field,
                "a transparent newtype has no base",
            ));
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let member = &members(fields)[0];
    let construct = match fields {
        Fields::Named(_) => quote! { Self { #member: r.read()? } },
        _ => quote! { Self(r.read()?) },
    };

    Ok(quote! {
        impl #impl_generics ::chasm::types::writer::Encode for #name #ty_generics #where_clause {
            fn encode<S: ::chasm::types::writer::EncodeSink>(
                &self,
                w: &mut ::chasm::types::writer::Writer<S>,
            ) -> ::core::result::Result<(), ::chasm::types::writer::EncodeError> {
                w.write(&self.#member)?;
                Ok(())
            }
        }

        impl #impl_generics ::chasm::types::reader::Decode for #name #ty_generics #where_clause {
            fn decode(
                r: &mut ::chasm::types::reader::Reader<'_>,
            ) -> ::core::result::Result<Self, ::chasm::types::reader::DecodeError> {
                Ok(#construct)
            }
        }
    })
}

fn expand_sum(input: &DeriveInput, data: &DataEnum) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut variants: Vec<(&Ident, &Type)> = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        match &variant.fields {
            Fields::Unnamed(f) if f.unnamed.len() == 1 => {
                variants.push((&variant.ident, &f.unnamed[0].ty));
            }
            _ => {
                return Err(syn::Error::new_spanned(
                    variant,
                    "each variant of a serializable sum type must wrap exactly one compound type",
                ));
            }
        }
    }
    if variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "a serializable sum type needs at least one variant",
        ));
    }

    let encode_arms = variants.iter().map(|(ident, _)| {
        quote! { Self::#ident(value) => ::chasm::types::writer::Encode::encode(value, w), }
    });

    let decode_branches = variants.iter().map(|(ident, ty)| {
        quote! {
            if found == <#ty as ::chasm::types::class::Compound>::CLASS_TAG {
                return Ok(Self::#ident(r.read()?));
            }
        }
    });

    // Generic sum types cannot name their variant types from a free const item.
    let distinct_check = if input.generics.params.is_empty() {
        let tys = variants.iter().map(|(_, ty)| ty);
        let message = format!("variants of `{}` must have distinct class tags", name);
        quote! {
            const _: () = assert!(
                ::chasm::types::class::tags_are_distinct(&[
                    #(<#tys as ::chasm::types::class::Compound>::CLASS_TAG),*
                ]),
                #message
            );
        }
    } else {
        TokenStream2::new()
    };

    let type_name = name.to_string();

    Ok(quote! {
        #distinct_check

        impl #impl_generics ::chasm::types::writer::Encode for #name #ty_generics #where_clause {
            fn encode<S: ::chasm::types::writer::EncodeSink>(
                &self,
                w: &mut ::chasm::types::writer::Writer<S>,
            ) -> ::core::result::Result<(), ::chasm::types::writer::EncodeError> {
                match self {
                    #(#encode_arms)*
                }
            }
        }

        impl #impl_generics ::chasm::types::reader::Decode for #name #ty_generics #where_clause {
            fn decode(
                r: &mut ::chasm::types::reader::Reader<'_>,
            ) -> ::core::result::Result<Self, ::chasm::types::reader::DecodeError> {
                let found = r.peek_tag()?;
                #(#decode_branches)*
                Err(::chasm::types::reader::DecodeError::TagMismatch {
                    type_name: #type_name,
                    found,
                })
            }
        }
    })
}
