//! Derive macros for the chasm crate.
//!
//! Provides:
//! - `#[derive(Serializable)]` - class tag, inheritance descriptor and field list for the codec
//! - `#[derive(Error)]` - `Display` and `Error` boilerplate for error enums

mod error;
mod serializable;

use proc_macro::TokenStream;

/// Implements `Compound`, `Encode` and `Decode` for a classified type.
///
/// See the `serializable` module for the accepted `#[class(...)]` forms.
#[proc_macro_derive(Serializable, attributes(class))]
pub fn derive_serializable(input: TokenStream) -> TokenStream {
    serializable::derive_serializable(input)
}

/// Automatically implements `Display` and `Error` traits for error types.
#[proc_macro_derive(Error, attributes(error))]
pub fn derive_error(input: TokenStream) -> TokenStream {
    error::derive_error(input)
}
