//! Paths into `pact_codec` used by generated code.
//!
//! Kept in one place so a reorganization of `pact_codec` only touches this
//! module.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Modules

pub(crate) mod fp;

// -----------------------------------------------------------------------------
// Crate Path

/// The path of `pact_codec` as seen from the crate being expanded.
///
/// Resolved from the invoking crate's `Cargo.toml`, see
/// [`pact_macro_utils::Manifest`]. Reading the manifest is not free, so the
/// result is computed once per macro invocation and passed around.
pub(crate) fn pact_codec() -> syn::Path {
    pact_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("pact_codec"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn macro_exports_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::__macro_exports }
}

#[inline(always)]
pub(crate) fn type_path_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::info::TypePath }
}

#[inline(always)]
pub(crate) fn typed_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::info::Typed }
}

#[inline(always)]
pub(crate) fn type_info_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::info::TypeInfo }
}

#[inline(always)]
pub(crate) fn type_info_cell_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::info::TypeInfoCell }
}

#[inline(always)]
pub(crate) fn implements_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::info::Implements }
}

#[inline(always)]
pub(crate) fn compact_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::Compact }
}

#[inline(always)]
pub(crate) fn declared_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::Declared }
}

#[inline(always)]
pub(crate) fn compact_fields_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::registry::CompactFields }
}

#[inline(always)]
pub(crate) fn compact_field_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::CompactField }
}

#[inline(always)]
pub(crate) fn codec_error_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::CodecError }
}

#[inline(always)]
pub(crate) fn ser_context_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::SerializationContext }
}

#[inline(always)]
pub(crate) fn de_context_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::DeserializationContext }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::__macro_exports::auto_register }
}
