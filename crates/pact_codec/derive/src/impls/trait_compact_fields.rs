use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::CompactDerive;
use crate::path::fp::{DefaultFP, ResultFP};

/// Implements `CompactFields`: the creator and the field-by-field codec.
pub(crate) fn impl_trait_compact_fields(derive: &CompactDerive) -> TokenStream {
    let codec = &derive.codec;
    let ident = &derive.ident;
    let compact_fields_ = crate::path::compact_fields_(codec);
    let codec_error_ = crate::path::codec_error_(codec);
    let ser_context_ = crate::path::ser_context_(codec);
    let de_context_ = crate::path::de_context_(codec);

    let create = match &derive.attrs.create {
        Some(path) => quote! { #path(__ctx) },
        None => quote! { #ResultFP::Ok(<Self as #DefaultFP>::default()) },
    };

    let members: Vec<_> = derive.active_fields().map(|field| &field.member).collect();

    quote! {
        impl #compact_fields_ for #ident {
            fn create(__ctx: &#de_context_<'_>) -> #ResultFP<Self, #codec_error_> {
                #create
            }

            fn write_fields(&self, __ctx: &mut #ser_context_<'_>) -> #ResultFP<(), #codec_error_> {
                #( #ser_context_::write_field(__ctx, &self.#members)?; )*
                #ResultFP::Ok(())
            }

            fn read_fields(&mut self, __ctx: &mut #de_context_<'_>) -> #ResultFP<(), #codec_error_> {
                #( self.#members = #de_context_::read_field(__ctx)?; )*
                #ResultFP::Ok(())
            }
        }
    }
}
