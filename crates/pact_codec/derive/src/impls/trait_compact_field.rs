use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::CompactDerive;
use crate::path::fp::ResultFP;

/// Value types are fields of their own: written inline through the struct
/// path, never through the object protocol.
pub(crate) fn impl_trait_compact_field(derive: &CompactDerive) -> TokenStream {
    if derive.attrs.value.is_none() {
        return TokenStream::new();
    }

    let codec = &derive.codec;
    let ident = &derive.ident;
    let compact_field_ = crate::path::compact_field_(codec);
    let codec_error_ = crate::path::codec_error_(codec);
    let ser_context_ = crate::path::ser_context_(codec);
    let de_context_ = crate::path::de_context_(codec);

    quote! {
        impl #compact_field_ for #ident {
            #[inline]
            fn write_field(&self, __ctx: &mut #ser_context_<'_>) -> #ResultFP<(), #codec_error_> {
                #ser_context_::write_struct(__ctx, self)
            }

            #[inline]
            fn read_field(__ctx: &mut #de_context_<'_>) -> #ResultFP<Self, #codec_error_> {
                #de_context_::read_struct::<Self>(__ctx)
            }
        }
    }
}
