use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, LitStr};

/// Implements `TypePath` for `target`.
///
/// Without a custom path the type path is `module_path!()` joined with the
/// type's identifier.
pub(crate) fn impl_trait_type_path(
    codec: &syn::Path,
    target: &TokenStream,
    ident: &Ident,
    custom: Option<&LitStr>,
    type_name: &str,
) -> TokenStream {
    let type_path_ = crate::path::type_path_(codec);

    let path_expr = match custom {
        Some(lit) => quote! { #lit },
        None => {
            let ident_str = ident.to_string();
            quote! { ::core::concat!(::core::module_path!(), "::", #ident_str) }
        }
    };

    quote! {
        impl #type_path_ for #target {
            #[inline]
            fn type_path() -> &'static str {
                #path_expr
            }

            #[inline]
            fn type_name() -> &'static str {
                #type_name
            }
        }
    }
}
