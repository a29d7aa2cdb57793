use proc_macro2::TokenStream;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{ItemTrait, LitStr, TypeParamBound};

use crate::path::fp::ResultFP;

/// Arguments of `#[compact_trait(...)]`.
#[derive(Default)]
pub(crate) struct TraitAttributes {
    pub type_path: Option<LitStr>,
}

impl TraitAttributes {
    pub fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("type_path") {
            if self.type_path.is_some() {
                return Err(meta.error("duplicate `type_path`"));
            }
            self.type_path = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported compact_trait attribute, expected `type_path`"))
        }
    }
}

/// Re-emits the trait and makes `dyn Trait` a declared abstract type.
pub(crate) fn impl_compact_trait(attrs: TraitAttributes, item: ItemTrait) -> syn::Result<TokenStream> {
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new(
            item.generics.span(),
            "#[compact_trait] does not support generic traits",
        ));
    }

    let codec = crate::path::pact_codec();
    let ident = &item.ident;
    let target = quote! { dyn #ident };

    let type_name = match &attrs.type_path {
        Some(lit) => {
            let path = lit.value();
            match path.rsplit_once("::") {
                Some((_, name)) => name.to_owned(),
                None => path,
            }
        }
        None => ident.to_string(),
    };

    let type_path_impl = super::impl_trait_type_path(
        &codec,
        &target,
        ident,
        attrs.type_path.as_ref(),
        &type_name,
    );

    let typed_ = crate::path::typed_(&codec);
    let type_info_ = crate::path::type_info_(&codec);
    let type_info_cell_ = crate::path::type_info_cell_(&codec);
    let compact_ = crate::path::compact_(&codec);
    let declared_ = crate::path::declared_(&codec);
    let codec_error_ = crate::path::codec_error_(&codec);
    let macro_exports_ = crate::path::macro_exports_(&codec);

    // A `Debug` supertrait already makes `dyn Trait: Debug`.
    let debug_impl = if has_debug_supertrait(&item) {
        TokenStream::new()
    } else {
        quote! {
            impl ::core::fmt::Debug for #target {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    ::core::fmt::Debug::fmt(#compact_::as_compact(self), f)
                }
            }
        }
    };

    Ok(quote! {
        #item

        #type_path_impl

        impl #typed_ for #target {
            fn type_info() -> &'static #type_info_ {
                static CELL: #type_info_cell_ = #type_info_cell_::new();
                CELL.get_or_init(#type_info_::abstract_type::<Self>)
            }
        }

        impl #declared_ for #target {
            #[inline]
            fn upcast(this: &Self) -> &dyn #compact_ {
                #compact_::as_compact(this)
            }

            #[inline]
            fn downcast(
                object: #macro_exports_::Box<dyn #compact_>,
            ) -> #ResultFP<#macro_exports_::Box<Self>, #codec_error_> {
                #macro_exports_::cast_boxed::<Self>(object)
            }
        }

        #debug_impl
    })
}

fn has_debug_supertrait(item: &ItemTrait) -> bool {
    item.supertraits.iter().any(|bound| match bound {
        TypeParamBound::Trait(bound) => bound
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Debug"),
        _ => false,
    })
}
