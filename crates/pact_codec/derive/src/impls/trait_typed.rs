use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::CompactDerive;
use crate::path::fp::{AnyFP, ResultFP};

/// Implements `Typed` for a derived struct.
pub(crate) fn impl_trait_typed(derive: &CompactDerive) -> TokenStream {
    let codec = &derive.codec;
    let ident = &derive.ident;
    let typed_ = crate::path::typed_(codec);
    let type_info_ = crate::path::type_info_(codec);
    let type_info_cell_ = crate::path::type_info_cell_(codec);
    let implements_ = crate::path::implements_(codec);
    let macro_exports_ = crate::path::macro_exports_(codec);

    let constructor = if derive.attrs.value.is_some() {
        quote! { #type_info_::value::<Self>() }
    } else {
        quote! { #type_info_::class::<Self>() }
    };

    let base = derive.attrs.base.as_ref().map(|base| {
        quote! { .with_base::<#base>() }
    });

    let implements = derive.attrs.implements.iter().map(|abstract_type| {
        quote! {
            .with_implements(#implements_::new::<#abstract_type>(|__any| {
                let __this = __any.downcast::<Self>()?;
                let __object: #macro_exports_::Box<#abstract_type> = __this;
                #ResultFP::Ok(#macro_exports_::Box::new(__object) as #macro_exports_::Box<dyn #AnyFP>)
            }))
        }
    });

    let names = derive.active_fields().map(|field| field.name());

    quote! {
        impl #typed_ for #ident {
            fn type_info() -> &'static #type_info_ {
                static CELL: #type_info_cell_ = #type_info_cell_::new();
                CELL.get_or_init(|| {
                    #constructor
                        #base
                        #(#implements)*
                        .with_fields(&[#(#names),*])
                })
            }
        }
    }
}
