use crate::derive_data::CompactDerive;

/// Submits the type's codec to the link-time registration list.
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(derive: &CompactDerive) -> proc_macro2::TokenStream {
    let Some(span) = derive.attrs.auto_register else {
        return proc_macro2::TokenStream::new();
    };

    let auto_register_ = crate::path::auto_register_(&derive.codec);
    let ident = &derive.ident;

    quote::quote_spanned! { span =>
        #auto_register_::inventory::submit!{
            #auto_register_::__AutoRegisterFunc(
                <#ident as #auto_register_::__RegisterType>::__register
            )
        }
    }
}

#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &CompactDerive) -> proc_macro2::TokenStream {
    proc_macro2::TokenStream::new()
}
