//! Fully qualified paths of prelude items, immune to shadowing in the
//! expanding crate.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

macro_rules! define_fp {
    ($($name:ident => $path:path;)*) => {
        $(
            pub(crate) struct $name;

            impl ToTokens for $name {
                fn to_tokens(&self, tokens: &mut TokenStream) {
                    tokens.extend(quote!($path));
                }
            }
        )*
    };
}

define_fp! {
    ResultFP => ::core::result::Result;
    DefaultFP => ::core::default::Default;
    AnyFP => ::core::any::Any;
}
