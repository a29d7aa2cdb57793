//! See following macros:
//!
//! - [`Compact`](macro@Compact)
//! - [`compact_trait`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, ItemTrait, parse_macro_input};

static COMPACT_ATTRIBUTE_NAME: &str = "compact";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Compact Derivation
///
/// `#[derive(Compact)]` implements the following traits for a struct:
///
/// - `TypePath`
/// - `Typed`
/// - `CompactFields`
/// - `CompactField` (value types only)
///
/// `Compact` and `Declared` then follow from their blanket implementations.
/// Named, tuple and unit structs are supported; enums, unions and generic
/// types are rejected.
///
/// Fields are written in declaration order, each through its `CompactField`
/// implementation. The field order is the wire format: reordering fields
/// breaks existing data.
///
/// ## Type Path
///
/// The default path is `module_path!()` followed by the type name. It can
/// be overridden; the type name is then the last segment.
///
/// ```rust, ignore
/// #[derive(Compact, Default)]
/// #[compact(type_path = "shapes::Circle")]
/// struct Circle { radius: i32 }
/// ```
///
/// ## Hierarchy
///
/// `base` names a concrete base type and `implements` lists abstract types
/// (traits marked with [`compact_trait`]) the struct can be stored as.
/// Each listed trait must be implemented by the struct.
///
/// ```rust, ignore
/// #[derive(Compact, Default)]
/// #[compact(implements(dyn Shape))]
/// struct Circle { radius: i32 }
///
/// impl Shape for Circle {}
/// ```
///
/// ## Value Types
///
/// `#[compact(value)]` marks a value type. Value types are written inline
/// with no header and are themselves usable as fields. They cannot declare
/// `base` or `implements`.
///
/// ```rust, ignore
/// #[derive(Compact, Default)]
/// #[compact(value)]
/// struct Point { x: i32, y: i32 }
/// ```
///
/// ## Creation
///
/// Instances are created with `Default::default()` before their fields are
/// read. `create = path` names a function
/// `fn(&DeserializationContext<'_>) -> Result<Self, CodecError>` to use
/// instead, which may pull services from the serializer's components.
///
/// ## Skipped Fields
///
/// `#[compact(skip)]` on a field leaves it out of the wire format. On read
/// it keeps whatever the creator produced.
///
/// ## Auto Registration
///
/// With the `auto_register` feature, `#[compact(auto_register)]` submits the
/// codec to a link-time list that `CodecRegistry::auto_register` collects.
#[proc_macro_derive(Compact, attributes(compact))]
pub fn derive_compact(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let derive = match derive_data::CompactDerive::from_input(&ast) {
        Ok(derive) => derive,
        Err(err) => return err.into_compile_error().into(),
    };

    let type_name = derive.attrs.type_name(&derive.ident);
    let ident = &derive.ident;
    let type_path_impl = impls::impl_trait_type_path(
        &derive.codec,
        &quote! { #ident },
        ident,
        derive.attrs.type_path.as_ref(),
        &type_name,
    );
    let typed_impl = impls::impl_trait_typed(&derive);
    let compact_fields_impl = impls::impl_trait_compact_fields(&derive);
    let compact_field_impl = impls::impl_trait_compact_field(&derive);
    let auto_register = impls::get_auto_register_impl(&derive);

    TokenStream::from(quote! {
        const _: () = {
            #type_path_impl

            #typed_impl

            #compact_fields_impl

            #compact_field_impl

            #auto_register
        };
    })
}

/// Makes `dyn Trait` usable as a declared type.
///
/// Implements `TypePath`, `Typed`, `Declared` and `Debug` for `dyn Trait`;
/// `Debug` is left out when the trait already has it as a supertrait. The trait
/// must have `Compact` as a supertrait, and may not be generic.
///
/// ```rust, ignore
/// use pact_codec::{Compact, derive::compact_trait};
///
/// #[compact_trait]
/// trait Shape: Compact {
///     fn area(&self) -> f64;
/// }
///
/// #[compact_trait(type_path = "shapes::Named")]
/// trait Named: Compact {}
/// ```
#[proc_macro_attribute]
pub fn compact_trait(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut attrs = impls::TraitAttributes::default();
    let parser = syn::meta::parser(|meta| attrs.parse_meta(meta));
    parse_macro_input!(args with parser);

    let item = parse_macro_input!(input as ItemTrait);

    match impls::impl_compact_trait(attrs, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
