// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod compact_trait;
mod trait_compact_field;
mod trait_compact_fields;
mod trait_type_path;
mod trait_typed;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use auto_register::get_auto_register_impl;
pub(crate) use compact_trait::{TraitAttributes, impl_compact_trait};
pub(crate) use trait_compact_field::impl_trait_compact_field;
pub(crate) use trait_compact_fields::impl_trait_compact_fields;
pub(crate) use trait_type_path::impl_trait_type_path;
pub(crate) use trait_typed::impl_trait_typed;
