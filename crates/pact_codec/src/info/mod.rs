//! Static type metadata.
//!
//! Every type that crosses the wire exposes a [`TypeInfo`] through [`Typed`]:
//! its kind, its base type, the abstract types it implements and the names
//! of its persisted fields. Ancestry checks during reads and writes go
//! through [`TypeInfo::is_assignable_to`].

// -----------------------------------------------------------------------------
// Modules

mod type_info;
mod type_path;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use type_info::{Implements, TypeInfo, TypeKind};
pub use type_path::{Type, TypePath, TypePathTable};
pub use typed::{DynamicTyped, TypeInfoCell, Typed};
