use std::sync::OnceLock;

use crate::info::{TypeInfo, TypePath};

// -----------------------------------------------------------------------------
// Typed

/// Static access to a type's [`TypeInfo`].
///
/// Implemented by [`#[derive(Compact)]`](crate::derive::Compact) for concrete
/// types and by [`#[compact_trait]`](crate::derive::compact_trait) for trait
/// objects. Hand-written impls should keep the info in a [`TypeInfoCell`]:
///
/// ```
/// use pact_codec::info::{TypeInfo, TypeInfoCell, TypePath, Typed};
///
/// struct Marker;
///
/// impl TypePath for Marker {
///     fn type_path() -> &'static str { "demo::Marker" }
///     fn type_name() -> &'static str { "Marker" }
/// }
///
/// impl Typed for Marker {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: TypeInfoCell = TypeInfoCell::new();
///         CELL.get_or_init(TypeInfo::class::<Self>)
///     }
/// }
///
/// assert_eq!(Marker::type_info().type_path(), "demo::Marker");
/// ```
pub trait Typed: TypePath {
    fn type_info() -> &'static TypeInfo;
}

// -----------------------------------------------------------------------------
// DynamicTyped

/// Object-safe access to [`Typed::type_info`].
///
/// Blanket implemented for every sized [`Typed`] type, so a `dyn Compact`
/// can report its runtime type.
pub trait DynamicTyped {
    fn dyn_type_info(&self) -> &'static TypeInfo;
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn dyn_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }
}

// -----------------------------------------------------------------------------
// TypeInfoCell

/// Lazily initialized storage for a non-generic type's [`TypeInfo`].
pub struct TypeInfoCell(OnceLock<TypeInfo>);

impl TypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored info, building it with `f` on first use.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.0.get_or_init(f)
    }
}
