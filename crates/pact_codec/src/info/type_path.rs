use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// TypePath

/// Stable names for a type.
///
/// Unlike [`core::any::type_name`], these strings are part of the type's
/// contract and do not change between compiler versions. They appear in error
/// messages and logs; the wire format never contains them.
///
/// Usually implemented by [`#[derive(Compact)]`](crate::derive::Compact) or
/// [`#[compact_trait]`](crate::derive::compact_trait).
///
/// # Examples
///
/// ```
/// use pact_codec::{derive::Compact, info::TypePath};
///
/// #[derive(Compact, Default)]
/// #[compact(type_path = "shapes::Circle")]
/// struct Circle {
///     radius: i32,
/// }
///
/// assert_eq!(Circle::type_path(), "shapes::Circle");
/// assert_eq!(Circle::type_name(), "Circle");
/// ```
pub trait TypePath: 'static {
    /// The full path, unique per type, without a leading `::`.
    fn type_path() -> &'static str;

    /// The last segment of [`type_path`](TypePath::type_path).
    fn type_name() -> &'static str;
}

// -----------------------------------------------------------------------------
// TypePathTable

/// Function pointers to a type's [`TypePath`] methods.
#[derive(Clone, Copy)]
pub struct TypePathTable {
    type_path: fn() -> &'static str,
    type_name: fn() -> &'static str,
}

impl TypePathTable {
    #[inline]
    pub const fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            type_path: T::type_path,
            type_name: T::type_name,
        }
    }

    #[inline(always)]
    pub fn path(&self) -> &'static str {
        (self.type_path)()
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        (self.type_name)()
    }
}

impl fmt::Debug for TypePathTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypePathTable")
            .field("type_path", &self.path())
            .field("type_name", &self.name())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Type

/// A [`TypeId`] together with the type's [`TypePath`] names.
///
/// Equality and hashing only look at the `TypeId`.
///
/// # Examples
///
/// ```
/// use pact_codec::info::Type;
///
/// let ty = Type::of::<String>();
/// assert!(ty.is::<String>());
/// assert_eq!(ty.path(), "alloc::string::String");
/// ```
#[derive(Clone, Copy)]
pub struct Type {
    type_path_table: TypePathTable,
    type_id: TypeId,
}

impl Type {
    #[inline]
    pub const fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            type_path_table: TypePathTable::of::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.type_id
    }

    /// Checks the `TypeId` against `T`.
    #[inline(always)]
    pub fn is<T: Any + ?Sized>(&self) -> bool {
        TypeId::of::<T>() == self.type_id
    }

    #[inline(always)]
    pub const fn path_table(&self) -> TypePathTable {
        self.type_path_table
    }

    #[inline]
    pub fn path(&self) -> &'static str {
        self.type_path_table.path()
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.type_path_table.name()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
