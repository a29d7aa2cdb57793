use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::CodecError;
use crate::info::{DynamicTyped, TypeInfo, TypeInfoCell, TypePath, Typed};

// -----------------------------------------------------------------------------
// Compact

/// A value that can be written as a compact object.
///
/// Blanket implemented for every [`Typed`] type that is `Send + Sync`, so
/// `#[derive(Compact)]` is all a type needs. `dyn Compact` is the engine's
/// universal object type: every instance can be boxed into it and every
/// type is assignable to it.
///
/// # Examples
///
/// ```
/// use pact_codec::{Compact, derive::Compact};
///
/// #[derive(Compact, Default, Debug, PartialEq)]
/// struct Circle {
///     radius: i32,
/// }
///
/// let object: Box<dyn Compact> = Box::new(Circle { radius: 5 });
/// assert!(object.is::<Circle>());
/// assert_eq!(object.type_info().type_name(), "Circle");
/// assert_eq!(object.take::<Circle>().ok(), Some(Circle { radius: 5 }));
/// ```
pub trait Compact: DynamicTyped + Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Upcasts to the universal object type.
    fn as_compact(&self) -> &dyn Compact;
}

impl<T: Typed + Send + Sync> Compact for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    #[inline]
    fn as_compact(&self) -> &dyn Compact {
        self
    }
}

impl dyn Compact {
    /// The runtime type of this instance.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.dyn_type_info()
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Downcasts the box, handing it back unchanged if `T` is not the
    /// runtime type.
    pub fn downcast<T: Any>(self: Box<Self>) -> Result<Box<T>, Box<dyn Compact>> {
        if !self.is::<T>() {
            return Err(self);
        }
        // `is` has checked the runtime type.
        Ok(self
            .into_any()
            .downcast::<T>()
            .unwrap_or_else(|_| unreachable!()))
    }

    /// Like [`downcast`](Self::downcast), but moves the value out of the box.
    #[inline]
    pub fn take<T: Any>(self: Box<Self>) -> Result<T, Box<dyn Compact>> {
        self.downcast::<T>().map(|value| *value)
    }
}

impl fmt::Debug for dyn Compact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dyn Compact<{}>", self.type_info().type_path())
    }
}

impl TypePath for dyn Compact {
    fn type_path() -> &'static str {
        "pact_codec::Compact"
    }

    fn type_name() -> &'static str {
        "Compact"
    }
}

impl Typed for dyn Compact {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(TypeInfo::abstract_type::<Self>)
    }
}

// -----------------------------------------------------------------------------
// Declared

/// A type that can stand as the declared type of a compact value.
///
/// Covers every sized [`Compact`] type, `dyn Compact`, and every trait
/// annotated with [`#[compact_trait]`](crate::derive::compact_trait). The
/// typed serializer entry points and reference fields such as
/// `Option<Box<dyn Shape>>` are written in terms of it.
pub trait Declared: Typed {
    /// Views a reference as the universal object type.
    fn upcast(this: &Self) -> &dyn Compact;

    /// Recovers `Box<Self>` from a deserialized object.
    ///
    /// Fails with [`CodecError::TypeMismatch`] if the instance is neither
    /// `Self` nor castable to it.
    fn downcast(object: Box<dyn Compact>) -> Result<Box<Self>, CodecError>;
}

impl<T: Typed + Send + Sync> Declared for T {
    #[inline]
    fn upcast(this: &Self) -> &dyn Compact {
        this
    }

    fn downcast(object: Box<dyn Compact>) -> Result<Box<Self>, CodecError> {
        object.downcast::<T>().map_err(|object| CodecError::TypeMismatch {
            key: None,
            expected: T::type_path().into(),
            actual: object.type_info().type_path().into(),
        })
    }
}

impl Declared for dyn Compact {
    #[inline]
    fn upcast(this: &Self) -> &dyn Compact {
        this
    }

    #[inline]
    fn downcast(object: Box<dyn Compact>) -> Result<Box<Self>, CodecError> {
        Ok(object)
    }
}

/// Casts `object` to the trait object `D` through the [`Implements`] entries
/// of its runtime type.
///
/// Used by the `Declared` impls that `#[compact_trait]` generates.
///
/// [`Implements`]: crate::info::Implements
pub fn cast_boxed<D: Typed + ?Sized>(object: Box<dyn Compact>) -> Result<Box<D>, CodecError> {
    let info = object.type_info();
    let mismatch = || CodecError::TypeMismatch {
        key: None,
        expected: D::type_path().into(),
        actual: info.type_path().into(),
    };
    let cast = info
        .cast_to(TypeId::of::<D>(), object.into_any())
        .map_err(|_| mismatch())?;
    cast.downcast::<Box<D>>()
        .map(|boxed| *boxed)
        .map_err(|_| mismatch())
}
