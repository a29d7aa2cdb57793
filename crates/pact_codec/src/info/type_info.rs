use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use crate::Compact;
use crate::info::{Type, TypePath, Typed};

// -----------------------------------------------------------------------------
// TypeKind

/// How a type takes part in the wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A concrete reference type: written behind an indicator byte and
    /// constructed through its default creator.
    Class,
    /// A trait object or other interface. Usable as a declared type but
    /// never constructed.
    Abstract,
    /// A value type, written inline through the struct path.
    Value,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Class => "class",
            Self::Abstract => "abstract",
            Self::Value => "value",
        })
    }
}

// -----------------------------------------------------------------------------
// Implements

/// A cast from a boxed concrete instance to a boxed trait object.
///
/// The cast receives the instance as `Box<dyn Any>` and on success returns
/// `Box<Box<dyn Trait>>` erased as `Box<dyn Any>`. On failure the input is
/// handed back unchanged.
pub type ImplementsCast = fn(Box<dyn Any>) -> Result<Box<dyn Any>, Box<dyn Any>>;

/// An abstract type implemented by a concrete type.
#[derive(Clone, Copy)]
pub struct Implements {
    info: fn() -> &'static TypeInfo,
    type_id: TypeId,
    cast: ImplementsCast,
}

impl Implements {
    /// Declares that the owner implements `D`.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::any::Any;
    /// use pact_codec::{Compact, derive::{Compact, compact_trait}, info::{Implements, Typed}};
    ///
    /// #[compact_trait]
    /// trait Shape: Compact {}
    ///
    /// #[derive(Compact, Default)]
    /// struct Dot;
    /// impl Shape for Dot {}
    ///
    /// let implements = Implements::new::<dyn Shape>(|any| {
    ///     let dot = any.downcast::<Dot>()?;
    ///     let shape: Box<dyn Shape> = dot;
    ///     Ok(Box::new(shape) as Box<dyn Any>)
    /// });
    /// assert!(implements.is::<dyn Shape>());
    /// ```
    #[inline]
    pub fn new<D: Typed + ?Sized>(cast: ImplementsCast) -> Self {
        Self {
            info: D::type_info,
            type_id: TypeId::of::<D>(),
            cast,
        }
    }

    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        (self.info)()
    }

    #[inline]
    pub fn is<D: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<D>()
    }
}

impl fmt::Debug for Implements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().type_path())
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Static metadata for one type.
///
/// Built once per type and stored in a
/// [`TypeInfoCell`](crate::info::TypeInfoCell). Base types and implemented
/// types are referenced through function pointers, so self-referential and
/// mutually recursive types need no special care.
///
/// # Examples
///
/// ```
/// use pact_codec::{Compact, derive::{Compact, compact_trait}, info::{TypeKind, Typed}};
///
/// #[compact_trait]
/// trait Shape: Compact {}
///
/// #[derive(Compact, Default)]
/// #[compact(implements(dyn Shape))]
/// struct Circle {
///     radius: i32,
/// }
/// impl Shape for Circle {}
///
/// let info = Circle::type_info();
/// assert_eq!(info.kind(), TypeKind::Class);
/// assert_eq!(info.fields(), &["radius"]);
/// assert!(info.is_assignable_to(<dyn Shape>::type_info()));
/// assert!(!<dyn Shape>::type_info().is_assignable_to(info));
/// ```
pub struct TypeInfo {
    ty: Type,
    kind: TypeKind,
    base: Option<fn() -> &'static TypeInfo>,
    implements: Vec<Implements>,
    fields: &'static [&'static str],
}

impl TypeInfo {
    const fn new(ty: Type, kind: TypeKind) -> Self {
        Self {
            ty,
            kind,
            base: None,
            implements: Vec::new(),
            fields: &[],
        }
    }

    /// Info for a concrete reference type.
    #[inline]
    pub fn class<T: TypePath>() -> Self {
        Self::new(Type::of::<T>(), TypeKind::Class)
    }

    /// Info for a value type.
    #[inline]
    pub fn value<T: TypePath>() -> Self {
        Self::new(Type::of::<T>(), TypeKind::Value)
    }

    /// Info for an abstract type, usually a trait object.
    #[inline]
    pub fn abstract_type<T: TypePath + ?Sized>() -> Self {
        Self::new(Type::of::<T>(), TypeKind::Abstract)
    }

    /// Sets the base type.
    #[inline]
    pub fn with_base<B: Typed + ?Sized>(mut self) -> Self {
        self.base = Some(B::type_info);
        self
    }

    /// Adds an implemented abstract type.
    #[inline]
    pub fn with_implements(mut self, implements: Implements) -> Self {
        self.implements.push(implements);
        self
    }

    /// Sets the names of the persisted fields, in wire order.
    #[inline]
    pub fn with_fields(mut self, fields: &'static [&'static str]) -> Self {
        self.fields = fields;
        self
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty.path()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty.name()
    }

    #[inline]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    #[inline]
    pub fn is_value_type(&self) -> bool {
        self.kind == TypeKind::Value
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.ty.is::<T>()
    }

    pub fn base(&self) -> Option<&'static TypeInfo> {
        self.base.map(|base| base())
    }

    pub fn implements(&self) -> &[Implements] {
        &self.implements
    }

    pub fn fields(&self) -> &'static [&'static str] {
        self.fields
    }

    /// Returns `true` if a value of this type may stand where `ancestor` is
    /// expected.
    ///
    /// That holds for the type itself, for the universal ancestor
    /// `dyn Compact`, and for anything reachable through the base chain or
    /// the implemented abstract types.
    pub fn is_assignable_to(&self, ancestor: &TypeInfo) -> bool {
        if self.ty == ancestor.ty || ancestor.is::<dyn Compact>() {
            return true;
        }
        if self
            .implements
            .iter()
            .any(|implements| implements.info().is_assignable_to(ancestor))
        {
            return true;
        }
        self.base().is_some_and(|base| base.is_assignable_to(ancestor))
    }

    /// Runs the cast registered for `target` on `instance`.
    ///
    /// Only this type's own [`Implements`] entries are searched. A derived
    /// type that must be cast to an abstract type declares it itself.
    pub(crate) fn cast_to(
        &self,
        target: TypeId,
        instance: Box<dyn Any>,
    ) -> Result<Box<dyn Any>, Box<dyn Any>> {
        match self.implements.iter().find(|i| i.type_id == target) {
            Some(implements) => (implements.cast)(instance),
            None => Err(instance),
        }
    }
}

impl PartialEq for TypeInfo {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
    }
}

impl Eq for TypeInfo {}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type_path", &self.type_path())
            .field("kind", &self.kind)
            .field("base", &self.base().map(TypeInfo::type_path))
            .field("implements", &self.implements)
            .field("fields", &self.fields)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
