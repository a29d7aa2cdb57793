use alloc::string::String;
use core::any::TypeId;
use core::fmt;

use pact_utils::TypeIdMap;
use pact_utils::hash::HashMap;

use crate::info::TypeInfo;
use crate::registry::{CompactFields, FromType, TypeCodec};

// -----------------------------------------------------------------------------
// CodecProvider

/// Produces the codec of a reference type on request.
///
/// The [`CodecCache`](crate::registry::CodecCache) calls a provider at most
/// once per type under normal operation. Closures work as providers:
///
/// ```
/// use pact_codec::info::TypeInfo;
/// use pact_codec::registry::{CodecProvider, TypeCodec};
///
/// let nothing = |_: &'static TypeInfo| -> Option<TypeCodec> { None };
/// let provider: &dyn CodecProvider = &nothing;
/// ```
pub trait CodecProvider: Send + Sync + 'static {
    fn codec(&self, info: &'static TypeInfo) -> Option<TypeCodec>;
}

impl<F> CodecProvider for F
where
    F: Fn(&'static TypeInfo) -> Option<TypeCodec> + Send + Sync + 'static,
{
    #[inline]
    fn codec(&self, info: &'static TypeInfo) -> Option<TypeCodec> {
        self(info)
    }
}

// -----------------------------------------------------------------------------
// CodecRegistry

/// A [`CodecProvider`] over explicitly registered types.
///
/// Registration only stores a constructor function; nothing about the type,
/// not even its [`TypeInfo`], is built until the codec is requested.
///
/// # Examples
///
/// ```
/// use pact_codec::{derive::Compact, info::Typed};
/// use pact_codec::registry::{CodecProvider, CodecRegistry};
///
/// #[derive(Compact, Default)]
/// #[compact(type_path = "shapes::Circle")]
/// struct Circle {
///     radius: i32,
/// }
///
/// let mut registry = CodecRegistry::new();
/// registry.register::<Circle>();
///
/// assert!(registry.contains::<Circle>());
/// assert!(registry.contains::<String>());
/// assert!(registry.get_with_type_path("shapes::Circle").is_some());
/// assert!(registry.codec(Circle::type_info()).is_some());
/// ```
pub struct CodecRegistry {
    codecs: TypeIdMap<fn() -> TypeCodec>,
    type_paths: HashMap<&'static str, TypeId>,
    auto_registered: bool,
}

impl CodecRegistry {
    /// A registry without any type.
    pub fn empty() -> Self {
        Self {
            codecs: TypeIdMap::new(),
            type_paths: HashMap::default(),
            auto_registered: false,
        }
    }

    /// A registry holding the builtin types.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<String>();
        registry
    }

    /// Registers `T`, replacing any codec registered for it before.
    pub fn register<T: CompactFields>(&mut self) {
        self.register_with(
            TypeId::of::<T>(),
            T::type_path(),
            <TypeCodec as FromType<T>>::from_type,
        );
    }

    /// Registers a codec constructor under an explicit id and path.
    pub fn register_with(
        &mut self,
        type_id: TypeId,
        type_path: &'static str,
        codec: fn() -> TypeCodec,
    ) {
        self.codecs.insert(type_id, codec);
        self.type_paths.insert(type_path, type_id);
    }

    /// Registers every type annotated with `#[compact(auto_register)]`.
    ///
    /// Returns `true` if link-time collection works on this platform. Calls
    /// after the first successful one do nothing. Always `false` without the
    /// `auto_register` feature.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pact_codec::derive::Compact;
    /// use pact_codec::registry::CodecRegistry;
    ///
    /// #[derive(Compact, Default)]
    /// #[compact(auto_register)]
    /// struct Circle {
    ///     radius: i32,
    /// }
    ///
    /// let mut registry = CodecRegistry::empty();
    /// assert!(registry.auto_register());
    /// assert!(registry.contains::<Circle>());
    /// ```
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        if !self.auto_registered {
            crate::__macro_exports::auto_register::__register_types(self);
        }
        self.auto_registered
    }

    #[cfg(feature = "auto_register")]
    pub(crate) fn mark_auto_registered(&mut self) {
        self.auto_registered = true;
    }

    #[inline]
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.codecs.contains_type::<T>()
    }

    #[inline]
    pub fn contains_id(&self, type_id: TypeId) -> bool {
        self.codecs.contains(&type_id)
    }

    /// Finds a registered type by its [`TypePath::type_path`](crate::info::TypePath::type_path).
    pub fn get_with_type_path(&self, type_path: &str) -> Option<TypeId> {
        self.type_paths.get(type_path).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// The registered type paths, in arbitrary order.
    pub fn type_paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.type_paths.keys().copied()
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecProvider for CodecRegistry {
    fn codec(&self, info: &'static TypeInfo) -> Option<TypeCodec> {
        self.codecs.get(&info.type_id()).map(|build| build())
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.type_paths.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::Compact;
    use crate::info::Typed;

    #[derive(Compact, Default)]
    #[compact(type_path = "registry::tests::Node")]
    struct Node {
        id: u32,
    }

    #[test]
    fn empty_registry_has_no_builtins() {
        let registry = CodecRegistry::empty();
        assert_eq!(registry.len(), 0);
        assert!(registry.codec(String::type_info()).is_none());
    }

    #[test]
    fn register_by_path() {
        let mut registry = CodecRegistry::empty();
        registry.register::<Node>();
        registry.register::<Node>();

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get_with_type_path("registry::tests::Node"),
            Some(TypeId::of::<Node>())
        );
        let codec = registry.codec(Node::type_info()).unwrap();
        assert_eq!(codec.info(), Node::type_info());
    }
}
