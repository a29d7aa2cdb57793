use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::Compact;
use crate::info::TypeInfo;
use crate::resolver::{ObjectTypeResolver, VoidTypeResolver};

/// An ordered, immutable list of resolvers ending in [`VoidTypeResolver`].
///
/// # Examples
///
/// ```
/// use pact_codec::{Compact, derive::Compact, info::{TypeInfo, Typed}};
/// use pact_codec::resolver::{ObjectTypeResolver, ResolverPipeline};
///
/// #[derive(Compact, Default)]
/// struct Circle;
///
/// let pipeline = ResolverPipeline::new([]);
/// let object = <dyn Compact as Typed>::type_info();
///
/// assert_eq!(pipeline.len(), 1);
/// assert_eq!(pipeline.serialization_type(object, &Circle), object);
/// assert_eq!(pipeline.deserialization_type(object, Circle::type_info()), Circle::type_info());
/// assert!(pipeline.find_materializer(object, Circle::type_info()).is_none());
/// ```
#[derive(Clone)]
pub struct ResolverPipeline {
    resolvers: Arc<[Arc<dyn ObjectTypeResolver>]>,
}

impl ResolverPipeline {
    /// Builds a pipeline from `resolvers` in order, appending the void resolver.
    pub fn new(resolvers: impl IntoIterator<Item = Arc<dyn ObjectTypeResolver>>) -> Self {
        let mut list: Vec<Arc<dyn ObjectTypeResolver>> = resolvers.into_iter().collect();
        list.push(Arc::new(VoidTypeResolver));
        Self {
            resolvers: list.into(),
        }
    }

    /// The first resolver answer that is not `declared`, or `declared`.
    pub fn serialization_type(
        &self,
        declared: &'static TypeInfo,
        instance: &dyn Compact,
    ) -> &'static TypeInfo {
        self.resolvers
            .iter()
            .map(|resolver| resolver.serialization_type(declared, instance))
            .find(|ty| *ty != declared)
            .unwrap_or(declared)
    }

    /// The first resolver answer that is not `declared`, or `declared`.
    pub fn deserialization_type(
        &self,
        declared: &'static TypeInfo,
        serialized: &'static TypeInfo,
    ) -> &'static TypeInfo {
        self.resolvers
            .iter()
            .map(|resolver| resolver.deserialization_type(declared, serialized))
            .find(|ty| *ty != declared)
            .unwrap_or(declared)
    }

    /// The first resolver willing to materialize `serialized`.
    pub fn find_materializer(
        &self,
        declared: &'static TypeInfo,
        serialized: &'static TypeInfo,
    ) -> Option<&dyn ObjectTypeResolver> {
        self.resolvers
            .iter()
            .find(|resolver| resolver.can_materialize(declared, serialized))
            .map(|resolver| &**resolver)
    }

    /// The number of resolvers, including the void resolver.
    #[inline]
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &dyn ObjectTypeResolver> {
        self.resolvers.iter().map(|resolver| &**resolver)
    }
}

impl Default for ResolverPipeline {
    fn default() -> Self {
        Self::new([])
    }
}

impl fmt::Debug for ResolverPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverPipeline")
            .field("len", &self.resolvers.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
