use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::io::DEFAULT_MAX_LENGTH;
use crate::registry::{CodecCache, CodecProvider};
use crate::resolver::{ObjectTypeResolver, ResolverPipeline};
use crate::{CompactSerializer, Components};

// -----------------------------------------------------------------------------
// CompactConfig

/// Limits applied while reading and writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactConfig {
    /// The deepest nesting of objects and value types accepted, counting the
    /// top-level value.
    pub max_depth: usize,
    /// The largest length prefix of a string or sequence. Enforced on both
    /// write and read.
    pub max_length: usize,
}

impl CompactConfig {
    pub const DEFAULT: Self = Self {
        max_depth: 128,
        max_length: DEFAULT_MAX_LENGTH,
    };
}

impl Default for CompactConfig {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

// -----------------------------------------------------------------------------
// CompactSerializerBuilder

/// Configures a [`CompactSerializer`].
///
/// # Examples
///
/// ```
/// use pact_codec::{CompactSerializer, resolver::VoidTypeResolver};
/// use pact_codec::registry::CodecRegistry;
///
/// struct Clock;
///
/// let serializer = CompactSerializer::builder(CodecRegistry::new())
///     .resolver(VoidTypeResolver)
///     .component(Clock)
///     .max_depth(16)
///     .build();
///
/// assert_eq!(serializer.resolvers().len(), 2);
/// assert!(serializer.components().contains::<Clock>());
/// assert_eq!(serializer.config().max_depth, 16);
/// ```
pub struct CompactSerializerBuilder {
    provider: Box<dyn CodecProvider>,
    resolvers: Vec<Arc<dyn ObjectTypeResolver>>,
    components: Components,
    config: CompactConfig,
}

impl CompactSerializerBuilder {
    pub fn new(provider: impl CodecProvider) -> Self {
        Self {
            provider: Box::new(provider),
            resolvers: Vec::new(),
            components: Components::new(),
            config: CompactConfig::DEFAULT,
        }
    }

    /// Appends a resolver. Earlier resolvers take precedence.
    #[inline]
    pub fn resolver(self, resolver: impl ObjectTypeResolver) -> Self {
        self.shared_resolver(Arc::new(resolver))
    }

    /// Appends a resolver that is also used elsewhere.
    pub fn shared_resolver(mut self, resolver: Arc<dyn ObjectTypeResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    /// Installs a component for creators and readers.
    pub fn component<T: Any + Send + Sync>(mut self, component: T) -> Self {
        self.components.insert(component);
        self
    }

    /// Replaces all components.
    pub fn components(mut self, components: Components) -> Self {
        self.components = components;
        self
    }

    pub fn config(mut self, config: CompactConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.config.max_length = max_length;
        self
    }

    pub fn build(self) -> CompactSerializer {
        CompactSerializer {
            codecs: CodecCache::from_boxed(self.provider),
            resolvers: ResolverPipeline::new(self.resolvers),
            components: self.components,
            config: self.config,
        }
    }
}

impl fmt::Debug for CompactSerializerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompactSerializerBuilder")
            .field("resolvers", &self.resolvers.len())
            .field("components", &self.components)
            .field("config", &self.config)
            .finish()
    }
}
