use alloc::boxed::Box;
use core::fmt;
use std::sync::{PoisonError, RwLock};

use pact_utils::TypeIdMap;

use crate::CodecError;
use crate::info::TypeInfo;
use crate::registry::{CodecProvider, CompactFields, FromType, StructCodec, TypeCodec};
use crate::registry::{DefaultCreator, TypeReader, TypeWriter};
use crate::registry::{StructDefaultCreator, StructTypeReader, StructTypeWriter};

/// Memoizes the codecs of reference types.
///
/// The provider is asked for a type the first time any of its callables is
/// requested, and the answer is kept for the lifetime of the cache. Two
/// threads missing on the same type at once may both ask the provider; the
/// first entry inserted wins.
///
/// Value-type codecs are monomorphized per `T`, so the struct getters
/// return the same function pointers on every call without a lookup.
///
/// # Examples
///
/// ```
/// use pact_codec::{derive::Compact, info::Typed};
/// use pact_codec::registry::{CodecCache, CodecRegistry};
///
/// #[derive(Compact, Default)]
/// struct Circle {
///     radius: i32,
/// }
///
/// let mut registry = CodecRegistry::new();
/// registry.register::<Circle>();
/// let cache = CodecCache::new(registry);
///
/// assert!(!cache.is_cached(Circle::type_info()));
/// cache.get_type_writer(Circle::type_info()).unwrap();
/// assert!(cache.is_cached(Circle::type_info()));
/// ```
pub struct CodecCache {
    provider: Box<dyn CodecProvider>,
    codecs: RwLock<TypeIdMap<TypeCodec>>,
}

impl CodecCache {
    #[inline]
    pub fn new(provider: impl CodecProvider) -> Self {
        Self::from_boxed(Box::new(provider))
    }

    pub fn from_boxed(provider: Box<dyn CodecProvider>) -> Self {
        Self {
            provider,
            codecs: RwLock::new(TypeIdMap::new()),
        }
    }

    /// The memoized codec of `info`.
    pub fn get_codec(&self, info: &'static TypeInfo) -> Result<TypeCodec, CodecError> {
        let cached = self
            .codecs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&info.type_id())
            .copied();
        if let Some(codec) = cached {
            return Ok(codec);
        }

        let codec = self
            .provider
            .codec(info)
            .ok_or_else(|| CodecError::MissingCodec {
                type_path: info.type_path().into(),
            })?;
        log::debug!("built compact codec for `{}`", info.type_path());

        let mut codecs = self.codecs.write().unwrap_or_else(PoisonError::into_inner);
        Ok(*codecs.get_or_insert(info.type_id(), || codec))
    }

    #[inline]
    pub fn get_default_creator(&self, info: &'static TypeInfo) -> Result<DefaultCreator, CodecError> {
        self.get_codec(info).map(|codec| codec.creator())
    }

    #[inline]
    pub fn get_type_writer(&self, info: &'static TypeInfo) -> Result<TypeWriter, CodecError> {
        self.get_codec(info).map(|codec| codec.writer())
    }

    #[inline]
    pub fn get_type_reader(&self, info: &'static TypeInfo) -> Result<TypeReader, CodecError> {
        self.get_codec(info).map(|codec| codec.reader())
    }

    #[inline]
    pub fn get_struct_codec<T: CompactFields>(&self) -> StructCodec<T> {
        <StructCodec<T> as FromType<T>>::from_type()
    }

    #[inline]
    pub fn get_struct_default_creator<T: CompactFields>(&self) -> StructDefaultCreator<T> {
        self.get_struct_codec::<T>().creator()
    }

    #[inline]
    pub fn get_struct_type_writer<T: CompactFields>(&self) -> StructTypeWriter<T> {
        self.get_struct_codec::<T>().writer()
    }

    #[inline]
    pub fn get_struct_type_reader<T: CompactFields>(&self) -> StructTypeReader<T> {
        self.get_struct_codec::<T>().reader()
    }

    /// Whether the codec of `info` has already been built.
    pub fn is_cached(&self, info: &TypeInfo) -> bool {
        self.codecs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&info.type_id())
    }

    /// The number of codecs built so far.
    pub fn len(&self) -> usize {
        self.codecs.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl fmt::Debug for CodecCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecCache")
            .field("len", &self.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    use super::*;
    use crate::derive::Compact;
    use crate::info::Typed;
    use crate::registry::CodecRegistry;

    #[derive(Compact, Default)]
    struct Leaf {
        value: u8,
    }

    #[derive(Compact, Default)]
    struct Unregistered;

    fn counting_provider() -> (Arc<AtomicUsize>, impl CodecProvider) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut registry = CodecRegistry::empty();
        registry.register::<Leaf>();
        let provider = move |info: &'static TypeInfo| {
            counter.fetch_add(1, Ordering::Relaxed);
            registry.codec(info)
        };
        (calls, provider)
    }

    #[test]
    fn provider_is_asked_once() {
        let (calls, provider) = counting_provider();
        let cache = CodecCache::new(provider);

        cache.get_default_creator(Leaf::type_info()).unwrap();
        cache.get_type_writer(Leaf::type_info()).unwrap();
        cache.get_type_reader(Leaf::type_info()).unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn missing_codec_is_not_cached() {
        let (calls, provider) = counting_provider();
        let cache = CodecCache::new(provider);

        for _ in 0..2 {
            assert!(matches!(
                cache.get_type_writer(Unregistered::type_info()),
                Err(CodecError::MissingCodec { .. })
            ));
        }
        assert_eq!(calls.load(Ordering::Relaxed), 2);
        assert!(!cache.is_cached(Unregistered::type_info()));
    }

    #[test]
    fn writer_rejects_foreign_instance() {
        let (_, provider) = counting_provider();
        let cache = CodecCache::new(provider);
        let codec = cache.get_codec(Leaf::type_info()).unwrap();

        let mut bytes = Vec::new();
        let serializer = crate::CompactSerializer::new(CodecRegistry::new());
        let mut dictionary = crate::CompactDictionary::new();
        let mut ctx = crate::SerializationContext::new(
            &serializer,
            &mut dictionary,
            crate::io::CompactWriter::new(&mut bytes),
        );
        let result = (codec.writer())(&mut ctx, &Unregistered);
        assert!(matches!(result, Err(CodecError::TypeMismatch { .. })));
    }

    #[test]
    fn shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CodecCache>();
        assert_send_sync::<crate::CompactSerializer>();
    }

    #[test]
    fn concurrent_first_use_keeps_one_entry() {
        const THREADS: usize = 8;

        let (calls, provider) = counting_provider();
        let cache = CodecCache::new(provider);
        let barrier = Barrier::new(THREADS);

        let writers: Vec<TypeWriter> = thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        cache.get_type_writer(Leaf::type_info()).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });

        assert_eq!(cache.len(), 1);
        assert!(cache.is_cached(Leaf::type_info()));
        assert!(calls.load(Ordering::Relaxed) >= 1);
        assert!(
            writers
                .iter()
                .all(|writer| core::ptr::fn_addr_eq(*writer, writers[0]))
        );
    }
}
