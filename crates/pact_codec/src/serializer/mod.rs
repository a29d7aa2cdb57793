//! The compact serializer: the public entry point of the engine.

// -----------------------------------------------------------------------------
// Modules

mod builder;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Exports

pub use builder::{CompactConfig, CompactSerializerBuilder};

use alloc::boxed::Box;
use alloc::vec::Vec;
use std::io::{Read, Write};

use crate::info::TypeInfo;
use crate::io::{CompactReader, CompactWriter, ObjectHeader};
use crate::object::Declared;
use crate::registry::{CodecCache, CodecProvider, CompactFields};
use crate::resolver::ResolverPipeline;
use crate::{CodecError, Compact, CompactDictionary, Components};
use crate::{DeserializationContext, SerializationContext};

// -----------------------------------------------------------------------------
// CompactSerializer

/// Reads and writes object graphs in the compact binary format.
///
/// Every reference-typed value is preceded by an indicator byte. When the
/// written type differs from the declared type, a 16-bit key from the
/// [`CompactDictionary`] follows, so the reader can construct the right
/// type. The dictionary is passed explicitly to every call and must hold the
/// same keys on both ends.
///
/// Each operation comes as a typed wrapper (`*_of`) and an untyped form
/// taking the declared [`TypeInfo`]. The `get_*` forms work on byte buffers
/// and produce exactly what the stream forms produce.
///
/// # Examples
///
/// ```
/// use pact_codec::{Compact, CompactDictionary, CompactSerializer};
/// use pact_codec::derive::{Compact, compact_trait};
/// use pact_codec::registry::CodecRegistry;
///
/// #[compact_trait]
/// trait Shape: Compact {}
///
/// #[derive(Compact, Default, Debug, PartialEq)]
/// #[compact(implements(dyn Shape))]
/// struct Circle {
///     radius: i32,
/// }
/// impl Shape for Circle {}
///
/// let mut registry = CodecRegistry::new();
/// registry.register::<Circle>();
/// let serializer = CompactSerializer::new(registry);
///
/// let mut dictionary = CompactDictionary::new();
/// let shape: Box<dyn Shape> = Box::new(Circle { radius: 5 });
/// let bytes = serializer
///     .get_bytes_of::<dyn Shape>(Some(&*shape), &mut dictionary)
///     .unwrap();
/// assert_eq!(bytes, [2, 1, 0, 5, 0, 0, 0]);
///
/// let shape = serializer
///     .get_object_of::<dyn Shape>(&bytes, &dictionary)
///     .unwrap()
///     .unwrap();
/// let object: Box<dyn Compact> = shape;
/// assert_eq!(object.take::<Circle>().ok(), Some(Circle { radius: 5 }));
/// ```
pub struct CompactSerializer {
    codecs: CodecCache,
    resolvers: ResolverPipeline,
    components: Components,
    config: CompactConfig,
}

impl CompactSerializer {
    /// A serializer with the default configuration and no resolver besides
    /// the void resolver.
    #[inline]
    pub fn new(provider: impl CodecProvider) -> Self {
        Self::builder(provider).build()
    }

    #[inline]
    pub fn builder(provider: impl CodecProvider) -> CompactSerializerBuilder {
        CompactSerializerBuilder::new(provider)
    }

    #[inline]
    pub fn codecs(&self) -> &CodecCache {
        &self.codecs
    }

    #[inline]
    pub fn resolvers(&self) -> &ResolverPipeline {
        &self.resolvers
    }

    #[inline]
    pub fn components(&self) -> &Components {
        &self.components
    }

    #[inline]
    pub fn config(&self) -> &CompactConfig {
        &self.config
    }

    fn reader<'a>(&self, input: &'a mut dyn Read) -> CompactReader<'a> {
        CompactReader::new(input).with_max_length(self.config.max_length)
    }

    fn writer<'a>(&self, output: &'a mut dyn Write) -> CompactWriter<'a> {
        CompactWriter::new(output).with_max_length(self.config.max_length)
    }

    // -------------------------------------------------------------------------
    // Object writes

    /// Writes `object` as a `declared` value to a fresh buffer.
    pub fn get_bytes(
        &self,
        declared: &'static TypeInfo,
        object: Option<&dyn Compact>,
        dictionary: &mut CompactDictionary,
    ) -> Result<Vec<u8>, CodecError> {
        let mut bytes = Vec::new();
        self.write_object(declared, object, &mut bytes, dictionary)?;
        Ok(bytes)
    }

    /// Writes `object` as a `declared` value to `output`.
    pub fn write_object(
        &self,
        declared: &'static TypeInfo,
        object: Option<&dyn Compact>,
        output: &mut dyn Write,
        dictionary: &mut CompactDictionary,
    ) -> Result<(), CodecError> {
        self.write_object_to(declared, object, &mut self.writer(output), dictionary)
    }

    /// Writes `object` as a `declared` value through an existing writer.
    pub fn write_object_to(
        &self,
        declared: &'static TypeInfo,
        object: Option<&dyn Compact>,
        writer: &mut CompactWriter<'_>,
        dictionary: &mut CompactDictionary,
    ) -> Result<(), CodecError> {
        SerializationContext::new(self, dictionary, writer.reborrow()).write_object(declared, object)
    }

    pub fn get_bytes_of<T: Declared + ?Sized>(
        &self,
        object: Option<&T>,
        dictionary: &mut CompactDictionary,
    ) -> Result<Vec<u8>, CodecError> {
        self.get_bytes(T::type_info(), object.map(T::upcast), dictionary)
    }

    pub fn write_object_of<T: Declared + ?Sized>(
        &self,
        object: Option<&T>,
        output: &mut dyn Write,
        dictionary: &mut CompactDictionary,
    ) -> Result<(), CodecError> {
        self.write_object(T::type_info(), object.map(T::upcast), output, dictionary)
    }

    // -------------------------------------------------------------------------
    // Object reads

    /// Reads a `declared` value from `bytes`.
    pub fn get_object(
        &self,
        declared: &'static TypeInfo,
        mut bytes: &[u8],
        dictionary: &CompactDictionary,
    ) -> Result<Option<Box<dyn Compact>>, CodecError> {
        self.read_object(declared, &mut bytes, dictionary)
    }

    /// Reads a `declared` value from `input`.
    pub fn read_object(
        &self,
        declared: &'static TypeInfo,
        input: &mut dyn Read,
        dictionary: &CompactDictionary,
    ) -> Result<Option<Box<dyn Compact>>, CodecError> {
        self.read_object_from(declared, &mut self.reader(input), dictionary)
    }

    /// Reads a `declared` value through an existing reader.
    pub fn read_object_from(
        &self,
        declared: &'static TypeInfo,
        reader: &mut CompactReader<'_>,
        dictionary: &CompactDictionary,
    ) -> Result<Option<Box<dyn Compact>>, CodecError> {
        DeserializationContext::new(self, dictionary, reader.reborrow()).read_object(declared)
    }

    pub fn get_object_of<T: Declared + ?Sized>(
        &self,
        bytes: &[u8],
        dictionary: &CompactDictionary,
    ) -> Result<Option<Box<T>>, CodecError> {
        self.get_object(T::type_info(), bytes, dictionary)?
            .map(T::downcast)
            .transpose()
    }

    pub fn read_object_of<T: Declared + ?Sized>(
        &self,
        input: &mut dyn Read,
        dictionary: &CompactDictionary,
    ) -> Result<Option<Box<T>>, CodecError> {
        self.read_object(T::type_info(), input, dictionary)?
            .map(T::downcast)
            .transpose()
    }

    // -------------------------------------------------------------------------
    // Value types

    pub fn get_struct_bytes<T: CompactFields>(
        &self,
        value: &T,
        dictionary: &mut CompactDictionary,
    ) -> Result<Vec<u8>, CodecError> {
        let mut bytes = Vec::new();
        self.write_struct(value, &mut bytes, dictionary)?;
        Ok(bytes)
    }

    /// Writes a value type inline, without object header.
    pub fn write_struct<T: CompactFields>(
        &self,
        value: &T,
        output: &mut dyn Write,
        dictionary: &mut CompactDictionary,
    ) -> Result<(), CodecError> {
        SerializationContext::new(self, dictionary, self.writer(output)).write_struct(value)
    }

    pub fn get_struct<T: CompactFields>(
        &self,
        mut bytes: &[u8],
        dictionary: &CompactDictionary,
    ) -> Result<T, CodecError> {
        self.read_struct(&mut bytes, dictionary)
    }

    pub fn read_struct<T: CompactFields>(
        &self,
        input: &mut dyn Read,
        dictionary: &CompactDictionary,
    ) -> Result<T, CodecError> {
        DeserializationContext::new(self, dictionary, self.reader(input)).read_struct()
    }

    // -------------------------------------------------------------------------
    // Protocol

    pub(crate) fn write_object_in(
        &self,
        ctx: &mut SerializationContext<'_>,
        declared: &'static TypeInfo,
        object: Option<&dyn Compact>,
    ) -> Result<(), CodecError> {
        validate_reference_type(declared)?;

        let Some(object) = object else {
            return ctx.output().write_header(ObjectHeader::Null);
        };

        // A missing codec must leave both the output and the dictionary untouched.
        let writer = self.codecs.get_type_writer(object.type_info())?;

        let resolved = self.resolvers.serialization_type(declared, object);
        let header = match ctx
            .dictionary_mut()
            .should_write_type_key(object, declared, resolved)?
        {
            Some(key) => ObjectHeader::WithTypeKey(key),
            None => ObjectHeader::NotNull,
        };

        ctx.output().write_header(header)?;
        writer(ctx, object)
    }

    pub(crate) fn read_object_in(
        &self,
        ctx: &mut DeserializationContext<'_>,
        declared: &'static TypeInfo,
    ) -> Result<Option<Box<dyn Compact>>, CodecError> {
        validate_reference_type(declared)?;

        let serialized = match ctx.input().read_header()? {
            ObjectHeader::Null => return Ok(None),
            ObjectHeader::NotNull => declared,
            ObjectHeader::WithTypeKey(key) => ctx.dictionary().lookup_type(key, declared)?,
        };

        let mut instance = match self.resolvers.find_materializer(declared, serialized) {
            Some(resolver) => {
                log::debug!(
                    "materializing `{}` declared as `{}`",
                    serialized.type_path(),
                    declared.type_path()
                );
                resolver.materialize(declared, serialized)?
            }
            None => {
                let target = self.resolvers.deserialization_type(declared, serialized);
                let creator = self.codecs.get_default_creator(target)?;
                creator(ctx)?
            }
        };

        let reader = self.codecs.get_type_reader(instance.type_info())?;
        reader(ctx, &mut *instance)?;
        Ok(Some(instance))
    }
}

impl core::fmt::Debug for CompactSerializer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CompactSerializer")
            .field("codecs", &self.codecs)
            .field("resolvers", &self.resolvers)
            .field("components", &self.components)
            .field("config", &self.config)
            .finish()
    }
}

fn validate_reference_type(declared: &'static TypeInfo) -> Result<(), CodecError> {
    if declared.is_value_type() {
        return Err(CodecError::PreconditionViolation {
            type_path: declared.type_path().into(),
            reason: "must be a reference type".into(),
        });
    }
    Ok(())
}

pub(crate) fn validate_value_type(declared: &'static TypeInfo) -> Result<(), CodecError> {
    if !declared.is_value_type() {
        return Err(CodecError::PreconditionViolation {
            type_path: declared.type_path().into(),
            reason: "must be a value type".into(),
        });
    }
    Ok(())
}
