use alloc::boxed::Box;

use crate::info::TypeInfo;
use crate::io::{CompactReader, CompactWriter};
use crate::registry::CompactFields;
use crate::serializer::validate_value_type;
use crate::{CodecError, Compact, CompactDictionary, CompactField, CompactSerializer, Components};

// -----------------------------------------------------------------------------
// SerializationContext

/// State shared by every nested write of one top-level write call.
///
/// Generated writers receive it and recurse through
/// [`write_field`](Self::write_field), which keeps the same dictionary and
/// serializer across the whole object graph.
pub struct SerializationContext<'a> {
    serializer: &'a CompactSerializer,
    dictionary: &'a mut CompactDictionary,
    output: CompactWriter<'a>,
    depth: usize,
}

impl<'a> SerializationContext<'a> {
    pub(crate) fn new(
        serializer: &'a CompactSerializer,
        dictionary: &'a mut CompactDictionary,
        output: CompactWriter<'a>,
    ) -> Self {
        Self {
            serializer,
            dictionary,
            output,
            depth: 0,
        }
    }

    #[inline]
    pub fn serializer(&self) -> &'a CompactSerializer {
        self.serializer
    }

    #[inline]
    pub fn dictionary(&self) -> &CompactDictionary {
        self.dictionary
    }

    #[inline]
    pub(crate) fn dictionary_mut(&mut self) -> &mut CompactDictionary {
        self.dictionary
    }

    #[inline]
    pub fn output(&mut self) -> &mut CompactWriter<'a> {
        &mut self.output
    }

    /// Writes one field with its [`CompactField`] encoding.
    #[inline]
    pub fn write_field<F: CompactField>(&mut self, field: &F) -> Result<(), CodecError> {
        field.write_field(self)
    }

    /// Writes a reference-typed value behind its object header.
    pub fn write_object(
        &mut self,
        declared: &'static TypeInfo,
        object: Option<&dyn Compact>,
    ) -> Result<(), CodecError> {
        let serializer = self.serializer;
        self.nested(|ctx| serializer.write_object_in(ctx, declared, object))
    }

    /// Writes a value type inline, without header.
    ///
    /// Fails with [`CodecError::PreconditionViolation`] unless `T` is a value type.
    pub fn write_struct<T: CompactFields>(&mut self, value: &T) -> Result<(), CodecError> {
        validate_value_type(T::type_info())?;
        let writer = self.serializer.codecs().get_struct_type_writer::<T>();
        self.nested(|ctx| writer(ctx, value))
    }

    fn nested(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<(), CodecError>,
    ) -> Result<(), CodecError> {
        let limit = self.serializer.config().max_depth;
        if self.depth >= limit {
            return Err(CodecError::DepthLimitExceeded { limit });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

// -----------------------------------------------------------------------------
// DeserializationContext

/// State shared by every nested read of one top-level read call.
pub struct DeserializationContext<'a> {
    serializer: &'a CompactSerializer,
    dictionary: &'a CompactDictionary,
    input: CompactReader<'a>,
    depth: usize,
}

impl<'a> DeserializationContext<'a> {
    pub(crate) fn new(
        serializer: &'a CompactSerializer,
        dictionary: &'a CompactDictionary,
        input: CompactReader<'a>,
    ) -> Self {
        Self {
            serializer,
            dictionary,
            input,
            depth: 0,
        }
    }

    #[inline]
    pub fn serializer(&self) -> &'a CompactSerializer {
        self.serializer
    }

    #[inline]
    pub fn dictionary(&self) -> &'a CompactDictionary {
        self.dictionary
    }

    /// Ancillary services installed on the serializer.
    #[inline]
    pub fn components(&self) -> &'a Components {
        self.serializer.components()
    }

    #[inline]
    pub fn input(&mut self) -> &mut CompactReader<'a> {
        &mut self.input
    }

    /// Reads one field with its [`CompactField`] encoding.
    #[inline]
    pub fn read_field<F: CompactField>(&mut self) -> Result<F, CodecError> {
        F::read_field(self)
    }

    /// Reads a reference-typed value and its object header.
    pub fn read_object(
        &mut self,
        declared: &'static TypeInfo,
    ) -> Result<Option<Box<dyn Compact>>, CodecError> {
        let serializer = self.serializer;
        self.nested(|ctx| serializer.read_object_in(ctx, declared))
    }

    /// Reads a value type written by
    /// [`SerializationContext::write_struct`].
    pub fn read_struct<T: CompactFields>(&mut self) -> Result<T, CodecError> {
        validate_value_type(T::type_info())?;
        let codec = self.serializer.codecs().get_struct_codec::<T>();
        self.nested(|ctx| {
            let mut value = (codec.creator())(ctx)?;
            (codec.reader())(ctx, &mut value)?;
            Ok(value)
        })
    }

    fn nested<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, CodecError>,
    ) -> Result<R, CodecError> {
        let limit = self.serializer.config().max_depth;
        if self.depth >= limit {
            return Err(CodecError::DepthLimitExceeded { limit });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
