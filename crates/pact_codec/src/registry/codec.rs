use alloc::boxed::Box;
use core::fmt;

use crate::info::TypeInfo;
use crate::registry::{CompactFields, FromType};
use crate::{CodecError, Compact, DeserializationContext, SerializationContext};

/// Constructs an empty instance of a reference type.
pub type DefaultCreator = fn(&DeserializationContext<'_>) -> Result<Box<dyn Compact>, CodecError>;

/// Writes the fields of a reference-typed instance.
pub type TypeWriter = fn(&mut SerializationContext<'_>, &dyn Compact) -> Result<(), CodecError>;

/// Reads the fields of a reference-typed instance in place.
pub type TypeReader = fn(&mut DeserializationContext<'_>, &mut dyn Compact) -> Result<(), CodecError>;

pub type StructDefaultCreator<T> = fn(&DeserializationContext<'_>) -> Result<T, CodecError>;

pub type StructTypeWriter<T> = fn(&mut SerializationContext<'_>, &T) -> Result<(), CodecError>;

pub type StructTypeReader<T> = fn(&mut DeserializationContext<'_>, &mut T) -> Result<(), CodecError>;

// -----------------------------------------------------------------------------
// TypeCodec

/// The codec of one reference type.
///
/// The writer and reader check the runtime type of the instance they are
/// given and fail with [`CodecError::TypeMismatch`] instead of panicking.
#[derive(Clone, Copy)]
pub struct TypeCodec {
    info: &'static TypeInfo,
    creator: DefaultCreator,
    writer: TypeWriter,
    reader: TypeReader,
}

fn mismatch(expected: &'static TypeInfo, actual: &dyn Compact) -> CodecError {
    CodecError::TypeMismatch {
        key: None,
        expected: expected.type_path().into(),
        actual: actual.type_info().type_path().into(),
    }
}

impl TypeCodec {
    /// A codec from explicit parts, for providers that do not go through
    /// [`CompactFields`].
    #[inline]
    pub const fn new(
        info: &'static TypeInfo,
        creator: DefaultCreator,
        writer: TypeWriter,
        reader: TypeReader,
    ) -> Self {
        Self {
            info,
            creator,
            writer,
            reader,
        }
    }

    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        self.info
    }

    #[inline]
    pub fn creator(&self) -> DefaultCreator {
        self.creator
    }

    #[inline]
    pub fn writer(&self) -> TypeWriter {
        self.writer
    }

    #[inline]
    pub fn reader(&self) -> TypeReader {
        self.reader
    }
}

impl<T: CompactFields> FromType<T> for TypeCodec {
    fn from_type() -> Self {
        Self {
            info: T::type_info(),
            creator: |ctx| Ok(Box::new(T::create(ctx)?)),
            writer: |ctx, object| match object.downcast_ref::<T>() {
                Some(value) => value.write_fields(ctx),
                None => Err(mismatch(T::type_info(), object)),
            },
            reader: |ctx, object| {
                if let Some(value) = object.downcast_mut::<T>() {
                    return value.read_fields(ctx);
                }
                Err(mismatch(T::type_info(), object))
            },
        }
    }
}

impl fmt::Debug for TypeCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeCodec")
            .field(&self.info.type_path())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// StructCodec

/// The codec of one value type.
pub struct StructCodec<T> {
    creator: StructDefaultCreator<T>,
    writer: StructTypeWriter<T>,
    reader: StructTypeReader<T>,
}

impl<T> StructCodec<T> {
    #[inline]
    pub fn creator(&self) -> StructDefaultCreator<T> {
        self.creator
    }

    #[inline]
    pub fn writer(&self) -> StructTypeWriter<T> {
        self.writer
    }

    #[inline]
    pub fn reader(&self) -> StructTypeReader<T> {
        self.reader
    }
}

impl<T> Clone for StructCodec<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StructCodec<T> {}

impl<T: CompactFields> FromType<T> for StructCodec<T> {
    fn from_type() -> Self {
        Self {
            creator: T::create,
            writer: |ctx, value| value.write_fields(ctx),
            reader: |ctx, value| value.read_fields(ctx),
        }
    }
}
