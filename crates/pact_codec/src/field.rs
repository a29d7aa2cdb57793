use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::info::Typed;
use crate::object::Declared;
use crate::{CodecError, Compact, DeserializationContext, SerializationContext};

/// The encoding of one field inside a type's payload.
///
/// | Field type | Encoding |
/// |---|---|
/// | integers, floats | fixed width, little-endian |
/// | `bool` | one byte, `0` or `1` |
/// | `char` | its scalar value as `u32` |
/// | `String` | inline, length prefixed, never null |
/// | `Vec<T>` | length prefix, then each element |
/// | `Option<String>` | object header, then the string |
/// | `Option<Box<D>>` | object header, optional type key, then the fields |
/// | `Box<D>` | as `Option<Box<D>>`, but null is rejected on read |
/// | `#[compact(value)]` types | the value's fields inline |
///
/// # Examples
///
/// ```
/// use pact_codec::{CompactDictionary, CompactSerializer, derive::Compact, registry::CodecRegistry};
///
/// #[derive(Compact, Default, Debug, PartialEq)]
/// struct Holder {
///     name: Option<String>,
///     tags: Vec<u8>,
/// }
///
/// let mut registry = CodecRegistry::new();
/// registry.register::<Holder>();
/// let serializer = CompactSerializer::new(registry);
///
/// let holder = Holder { name: None, tags: vec![7] };
/// let bytes = serializer
///     .get_bytes_of(Some(&holder), &mut CompactDictionary::new())
///     .unwrap();
///
/// // Holder header, null name, one tag.
/// assert_eq!(bytes, [1, 0, 1, 7]);
/// ```
pub trait CompactField: Sized {
    fn write_field(&self, ctx: &mut SerializationContext<'_>) -> Result<(), CodecError>;

    fn read_field(ctx: &mut DeserializationContext<'_>) -> Result<Self, CodecError>;
}

macro_rules! impl_primitive {
    ($($ty:ty => $write:ident, $read:ident;)*) => {
        $(
            impl CompactField for $ty {
                #[inline]
                fn write_field(&self, ctx: &mut SerializationContext<'_>) -> Result<(), CodecError> {
                    ctx.output().$write(*self)
                }

                #[inline]
                fn read_field(ctx: &mut DeserializationContext<'_>) -> Result<Self, CodecError> {
                    ctx.input().$read()
                }
            }
        )*
    };
}

impl_primitive! {
    bool => write_bool, read_bool;
    u8 => write_u8, read_u8;
    i8 => write_i8, read_i8;
    u16 => write_u16, read_u16;
    i16 => write_i16, read_i16;
    u32 => write_u32, read_u32;
    i32 => write_i32, read_i32;
    u64 => write_u64, read_u64;
    i64 => write_i64, read_i64;
    f32 => write_f32, read_f32;
    f64 => write_f64, read_f64;
    char => write_char, read_char;
}

impl CompactField for String {
    #[inline]
    fn write_field(&self, ctx: &mut SerializationContext<'_>) -> Result<(), CodecError> {
        ctx.output().write_str(self)
    }

    #[inline]
    fn read_field(ctx: &mut DeserializationContext<'_>) -> Result<Self, CodecError> {
        ctx.input().read_string()
    }
}

impl<T: CompactField> CompactField for Vec<T> {
    fn write_field(&self, ctx: &mut SerializationContext<'_>) -> Result<(), CodecError> {
        ctx.output().write_len(self.len())?;
        self.iter().try_for_each(|item| item.write_field(ctx))
    }

    fn read_field(ctx: &mut DeserializationContext<'_>) -> Result<Self, CodecError> {
        let len = ctx.input().read_len()?;
        // Elements may be wider than a byte; grow with the data actually read.
        let mut items = Vec::with_capacity(len.min(1024));
        for _ in 0..len {
            items.push(T::read_field(ctx)?);
        }
        Ok(items)
    }
}

impl CompactField for Option<String> {
    fn write_field(&self, ctx: &mut SerializationContext<'_>) -> Result<(), CodecError> {
        ctx.write_object(String::type_info(), self.as_ref().map(|s| s as &dyn Compact))
    }

    fn read_field(ctx: &mut DeserializationContext<'_>) -> Result<Self, CodecError> {
        ctx.read_object(String::type_info())?
            .map(|object| <String as Declared>::downcast(object).map(|s| *s))
            .transpose()
    }
}

impl<D: Declared + ?Sized> CompactField for Option<Box<D>> {
    fn write_field(&self, ctx: &mut SerializationContext<'_>) -> Result<(), CodecError> {
        ctx.write_object(D::type_info(), self.as_deref().map(D::upcast))
    }

    fn read_field(ctx: &mut DeserializationContext<'_>) -> Result<Self, CodecError> {
        ctx.read_object(D::type_info())?.map(D::downcast).transpose()
    }
}

impl<D: Declared + ?Sized> CompactField for Box<D> {
    fn write_field(&self, ctx: &mut SerializationContext<'_>) -> Result<(), CodecError> {
        ctx.write_object(D::type_info(), Some(D::upcast(&**self)))
    }

    fn read_field(ctx: &mut DeserializationContext<'_>) -> Result<Self, CodecError> {
        match ctx.read_object(D::type_info())? {
            Some(object) => D::downcast(object),
            None => Err(CodecError::invalid_data(format!(
                "null where a `{}` is required",
                D::type_path()
            ))),
        }
    }
}
