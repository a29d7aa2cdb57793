//! Codecs for foreign types.

use alloc::string::String;

use crate::info::{TypeInfo, TypeInfoCell, TypePath, Typed};
use crate::registry::CompactFields;
use crate::{CodecError, DeserializationContext, SerializationContext};

impl TypePath for String {
    fn type_path() -> &'static str {
        "alloc::string::String"
    }

    fn type_name() -> &'static str {
        "String"
    }
}

impl Typed for String {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(TypeInfo::class::<Self>)
    }
}

impl CompactFields for String {
    #[inline]
    fn create(_: &DeserializationContext<'_>) -> Result<Self, CodecError> {
        Ok(String::new())
    }

    #[inline]
    fn write_fields(&self, ctx: &mut SerializationContext<'_>) -> Result<(), CodecError> {
        ctx.output().write_str(self)
    }

    #[inline]
    fn read_fields(&mut self, ctx: &mut DeserializationContext<'_>) -> Result<(), CodecError> {
        *self = ctx.input().read_string()?;
        Ok(())
    }
}
