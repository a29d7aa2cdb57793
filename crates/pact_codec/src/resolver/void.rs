use crate::Compact;
use crate::info::TypeInfo;
use crate::resolver::ObjectTypeResolver;

/// The identity resolver at the tail of every pipeline.
///
/// Answers the declared type when writing and the serialized type when
/// reading. It never materializes.
#[derive(Debug, Default, Clone, Copy)]
pub struct VoidTypeResolver;

impl ObjectTypeResolver for VoidTypeResolver {
    #[inline]
    fn serialization_type(
        &self,
        declared: &'static TypeInfo,
        _instance: &dyn Compact,
    ) -> &'static TypeInfo {
        declared
    }

    #[inline]
    fn deserialization_type(
        &self,
        _declared: &'static TypeInfo,
        serialized: &'static TypeInfo,
    ) -> &'static TypeInfo {
        serialized
    }
}
