//! Pluggable type substitution and materialization.
//!
//! A [`ResolverPipeline`] holds the user's [`ObjectTypeResolver`]s in
//! registration order, followed by a [`VoidTypeResolver`]. Type queries
//! return the first answer that differs from the declared type;
//! materialization is offered to the first resolver that accepts it.

// -----------------------------------------------------------------------------
// Modules

mod pipeline;
mod void;

// -----------------------------------------------------------------------------
// Exports

pub use pipeline::ResolverPipeline;
pub use void::VoidTypeResolver;

use alloc::boxed::Box;

use crate::info::TypeInfo;
use crate::{CodecError, Compact};

// -----------------------------------------------------------------------------
// ObjectTypeResolver

/// A hook that can change which type is written or constructed.
///
/// Every method has a neutral default: type queries answer `declared`, which
/// the pipeline treats as "no opinion", and nothing is materialized.
///
/// # Examples
///
/// A resolver that writes every `Draft` as the `Published` type:
///
/// ```
/// use pact_codec::{Compact, derive::Compact, info::{TypeInfo, Typed}};
/// use pact_codec::resolver::ObjectTypeResolver;
///
/// #[derive(Compact, Default)]
/// struct Draft;
///
/// #[derive(Compact, Default)]
/// struct Published;
///
/// struct Publish;
///
/// impl ObjectTypeResolver for Publish {
///     fn serialization_type(
///         &self,
///         declared: &'static TypeInfo,
///         instance: &dyn Compact,
///     ) -> &'static TypeInfo {
///         if instance.is::<Draft>() { Published::type_info() } else { declared }
///     }
/// }
/// ```
pub trait ObjectTypeResolver: Send + Sync + 'static {
    /// The type to record on the wire for `instance`.
    fn serialization_type(
        &self,
        declared: &'static TypeInfo,
        instance: &dyn Compact,
    ) -> &'static TypeInfo {
        let _ = instance;
        declared
    }

    /// The type to construct for a value recorded as `serialized`.
    fn deserialization_type(
        &self,
        declared: &'static TypeInfo,
        serialized: &'static TypeInfo,
    ) -> &'static TypeInfo {
        let _ = serialized;
        declared
    }

    /// Whether [`materialize`](Self::materialize) should build the instance
    /// instead of the type's default creator.
    fn can_materialize(&self, declared: &'static TypeInfo, serialized: &'static TypeInfo) -> bool {
        let _ = (declared, serialized);
        false
    }

    /// Builds the instance. The field reader still runs on the result.
    fn materialize(
        &self,
        declared: &'static TypeInfo,
        serialized: &'static TypeInfo,
    ) -> Result<Box<dyn Compact>, CodecError> {
        let _ = (declared, serialized);
        Err(CodecError::UnsupportedOperation {
            operation: "ObjectTypeResolver::materialize".into(),
        })
    }
}
