//! Per-type codecs and their lazy, memoized cache.
//!
//! - [`CompactFields`]: a type's own persisted fields, usually derived.
//! - [`TypeCodec`]: creator, writer and reader of one reference type, as
//!   function pointers over `dyn Compact`.
//! - [`StructCodec`]: the same for a value type, monomorphized.
//! - [`CodecProvider`]: produces a `TypeCodec` on request.
//!   [`CodecRegistry`] is the shipped implementation.
//! - [`CodecCache`]: asks the provider once per type and keeps the answer.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, types annotated with
//! `#[compact(auto_register)]` are collected at link time through the
//! [`inventory`](https://docs.rs/inventory) crate and added by
//! [`CodecRegistry::auto_register`].

// -----------------------------------------------------------------------------
// Modules

mod cache;
mod codec;
mod provider;

// -----------------------------------------------------------------------------
// Exports

pub use cache::CodecCache;
pub use codec::{DefaultCreator, StructCodec, TypeCodec, TypeReader, TypeWriter};
pub use codec::{StructDefaultCreator, StructTypeReader, StructTypeWriter};
pub use provider::{CodecProvider, CodecRegistry};

use crate::info::Typed;
use crate::{CodecError, DeserializationContext, SerializationContext};

// -----------------------------------------------------------------------------
// FromType

/// Builds a value describing `T`.
pub trait FromType<T> {
    fn from_type() -> Self;
}

// -----------------------------------------------------------------------------
// CompactFields

/// Creation and field-level encoding of one type.
///
/// Writers and readers cover only the type's own persisted fields; the
/// object header in front of a reference-typed value is handled by the
/// serializer. Usually derived:
///
/// ```
/// use pact_codec::derive::Compact;
///
/// #[derive(Compact, Default)]
/// struct Holder {
///     name: Option<String>,
///     count: u32,
/// }
/// ```
///
/// A hand-written impl looks like this:
///
/// ```
/// use pact_codec::{CodecError, DeserializationContext, SerializationContext};
/// use pact_codec::info::{TypeInfo, TypeInfoCell, TypePath, Typed};
/// use pact_codec::registry::CompactFields;
///
/// struct Counter(u64);
///
/// impl TypePath for Counter {
///     fn type_path() -> &'static str { "demo::Counter" }
///     fn type_name() -> &'static str { "Counter" }
/// }
///
/// impl Typed for Counter {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: TypeInfoCell = TypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::class::<Self>().with_fields(&["0"]))
///     }
/// }
///
/// impl CompactFields for Counter {
///     fn create(_: &DeserializationContext<'_>) -> Result<Self, CodecError> {
///         Ok(Counter(0))
///     }
///
///     fn write_fields(&self, ctx: &mut SerializationContext<'_>) -> Result<(), CodecError> {
///         ctx.output().write_u64(self.0)
///     }
///
///     fn read_fields(&mut self, ctx: &mut DeserializationContext<'_>) -> Result<(), CodecError> {
///         self.0 = ctx.input().read_u64()?;
///         Ok(())
///     }
/// }
/// ```
pub trait CompactFields: Typed + Send + Sync + Sized {
    /// Creates the instance that [`read_fields`](Self::read_fields) fills.
    fn create(ctx: &DeserializationContext<'_>) -> Result<Self, CodecError>;

    fn write_fields(&self, ctx: &mut SerializationContext<'_>) -> Result<(), CodecError>;

    fn read_fields(&mut self, ctx: &mut DeserializationContext<'_>) -> Result<(), CodecError>;
}
