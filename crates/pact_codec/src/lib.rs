#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Lets code generated by `pact_codec_derive` name `::pact_codec` inside this crate.
extern crate self as pact_codec;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod components;
mod context;
mod dictionary;
mod error;
mod field;
mod impls;
mod object;
mod serializer;

pub mod info;
pub mod io;
pub mod registry;
pub mod resolver;

pub mod derive {
    //! Derive and attribute macros.
    //!
    //! - [`Compact`](macro@Compact): type metadata and field codecs for a struct.
    //! - [`compact_trait`]: makes `dyn Trait` usable as a declared type.
    pub use pact_codec_derive::{Compact, compact_trait};
}

#[doc(hidden)]
pub mod __macro_exports;

// -----------------------------------------------------------------------------
// Top-level exports

pub use components::Components;
pub use context::{DeserializationContext, SerializationContext};
pub use dictionary::CompactDictionary;
pub use error::CodecError;
pub use field::CompactField;
pub use object::{Compact, Declared};
pub use serializer::{CompactConfig, CompactSerializer, CompactSerializerBuilder};
