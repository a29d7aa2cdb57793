//! The binary cursor: primitive encodings and the object header.
//!
//! Every reference-typed value starts with an [`ObjectIndicator`] byte,
//! optionally followed by a 16-bit [`TypeKey`]. Fixed-width numbers are
//! little-endian; strings and sequences carry an unsigned LEB128 length.

// -----------------------------------------------------------------------------
// Modules

mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use reader::CompactReader;
pub(crate) use reader::DEFAULT_MAX_LENGTH;
pub use writer::CompactWriter;

use core::fmt;

use crate::CodecError;

// -----------------------------------------------------------------------------
// TypeKey

/// A dictionary-scoped integer standing in for a type on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeKey(i16);

impl TypeKey {
    /// The key assigned to the first type a dictionary sees.
    pub const FIRST: TypeKey = TypeKey(1);

    #[inline]
    pub const fn new(key: i16) -> Self {
        Self(key)
    }

    #[inline]
    pub const fn get(self) -> i16 {
        self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// -----------------------------------------------------------------------------
// ObjectIndicator

/// The byte in front of every reference-typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ObjectIndicator {
    Null = 0,
    NotNull = 1,
    NotNullWithTypeKey = 2,
}

impl TryFrom<u8> for ObjectIndicator {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Null),
            1 => Ok(Self::NotNull),
            2 => Ok(Self::NotNullWithTypeKey),
            indicator => Err(CodecError::CorruptStream { indicator }),
        }
    }
}

// -----------------------------------------------------------------------------
// ObjectHeader

/// A decoded indicator byte together with its type key, if any.
///
/// # Examples
///
/// ```
/// use pact_codec::io::{CompactReader, CompactWriter, ObjectHeader, TypeKey};
///
/// let mut bytes = Vec::new();
/// CompactWriter::new(&mut bytes)
///     .write_header(ObjectHeader::WithTypeKey(TypeKey::new(3)))
///     .unwrap();
/// assert_eq!(bytes, [2, 3, 0]);
///
/// let mut input = bytes.as_slice();
/// let header = CompactReader::new(&mut input).read_header().unwrap();
/// assert_eq!(header, ObjectHeader::WithTypeKey(TypeKey::new(3)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectHeader {
    Null,
    NotNull,
    WithTypeKey(TypeKey),
}

impl ObjectHeader {
    #[inline]
    pub const fn indicator(self) -> ObjectIndicator {
        match self {
            Self::Null => ObjectIndicator::Null,
            Self::NotNull => ObjectIndicator::NotNull,
            Self::WithTypeKey(_) => ObjectIndicator::NotNullWithTypeKey,
        }
    }
}
