use alloc::borrow::Cow;
use core::{error, fmt};
use std::io;

use crate::io::TypeKey;

/// Every way a compact read or write can fail.
///
/// Errors are never recovered inside the engine: the first one aborts the
/// whole top-level operation.
#[derive(Debug)]
pub enum CodecError {
    /// A value type was passed where a reference type is required.
    PreconditionViolation {
        type_path: Cow<'static, str>,
        reason: Cow<'static, str>,
    },
    /// The indicator byte is not one of the three valid values.
    CorruptStream { indicator: u8 },
    /// A type key was read that the dictionary never assigned.
    CorruptDictionary { key: TypeKey },
    /// A type is not assignable to the type expected at that position.
    TypeMismatch {
        key: Option<TypeKey>,
        expected: Cow<'static, str>,
        actual: Cow<'static, str>,
    },
    /// The capability exists in the interface but is intentionally not provided.
    UnsupportedOperation { operation: Cow<'static, str> },
    /// No codec is known for the type.
    MissingCodec { type_path: Cow<'static, str> },
    /// The dictionary ran out of 16-bit keys.
    DictionaryOverflow { type_path: Cow<'static, str> },
    /// A primitive payload is malformed.
    InvalidData { reason: Cow<'static, str> },
    /// Nesting went deeper than [`CompactConfig::max_depth`](crate::CompactConfig).
    DepthLimitExceeded { limit: usize },
    /// A creator or reader asked for a component that was never installed.
    MissingComponent { type_name: &'static str },
    /// The underlying stream failed.
    Io(io::Error),
}

impl CodecError {
    #[inline]
    pub(crate) fn invalid_data(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidData {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the stream ended before the value was complete.
    pub fn is_unexpected_eof(&self) -> bool {
        matches!(self, Self::Io(err) if err.kind() == io::ErrorKind::UnexpectedEof)
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreconditionViolation { type_path, reason } => {
                write!(f, "invalid declared type `{type_path}`: {reason}")
            }
            Self::CorruptStream { indicator } => {
                write!(f, "input stream is invalid: object indicator byte={indicator}")
            }
            Self::CorruptDictionary { key } => {
                write!(f, "type key {key} is not present in the dictionary")
            }
            Self::TypeMismatch {
                key: Some(key),
                expected,
                actual,
            } => write!(
                f,
                "type key {key} resolves to `{actual}`, which is not assignable to `{expected}`"
            ),
            Self::TypeMismatch {
                key: None,
                expected,
                actual,
            } => write!(f, "`{actual}` is not assignable to `{expected}`"),
            Self::UnsupportedOperation { operation } => {
                write!(f, "operation `{operation}` is not supported")
            }
            Self::MissingCodec { type_path } => {
                write!(f, "no compact codec is registered for `{type_path}`")
            }
            Self::DictionaryOverflow { type_path } => {
                write!(f, "no type key left to assign to `{type_path}`")
            }
            Self::InvalidData { reason } => write!(f, "invalid data: {reason}"),
            Self::DepthLimitExceeded { limit } => {
                write!(f, "object graph is nested deeper than {limit} levels")
            }
            Self::MissingComponent { type_name } => {
                write!(f, "component `{type_name}` is not available")
            }
            Self::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl error::Error for CodecError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for CodecError {
    #[inline]
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
