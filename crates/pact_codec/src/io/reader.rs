use alloc::string::String;
use alloc::vec::Vec;
use std::io::{self, Read};

use crate::CodecError;
use crate::io::{ObjectHeader, ObjectIndicator, TypeKey};

/// The default bound on a single length prefix, 16 MiB.
pub(crate) const DEFAULT_MAX_LENGTH: usize = 16 * 1024 * 1024;

/// Forward-only decoder over any [`Read`].
///
/// Length prefixes larger than the configured maximum fail with
/// [`CodecError::InvalidData`] before anything is allocated.
///
/// # Examples
///
/// ```
/// use pact_codec::io::CompactReader;
///
/// let mut input: &[u8] = &[5, 0, 0, 0, 2, b'a', b'b'];
/// let mut reader = CompactReader::new(&mut input);
///
/// assert_eq!(reader.read_i32().unwrap(), 5);
/// assert_eq!(reader.read_string().unwrap(), "ab");
/// assert!(reader.read_u8().unwrap_err().is_unexpected_eof());
/// ```
pub struct CompactReader<'a> {
    input: &'a mut dyn Read,
    max_length: usize,
}

macro_rules! read_le {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(&mut self) -> Result<$ty, CodecError> {
                let mut buf = [0_u8; size_of::<$ty>()];
                self.input.read_exact(&mut buf)?;
                Ok(<$ty>::from_le_bytes(buf))
            }
        )*
    };
}

impl<'a> CompactReader<'a> {
    #[inline]
    pub fn new(input: &'a mut dyn Read) -> Self {
        Self {
            input,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Sets the largest length prefix this reader accepts.
    #[inline]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    #[inline]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// A reader over the same input with a shorter lifetime.
    #[inline]
    pub fn reborrow(&mut self) -> CompactReader<'_> {
        CompactReader {
            input: &mut *self.input,
            max_length: self.max_length,
        }
    }

    read_le! {
        read_u8: u8,
        read_i8: i8,
        read_u16: u16,
        read_i16: i16,
        read_u32: u32,
        read_i32: i32,
        read_u64: u64,
        read_i64: i64,
        read_f32: f32,
        read_f64: f64,
    }

    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(CodecError::invalid_data(format!("{byte} is not a bool"))),
        }
    }

    pub fn read_char(&mut self) -> Result<char, CodecError> {
        let value = self.read_u32()?;
        char::from_u32(value)
            .ok_or_else(|| CodecError::invalid_data(format!("{value:#x} is not a char")))
    }

    /// Reads exactly `len` bytes.
    ///
    /// The buffer grows with the data actually received, so a short stream
    /// with a large claimed length does not allocate up front.
    pub fn read_raw(&mut self, len: usize) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();
        (&mut *self.input).take(len as u64).read_to_end(&mut buf)?;
        if buf.len() != len {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        Ok(buf)
    }

    /// Reads an unsigned LEB128 length and checks it against the maximum.
    pub fn read_len(&mut self) -> Result<usize, CodecError> {
        let mut value: u32 = 0;
        for shift in (0..35).step_by(7) {
            let byte = self.read_u8()?;
            let bits = u32::from(byte & 0x7F);
            if shift == 28 && bits > 0x0F {
                return Err(CodecError::invalid_data("length prefix overflows 32 bits"));
            }
            value |= bits << shift;
            if byte & 0x80 == 0 {
                let len = value as usize;
                if len > self.max_length {
                    return Err(CodecError::invalid_data(format!(
                        "length {len} exceeds the limit of {}",
                        self.max_length
                    )));
                }
                return Ok(len);
            }
        }
        Err(CodecError::invalid_data("length prefix is longer than 5 bytes"))
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String, CodecError> {
        let len = self.read_len()?;
        let bytes = self.read_raw(len)?;
        String::from_utf8(bytes).map_err(|err| CodecError::invalid_data(err.to_string()))
    }

    /// Reads the indicator byte and, when present, the type key.
    pub fn read_header(&mut self) -> Result<ObjectHeader, CodecError> {
        Ok(match ObjectIndicator::try_from(self.read_u8()?)? {
            ObjectIndicator::Null => ObjectHeader::Null,
            ObjectIndicator::NotNull => ObjectHeader::NotNull,
            ObjectIndicator::NotNullWithTypeKey => {
                ObjectHeader::WithTypeKey(TypeKey::new(self.read_i16()?))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reader(bytes: &[u8], f: impl FnOnce(&mut CompactReader<'_>)) {
        let mut input = bytes;
        f(&mut CompactReader::new(&mut input));
    }

    #[test]
    fn multi_byte_length() {
        reader(&[0xAC, 0x02], |r| assert_eq!(r.read_len().unwrap(), 300));
    }

    #[test]
    fn overlong_length_prefix() {
        reader(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F], |r| {
            assert!(matches!(r.read_len(), Err(CodecError::InvalidData { .. })));
        });
        reader(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01], |r| {
            assert!(matches!(r.read_len(), Err(CodecError::InvalidData { .. })));
        });
    }

    #[test]
    fn length_over_limit() {
        let mut input: &[u8] = &[0x80, 0x01];
        let mut r = CompactReader::new(&mut input).with_max_length(100);
        assert!(matches!(r.read_len(), Err(CodecError::InvalidData { .. })));
    }

    #[test]
    fn truncated_string() {
        reader(&[5, b'a', b'b'], |r| {
            assert!(r.read_string().unwrap_err().is_unexpected_eof());
        });
    }

    #[test]
    fn invalid_bool_and_utf8() {
        reader(&[2], |r| {
            assert!(matches!(r.read_bool(), Err(CodecError::InvalidData { .. })));
        });
        reader(&[2, 0xC3, 0x28], |r| {
            assert!(matches!(r.read_string(), Err(CodecError::InvalidData { .. })));
        });
    }

    #[test]
    fn unknown_indicator() {
        reader(&[7], |r| {
            assert!(matches!(
                r.read_header(),
                Err(CodecError::CorruptStream { indicator: 7 })
            ));
        });
    }

    proptest! {
        #[test]
        fn arbitrary_input_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut input = bytes.as_slice();
            let mut r = CompactReader::new(&mut input).with_max_length(1024);
            let _ = r.read_header();
            let _ = r.read_string();
            let _ = r.read_char();
            let _ = r.read_len();
        }
    }
}
