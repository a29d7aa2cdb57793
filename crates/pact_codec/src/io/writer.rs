use std::io::Write;

use crate::CodecError;
use crate::io::{DEFAULT_MAX_LENGTH, ObjectHeader};

/// Forward-only encoder over any [`Write`].
///
/// Length prefixes above [`max_length`](Self::max_length) are rejected, so
/// nothing is written that a reader with the same limit would refuse.
///
/// # Examples
///
/// ```
/// use pact_codec::io::CompactWriter;
///
/// let mut bytes = Vec::new();
/// let mut writer = CompactWriter::new(&mut bytes);
/// writer.write_i32(5).unwrap();
/// writer.write_str("ab").unwrap();
///
/// assert_eq!(bytes, [5, 0, 0, 0, 2, b'a', b'b']);
/// ```
pub struct CompactWriter<'a> {
    output: &'a mut dyn Write,
    max_length: usize,
}

macro_rules! write_le {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(&mut self, value: $ty) -> Result<(), CodecError> {
                self.write_raw(&value.to_le_bytes())
            }
        )*
    };
}

impl<'a> CompactWriter<'a> {
    #[inline]
    pub fn new(output: &'a mut dyn Write) -> Self {
        Self {
            output,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    #[inline]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    #[inline]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// A writer over the same output with a shorter lifetime.
    #[inline]
    pub fn reborrow(&mut self) -> CompactWriter<'_> {
        CompactWriter {
            output: &mut *self.output,
            max_length: self.max_length,
        }
    }

    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.output.write_all(bytes)?;
        Ok(())
    }

    write_le! {
        write_u8: u8,
        write_i8: i8,
        write_u16: u16,
        write_i16: i16,
        write_u32: u32,
        write_i32: i32,
        write_u64: u64,
        write_i64: i64,
        write_f32: f32,
        write_f64: f64,
    }

    #[inline]
    pub fn write_bool(&mut self, value: bool) -> Result<(), CodecError> {
        self.write_u8(value as u8)
    }

    #[inline]
    pub fn write_char(&mut self, value: char) -> Result<(), CodecError> {
        self.write_u32(value as u32)
    }

    /// Writes `len` as an unsigned LEB128 integer.
    pub fn write_len(&mut self, len: usize) -> Result<(), CodecError> {
        if len > self.max_length {
            return Err(CodecError::invalid_data(format!(
                "length {len} exceeds the limit of {}",
                self.max_length
            )));
        }
        let Ok(mut value) = u32::try_from(len) else {
            return Err(CodecError::invalid_data(format!(
                "length {len} does not fit the 32-bit length prefix"
            )));
        };
        let mut buf = [0_u8; 5];
        let mut used = 0;
        loop {
            let byte = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                buf[used] = byte;
                used += 1;
                break;
            }
            buf[used] = byte | 0x80;
            used += 1;
        }
        self.write_raw(&buf[..used])
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn write_str(&mut self, value: &str) -> Result<(), CodecError> {
        self.write_len(value.len())?;
        self.write_raw(value.as_bytes())
    }

    /// Writes the indicator byte and, for [`ObjectHeader::WithTypeKey`], the key.
    pub fn write_header(&mut self, header: ObjectHeader) -> Result<(), CodecError> {
        self.write_u8(header.indicator() as u8)?;
        if let ObjectHeader::WithTypeKey(key) = header {
            self.write_i16(key.get())?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), CodecError> {
        self.output.flush()?;
        Ok(())
    }
}
