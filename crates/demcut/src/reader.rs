//! Bounds-checked cursor over an input buffer.
//!
//! All integers are little-endian. Every read either consumes exactly the
//! bytes it decodes or fails without moving the cursor.

use crate::error::CutError;

/// Read-only cursor over a byte slice.
///
/// Borrowed slices returned by [`read_fixed`](Reader::read_fixed) and
/// [`read_length_prefixed`](Reader::read_length_prefixed) live as long as the
/// underlying buffer, not the reader.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Wrap a buffer with the cursor at offset 0.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current cursor offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True once every byte has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos == self.data.len()
    }

    /// Look at the next frame tag without consuming it.
    pub fn peek_kind(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Consume exactly `width` bytes.
    pub fn read_fixed(&mut self, width: usize) -> Result<&'a [u8], CutError> {
        if width > self.remaining() {
            return Err(CutError::Truncated {
                offset: self.pos,
                needed: width,
                remaining: self.remaining(),
            });
        }
        let start = self.pos;
        self.pos += width;
        Ok(&self.data[start..self.pos])
    }

    /// Consume exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CutError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_fixed(N)?);
        Ok(out)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, CutError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a little-endian u32.
    pub fn read_u32(&mut self) -> Result<u32, CutError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian i32.
    pub fn read_i32(&mut self) -> Result<i32, CutError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian f32.
    pub fn read_f32(&mut self) -> Result<f32, CutError> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Read an i32 that must not be negative, as a count or size.
    pub fn read_count(&mut self, what: &str) -> Result<u32, CutError> {
        let offset = self.pos;
        let value = self.read_i32()?;
        u32::try_from(value)
            .map_err(|_| CutError::encoding(offset, format!("negative {what}: {value}")))
    }

    /// Read an i32 length prefix followed by that many bytes.
    ///
    /// A negative length, or one larger than what is left in the buffer, is
    /// [`CutError::InvalidEncoding`]; the cursor is left at the prefix.
    pub fn read_length_prefixed(&mut self) -> Result<&'a [u8], CutError> {
        let offset = self.pos;
        let len = self.read_i32()?;
        let len = match usize::try_from(len) {
            Ok(len) if len <= self.remaining() => len,
            _ => {
                let remaining = self.remaining();
                self.pos = offset;
                return Err(CutError::encoding(
                    offset,
                    format!("length prefix {len} exceeds {remaining} remaining bytes"),
                ));
            }
        };
        self.read_fixed(len)
    }

    /// Read a NUL-terminated string stored in a fixed-width field.
    ///
    /// The field must contain a NUL; bytes after it are padding. Invalid
    /// UTF-8 is replaced rather than rejected.
    pub fn read_fixed_str(&mut self, width: usize) -> Result<String, CutError> {
        let offset = self.pos;
        let field = self.read_fixed(width)?;
        let Some(nul) = field.iter().position(|&b| b == 0) else {
            self.pos = offset;
            return Err(CutError::encoding(
                offset,
                format!("string field of {width} bytes is not NUL-terminated"),
            ));
        };
        Ok(String::from_utf8_lossy(&field[..nul]).into_owned())
    }
}
