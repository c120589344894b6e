//! Bounds-checked reading of binary input.

use byteorder::{ByteOrder, NativeEndian};

use crate::endian::Endianness;
use crate::error::TesseraWireError;

/// Deepest collection nesting the decoders accept. The outermost geometry is at depth 0.
pub const MAX_NESTING_DEPTH: usize = 200;

pub(crate) fn check_depth(depth: usize) -> Result<(), TesseraWireError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(TesseraWireError::TooDeep(MAX_NESTING_DEPTH));
    }

    Ok(())
}

/// Cursor over a byte slice.
///
/// Every read checks the remaining length first and fails with [`TesseraWireError::Truncated`] instead of reading
/// past the end. Multi-byte values are read in the machine byte order and swapped when the input byte order differs.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    position: usize,
    endianness: Endianness,
}

impl<'a> ByteReader<'a> {
    /// Creates a reader at the start of `bytes`.
    pub fn new(bytes: &'a [u8], endianness: Endianness) -> Self {
        Self {
            bytes,
            position: 0,
            endianness,
        }
    }

    /// Current offset from the start of the input.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes not read yet.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// Byte order of the input.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Changes the byte order for the following reads.
    pub fn set_endianness(&mut self, endianness: Endianness) {
        self.endianness = endianness;
    }

    /// Returns true if values have to be byte-swapped on this machine.
    pub fn swaps(&self) -> bool {
        self.endianness != Endianness::native()
    }

    /// Returns the next `len` bytes and advances past them.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8], TesseraWireError> {
        if len > self.remaining() {
            return Err(TesseraWireError::Truncated {
                offset: self.position,
                needed: len,
                available: self.remaining(),
            });
        }

        let slice = &self.bytes[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    /// Advances past `len` bytes.
    pub fn skip(&mut self, len: usize) -> Result<(), TesseraWireError> {
        self.take(len).map(|_| ())
    }

    /// Reads one byte.
    pub fn read_u8(&mut self) -> Result<u8, TesseraWireError> {
        Ok(self.take(1)?[0])
    }

    /// Reads an unsigned 32-bit integer.
    pub fn read_u32(&mut self) -> Result<u32, TesseraWireError> {
        let raw = NativeEndian::read_u32(self.take(4)?);
        Ok(if self.swaps() { raw.swap_bytes() } else { raw })
    }

    /// Reads a signed 32-bit integer.
    pub fn read_i32(&mut self) -> Result<i32, TesseraWireError> {
        self.read_u32().map(|v| v as i32)
    }

    /// Reads a single precision float.
    pub fn read_f32(&mut self) -> Result<f32, TesseraWireError> {
        self.read_u32().map(f32::from_bits)
    }

    /// Reads a double precision float.
    pub fn read_f64(&mut self) -> Result<f64, TesseraWireError> {
        let raw = NativeEndian::read_u64(self.take(8)?);
        Ok(f64::from_bits(if self.swaps() { raw.swap_bytes() } else { raw }))
    }

    /// Reads an element count, failing early if the input cannot possibly hold `count` elements of at least
    /// `min_item_size` bytes each.
    pub fn read_count(&mut self, min_item_size: usize) -> Result<usize, TesseraWireError> {
        let offset = self.position;
        let count = self.read_u32()? as usize;
        let needed = count.saturating_mul(min_item_size);
        if needed > self.remaining() {
            return Err(TesseraWireError::Truncated {
                offset,
                needed,
                available: self.remaining(),
            });
        }

        Ok(count)
    }
}
