use bytes::{BufMut, BytesMut};
use tessera_types::{Flags, Point4d};

use crate::endian::Endianness;

/// Growable output buffer writing multi-byte values in a fixed byte order.
#[derive(Debug)]
pub(crate) struct ByteWriter {
    buf: BytesMut,
    endianness: Endianness,
}

impl ByteWriter {
    pub(crate) fn with_capacity(capacity: usize, endianness: Endianness) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            endianness,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub(crate) fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub(crate) fn put_zeros(&mut self, count: usize) {
        self.buf.put_bytes(0, count);
    }

    pub(crate) fn put_u32(&mut self, value: u32) {
        match self.endianness {
            Endianness::BigEndian => self.buf.put_u32(value),
            Endianness::LittleEndian => self.buf.put_u32_le(value),
        }
    }

    pub(crate) fn put_i32(&mut self, value: i32) {
        self.put_u32(value as u32);
    }

    pub(crate) fn put_f32(&mut self, value: f32) {
        self.put_u32(value.to_bits());
    }

    pub(crate) fn put_f64(&mut self, value: f64) {
        match self.endianness {
            Endianness::BigEndian => self.buf.put_f64(value),
            Endianness::LittleEndian => self.buf.put_f64_le(value),
        }
    }

    pub(crate) fn put_point(&mut self, p: &Point4d, flags: Flags) {
        self.put_f64(p.x);
        self.put_f64(p.y);
        if flags.has_z {
            self.put_f64(p.z);
        }
        if flags.has_m {
            self.put_f64(p.m);
        }
    }

    pub(crate) fn into_inner(self) -> BytesMut {
        self.buf
    }
}
