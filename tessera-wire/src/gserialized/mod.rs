//! Compact serialized geometry format.
//!
//! A serialized geometry is a single little-endian buffer:
//!
//! ```text
//! [size << 2: u32][srid: 3 bytes][flags: u8][bbox: f32 * N][payload]
//! ```
//!
//! The SRID is a 21-bit signed value, zero meaning unknown. The optional bounding box holds `xmin, xmax, ymin, ymax`
//! followed by Z and M bounds for the dimensions the geometry has, widened outward to single precision. Geodetic
//! geometries always store six values: the geocentric X, Y and Z bounds.
//!
//! The payload starts with a `u32` type code followed by type specific counts and `f64` coordinates. Polygons store
//! all ring sizes before the coordinates, padded to keep the coordinates 8-byte aligned. Collections store the number
//! of children followed by the payload of every child.
//!
//! Decoded point arrays are views into the input buffer, so the decoded geometry borrows from it.

use tessera_types::{Flags, Srid};

use crate::endian::Endianness;
use crate::error::TesseraWireError;
use crate::reader::ByteReader;

mod peek;
mod read;
mod write;

pub use peek::{peek_bbox, read_bbox};
pub use read::from_gserialized;
pub use write::{serialized_size, to_gserialized};

/// Geometry has Z coordinates.
pub const FLAG_Z: u8 = 0x01;
/// Geometry has M coordinates.
pub const FLAG_M: u8 = 0x02;
/// A bounding box follows the header.
pub const FLAG_BBOX: u8 = 0x04;
/// Coordinates are geodetic.
pub const FLAG_GEODETIC: u8 = 0x08;
/// Buffer must not be modified.
pub const FLAG_READONLY: u8 = 0x10;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 8;

const MAX_SIZE: usize = (u32::MAX >> 2) as usize;

/// Fixed part of a serialized geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GSerializedHeader {
    /// Total size of the serialized geometry in bytes.
    pub size: usize,
    /// Spatial reference of the geometry.
    pub srid: Srid,
    /// Dimensions and coordinate model.
    pub flags: Flags,
    /// Whether a bounding box follows the header.
    pub has_bbox: bool,
    /// Whether the read-only bit is set.
    pub read_only: bool,
}

impl GSerializedHeader {
    /// Reads the header from the beginning of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, TesseraWireError> {
        let mut reader = ByteReader::new(bytes, Endianness::LittleEndian);
        let size = (reader.read_u32()? >> 2) as usize;
        let srid = srid_from_bytes(reader.take(3)?);
        let flags = reader.read_u8()?;

        Ok(Self {
            size,
            srid,
            flags: Flags::new(flags & FLAG_Z != 0, flags & FLAG_M != 0).with_geodetic(flags & FLAG_GEODETIC != 0),
            has_bbox: flags & FLAG_BBOX != 0,
            read_only: flags & FLAG_READONLY != 0,
        })
    }

    /// The flags byte of the header.
    pub fn flags_byte(&self) -> u8 {
        let mut byte = 0;
        for (set, bit) in [
            (self.flags.has_z, FLAG_Z),
            (self.flags.has_m, FLAG_M),
            (self.has_bbox, FLAG_BBOX),
            (self.flags.geodetic, FLAG_GEODETIC),
            (self.read_only, FLAG_READONLY),
        ] {
            if set {
                byte |= bit;
            }
        }

        byte
    }

    /// Size of the stored bounding box in bytes, zero if there is none.
    pub fn bbox_size(&self) -> usize {
        if self.has_bbox {
            bbox_float_count(self.flags) * 4
        } else {
            0
        }
    }

    /// Offset of the geometry payload from the start of the buffer.
    pub fn payload_offset(&self) -> usize {
        HEADER_SIZE + self.bbox_size()
    }
}

/// Number of `f32` values in the stored box of a geometry with the given flags.
pub(crate) fn bbox_float_count(flags: Flags) -> usize {
    if flags.geodetic {
        6
    } else {
        2 * flags.ndims()
    }
}

fn srid_from_bytes(bytes: &[u8]) -> Srid {
    let raw = bytes
        .iter()
        .fold(0u32, |value, byte| (value << 8) | u32::from(*byte));
    // sign extend from 21 bits
    Srid(((raw << 11) as i32) >> 11)
}

fn srid_to_bytes(srid: Srid) -> [u8; 3] {
    let value = srid.0 as u32;
    [((value >> 16) & 0x1f) as u8, (value >> 8) as u8, value as u8]
}
