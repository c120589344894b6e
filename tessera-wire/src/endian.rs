use serde::{Deserialize, Serialize};

use crate::error::TesseraWireError;

/// Byte order of multi-byte values.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endianness {
    /// Most significant byte first (XDR).
    BigEndian,
    /// Least significant byte first (NDR).
    #[default]
    LittleEndian,
}

impl Endianness {
    /// Byte order of the machine the code runs on.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::BigEndian
        } else {
            Self::LittleEndian
        }
    }
}

impl TryFrom<u8> for Endianness {
    type Error = TesseraWireError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Endianness::BigEndian),
            1 => Ok(Endianness::LittleEndian),
            other => Err(TesseraWireError::InvalidByteOrder(other)),
        }
    }
}

impl From<Endianness> for u8 {
    fn from(value: Endianness) -> Self {
        match value {
            Endianness::BigEndian => 0,
            Endianness::LittleEndian => 1,
        }
    }
}
