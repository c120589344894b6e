//! Well-known binary.
//!
//! Three variants of the type word are supported:
//!
//! * [`WkbVariant::Sfsql`]: plain type numbers, coordinates are always written in 2d.
//! * [`WkbVariant::Extended`]: Z, M and SRID presence are flagged in the high bits of the type word, and the SRID
//!   follows the type word of the outermost geometry.
//! * [`WkbVariant::Iso`]: Z and M are encoded by adding 1000 and 2000 to the type number. No SRID.
//!
//! The reader accepts all three variants, in either byte order, with byte order switching between nested geometries.

use serde::{Deserialize, Serialize};
use tessera_types::{Flags, GeometryType};

use crate::error::TesseraWireError;
pub use crate::endian::Endianness;

mod read;
mod write;

pub use read::{from_wkb, from_wkb_hex};
pub use write::{to_wkb, to_wkb_hex, wkb_size};

/// Type word flag: coordinates have Z.
pub const WKB_Z_FLAG: u32 = 0x8000_0000;
/// Type word flag: coordinates have M.
pub const WKB_M_FLAG: u32 = 0x4000_0000;
/// Type word flag: an SRID follows the type word.
pub const WKB_SRID_FLAG: u32 = 0x2000_0000;

const ISO_Z_OFFSET: u32 = 1000;
const ISO_M_OFFSET: u32 = 2000;

/// Flavour of the type word.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WkbVariant {
    /// Simple features for SQL: 2d only.
    Sfsql,
    /// Flags in the high bits of the type word, optional SRID.
    #[default]
    Extended,
    /// ISO SQL/MM type number offsets.
    Iso,
}

/// Output encoding.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WkbEncoding {
    /// Raw bytes.
    #[default]
    Binary,
    /// Uppercase hex text, two characters per byte.
    Hex,
}

/// Options of the WKB writer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WkbOptions {
    /// Type word variant.
    pub variant: WkbVariant,
    /// Byte order of the output.
    pub byte_order: Endianness,
    /// Binary or hex output.
    pub encoding: WkbEncoding,
    /// Write the SRID when it is known. Only the extended variant can carry one.
    pub include_srid: bool,
}

impl Default for WkbOptions {
    fn default() -> Self {
        Self {
            variant: WkbVariant::default(),
            byte_order: Endianness::LittleEndian,
            encoding: WkbEncoding::default(),
            include_srid: true,
        }
    }
}

impl WkbOptions {
    /// Default options with the given variant.
    pub fn with_variant(variant: WkbVariant) -> Self {
        Self {
            variant,
            ..Default::default()
        }
    }

    pub(crate) fn output_flags(&self, flags: Flags) -> Flags {
        match self.variant {
            WkbVariant::Sfsql => Flags::xy(),
            _ => Flags::new(flags.has_z, flags.has_m),
        }
    }

    pub(crate) fn type_word(&self, geometry_type: GeometryType, flags: Flags, with_srid: bool) -> u32 {
        let base = geometry_type.wkb_code();
        match self.variant {
            WkbVariant::Sfsql => base,
            WkbVariant::Iso => {
                base + if flags.has_z { ISO_Z_OFFSET } else { 0 } + if flags.has_m { ISO_M_OFFSET } else { 0 }
            }
            WkbVariant::Extended => {
                let mut word = base;
                if flags.has_z {
                    word |= WKB_Z_FLAG;
                }
                if flags.has_m {
                    word |= WKB_M_FLAG;
                }
                if with_srid {
                    word |= WKB_SRID_FLAG;
                }
                word
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct TypeWord {
    geometry_type: GeometryType,
    flags: Flags,
    has_srid: bool,
}

impl TypeWord {
    fn parse(word: u32) -> Result<Self, TesseraWireError> {
        let mut has_z = word & WKB_Z_FLAG != 0;
        let mut has_m = word & WKB_M_FLAG != 0;
        let has_srid = word & WKB_SRID_FLAG != 0;

        let mut code = word & 0x0fff_ffff;
        if (ISO_Z_OFFSET..ISO_Z_OFFSET + ISO_M_OFFSET + 1000).contains(&code) {
            match code / 1000 {
                1 => has_z = true,
                2 => has_m = true,
                _ => {
                    has_z = true;
                    has_m = true;
                }
            }
            code %= 1000;
        }

        let geometry_type = GeometryType::from_wkb_code(code).ok_or(TesseraWireError::UnknownType(word))?;

        Ok(Self {
            geometry_type,
            flags: Flags::new(has_z, has_m),
            has_srid,
        })
    }
}
