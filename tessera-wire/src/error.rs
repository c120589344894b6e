//! Error type of the codecs.

use tessera_types::TesseraTypesError;
use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TesseraWireError {
    /// A read would run past the end of the input.
    #[error("unexpected end of input: {needed} bytes needed at offset {offset}, {available} available")]
    Truncated {
        /// Position of the read.
        offset: usize,
        /// Number of bytes the read needs.
        needed: usize,
        /// Number of bytes left in the input.
        available: usize,
    },

    /// The size stored in a serialized header does not match the input.
    #[error("declared size of {declared} bytes does not match {actual} bytes of input")]
    DeclaredSize {
        /// Size from the header.
        declared: usize,
        /// Length of the input.
        actual: usize,
    },

    /// Encoder wrote a different number of bytes than it calculated up front.
    #[error("encoder size mismatch: expected {expected} bytes, wrote {actual}")]
    SizeMismatch {
        /// Precalculated size.
        expected: usize,
        /// Number of bytes actually written.
        actual: usize,
    },

    /// Geometry is too large for the size field of the format.
    #[error("geometry of {0} bytes is too large to serialize")]
    TooLarge(usize),

    /// Type code is not known.
    #[error("unknown geometry type code {0}")]
    UnknownType(u32),

    /// Collections are nested deeper than the decoders allow.
    #[error("geometry collections nested deeper than {0} levels")]
    TooDeep(usize),

    /// Byte order marker is neither 0 nor 1.
    #[error("invalid byte order marker {0}")]
    InvalidByteOrder(u8),

    /// Hex text is malformed.
    #[error("invalid hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Decoded data does not form a valid geometry.
    #[error(transparent)]
    Geometry(#[from] TesseraTypesError),
}
