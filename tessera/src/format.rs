//! Format-agnostic encoding entry points.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tessera_types::{Context, Geometry, ParseCheck};
use tessera_wire::{WkbEncoding, WkbOptions};

use crate::error::TesseraError;

/// Binary representation of a geometry.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    /// Compact serialized form with an inlined bounding box.
    #[default]
    GSerialized,
    /// Well-known binary.
    Wkb(WkbOptions),
}

/// Encodes the geometry in the given format.
///
/// Serializing into [`Format::GSerialized`] may cache a bounding box in the geometry, hence the mutable reference.
pub fn encode(ctx: &Context, geometry: &mut Geometry<'_>, format: Format) -> Result<Bytes, TesseraError> {
    let bytes = match format {
        Format::GSerialized => tessera_wire::to_gserialized(ctx, geometry)?,
        Format::Wkb(options) => Bytes::from(tessera_wire::to_wkb(ctx, geometry, &options)?),
    };

    log::debug!(
        "Encoded {} as {format:?}: {} bytes",
        geometry.geometry_type(),
        bytes.len()
    );
    Ok(bytes)
}

/// Decodes a geometry written in the given format.
///
/// Geometries decoded from [`Format::GSerialized`] borrow their coordinates from `bytes`. WKB input is validated with
/// `check`; serialized geometries are trusted to be well-formed.
pub fn decode<'a>(
    ctx: &Context,
    bytes: &'a [u8],
    format: Format,
    check: ParseCheck,
) -> Result<Geometry<'a>, TesseraError> {
    match format {
        Format::GSerialized => Ok(tessera_wire::from_gserialized(ctx, bytes)?),
        Format::Wkb(WkbOptions {
            encoding: WkbEncoding::Hex,
            ..
        }) => Ok(tessera_wire::from_wkb_hex(ctx, bytes, check)?),
        Format::Wkb(_) => Ok(tessera_wire::from_wkb(ctx, bytes, check)?),
    }
}

/// Re-encodes a geometry from one format into another.
pub fn transcode(ctx: &Context, bytes: &[u8], from: Format, to: Format) -> Result<Bytes, TesseraError> {
    let mut geometry = decode(ctx, bytes, from, ParseCheck::NONE)?;
    encode(ctx, &mut geometry, to)
}
