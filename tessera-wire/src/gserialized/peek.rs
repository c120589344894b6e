use tessera_types::{Context, Flags, GBox, GeometryType, Point4d};

use crate::endian::Endianness;
use crate::error::TesseraWireError;
use crate::gserialized::read::read_bbox_floats;
use crate::gserialized::{from_gserialized, GSerializedHeader, HEADER_SIZE};
use crate::reader::ByteReader;

/// Derives the bounding box of a serialized geometry directly from its coordinates, without decoding it.
///
/// Works only for the shapes that are stored without a box: a point, a two-point line, and a multipoint or
/// multiline holding one such part. Returns `None` for every other shape and for geodetic geometries.
pub fn peek_bbox(bytes: &[u8]) -> Result<Option<GBox>, TesseraWireError> {
    let header = GSerializedHeader::parse(bytes)?;
    if header.flags.geodetic {
        return Ok(None);
    }

    let mut reader = ByteReader::new(bytes, Endianness::LittleEndian);
    reader.skip(header.payload_offset())?;

    let flags = header.flags;
    let code = reader.read_u32()?;
    let points = match GeometryType::from_code(code) {
        Some(GeometryType::Point) => peek_points(&mut reader, flags, 1)?,
        Some(GeometryType::Line) => peek_points(&mut reader, flags, 2)?,
        Some(GeometryType::MultiPoint) => peek_single_part(&mut reader, flags, GeometryType::Point, 1)?,
        Some(GeometryType::MultiLine) => peek_single_part(&mut reader, flags, GeometryType::Line, 2)?,
        _ => None,
    };

    Ok(points.and_then(|points| GBox::from_points(flags, points)))
}

fn peek_single_part(
    reader: &mut ByteReader<'_>,
    flags: Flags,
    part_type: GeometryType,
    npoints: usize,
) -> Result<Option<Vec<Point4d>>, TesseraWireError> {
    if reader.read_u32()? != 1 || reader.read_u32()? != part_type.code() {
        return Ok(None);
    }

    peek_points(reader, flags, npoints)
}

fn peek_points(
    reader: &mut ByteReader<'_>,
    flags: Flags,
    expected: usize,
) -> Result<Option<Vec<Point4d>>, TesseraWireError> {
    if reader.read_u32()? as usize != expected {
        return Ok(None);
    }

    let mut points = Vec::with_capacity(expected);
    for _ in 0..expected {
        let x = reader.read_f64()?;
        let y = reader.read_f64()?;
        let z = if flags.has_z { reader.read_f64()? } else { 0.0 };
        let m = if flags.has_m { reader.read_f64()? } else { 0.0 };
        points.push(Point4d::new(x, y, z, m));
    }

    Ok(Some(points))
}

/// Bounding box of a serialized geometry, found the cheapest way possible.
///
/// Uses the stored box if there is one, then tries [`peek_bbox`], and finally decodes the geometry and calculates
/// the box. Returns `None` for empty geometries.
pub fn read_bbox(ctx: &Context, bytes: &[u8]) -> Result<Option<GBox>, TesseraWireError> {
    let header = GSerializedHeader::parse(bytes)?;
    if header.has_bbox {
        let mut reader = ByteReader::new(bytes, Endianness::LittleEndian);
        reader.skip(HEADER_SIZE)?;
        return Ok(Some(read_bbox_floats(&mut reader, header.flags)?));
    }

    if let Some(bbox) = peek_bbox(bytes)? {
        return Ok(Some(bbox));
    }

    log::debug!("No stored box in serialized geometry, decoding to calculate one");
    let geometry = from_gserialized(ctx, bytes)?;
    Ok(geometry.calculate_gbox()?)
}
