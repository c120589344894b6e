use bytes::Bytes;
use tessera_types::{Context, Flags, GBox, Geometry, GeometryKind, PointArray, PointSequence};

use crate::endian::Endianness;
use crate::error::TesseraWireError;
use crate::gserialized::{bbox_float_count, srid_to_bytes, GSerializedHeader, HEADER_SIZE, MAX_SIZE};
use crate::writer::ByteWriter;

/// Number of bytes [`to_gserialized`] produces for the geometry in its current state.
///
/// The stored bounding box is counted only if the geometry already carries one.
pub fn serialized_size(geometry: &Geometry<'_>) -> usize {
    let bbox_size = match geometry.bbox() {
        Some(_) => bbox_float_count(geometry.flags()) * 4,
        None => 0,
    };

    HEADER_SIZE + bbox_size + payload_size(geometry)
}

fn payload_size(geometry: &Geometry<'_>) -> usize {
    let stride = geometry.flags().ndims() * 8;
    match geometry.kind() {
        GeometryKind::Point(points)
        | GeometryKind::Line(points)
        | GeometryKind::CircularString(points)
        | GeometryKind::Triangle(points) => 8 + points.len() * stride,
        GeometryKind::Polygon(rings) => {
            let padding = if rings.len() % 2 == 1 { 4 } else { 0 };
            8 + 4 * rings.len() + padding + rings.iter().map(|ring| ring.len() * stride).sum::<usize>()
        }
        GeometryKind::Collection { geometries, .. } => 8 + geometries.iter().map(payload_size).sum::<usize>(),
    }
}

/// Serializes the geometry.
///
/// If the geometry is worth a bounding box (see [`Geometry::needs_bbox`]) and does not have one yet, the box is
/// calculated and cached in the geometry before writing. The SRID is clamped to the storable range.
pub fn to_gserialized(ctx: &Context, geometry: &mut Geometry<'_>) -> Result<Bytes, TesseraWireError> {
    if geometry.needs_bbox() {
        geometry.add_bbox()?;
    }

    let size = serialized_size(geometry);
    if size > MAX_SIZE {
        return Err(TesseraWireError::TooLarge(size));
    }

    let header = GSerializedHeader {
        size,
        srid: geometry.srid().clamp(ctx),
        flags: geometry.flags(),
        has_bbox: geometry.bbox().is_some(),
        read_only: false,
    };

    let mut writer = ByteWriter::with_capacity(size, Endianness::LittleEndian);
    writer.put_u32((size as u32) << 2);
    for byte in srid_to_bytes(header.srid) {
        writer.put_u8(byte);
    }
    writer.put_u8(header.flags_byte());

    if let Some(bbox) = geometry.bbox() {
        write_bbox(&mut writer, bbox, geometry.flags());
    }

    write_payload(ctx, &mut writer, geometry)?;

    if writer.len() != size {
        return Err(TesseraWireError::SizeMismatch {
            expected: size,
            actual: writer.len(),
        });
    }

    log::trace!("Serialized {} into {size} bytes", geometry.geometry_type());
    Ok(writer.into_inner().freeze())
}

fn write_bbox(writer: &mut ByteWriter, bbox: &GBox, flags: Flags) {
    let mut bbox = *bbox;
    bbox.float_round();

    let mut bounds = vec![bbox.xmin, bbox.xmax, bbox.ymin, bbox.ymax];
    if flags.geodetic || flags.has_z {
        bounds.extend([bbox.zmin, bbox.zmax]);
    }
    if !flags.geodetic && flags.has_m {
        bounds.extend([bbox.mmin, bbox.mmax]);
    }

    for value in bounds {
        writer.put_f32(value as f32);
    }
}

fn write_payload(ctx: &Context, writer: &mut ByteWriter, geometry: &Geometry<'_>) -> Result<(), TesseraWireError> {
    ctx.check_interrupt()?;

    let flags = geometry.flags();
    writer.put_u32(geometry.geometry_type().code());

    match geometry.kind() {
        GeometryKind::Point(points)
        | GeometryKind::Line(points)
        | GeometryKind::CircularString(points)
        | GeometryKind::Triangle(points) => {
            writer.put_u32(points.len() as u32);
            write_points(writer, points, flags);
        }
        GeometryKind::Polygon(rings) => {
            writer.put_u32(rings.len() as u32);
            for ring in rings {
                writer.put_u32(ring.len() as u32);
            }
            if rings.len() % 2 == 1 {
                writer.put_zeros(4);
            }
            for ring in rings {
                write_points(writer, ring, flags);
            }
        }
        GeometryKind::Collection { geometries, .. } => {
            writer.put_u32(geometries.len() as u32);
            for child in geometries {
                write_payload(ctx, writer, child)?;
            }
        }
    }

    Ok(())
}

fn write_points(writer: &mut ByteWriter, points: &PointArray<'_>, flags: Flags) {
    for p in points.iter_points() {
        writer.put_point(&p, flags);
    }
}
