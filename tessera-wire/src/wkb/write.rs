use tessera_types::{Context, Flags, Geometry, GeometryKind, Point4d, PointArray, PointSequence, Srid};

use crate::error::TesseraWireError;
use crate::wkb::{WkbEncoding, WkbOptions, WkbVariant};
use crate::writer::ByteWriter;

fn writes_srid(geometry: &Geometry<'_>, options: &WkbOptions) -> bool {
    options.variant == WkbVariant::Extended && options.include_srid && geometry.srid().0 > 0
}

/// Number of bytes [`to_wkb`] produces for the geometry with the given options.
pub fn wkb_size(geometry: &Geometry<'_>, options: &WkbOptions) -> usize {
    let srid_size = if writes_srid(geometry, options) { 4 } else { 0 };
    let size = srid_size + binary_size(geometry, options);
    match options.encoding {
        WkbEncoding::Binary => size,
        WkbEncoding::Hex => size * 2,
    }
}

fn binary_size(geometry: &Geometry<'_>, options: &WkbOptions) -> usize {
    const HEADER: usize = 1 + 4;
    let stride = options.output_flags(geometry.flags()).ndims() * 8;

    match geometry.kind() {
        GeometryKind::Point(_) => HEADER + stride,
        GeometryKind::Line(points) | GeometryKind::CircularString(points) => HEADER + 4 + points.len() * stride,
        GeometryKind::Triangle(points) if points.is_empty() => HEADER + 4,
        GeometryKind::Triangle(points) => HEADER + 4 + 4 + points.len() * stride,
        GeometryKind::Polygon(rings) => HEADER + 4 + rings.iter().map(|ring| 4 + ring.len() * stride).sum::<usize>(),
        GeometryKind::Collection { geometries, .. } => {
            HEADER + 4 + geometries.iter().map(|child| binary_size(child, options)).sum::<usize>()
        }
    }
}

/// Encodes the geometry as WKB.
///
/// With [`WkbEncoding::Hex`] the result is the ASCII hex text as bytes.
pub fn to_wkb(ctx: &Context, geometry: &Geometry<'_>, options: &WkbOptions) -> Result<Vec<u8>, TesseraWireError> {
    let srid = writes_srid(geometry, options).then(|| geometry.srid().clamp(ctx));
    let size = srid.map_or(0, |_| 4) + binary_size(geometry, options);

    let mut writer = ByteWriter::with_capacity(size, options.byte_order);
    write_geometry(ctx, &mut writer, geometry, options, srid)?;

    if writer.len() != size {
        return Err(TesseraWireError::SizeMismatch {
            expected: size,
            actual: writer.len(),
        });
    }

    let bytes = writer.into_inner();
    Ok(match options.encoding {
        WkbEncoding::Binary => bytes.to_vec(),
        WkbEncoding::Hex => hex::encode_upper(&bytes).into_bytes(),
    })
}

/// Encodes the geometry as hex WKB text, regardless of `options.encoding`.
pub fn to_wkb_hex(ctx: &Context, geometry: &Geometry<'_>, options: &WkbOptions) -> Result<String, TesseraWireError> {
    let binary = WkbOptions {
        encoding: WkbEncoding::Binary,
        ..*options
    };

    Ok(hex::encode_upper(to_wkb(ctx, geometry, &binary)?))
}

fn write_geometry(
    ctx: &Context,
    writer: &mut ByteWriter,
    geometry: &Geometry<'_>,
    options: &WkbOptions,
    srid: Option<Srid>,
) -> Result<(), TesseraWireError> {
    ctx.check_interrupt()?;

    let flags = options.output_flags(geometry.flags());
    writer.put_u8(writer.endianness().into());
    writer.put_u32(options.type_word(geometry.geometry_type(), flags, srid.is_some()));
    if let Some(srid) = srid {
        writer.put_i32(srid.0);
    }

    match geometry.kind() {
        GeometryKind::Point(points) => {
            let point = points
                .first()
                .unwrap_or_else(|| Point4d::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN));
            writer.put_point(&point, flags);
        }
        GeometryKind::Line(points) | GeometryKind::CircularString(points) => write_points(writer, points, flags),
        GeometryKind::Triangle(points) => {
            if points.is_empty() {
                writer.put_u32(0);
            } else {
                writer.put_u32(1);
                write_points(writer, points, flags);
            }
        }
        GeometryKind::Polygon(rings) => {
            writer.put_u32(rings.len() as u32);
            for ring in rings {
                write_points(writer, ring, flags);
            }
        }
        GeometryKind::Collection { geometries, .. } => {
            writer.put_u32(geometries.len() as u32);
            for child in geometries {
                write_geometry(ctx, writer, child, options, None)?;
            }
        }
    }

    Ok(())
}

fn write_points(writer: &mut ByteWriter, points: &PointArray<'_>, flags: Flags) {
    writer.put_u32(points.len() as u32);
    for p in points.iter_points() {
        writer.put_point(&p, flags);
    }
}
