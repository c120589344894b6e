use tessera_types::{
    Context, Flags, Geometry, GeometryKind, GeometryType, ParseCheck, Point4d, PointArray, PointBuf, Srid,
    TesseraTypesError,
};

use crate::endian::Endianness;
use crate::error::TesseraWireError;
use crate::reader::{check_depth, ByteReader};
use crate::wkb::TypeWord;

/// Smallest possible encoded geometry: byte order, type word and a count.
const MIN_GEOMETRY_SIZE: usize = 1 + 4 + 4;

/// Decodes a WKB geometry of any variant.
///
/// A point with all coordinates NaN is read as an empty point. The decoded geometry is validated with `check`.
pub fn from_wkb(ctx: &Context, bytes: &[u8], check: ParseCheck) -> Result<Geometry<'static>, TesseraWireError> {
    let mut reader = ByteReader::new(bytes, Endianness::native());
    let geometry = read_geometry(ctx, &mut reader, Srid::UNKNOWN, 0)?;

    if reader.remaining() > 0 {
        ctx.notice(&format!(
            "ignoring {} bytes after the end of the WKB geometry",
            reader.remaining()
        ));
    }

    geometry.check(check)?;
    Ok(geometry)
}

/// Decodes hex encoded WKB text. Either letter case is accepted, surrounding whitespace is ignored.
pub fn from_wkb_hex(
    ctx: &Context,
    text: impl AsRef<[u8]>,
    check: ParseCheck,
) -> Result<Geometry<'static>, TesseraWireError> {
    let bytes = hex::decode(text.as_ref().trim_ascii())?;
    from_wkb(ctx, &bytes, check)
}

fn read_geometry(
    ctx: &Context,
    reader: &mut ByteReader<'_>,
    parent_srid: Srid,
    depth: usize,
) -> Result<Geometry<'static>, TesseraWireError> {
    check_depth(depth)?;
    ctx.check_interrupt()?;

    let endianness = Endianness::try_from(reader.read_u8()?)?;
    reader.set_endianness(endianness);

    let word = TypeWord::parse(reader.read_u32()?)?;
    let srid = if word.has_srid {
        Srid(reader.read_i32()?).clamp(ctx)
    } else {
        parent_srid
    };

    let flags = word.flags;
    log::trace!(
        "Reading WKB {}{} at offset {} ({endianness:?})",
        word.geometry_type,
        flags.suffix(),
        reader.position()
    );

    let kind = match word.geometry_type {
        GeometryType::Point => GeometryKind::Point(read_point(reader, flags)?),
        GeometryType::Line => GeometryKind::Line(read_points(reader, flags)?),
        GeometryType::CircularString => GeometryKind::CircularString(read_points(reader, flags)?),
        GeometryType::Polygon => {
            let nrings = reader.read_count(4)?;
            let rings = (0..nrings)
                .map(|_| read_points(reader, flags))
                .collect::<Result<Vec<_>, _>>()?;
            GeometryKind::Polygon(rings)
        }
        GeometryType::Triangle => {
            let points = match reader.read_count(4)? {
                0 => PointBuf::new(flags).into(),
                1 => read_points(reader, flags)?,
                nrings => {
                    return Err(TesseraTypesError::InvalidArgument(format!(
                        "triangle must have a single ring, got {nrings}"
                    ))
                    .into())
                }
            };
            GeometryKind::Triangle(points)
        }
        collection_type => {
            let count = reader.read_count(MIN_GEOMETRY_SIZE)?;
            let geometries = (0..count)
                .map(|_| read_geometry(ctx, reader, srid, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            GeometryKind::Collection {
                geometry_type: collection_type,
                geometries,
            }
        }
    };

    Ok(Geometry::new(srid, flags, kind)?)
}

fn read_ordinates(reader: &mut ByteReader<'_>, flags: Flags) -> Result<Point4d, TesseraWireError> {
    let x = reader.read_f64()?;
    let y = reader.read_f64()?;
    let z = if flags.has_z { reader.read_f64()? } else { 0.0 };
    let m = if flags.has_m { reader.read_f64()? } else { 0.0 };
    Ok(Point4d::new(x, y, z, m))
}

fn read_point(reader: &mut ByteReader<'_>, flags: Flags) -> Result<PointArray<'static>, TesseraWireError> {
    let p = read_ordinates(reader, flags)?;
    let is_empty = p.x.is_nan()
        && p.y.is_nan()
        && (!flags.has_z || p.z.is_nan())
        && (!flags.has_m || p.m.is_nan());

    let mut points = PointBuf::with_capacity(flags, 1);
    if !is_empty {
        points.append(p, true);
    }

    Ok(points.into())
}

fn read_points(reader: &mut ByteReader<'_>, flags: Flags) -> Result<PointArray<'static>, TesseraWireError> {
    let npoints = reader.read_count(flags.ndims() * 8)?;
    let mut points = PointBuf::with_capacity(flags, npoints);
    for _ in 0..npoints {
        points.append(read_ordinates(reader, flags)?, true);
    }

    Ok(points.into())
}
