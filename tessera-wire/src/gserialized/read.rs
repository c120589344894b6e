use tessera_types::geodetic::GEODETIC_BOX_FLAGS;
use tessera_types::{
    Context, Flags, GBox, Geometry, GeometryKind, GeometryType, PointArray, PointView, Srid,
};

use crate::endian::Endianness;
use crate::error::TesseraWireError;
use crate::gserialized::{GSerializedHeader, HEADER_SIZE};
use crate::reader::{check_depth, ByteReader};

/// Decodes a serialized geometry.
///
/// Coordinates are not copied: point arrays of the result are read-only views into `bytes`. Use
/// [`Geometry::into_owned`] to detach the geometry from the buffer. The stored bounding box, if any, becomes the
/// cached box of the geometry.
///
/// Bytes past the size declared in the header are ignored with a notice.
pub fn from_gserialized<'a>(ctx: &Context, bytes: &'a [u8]) -> Result<Geometry<'a>, TesseraWireError> {
    let header = GSerializedHeader::parse(bytes)?;
    if header.size > bytes.len() || header.size < HEADER_SIZE {
        return Err(TesseraWireError::DeclaredSize {
            declared: header.size,
            actual: bytes.len(),
        });
    }

    if header.size < bytes.len() {
        ctx.notice(&format!(
            "ignoring {} bytes after the end of the serialized geometry",
            bytes.len() - header.size
        ));
    }

    let mut reader = ByteReader::new(&bytes[..header.size], Endianness::LittleEndian);
    reader.skip(HEADER_SIZE)?;

    let bbox = if header.has_bbox {
        Some(read_bbox_floats(&mut reader, header.flags)?)
    } else {
        None
    };

    let mut geometry = read_payload(ctx, &mut reader, header.srid, header.flags, 0)?;
    if reader.remaining() > 0 {
        ctx.notice(&format!(
            "serialized geometry declares {} bytes more than its payload uses",
            reader.remaining()
        ));
    }

    log::trace!(
        "Decoded {} from {} bytes of serialized geometry",
        geometry.geometry_type(),
        header.size
    );

    geometry.set_bbox(bbox);
    Ok(geometry)
}

pub(super) fn read_bbox_floats(reader: &mut ByteReader<'_>, flags: Flags) -> Result<GBox, TesseraWireError> {
    let mut bbox = GBox::new(if flags.geodetic { GEODETIC_BOX_FLAGS } else { flags });
    bbox.xmin = reader.read_f32()? as f64;
    bbox.xmax = reader.read_f32()? as f64;
    bbox.ymin = reader.read_f32()? as f64;
    bbox.ymax = reader.read_f32()? as f64;

    if flags.geodetic || flags.has_z {
        bbox.zmin = reader.read_f32()? as f64;
        bbox.zmax = reader.read_f32()? as f64;
    }

    if !flags.geodetic && flags.has_m {
        bbox.mmin = reader.read_f32()? as f64;
        bbox.mmax = reader.read_f32()? as f64;
    }

    Ok(bbox)
}

fn read_payload<'a>(
    ctx: &Context,
    reader: &mut ByteReader<'a>,
    srid: Srid,
    flags: Flags,
    depth: usize,
) -> Result<Geometry<'a>, TesseraWireError> {
    check_depth(depth)?;
    ctx.check_interrupt()?;

    let code = reader.read_u32()?;
    let geometry_type = GeometryType::from_code(code).ok_or(TesseraWireError::UnknownType(code))?;

    let kind = match geometry_type {
        GeometryType::Point => GeometryKind::Point(read_points(reader, flags)?),
        GeometryType::Line => GeometryKind::Line(read_points(reader, flags)?),
        GeometryType::CircularString => GeometryKind::CircularString(read_points(reader, flags)?),
        GeometryType::Triangle => GeometryKind::Triangle(read_points(reader, flags)?),
        GeometryType::Polygon => GeometryKind::Polygon(read_rings(reader, flags)?),
        collection_type => {
            let count = reader.read_count(8)?;
            let mut geometries = Vec::with_capacity(count);
            for _ in 0..count {
                geometries.push(read_payload(ctx, reader, srid, flags, depth + 1)?);
            }

            GeometryKind::Collection {
                geometry_type: collection_type,
                geometries,
            }
        }
    };

    Ok(Geometry::new(srid, flags, kind)?)
}

fn coordinates<'a>(
    reader: &mut ByteReader<'a>,
    flags: Flags,
    npoints: usize,
) -> Result<PointArray<'a>, TesseraWireError> {
    let len = npoints.checked_mul(flags.ndims() * 8).ok_or(TesseraWireError::Truncated {
        offset: reader.position(),
        needed: usize::MAX,
        available: reader.remaining(),
    })?;

    let bytes = reader.take(len)?;
    Ok(PointView::from_le_bytes(flags, npoints, bytes)?.into())
}

fn read_points<'a>(reader: &mut ByteReader<'a>, flags: Flags) -> Result<PointArray<'a>, TesseraWireError> {
    let npoints = reader.read_count(flags.ndims() * 8)?;
    coordinates(reader, flags, npoints)
}

fn read_rings<'a>(reader: &mut ByteReader<'a>, flags: Flags) -> Result<Vec<PointArray<'a>>, TesseraWireError> {
    let nrings = reader.read_count(4)?;
    let sizes = (0..nrings)
        .map(|_| reader.read_u32().map(|size| size as usize))
        .collect::<Result<Vec<_>, _>>()?;

    if nrings % 2 == 1 {
        reader.skip(4)?;
    }

    sizes
        .into_iter()
        .map(|npoints| coordinates(reader, flags, npoints))
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use tessera_types::{GeometryType, Point4d, PointBuf, PointSequence, TesseraTypesError};

    use super::*;
    use crate::gserialized::to_gserialized;
    use crate::reader::MAX_NESTING_DEPTH;

    fn buf(flags: Flags, coords: &[(f64, f64)]) -> PointBuf {
        PointBuf::from_points(flags, coords.iter().map(|&(x, y)| Point4d::xy(x, y)))
    }

    fn unit_square() -> Geometry<'static> {
        let ring = buf(Flags::xy(), &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
        Geometry::polygon(Srid::UNKNOWN, Flags::xy(), vec![ring.into()]).unwrap()
    }

    #[test]
    fn point_round_trip() {
        let ctx = Context::new();
        let mut point = Geometry::from_point4d(Srid::UNKNOWN, Flags::xy(), Point4d::xy(1.5, -2.5));
        let bytes = to_gserialized(&ctx, &mut point).unwrap();

        let decoded = from_gserialized(&ctx, &bytes).unwrap();
        assert_eq!(decoded.geometry_type(), GeometryType::Point);
        assert_eq!(decoded.num_points(), 1);
        assert!(decoded.srid().is_unknown());

        let p = decoded.point_array().and_then(|points| points.first()).unwrap();
        assert_eq!((p.x, p.y), (1.5, -2.5));
        assert_eq!(decoded, point);
    }

    #[test]
    fn polygon_box_is_stored() {
        let ctx = Context::new();
        let mut polygon = unit_square();
        let bytes = to_gserialized(&ctx, &mut polygon).unwrap();

        let decoded = from_gserialized(&ctx, &bytes).unwrap();
        let bbox = decoded.bbox().unwrap();
        assert_eq!((bbox.xmin, bbox.xmax, bbox.ymin, bbox.ymax), (0.0, 1.0, 0.0, 1.0));
        assert_eq!(decoded, polygon);
    }

    #[test]
    fn decoded_arrays_borrow_input() {
        let ctx = Context::new();
        let mut line = Geometry::line(Srid(4326), buf(Flags::xym(), &[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)])).unwrap();
        let bytes = to_gserialized(&ctx, &mut line).unwrap();

        let mut decoded = from_gserialized(&ctx, &bytes).unwrap();
        assert!(decoded.is_read_only());
        assert_eq!(decoded.srid(), Srid(4326));
        assert_matches!(decoded.reverse(), Err(TesseraTypesError::ReadOnly));

        let mut owned = decoded.into_owned();
        assert!(owned.reverse().is_ok());
    }

    #[test]
    fn geodetic_box() {
        let ctx = Context::new();
        let ring = buf(Flags::xy(), &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
        let mut polygon = Geometry::polygon(Srid(4326), Flags::xy(), vec![ring.into()]).unwrap();
        polygon.set_geodetic(true);

        let bytes = to_gserialized(&ctx, &mut polygon).unwrap();
        let header = GSerializedHeader::parse(&bytes).unwrap();
        assert!(header.flags.geodetic);
        assert_eq!(header.bbox_size(), 24);

        let decoded = from_gserialized(&ctx, &bytes).unwrap();
        let stored = decoded.bbox().unwrap();
        let exact = polygon.calculate_gbox().unwrap().unwrap();
        assert!(stored.flags.geodetic);
        assert!(stored.contains(&exact));
        assert_abs_diff_eq!(stored.zmax, exact.zmax, epsilon = 1e-6);
    }

    #[test]
    fn nested_collections() {
        let ctx = Context::new();
        let square = unit_square();
        let multi = Geometry::collection(GeometryType::MultiPolygon, Srid::UNKNOWN, Flags::xy(), vec![square.clone()])
            .unwrap();
        let line = Geometry::line(Srid::UNKNOWN, buf(Flags::xy(), &[(5.0, 5.0), (6.0, 6.0)])).unwrap();
        let empty = Geometry::point_empty(Srid::UNKNOWN, Flags::xy());
        let mut collection = Geometry::collection(
            GeometryType::Collection,
            Srid(3857),
            Flags::xy(),
            vec![multi, line, empty],
        )
        .unwrap();

        let bytes = to_gserialized(&ctx, &mut collection).unwrap();
        let decoded = from_gserialized(&ctx, &bytes).unwrap();
        assert_eq!(decoded, collection);
        assert_eq!(decoded.geometries().map(|g| g[0].srid()), Some(Srid(3857)));
        assert!(decoded.geometries().unwrap()[2].is_empty());
    }

    #[test]
    fn truncated_input() {
        let ctx = Context::new();
        let mut polygon = unit_square();
        let bytes = to_gserialized(&ctx, &mut polygon).unwrap();

        assert_matches!(
            from_gserialized(&ctx, &bytes[..bytes.len() - 8]),
            Err(TesseraWireError::DeclaredSize { .. })
        );

        // keep the header consistent with the cut buffer, so the payload read runs out of data
        let mut cut = bytes[..bytes.len() - 8].to_vec();
        let cut_len = cut.len();
        cut[..4].copy_from_slice(&((cut_len as u32) << 2).to_le_bytes());
        assert_matches!(from_gserialized(&ctx, &cut), Err(TesseraWireError::Truncated { .. }));
    }

    fn nested_collections_bytes(levels: usize) -> Vec<u8> {
        let mut payload = Vec::new();
        for _ in 0..levels {
            payload.extend(GeometryType::Collection.code().to_le_bytes());
            payload.extend(1u32.to_le_bytes());
        }
        payload.extend(GeometryType::Line.code().to_le_bytes());
        payload.extend(0u32.to_le_bytes());

        let mut bytes = (((payload.len() + HEADER_SIZE) as u32) << 2).to_le_bytes().to_vec();
        bytes.extend([0, 0, 0, 0]);
        bytes.extend(payload);
        bytes
    }

    #[test]
    fn nesting_depth_is_limited() {
        let ctx = Context::new();

        let nested = nested_collections_bytes(MAX_NESTING_DEPTH);
        let geometry = from_gserialized(&ctx, &nested).unwrap();
        assert_eq!(geometry.geometry_type(), GeometryType::Collection);

        assert_matches!(
            from_gserialized(&ctx, &nested_collections_bytes(MAX_NESTING_DEPTH + 1)),
            Err(TesseraWireError::TooDeep(MAX_NESTING_DEPTH))
        );
        assert_matches!(
            from_gserialized(&ctx, &nested_collections_bytes(200_000)),
            Err(TesseraWireError::TooDeep(_))
        );
    }

    #[test]
    fn huge_counts_fail_before_allocating() {
        let ctx = Context::new();
        for code in [GeometryType::Line.code(), GeometryType::Polygon.code(), GeometryType::Collection.code()] {
            let mut bytes = (24u32 << 2).to_le_bytes().to_vec();
            bytes.extend([0, 0, 0, 0]);
            bytes.extend(code.to_le_bytes());
            bytes.extend(u32::MAX.to_le_bytes());
            bytes.extend([0; 8]);

            assert_matches!(from_gserialized(&ctx, &bytes), Err(TesseraWireError::Truncated { .. }));
        }
    }

    #[test]
    fn unknown_type_code() {
        let ctx = Context::new();
        let mut bytes = (16u32 << 2).to_le_bytes().to_vec();
        bytes.extend([0, 0, 0, 0]);
        bytes.extend(99u32.to_le_bytes());
        bytes.extend(0u32.to_le_bytes());

        assert_matches!(from_gserialized(&ctx, &bytes), Err(TesseraWireError::UnknownType(99)));
    }

    #[test]
    fn trailing_bytes_are_noticed() {
        use std::sync::{Arc, Mutex};

        let notices = Arc::new(Mutex::new(Vec::new()));
        let sink = notices.clone();
        let ctx = Context::builder()
            .notice_handler(move |message| sink.lock().unwrap().push(message.to_string()))
            .build();

        let mut point = Geometry::from_point4d(Srid::UNKNOWN, Flags::xy(), Point4d::xy(1.0, 2.0));
        let mut bytes = to_gserialized(&ctx, &mut point).unwrap().to_vec();
        bytes.extend([0; 4]);

        let decoded = from_gserialized(&ctx, &bytes).unwrap();
        assert_eq!(decoded, point);
        assert_eq!(notices.lock().unwrap().len(), 1);
    }
}
