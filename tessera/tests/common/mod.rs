#![allow(dead_code)]

use proptest::collection::vec;
use proptest::prelude::*;
use tessera::{Flags, Geometry, GeometryType, Point4d, PointArray, PointBuf, PointSequence, Srid};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn arb_flags() -> impl Strategy<Value = Flags> {
    (any::<bool>(), any::<bool>()).prop_map(|(has_z, has_m)| Flags::new(has_z, has_m))
}

fn coordinate() -> impl Strategy<Value = f64> {
    -1.0e6..1.0e6f64
}

pub fn arb_point(flags: Flags) -> impl Strategy<Value = Point4d> {
    (coordinate(), coordinate(), coordinate(), coordinate()).prop_map(move |(x, y, z, m)| {
        Point4d::new(
            x,
            y,
            if flags.has_z { z } else { 0.0 },
            if flags.has_m { m } else { 0.0 },
        )
    })
}

pub fn arb_points(flags: Flags, len: std::ops::Range<usize>) -> impl Strategy<Value = PointBuf> {
    vec(arb_point(flags), len).prop_map(move |points| PointBuf::from_points(flags, points))
}

fn arb_ring(flags: Flags) -> impl Strategy<Value = PointArray<'static>> {
    vec(arb_point(flags), 3..8).prop_map(move |mut points| {
        points.push(points[0]);
        PointBuf::from_points(flags, points).into()
    })
}

fn arb_point_geometry(flags: Flags) -> BoxedStrategy<Geometry<'static>> {
    prop_oneof![
        4 => arb_point(flags).prop_map(move |p| Geometry::from_point4d(Srid::UNKNOWN, flags, p)),
        1 => Just(Geometry::point_empty(Srid::UNKNOWN, flags)),
    ]
    .boxed()
}

fn arb_line(flags: Flags) -> BoxedStrategy<Geometry<'static>> {
    arb_points(flags, 2..10)
        .prop_map(|points| Geometry::line(Srid::UNKNOWN, points).unwrap())
        .boxed()
}

fn arb_circular_string(flags: Flags) -> BoxedStrategy<Geometry<'static>> {
    (1usize..4)
        .prop_flat_map(move |arcs| arb_points(flags, 2 * arcs + 1..2 * arcs + 2))
        .prop_map(|points| Geometry::circular_string(Srid::UNKNOWN, points).unwrap())
        .boxed()
}

fn arb_polygon(flags: Flags) -> BoxedStrategy<Geometry<'static>> {
    vec(arb_ring(flags), 0..3)
        .prop_map(move |rings| Geometry::polygon(Srid::UNKNOWN, flags, rings).unwrap())
        .boxed()
}

fn arb_triangle(flags: Flags) -> BoxedStrategy<Geometry<'static>> {
    vec(arb_point(flags), 3..4)
        .prop_map(move |mut points| {
            points.push(points[0]);
            Geometry::triangle(Srid::UNKNOWN, PointBuf::from_points(flags, points)).unwrap()
        })
        .boxed()
}

/// Segments of a compound curve, each starting where the previous one ends. Also returns the first point.
fn arb_segment_chain(flags: Flags) -> BoxedStrategy<(Point4d, Vec<Geometry<'static>>)> {
    (arb_point(flags), vec((any::<bool>(), vec(arb_point(flags), 2..4)), 1..4))
        .prop_map(move |(start, segments)| {
            let mut previous = start;
            let segments = segments
                .into_iter()
                .map(|(is_arc, mut points)| {
                    if is_arc {
                        points.truncate(2);
                    }
                    points.insert(0, previous);
                    previous = points[points.len() - 1];

                    let points = PointBuf::from_points(flags, points);
                    if is_arc {
                        Geometry::circular_string(Srid::UNKNOWN, points).unwrap()
                    } else {
                        Geometry::line(Srid::UNKNOWN, points).unwrap()
                    }
                })
                .collect();
            (start, segments)
        })
        .boxed()
}

fn arb_compound(flags: Flags) -> BoxedStrategy<Geometry<'static>> {
    arb_segment_chain(flags)
        .prop_map(move |(_, segments)| {
            Geometry::collection(GeometryType::Compound, Srid::UNKNOWN, flags, segments).unwrap()
        })
        .boxed()
}

/// Ring of a curve polygon: a closed line, a closed circular string or a closed compound curve.
fn arb_curve_ring(flags: Flags) -> BoxedStrategy<Geometry<'static>> {
    let line = arb_ring(flags).prop_map(|ring| Geometry::line(Srid::UNKNOWN, ring).unwrap());
    let arcs = (1usize..3)
        .prop_flat_map(move |arcs| vec(arb_point(flags), 2 * arcs..2 * arcs + 1))
        .prop_map(move |mut points| {
            points.push(points[0]);
            Geometry::circular_string(Srid::UNKNOWN, PointBuf::from_points(flags, points)).unwrap()
        });
    let compound = arb_segment_chain(flags).prop_map(move |(start, mut segments)| {
        let end = segments
            .last()
            .and_then(|segment| segment.point_array())
            .and_then(|points| points.last())
            .unwrap();
        segments.push(Geometry::line(Srid::UNKNOWN, PointBuf::from_points(flags, [end, start])).unwrap());
        Geometry::collection(GeometryType::Compound, Srid::UNKNOWN, flags, segments).unwrap()
    });

    prop_oneof![line, arcs, compound].boxed()
}

fn arb_curve_polygon(flags: Flags) -> BoxedStrategy<Geometry<'static>> {
    arb_collection_of(GeometryType::CurvePolygon, flags, arb_curve_ring(flags))
}

fn arb_curve(flags: Flags) -> BoxedStrategy<Geometry<'static>> {
    prop_oneof![arb_line(flags), arb_circular_string(flags), arb_compound(flags)].boxed()
}

fn arb_surface(flags: Flags) -> BoxedStrategy<Geometry<'static>> {
    prop_oneof![arb_polygon(flags), arb_curve_polygon(flags)].boxed()
}

fn arb_simple(flags: Flags) -> BoxedStrategy<Geometry<'static>> {
    prop_oneof![
        arb_point_geometry(flags),
        arb_line(flags),
        arb_circular_string(flags),
        arb_polygon(flags),
        arb_triangle(flags),
        arb_compound(flags),
        arb_curve_polygon(flags),
    ]
    .boxed()
}

fn arb_collection_of(
    geometry_type: GeometryType,
    flags: Flags,
    children: BoxedStrategy<Geometry<'static>>,
) -> BoxedStrategy<Geometry<'static>> {
    vec(children, 0..4)
        .prop_map(move |children| Geometry::collection(geometry_type, Srid::UNKNOWN, flags, children).unwrap())
        .boxed()
}

/// Any linear or curved geometry, including collections, with the given dimensions.
pub fn arb_geometry_with(flags: Flags) -> BoxedStrategy<Geometry<'static>> {
    prop_oneof![
        3 => arb_simple(flags),
        1 => arb_collection_of(GeometryType::MultiPoint, flags, arb_point_geometry(flags)),
        1 => arb_collection_of(GeometryType::MultiLine, flags, arb_line(flags)),
        1 => arb_collection_of(GeometryType::MultiPolygon, flags, arb_polygon(flags)),
        1 => arb_collection_of(GeometryType::MultiCurve, flags, arb_curve(flags)),
        1 => arb_collection_of(GeometryType::MultiSurface, flags, arb_surface(flags)),
        1 => arb_collection_of(GeometryType::PolyhedralSurface, flags, arb_polygon(flags)),
        1 => arb_collection_of(GeometryType::Tin, flags, arb_triangle(flags)),
        1 => arb_collection_of(GeometryType::Collection, flags, arb_simple(flags)),
    ]
    .boxed()
}

/// Any geometry of any dimensions, with an SRID that fits in the serialized form.
pub fn arb_geometry() -> impl Strategy<Value = Geometry<'static>> {
    (arb_flags().prop_flat_map(arb_geometry_with), 0..=Srid::MAXIMUM).prop_map(|(mut geometry, srid)| {
        geometry.set_srid(Srid(srid));
        geometry
    })
}

/// Lines and polygons on a part of the globe where no edge is close to antipodal.
pub fn arb_geodetic_geometry() -> impl Strategy<Value = Geometry<'static>> {
    let lon_lat = (-60.0..60.0f64, -60.0..60.0f64).prop_map(|(lon, lat)| Point4d::xy(lon, lat));
    let ring = vec(lon_lat.clone(), 3..8).prop_map(|mut points| {
        points.push(points[0]);
        PointArray::from(PointBuf::from_points(Flags::xy(), points))
    });

    prop_oneof![
        vec(lon_lat, 2..10).prop_map(|points| {
            Geometry::line(Srid(4326), PointBuf::from_points(Flags::xy(), points)).unwrap()
        }),
        vec(ring, 1..3).prop_map(|rings| Geometry::polygon(Srid(4326), Flags::xy(), rings).unwrap()),
    ]
    .prop_map(|mut geometry| {
        geometry.set_geodetic(true);
        geometry
    })
}
