//! Conversions between [`Geometry`] and `geo-types` geometries.
//!
//! `geo-types` only knows 2d linear geometries, so Z and M are dropped when converting to it, and curved types cannot
//! be converted.

use ::geo_types::{Coord, CoordNum};
use num_traits::Float;

use crate::error::TesseraTypesError;
use crate::flags::{Flags, Srid};
use crate::geodetic::GeoPoint;
use crate::geometry::{Geometry, GeometryKind, GeometryType};
use crate::point::Point4d;
use crate::point_array::{PointArray, PointBuf, PointSequence};

impl<T: CoordNum + Float> GeoPoint for ::geo_types::Point<T> {
    type Num = T;

    fn lat(&self) -> Self::Num {
        self.y()
    }

    fn lon(&self) -> Self::Num {
        self.x()
    }
}

fn points_from_coords(coords: impl IntoIterator<Item = Coord<f64>>) -> PointArray<'static> {
    PointBuf::from_points(Flags::xy(), coords.into_iter().map(|c| Point4d::xy(c.x, c.y))).into()
}

fn build(kind: GeometryKind<'static>) -> Geometry<'static> {
    Geometry {
        srid: Srid::UNKNOWN,
        flags: Flags::xy(),
        bbox: None,
        kind,
    }
}

fn build_collection(
    geometry_type: GeometryType,
    geometries: impl Iterator<Item = Geometry<'static>>,
) -> Geometry<'static> {
    build(GeometryKind::Collection {
        geometry_type,
        geometries: geometries.collect(),
    })
}

fn polygon_from_geo(polygon: ::geo_types::Polygon<f64>) -> Geometry<'static> {
    let (exterior, interiors) = polygon.into_inner();
    if exterior.0.is_empty() {
        return build(GeometryKind::Polygon(vec![]));
    }

    let rings = std::iter::once(exterior)
        .chain(interiors)
        .map(|ring| points_from_coords(ring.0))
        .collect();
    build(GeometryKind::Polygon(rings))
}

impl From<::geo_types::Geometry<f64>> for Geometry<'static> {
    fn from(value: ::geo_types::Geometry<f64>) -> Self {
        use ::geo_types::Geometry as G;

        match value {
            G::Point(point) => build(GeometryKind::Point(points_from_coords([point.0]))),
            G::Line(line) => build(GeometryKind::Line(points_from_coords([line.start, line.end]))),
            G::LineString(line) => build(GeometryKind::Line(points_from_coords(line.0))),
            G::Polygon(polygon) => polygon_from_geo(polygon),
            G::MultiPoint(points) => build_collection(
                GeometryType::MultiPoint,
                points.0.into_iter().map(|p| G::Point(p).into()),
            ),
            G::MultiLineString(lines) => build_collection(
                GeometryType::MultiLine,
                lines.0.into_iter().map(|l| G::LineString(l).into()),
            ),
            G::MultiPolygon(polygons) => {
                build_collection(GeometryType::MultiPolygon, polygons.0.into_iter().map(polygon_from_geo))
            }
            G::GeometryCollection(collection) => {
                build_collection(GeometryType::Collection, collection.0.into_iter().map(Geometry::from))
            }
            G::Rect(rect) => polygon_from_geo(rect.to_polygon()),
            G::Triangle(triangle) => build(GeometryKind::Triangle(points_from_coords([
                triangle.0, triangle.1, triangle.2, triangle.0,
            ]))),
        }
    }
}

fn coord(p: Point4d) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

fn line_string(points: &PointArray<'_>) -> ::geo_types::LineString<f64> {
    ::geo_types::LineString(points.iter_points().map(coord).collect())
}

fn polygon(rings: &[PointArray<'_>]) -> ::geo_types::Polygon<f64> {
    let mut rings = rings.iter().map(line_string);
    let exterior = rings.next().unwrap_or_else(|| ::geo_types::LineString(vec![]));
    ::geo_types::Polygon::new(exterior, rings.collect())
}

fn child_point(geometry: &Geometry<'_>) -> Result<::geo_types::Point<f64>, TesseraTypesError> {
    geometry
        .point_array()
        .and_then(|points| points.first())
        .map(|p| ::geo_types::Point(coord(p)))
        .ok_or_else(|| TesseraTypesError::Conversion("empty point cannot be converted".into()))
}

impl TryFrom<&Geometry<'_>> for ::geo_types::Geometry<f64> {
    type Error = TesseraTypesError;

    fn try_from(value: &Geometry<'_>) -> Result<Self, Self::Error> {
        use ::geo_types::Geometry as G;

        let unsupported = || TesseraTypesError::Unsupported {
            operation: "conversion to geo-types",
            geometry_type: value.geometry_type(),
        };

        let converted = match value.kind() {
            GeometryKind::Point(_) => G::Point(child_point(value)?),
            GeometryKind::Line(points) => G::LineString(line_string(points)),
            GeometryKind::Polygon(rings) => G::Polygon(polygon(rings)),
            GeometryKind::Triangle(points) => {
                let corner = |i| points.get_point(i).map(coord);
                G::Triangle(::geo_types::Triangle(corner(0)?, corner(1)?, corner(2)?))
            }
            GeometryKind::CircularString(_) => return Err(unsupported()),
            GeometryKind::Collection {
                geometry_type,
                geometries,
            } => match geometry_type {
                GeometryType::MultiPoint => G::MultiPoint(::geo_types::MultiPoint(
                    geometries.iter().map(child_point).collect::<Result<_, _>>()?,
                )),
                GeometryType::MultiLine => G::MultiLineString(::geo_types::MultiLineString(
                    geometries
                        .iter()
                        .filter_map(|g| g.point_array())
                        .map(line_string)
                        .collect(),
                )),
                GeometryType::MultiPolygon => G::MultiPolygon(::geo_types::MultiPolygon(
                    geometries.iter().filter_map(|g| g.rings()).map(polygon).collect(),
                )),
                GeometryType::Collection => G::GeometryCollection(::geo_types::GeometryCollection(
                    geometries.iter().map(G::try_from).collect::<Result<_, _>>()?,
                )),
                _ => return Err(unsupported()),
            },
        };

        Ok(converted)
    }
}
