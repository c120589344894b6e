use std::fmt::{Display, Formatter, Result, Write};

use crate::geometry::{Geometry, GeometryKind, GeometryType};
use crate::point_array::{PointArray, PointSequence};

/// ISO WKT representation, e.g. `POINT Z (1 2 3)` or `POLYGON EMPTY`.
impl Display for Geometry<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.geometry_type().wkt_name())?;
        let suffix = self.flags.suffix();
        if !suffix.is_empty() {
            write!(f, " {suffix}")?;
        }
        f.write_char(' ')?;
        write_body(f, self)
    }
}

fn write_body(f: &mut Formatter<'_>, geometry: &Geometry<'_>) -> Result {
    if geometry.is_empty() {
        return f.write_str("EMPTY");
    }

    match &geometry.kind {
        GeometryKind::Point(points)
        | GeometryKind::Line(points)
        | GeometryKind::CircularString(points) => write_points(f, points),
        GeometryKind::Triangle(points) => write_rings(f, std::slice::from_ref(points)),
        GeometryKind::Polygon(rings) => write_rings(f, rings),
        GeometryKind::Collection {
            geometry_type,
            geometries,
        } => {
            let bare = bare_child_type(*geometry_type);
            f.write_char('(')?;
            for (i, child) in geometries.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }

                if Some(child.geometry_type()) != bare {
                    f.write_str(child.geometry_type().wkt_name())?;
                    f.write_char(' ')?;
                }

                write_body(f, child)?;
            }
            f.write_char(')')
        }
    }
}

/// Child type that is written without its type name inside a container of the given type.
fn bare_child_type(container: GeometryType) -> Option<GeometryType> {
    match container {
        GeometryType::MultiPoint => Some(GeometryType::Point),
        GeometryType::MultiLine | GeometryType::Compound | GeometryType::CurvePolygon | GeometryType::MultiCurve => {
            Some(GeometryType::Line)
        }
        GeometryType::MultiPolygon | GeometryType::MultiSurface | GeometryType::PolyhedralSurface => {
            Some(GeometryType::Polygon)
        }
        GeometryType::Tin => Some(GeometryType::Triangle),
        _ => None,
    }
}

fn write_points(f: &mut Formatter<'_>, points: &PointArray<'_>) -> Result {
    let flags = points.flags();
    f.write_char('(')?;
    for (i, p) in points.iter_points().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }

        write!(f, "{} {}", p.x, p.y)?;
        if flags.has_z {
            write!(f, " {}", p.z)?;
        }
        if flags.has_m {
            write!(f, " {}", p.m)?;
        }
    }
    f.write_char(')')
}

fn write_rings(f: &mut Formatter<'_>, rings: &[PointArray<'_>]) -> Result {
    f.write_char('(')?;
    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_points(f, ring)?;
    }
    f.write_char(')')
}
