use crate::arc::{arc_calculate_gbox_2d, arc_length};
use crate::error::TesseraTypesError;
use crate::gbox::GBox;
use crate::geometry::{Geometry, GeometryKind, GeometryType};
use crate::point_array::{PointArray, PointSequence};
use crate::stroke::stroke_geometry;

/// Number of segments per quadrant used when the area of a curved polygon is approximated.
const AREA_SEGMENTS_PER_QUADRANT: u32 = 32;

impl Geometry<'_> {
    /// Length of linear and curved geometries, using Z when present. Zero for points and surfaces.
    pub fn length(&self) -> f64 {
        self.length_impl(true)
    }

    /// Planar length of linear and curved geometries. Zero for points and surfaces.
    pub fn length_2d(&self) -> f64 {
        self.length_impl(false)
    }

    fn length_impl(&self, use_z: bool) -> f64 {
        match &self.kind {
            GeometryKind::Line(points) => line_length(points, use_z),
            GeometryKind::CircularString(points) => circular_string_length(points),
            GeometryKind::Collection {
                geometry_type,
                geometries,
            } => match geometry_type {
                GeometryType::CurvePolygon
                | GeometryType::MultiPolygon
                | GeometryType::MultiSurface
                | GeometryType::PolyhedralSurface
                | GeometryType::Tin => 0.0,
                _ => geometries.iter().map(|g| g.length_impl(use_z)).sum(),
            },
            GeometryKind::Point(_) | GeometryKind::Triangle(_) | GeometryKind::Polygon(_) => 0.0,
        }
    }

    /// Planar area of surfaces. Holes are subtracted from the exterior ring area. Curved polygons are approximated by
    /// stroking them first, which fails only if a ring is not a curve.
    pub fn area(&self) -> Result<f64, TesseraTypesError> {
        let area = match &self.kind {
            GeometryKind::Polygon(rings) => polygon_area(rings),
            GeometryKind::Triangle(points) => points.signed_area_2d().abs(),
            GeometryKind::Collection {
                geometry_type: GeometryType::CurvePolygon,
                ..
            } => {
                if self.is_empty() {
                    return Ok(0.0);
                }

                stroke_geometry(None, self, AREA_SEGMENTS_PER_QUADRANT)?.area()?
            }
            GeometryKind::Collection { geometries, .. } => {
                let mut area = 0.0;
                for geometry in geometries {
                    area += geometry.area()?;
                }
                area
            }
            GeometryKind::Point(_) | GeometryKind::Line(_) | GeometryKind::CircularString(_) => 0.0,
        };

        Ok(area)
    }

    /// Length of the boundary of surfaces, using Z when present. Zero for points and curves.
    pub fn perimeter(&self) -> f64 {
        self.perimeter_impl(true)
    }

    /// Planar length of the boundary of surfaces. Zero for points and curves.
    pub fn perimeter_2d(&self) -> f64 {
        self.perimeter_impl(false)
    }

    fn perimeter_impl(&self, use_z: bool) -> f64 {
        match &self.kind {
            GeometryKind::Polygon(rings) => rings.iter().map(|ring| line_length(ring, use_z)).sum(),
            GeometryKind::Triangle(points) => line_length(points, use_z),
            GeometryKind::Collection {
                geometry_type: GeometryType::CurvePolygon,
                geometries,
            } => geometries.iter().map(|ring| ring.length_impl(use_z)).sum(),
            GeometryKind::Collection { geometries, .. } => {
                geometries.iter().map(|g| g.perimeter_impl(use_z)).sum()
            }
            GeometryKind::Point(_) | GeometryKind::Line(_) | GeometryKind::CircularString(_) => 0.0,
        }
    }

    /// Calculates the bounding box from the coordinates, ignoring the cached one.
    ///
    /// Geodetic geometries get a geodetic box (see [`Geometry::calculate_gbox_geodetic`]). Returns `None` for empty
    /// geometries.
    pub fn calculate_gbox(&self) -> Result<Option<GBox>, TesseraTypesError> {
        if self.flags.geodetic {
            self.calculate_gbox_geodetic()
        } else {
            Ok(self.calculate_gbox_cartesian())
        }
    }

    /// Cartesian bounding box. Circular arcs contribute their exact extent rather than just their defining points.
    pub fn calculate_gbox_cartesian(&self) -> Option<GBox> {
        match &self.kind {
            GeometryKind::Point(points) | GeometryKind::Line(points) | GeometryKind::Triangle(points) => {
                points.calculate_gbox_cartesian()
            }
            GeometryKind::CircularString(points) => circular_string_gbox(points),
            GeometryKind::Polygon(rings) => rings
                .iter()
                .fold(None, |acc, ring| GBox::union(acc.as_ref(), ring.calculate_gbox_cartesian().as_ref())),
            GeometryKind::Collection { geometries, .. } => geometries
                .iter()
                .fold(None, |acc, g| GBox::union(acc.as_ref(), g.calculate_gbox_cartesian().as_ref())),
        }
    }
}

fn line_length(points: &PointArray<'_>, use_z: bool) -> f64 {
    if use_z {
        points.length_3d()
    } else {
        points.length_2d()
    }
}

fn circular_string_length(points: &PointArray<'_>) -> f64 {
    let mut length = 0.0;
    for i in (2..points.len()).step_by(2) {
        if let (Some(a1), Some(a2), Some(a3)) = (points.point(i - 2), points.point(i - 1), points.point(i)) {
            length += arc_length(&a1, &a2, &a3);
        }
    }

    length
}

fn circular_string_gbox(points: &PointArray<'_>) -> Option<GBox> {
    let flags = points.flags().with_geodetic(false);
    if points.len() < 3 {
        return points.calculate_gbox_cartesian();
    }

    let mut bbox: Option<GBox> = None;
    for i in (2..points.len()).step_by(2) {
        if let (Some(a1), Some(a2), Some(a3)) = (points.point(i - 2), points.point(i - 1), points.point(i)) {
            let arc_box = arc_calculate_gbox_2d(flags, &a1, &a2, &a3);
            bbox = GBox::union(bbox.as_ref(), Some(&arc_box));
        }
    }

    bbox
}

fn polygon_area(rings: &[PointArray<'_>]) -> f64 {
    let mut rings = rings.iter();
    let Some(exterior) = rings.next() else {
        return 0.0;
    };

    let holes: f64 = rings.map(|ring| ring.signed_area_2d().abs()).sum();
    exterior.signed_area_2d().abs() - holes
}
