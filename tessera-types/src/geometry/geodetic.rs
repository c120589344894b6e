use crate::error::TesseraTypesError;
use crate::gbox::GBox;
use crate::geodetic::{
    gbox_check_poles, gbox_pt_outside, ll2cart, ptarray_calculate_gbox_geodetic, ptarray_contains_point_sphere,
    sphere_distance, GeographicPoint, Sphere,
};
use crate::geometry::{Geometry, GeometryKind, GeometryType};
use crate::point::Point4d;
use crate::point_array::{PointArray, PointSequence};

impl Geometry<'_> {
    fn geodetic_unsupported(&self, operation: &'static str) -> TesseraTypesError {
        TesseraTypesError::Unsupported {
            operation,
            geometry_type: self.geometry_type(),
        }
    }

    /// Geodetic bounding box: the box of the unit-sphere vectors of all edges, treating coordinates as longitude and
    /// latitude in degrees. Surfaces get a polar enclosure correction.
    ///
    /// Curved geometries are not supported.
    pub fn calculate_gbox_geodetic(&self) -> Result<Option<GBox>, TesseraTypesError> {
        match &self.kind {
            GeometryKind::Point(points) | GeometryKind::Line(points) => ptarray_calculate_gbox_geodetic(points),
            GeometryKind::Triangle(points) => surface_gbox_geodetic(std::slice::from_ref(points)),
            GeometryKind::Polygon(rings) => surface_gbox_geodetic(rings),
            GeometryKind::CircularString(_) => Err(self.geodetic_unsupported("geodetic bounding box")),
            GeometryKind::Collection {
                geometry_type,
                geometries,
            } => {
                if geometry_type.is_curved() {
                    return Err(self.geodetic_unsupported("geodetic bounding box"));
                }

                let mut bbox: Option<GBox> = None;
                for child in geometries {
                    if let Some(child_box) = child.calculate_gbox_geodetic()? {
                        merge_into(&mut bbox, &child_box)?;
                    }
                }

                Ok(bbox)
            }
        }
    }

    /// Tests whether a polygon or multipolygon covers the point on the sphere. Points on the boundary are covered.
    ///
    /// The point is given as longitude/latitude in degrees.
    pub fn covers_point_geodetic(&self, point: &Point4d) -> Result<bool, TesseraTypesError> {
        match &self.kind {
            GeometryKind::Polygon(rings) => self.polygon_covers_point(rings, point),
            GeometryKind::Collection {
                geometry_type: GeometryType::MultiPolygon,
                geometries,
            } => {
                for child in geometries {
                    if child.covers_point_geodetic(point)? {
                        return Ok(true);
                    }
                }

                Ok(false)
            }
            _ => Err(self.geodetic_unsupported("geodetic point coverage")),
        }
    }

    fn polygon_covers_point(&self, rings: &[PointArray<'_>], point: &Point4d) -> Result<bool, TesseraTypesError> {
        if self.is_empty() {
            return Ok(false);
        }

        let bbox = match self.bbox {
            Some(bbox) if bbox.flags.geodetic => Some(bbox),
            _ => self.calculate_gbox_geodetic()?,
        };
        let Some(bbox) = bbox else {
            return Ok(false);
        };

        if !bbox.contains_point3d(&ll2cart(point.x, point.y)) {
            return Ok(false);
        }

        let outside = gbox_pt_outside(&bbox)?;

        let mut rings = rings.iter();
        let Some(exterior) = rings.next() else {
            return Ok(false);
        };
        if !ptarray_contains_point_sphere(exterior, &outside, point) {
            return Ok(false);
        }

        let holes = rings
            .filter(|ring| ptarray_contains_point_sphere(*ring, &outside, point))
            .count();

        Ok(holes % 2 == 0)
    }

    /// Length of lines (and polygon boundaries) along great circles of the sphere, in the units of the sphere radius.
    /// Z differences are added when the geometry has Z.
    pub fn length_sphere(&self, sphere: &Sphere) -> Result<f64, TesseraTypesError> {
        match &self.kind {
            GeometryKind::Point(_) => Ok(0.0),
            GeometryKind::Line(points) | GeometryKind::Triangle(points) => Ok(ptarray_length_sphere(points, sphere)),
            GeometryKind::Polygon(rings) => Ok(rings.iter().map(|ring| ptarray_length_sphere(ring, sphere)).sum()),
            GeometryKind::CircularString(_) => Err(self.geodetic_unsupported("spherical length")),
            GeometryKind::Collection {
                geometry_type,
                geometries,
            } => {
                if geometry_type.is_curved() {
                    return Err(self.geodetic_unsupported("spherical length"));
                }

                geometries.iter().map(|g| g.length_sphere(sphere)).sum()
            }
        }
    }

    /// Checks that all coordinates are valid longitude/latitude values in degrees.
    pub fn check_geodetic(&self) -> Result<(), TesseraTypesError> {
        let in_range = |p: Point4d| (-180.0..=180.0).contains(&p.x) && (-90.0..=90.0).contains(&p.y);
        if self.points().all(in_range) {
            Ok(())
        } else {
            Err(TesseraTypesError::GeodeticRange)
        }
    }
}

fn merge_into(bbox: &mut Option<GBox>, other: &GBox) -> Result<(), TesseraTypesError> {
    match bbox {
        Some(bbox) => bbox.merge(other),
        None => {
            *bbox = Some(*other);
            Ok(())
        }
    }
}

fn surface_gbox_geodetic(rings: &[PointArray<'_>]) -> Result<Option<GBox>, TesseraTypesError> {
    let mut bbox: Option<GBox> = None;
    for ring in rings {
        if let Some(ring_box) = ptarray_calculate_gbox_geodetic(ring)? {
            merge_into(&mut bbox, &ring_box)?;
        }
    }

    if let Some(bbox) = &mut bbox {
        gbox_check_poles(bbox);
    }

    Ok(bbox)
}

fn ptarray_length_sphere(points: &PointArray<'_>, sphere: &Sphere) -> f64 {
    let has_z = points.flags().has_z;
    points
        .iter_segments()
        .map(|(a, b)| {
            let distance = sphere.arc_length(sphere_distance(
                &GeographicPoint::from_degrees(a.x, a.y),
                &GeographicPoint::from_degrees(b.x, b.y),
            ));

            if has_z {
                let dz = b.z - a.z;
                (distance * distance + dz * dz).sqrt()
            } else {
                distance
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;
    use assert_matches::assert_matches;

    use super::*;
    use crate::flags::{Flags, Srid};
    use crate::geometry::tests::buf;
    use crate::point_array::PointBuf;

    fn geodetic() -> Flags {
        Flags::xy().with_geodetic(true)
    }

    fn ring(coords: &[(f64, f64)]) -> PointArray<'static> {
        buf(geodetic(), coords).into()
    }

    fn square_ring(x: f64, y: f64, size: f64) -> PointArray<'static> {
        ring(&[(x, y), (x + size, y), (x + size, y + size), (x, y + size), (x, y)])
    }

    fn polygon(rings: Vec<PointArray<'static>>) -> Geometry<'static> {
        Geometry::polygon(Srid(4326), geodetic(), rings).unwrap()
    }

    #[test]
    fn polygon_box_contains_vertices() {
        let poly = polygon(vec![square_ring(0.0, 0.0, 10.0)]);
        let bbox = poly.calculate_gbox().unwrap().unwrap();
        assert!(bbox.flags.geodetic);

        for p in poly.points() {
            let v = ll2cart(p.x, p.y);
            let mut grown = bbox;
            grown.expand(1e-12);
            assert!(grown.contains_point3d(&v));
        }
    }

    #[test]
    fn polar_polygon_box_reaches_pole() {
        let poly = polygon(vec![ring(&[
            (0.0, 80.0),
            (90.0, 80.0),
            (180.0, 80.0),
            (-90.0, 80.0),
            (0.0, 80.0),
        ])]);
        let bbox = poly.calculate_gbox_geodetic().unwrap().unwrap();
        assert_eq!(bbox.zmax, 1.0);
    }

    #[test]
    fn covers_point() {
        let poly = polygon(vec![square_ring(0.0, 0.0, 10.0)]);
        assert!(poly.covers_point_geodetic(&Point4d::xy(5.0, 5.0)).unwrap());
        assert!(!poly.covers_point_geodetic(&Point4d::xy(20.0, 5.0)).unwrap());
        assert!(!poly.covers_point_geodetic(&Point4d::xy(-150.0, -40.0)).unwrap());

        let with_hole = polygon(vec![square_ring(0.0, 0.0, 10.0), square_ring(4.0, 4.0, 2.0)]);
        assert!(!with_hole.covers_point_geodetic(&Point4d::xy(5.0, 5.0)).unwrap());
        assert!(with_hole.covers_point_geodetic(&Point4d::xy(2.0, 2.0)).unwrap());

        let multi = Geometry::collection(
            GeometryType::MultiPolygon,
            Srid(4326),
            geodetic(),
            vec![polygon(vec![square_ring(20.0, 20.0, 5.0)]), with_hole],
        )
        .unwrap();
        assert!(multi.covers_point_geodetic(&Point4d::xy(22.0, 22.0)).unwrap());
        assert!(multi.covers_point_geodetic(&Point4d::xy(2.0, 2.0)).unwrap());
        assert!(!multi.covers_point_geodetic(&Point4d::xy(15.0, 15.0)).unwrap());
    }

    #[test]
    fn covers_point_requires_polygons() {
        let line = Geometry::line(Srid(4326), buf(geodetic(), &[(0.0, 0.0), (1.0, 1.0)])).unwrap();
        assert_matches!(
            line.covers_point_geodetic(&Point4d::xy(0.0, 0.0)),
            Err(TesseraTypesError::Unsupported {
                geometry_type: GeometryType::Line,
                ..
            })
        );
    }

    #[test]
    fn sphere_length() {
        let unit = Sphere { radius: 1.0 };
        let line = Geometry::line(Srid(4326), buf(geodetic(), &[(0.0, 0.0), (90.0, 0.0), (90.0, 90.0)])).unwrap();
        assert_relative_eq!(line.length_sphere(&unit).unwrap(), 2.0 * FRAC_PI_2, epsilon = 1e-12);

        let line_3d = Geometry::line(
            Srid(4326),
            PointBuf::from_points(
                Flags::xyz().with_geodetic(true),
                [Point4d::xyz(0.0, 0.0, 0.0), Point4d::xyz(0.0, 0.0, 2.0)],
            ),
        )
        .unwrap();
        assert_relative_eq!(line_3d.length_sphere(&unit).unwrap(), 2.0);
    }

    #[test]
    fn curves_are_unsupported() {
        let arc = Geometry::circular_string(Srid(4326), buf(geodetic(), &[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]))
            .unwrap();
        assert_matches!(arc.calculate_gbox(), Err(TesseraTypesError::Unsupported { .. }));
        assert_matches!(
            arc.length_sphere(&Sphere::default()),
            Err(TesseraTypesError::Unsupported { .. })
        );
    }

    #[test]
    fn range_check() {
        assert!(polygon(vec![square_ring(170.0, 80.0, 10.0)]).check_geodetic().is_ok());
        let line = Geometry::line(Srid(4326), buf(geodetic(), &[(0.0, 0.0), (200.0, 0.0)])).unwrap();
        assert_matches!(line.check_geodetic(), Err(TesseraTypesError::GeodeticRange));
    }
}
