use crate::affine::AffineTransform;
use crate::context::Context;
use crate::error::TesseraTypesError;
use crate::geometry::{Geometry, GeometryKind, GeometryType};
use crate::point::Point4d;
use crate::point_array::{PointArray, PointBuf, PointSequence};

impl Geometry<'_> {
    /// Fails with [`TesseraTypesError::ReadOnly`] if any coordinates are borrowed. Checked before any modification,
    /// so a failed transform leaves the geometry untouched.
    fn ensure_writable(&self) -> Result<(), TesseraTypesError> {
        if self.is_read_only() {
            Err(TesseraTypesError::ReadOnly)
        } else {
            Ok(())
        }
    }

    fn for_each_buf(&mut self, f: &mut impl FnMut(&mut PointBuf)) -> Result<(), TesseraTypesError> {
        self.bbox = None;
        match &mut self.kind {
            GeometryKind::Point(points)
            | GeometryKind::Line(points)
            | GeometryKind::CircularString(points)
            | GeometryKind::Triangle(points) => f(points.as_buf_mut()?),
            GeometryKind::Polygon(rings) => {
                for ring in rings {
                    f(ring.as_buf_mut()?);
                }
            }
            GeometryKind::Collection { geometries, .. } => {
                for child in geometries {
                    child.for_each_buf(f)?;
                }
            }
        }

        Ok(())
    }

    /// Reverses the order of the coordinates of every part. Compound curves also reverse the order of their segments
    /// to stay continuous.
    pub fn reverse(&mut self) -> Result<(), TesseraTypesError> {
        self.ensure_writable()?;
        self.for_each_buf(&mut |buf| buf.reverse())?;

        if let GeometryKind::Collection {
            geometry_type: GeometryType::Compound,
            geometries,
        } = &mut self.kind
        {
            geometries.reverse();
        }

        Ok(())
    }

    /// Applies an affine transformation to all coordinates. Z is transformed only if the geometry has it.
    pub fn affine(&mut self, transform: &AffineTransform) -> Result<(), TesseraTypesError> {
        self.ensure_writable()?;
        self.for_each_buf(&mut |buf| buf.affine(transform))
    }

    /// Multiplies every ordinate by the corresponding ordinate of `factor`.
    pub fn scale(&mut self, factor: &Point4d) -> Result<(), TesseraTypesError> {
        self.ensure_writable()?;
        self.for_each_buf(&mut |buf| buf.scale(factor))
    }

    /// Changes the dimensionality of the geometry. Added ordinates are zero.
    pub fn force_dims(&mut self, has_z: bool, has_m: bool) -> Result<(), TesseraTypesError> {
        self.ensure_writable()?;
        self.for_each_buf(&mut |buf| *buf = buf.force_dims(has_z, has_m))?;
        self.set_dims(has_z, has_m);

        Ok(())
    }

    fn set_dims(&mut self, has_z: bool, has_m: bool) {
        self.flags.has_z = has_z;
        self.flags.has_m = has_m;
        if let GeometryKind::Collection { geometries, .. } = &mut self.kind {
            for child in geometries {
                child.set_dims(has_z, has_m);
            }
        }
    }

    /// Removes consecutive coordinates closer than `tolerance` to each other from lines and polygon rings. Lines keep
    /// at least two points and rings at least four.
    pub fn remove_repeated_points(&mut self, tolerance: f64) -> Result<(), TesseraTypesError> {
        self.ensure_writable()?;
        self.bbox = None;

        match &mut self.kind {
            GeometryKind::Line(points) => {
                let buf = points.as_buf_mut()?;
                *buf = buf.remove_repeated_points(tolerance, 2);
            }
            GeometryKind::Polygon(rings) => {
                for ring in rings {
                    let buf = ring.as_buf_mut()?;
                    *buf = buf.remove_repeated_points(tolerance, 4);
                }
            }
            GeometryKind::Collection { geometries, .. } => {
                for child in geometries {
                    child.remove_repeated_points(tolerance)?;
                }
            }
            GeometryKind::Point(_) | GeometryKind::CircularString(_) | GeometryKind::Triangle(_) => {}
        }

        Ok(())
    }

    /// Returns a copy where no line or polygon ring segment is longer than `max_distance`. Other geometry types are
    /// copied as is.
    pub fn segmentize(&self, ctx: &Context, max_distance: f64) -> Result<Geometry<'static>, TesseraTypesError> {
        let segmentize = |points: &PointArray<'_>| -> Result<PointArray<'static>, TesseraTypesError> {
            Ok(points.segmentize(ctx, max_distance)?.into())
        };

        let kind = match &self.kind {
            GeometryKind::Line(points) => GeometryKind::Line(segmentize(points)?),
            GeometryKind::Polygon(rings) => {
                GeometryKind::Polygon(rings.iter().map(segmentize).collect::<Result<_, _>>()?)
            }
            GeometryKind::Collection {
                geometry_type,
                geometries,
            } => GeometryKind::Collection {
                geometry_type: *geometry_type,
                geometries: geometries
                    .iter()
                    .map(|g| g.segmentize(ctx, max_distance))
                    .collect::<Result<_, _>>()?,
            },
            GeometryKind::Point(_) | GeometryKind::CircularString(_) | GeometryKind::Triangle(_) => {
                return Ok(self.clone_deep());
            }
        };

        Geometry::new(self.srid, self.flags, kind)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::flags::{Flags, Srid};
    use crate::geometry::tests::{buf, line, polygon, square};

    fn coords(geometry: &Geometry<'_>) -> Vec<(f64, f64)> {
        geometry.points().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn reverse_compound_keeps_continuity() {
        let mut compound = Geometry::collection(
            GeometryType::Compound,
            Srid::UNKNOWN,
            Flags::xy(),
            vec![line(&[(0.0, 0.0), (1.0, 0.0)]), line(&[(1.0, 0.0), (2.0, 1.0)])],
        )
        .unwrap();

        compound.reverse().unwrap();
        assert_eq!(coords(&compound), vec![(2.0, 1.0), (1.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
    }

    #[test]
    fn affine_and_scale() {
        let mut poly = polygon(vec![square(0.0, 0.0, 1.0)]);
        poly.add_bbox().unwrap();

        poly.affine(&AffineTransform::translate(10.0, 0.0, 0.0)).unwrap();
        assert!(poly.bbox().is_none());
        assert_eq!(coords(&poly)[2], (11.0, 1.0));

        poly.scale(&Point4d::xy(2.0, 3.0)).unwrap();
        assert_eq!(coords(&poly)[2], (22.0, 3.0));
    }

    #[test]
    fn force_dims_updates_flags() {
        let mut collection = Geometry::collection(
            GeometryType::MultiLine,
            Srid::UNKNOWN,
            Flags::xy(),
            vec![line(&[(0.0, 0.0), (1.0, 1.0)])],
        )
        .unwrap();

        collection.force_dims(true, true).unwrap();
        assert_eq!(collection.flags(), Flags::xyzm());
        let child = &collection.geometries().unwrap()[0];
        assert_eq!(child.flags(), Flags::xyzm());
        assert_eq!(child.point_array().unwrap().flags(), Flags::xyzm());
        assert_eq!(child.points().next(), Some(Point4d::new(0.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn borrowed_geometries_are_read_only() {
        let owned = line(&[(0.0, 0.0), (1.0, 1.0)]);
        let mut shallow = owned.clone_shallow();
        assert_matches!(shallow.reverse(), Err(TesseraTypesError::ReadOnly));
        assert_matches!(shallow.force_dims(true, false), Err(TesseraTypesError::ReadOnly));
        assert_eq!(shallow, owned);

        shallow.set_srid(Srid(4326));
        assert_eq!(shallow.srid(), Srid(4326));
    }

    #[test]
    fn remove_repeated_points() {
        let mut geometry = line(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (1.0, 0.05), (2.0, 0.0)]);
        geometry.remove_repeated_points(0.1).unwrap();
        assert_eq!(coords(&geometry), vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    }

    #[test]
    fn segmentize_lines_and_rings() {
        let ctx = Context::new();
        let poly = polygon(vec![square(0.0, 0.0, 2.0)]);
        let segmentized = poly.segmentize(&ctx, 1.0).unwrap();
        assert_eq!(segmentized.num_points(), 9);
        assert_eq!(segmentized.area(), poly.area());

        let circle =
            Geometry::circular_string(Srid::UNKNOWN, buf(Flags::xy(), &[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]))
                .unwrap();
        assert_eq!(circle.segmentize(&ctx, 0.1).unwrap(), circle);
    }
}
