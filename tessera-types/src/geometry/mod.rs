//! Geometry object model.
//!
//! A [`Geometry`] is a tagged variant ([`GeometryKind`]) plus the properties every geometry has: SRID, dimensionality
//! flags and an optional cached bounding box. Single-array types (points, lines, circular strings, triangles) own a
//! [`PointArray`], polygons own their rings, and all container types (multi-geometries, compound curves, curve polygons,
//! collections) own their child geometries.
//!
//! The lifetime parameter is the lifetime of the storage borrowed by [`PointArray::Borrowed`] arrays. Geometries built
//! from owned buffers are `Geometry<'static>`.

mod geodetic;
mod geometry_type;
#[cfg(feature = "geo-types")]
mod interop;
mod measure;
mod transform;
mod wkt;

pub use geometry_type::GeometryType;

use serde::{Deserialize, Serialize};

use crate::error::TesseraTypesError;
use crate::flags::{Flags, Srid};
use crate::gbox::GBox;
use crate::point::Point4d;
use crate::point_array::{PointArray, PointBuf, PointSequence};

/// Structural checks applied when a geometry is constructed or decoded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseCheck {
    /// Lines need at least 2 points, circular strings 3, polygon rings and triangles 4.
    pub min_points: bool,
    /// Polygon rings, triangles and curve polygon rings must be closed in 2d. Compound curve segments must connect.
    pub closure: bool,
    /// Circular strings must have an odd number of points.
    pub odd_points: bool,
}

impl ParseCheck {
    /// No checks.
    pub const NONE: Self = Self {
        min_points: false,
        closure: false,
        odd_points: false,
    };

    /// All checks.
    pub const ALL: Self = Self {
        min_points: true,
        closure: true,
        odd_points: true,
    };
}

impl Default for ParseCheck {
    fn default() -> Self {
        Self::ALL
    }
}

/// Shape-specific contents of a geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryKind<'a> {
    /// Point. The array holds zero (empty point) or one point.
    Point(PointArray<'a>),
    /// Line string.
    Line(PointArray<'a>),
    /// Circular string: consecutive arcs sharing end points.
    CircularString(PointArray<'a>),
    /// Triangle, stored as a closed ring of four points.
    Triangle(PointArray<'a>),
    /// Polygon. The first ring is the exterior.
    Polygon(Vec<PointArray<'a>>),
    /// Any container type.
    Collection {
        /// Container type.
        geometry_type: GeometryType,
        /// Children, in order.
        geometries: Vec<Geometry<'a>>,
    },
}

impl GeometryKind<'_> {
    /// Type tag of the geometry.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Self::Point(_) => GeometryType::Point,
            Self::Line(_) => GeometryType::Line,
            Self::CircularString(_) => GeometryType::CircularString,
            Self::Triangle(_) => GeometryType::Triangle,
            Self::Polygon(_) => GeometryType::Polygon,
            Self::Collection { geometry_type, .. } => *geometry_type,
        }
    }
}

/// A geometry of any type.
#[derive(Debug, Clone)]
pub struct Geometry<'a> {
    srid: Srid,
    flags: Flags,
    bbox: Option<GBox>,
    kind: GeometryKind<'a>,
}

impl<'a> Geometry<'a> {
    /// Assembles a geometry from its parts.
    ///
    /// Validates only the structure: all point arrays and children must have the dimensions of `flags`, a point can
    /// have at most one coordinate, and containers must be container types and accept the type of every child. Point
    /// counts and ring closure are not checked, use [`Geometry::check`] for that.
    ///
    /// The geodetic flag and the SRID are propagated to all parts.
    pub fn new(srid: Srid, flags: Flags, kind: GeometryKind<'a>) -> Result<Self, TesseraTypesError> {
        let geometry_type = kind.geometry_type();
        let check_dims = |other: Flags| {
            if other.same_dims(&flags) {
                Ok(())
            } else {
                Err(TesseraTypesError::DimensionMismatch(format!(
                    "{geometry_type} XY{} cannot contain XY{} parts",
                    flags.suffix(),
                    other.suffix()
                )))
            }
        };

        match &kind {
            GeometryKind::Point(points) => {
                check_dims(points.flags())?;
                if points.len() > 1 {
                    return Err(TesseraTypesError::InvalidArgument(format!(
                        "point cannot have {} coordinates",
                        points.len()
                    )));
                }
            }
            GeometryKind::Line(points) | GeometryKind::CircularString(points) | GeometryKind::Triangle(points) => {
                check_dims(points.flags())?
            }
            GeometryKind::Polygon(rings) => {
                for ring in rings {
                    check_dims(ring.flags())?;
                }
            }
            GeometryKind::Collection {
                geometry_type,
                geometries,
            } => {
                if !geometry_type.is_collection() {
                    return Err(TesseraTypesError::InvalidArgument(format!(
                        "{geometry_type} is not a collection type"
                    )));
                }

                for child in geometries {
                    if !geometry_type.allows_subtype(child.geometry_type()) {
                        return Err(TesseraTypesError::InvalidSubtype {
                            parent: *geometry_type,
                            child: child.geometry_type(),
                        });
                    }

                    check_dims(child.flags)?;
                }
            }
        }

        let mut geometry = Self {
            srid,
            flags,
            bbox: None,
            kind,
        };
        geometry.set_geodetic(flags.geodetic);
        geometry.set_srid(srid);

        Ok(geometry)
    }

    fn checked(srid: Srid, flags: Flags, kind: GeometryKind<'a>) -> Result<Self, TesseraTypesError> {
        let geometry = Self::new(srid, flags, kind)?;
        geometry.check(ParseCheck::ALL)?;
        Ok(geometry)
    }

    /// Point with the given single coordinate (or no coordinate).
    pub fn point(srid: Srid, points: impl Into<PointArray<'a>>) -> Result<Self, TesseraTypesError> {
        let points = points.into();
        Self::new(srid, points.flags(), GeometryKind::Point(points))
    }

    /// Empty point.
    pub fn point_empty(srid: Srid, flags: Flags) -> Self {
        Self {
            srid,
            flags,
            bbox: None,
            kind: GeometryKind::Point(PointArray::empty(flags)),
        }
    }

    /// Line string. Non-empty lines need at least two points.
    pub fn line(srid: Srid, points: impl Into<PointArray<'a>>) -> Result<Self, TesseraTypesError> {
        let points = points.into();
        Self::checked(srid, points.flags(), GeometryKind::Line(points))
    }

    /// Circular string. Non-empty strings need an odd number of points, at least three.
    pub fn circular_string(srid: Srid, points: impl Into<PointArray<'a>>) -> Result<Self, TesseraTypesError> {
        let points = points.into();
        Self::checked(srid, points.flags(), GeometryKind::CircularString(points))
    }

    /// Triangle. Non-empty triangles need a closed ring of four points.
    pub fn triangle(srid: Srid, points: impl Into<PointArray<'a>>) -> Result<Self, TesseraTypesError> {
        let points = points.into();
        Self::checked(srid, points.flags(), GeometryKind::Triangle(points))
    }

    /// Polygon from its rings, exterior first. Every ring must be closed and have at least four points.
    pub fn polygon(srid: Srid, flags: Flags, rings: Vec<PointArray<'a>>) -> Result<Self, TesseraTypesError> {
        Self::checked(srid, flags, GeometryKind::Polygon(rings))
    }

    /// Container geometry of the given type. Compound curve segments must connect and curve polygon rings must be
    /// closed.
    pub fn collection(
        geometry_type: GeometryType,
        srid: Srid,
        flags: Flags,
        geometries: Vec<Geometry<'a>>,
    ) -> Result<Self, TesseraTypesError> {
        Self::checked(
            srid,
            flags,
            GeometryKind::Collection {
                geometry_type,
                geometries,
            },
        )
    }

    /// Empty geometry of any type.
    pub fn empty(geometry_type: GeometryType, srid: Srid, flags: Flags) -> Self {
        let points = || PointArray::empty(flags);
        let kind = match geometry_type {
            GeometryType::Point => GeometryKind::Point(points()),
            GeometryType::Line => GeometryKind::Line(points()),
            GeometryType::CircularString => GeometryKind::CircularString(points()),
            GeometryType::Triangle => GeometryKind::Triangle(points()),
            GeometryType::Polygon => GeometryKind::Polygon(vec![]),
            geometry_type => GeometryKind::Collection {
                geometry_type,
                geometries: vec![],
            },
        };

        Self {
            srid,
            flags,
            bbox: None,
            kind,
        }
    }

    /// Runs the given structural checks on this geometry and all its parts.
    pub fn check(&self, check: ParseCheck) -> Result<(), TesseraTypesError> {
        let geometry_type = self.geometry_type();
        let too_few = |required: usize, actual: usize| TesseraTypesError::TooFewPoints {
            geometry_type,
            required,
            actual,
        };

        match &self.kind {
            GeometryKind::Point(_) => {}
            GeometryKind::Line(points) => {
                if check.min_points && !points.is_empty() && points.len() < 2 {
                    return Err(too_few(2, points.len()));
                }
            }
            GeometryKind::CircularString(points) => {
                if points.is_empty() {
                    return Ok(());
                }
                if check.min_points && points.len() < 3 {
                    return Err(too_few(3, points.len()));
                }
                if check.odd_points && points.len() % 2 == 0 {
                    return Err(TesseraTypesError::EvenPointCount(geometry_type));
                }
            }
            GeometryKind::Triangle(points) => check_ring(points, check, geometry_type)?,
            GeometryKind::Polygon(rings) => {
                for ring in rings {
                    check_ring(ring, check, geometry_type)?;
                }
            }
            GeometryKind::Collection { geometries, .. } => {
                for child in geometries {
                    child.check(check)?;
                }

                if check.closure {
                    match geometry_type {
                        GeometryType::Compound => check_continuity(geometries)?,
                        GeometryType::CurvePolygon => {
                            for ring in geometries {
                                if let Some((start, end)) = ring.end_points() {
                                    if !start.same_2d(&end) {
                                        return Err(TesseraTypesError::RingNotClosed(geometry_type));
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        Ok(())
    }

    /// First and last point of a curve. `None` for empty curves and non-curve types.
    fn end_points(&self) -> Option<(Point4d, Point4d)> {
        match &self.kind {
            GeometryKind::Line(points) | GeometryKind::CircularString(points) => Some((points.first()?, points.last()?)),
            GeometryKind::Collection {
                geometry_type: GeometryType::Compound,
                geometries,
            } => {
                let mut ends = geometries.iter().filter_map(Geometry::end_points);
                let (start, mut end) = ends.next()?;
                for (_, segment_end) in ends {
                    end = segment_end;
                }
                Some((start, end))
            }
            _ => None,
        }
    }

    /// Spatial reference id.
    pub fn srid(&self) -> Srid {
        self.srid
    }

    /// Dimensionality and coordinate model.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Shape-specific contents.
    pub fn kind(&self) -> &GeometryKind<'a> {
        &self.kind
    }

    /// Consumes the geometry, returning its contents.
    pub fn into_kind(self) -> GeometryKind<'a> {
        self.kind
    }

    /// Type tag.
    pub fn geometry_type(&self) -> GeometryType {
        self.kind.geometry_type()
    }

    /// Coordinates of single-array types (point, line, circular string, triangle).
    pub fn point_array(&self) -> Option<&PointArray<'a>> {
        match &self.kind {
            GeometryKind::Point(points)
            | GeometryKind::Line(points)
            | GeometryKind::CircularString(points)
            | GeometryKind::Triangle(points) => Some(points),
            _ => None,
        }
    }

    /// Rings of a polygon.
    pub fn rings(&self) -> Option<&[PointArray<'a>]> {
        match &self.kind {
            GeometryKind::Polygon(rings) => Some(rings),
            _ => None,
        }
    }

    /// Children of a container geometry.
    pub fn geometries(&self) -> Option<&[Geometry<'a>]> {
        match &self.kind {
            GeometryKind::Collection { geometries, .. } => Some(geometries),
            _ => None,
        }
    }

    /// Returns true if the geometry has no coordinates.
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            GeometryKind::Point(points)
            | GeometryKind::Line(points)
            | GeometryKind::CircularString(points)
            | GeometryKind::Triangle(points) => points.is_empty(),
            GeometryKind::Polygon(rings) => rings.first().map_or(true, |ring| ring.is_empty()),
            GeometryKind::Collection { geometries, .. } => geometries.iter().all(|g| g.is_empty()),
        }
    }

    /// Total number of coordinates in the geometry and all its parts.
    pub fn num_points(&self) -> usize {
        match &self.kind {
            GeometryKind::Point(points)
            | GeometryKind::Line(points)
            | GeometryKind::CircularString(points)
            | GeometryKind::Triangle(points) => points.len(),
            GeometryKind::Polygon(rings) => rings.iter().map(|ring| ring.len()).sum(),
            GeometryKind::Collection { geometries, .. } => geometries.iter().map(|g| g.num_points()).sum(),
        }
    }

    /// Number of children of a container geometry, `1` for all other types.
    pub fn num_geometries(&self) -> usize {
        match &self.kind {
            GeometryKind::Collection { geometries, .. } => geometries.len(),
            _ => 1,
        }
    }

    /// Topological dimension: 0 for points, 1 for curves, 2 for surfaces. Heterogeneous collections report the
    /// largest dimension of their children.
    pub fn dimension(&self) -> u8 {
        match self.geometry_type() {
            GeometryType::Point | GeometryType::MultiPoint => 0,
            GeometryType::Line
            | GeometryType::CircularString
            | GeometryType::Compound
            | GeometryType::MultiLine
            | GeometryType::MultiCurve => 1,
            GeometryType::Polygon
            | GeometryType::Triangle
            | GeometryType::CurvePolygon
            | GeometryType::MultiPolygon
            | GeometryType::MultiSurface
            | GeometryType::PolyhedralSurface
            | GeometryType::Tin => 2,
            GeometryType::Collection => self
                .geometries()
                .and_then(|children| children.iter().map(|g| g.dimension()).max())
                .unwrap_or(0),
        }
    }

    /// Iterates over all coordinates of the geometry, depth first.
    pub fn points(&self) -> Box<dyn Iterator<Item = Point4d> + '_> {
        match &self.kind {
            GeometryKind::Point(points)
            | GeometryKind::Line(points)
            | GeometryKind::CircularString(points)
            | GeometryKind::Triangle(points) => Box::new(points.iter_points()),
            GeometryKind::Polygon(rings) => Box::new(rings.iter().flat_map(|ring| ring.iter_points())),
            GeometryKind::Collection { geometries, .. } => Box::new(geometries.iter().flat_map(|g| g.points())),
        }
    }

    /// Cached bounding box, if one was added.
    pub fn bbox(&self) -> Option<&GBox> {
        self.bbox.as_ref()
    }

    /// Replaces the cached bounding box. The box is trusted to cover the geometry.
    pub fn set_bbox(&mut self, bbox: Option<GBox>) {
        self.bbox = bbox;
    }

    /// Returns the cached box, or calculates one.
    pub fn gbox(&self) -> Result<Option<GBox>, TesseraTypesError> {
        match self.bbox {
            Some(bbox) => Ok(Some(bbox)),
            None => self.calculate_gbox(),
        }
    }

    /// Returns true if it is worth storing a bounding box with the geometry.
    ///
    /// Points, lines of two points and single-point or single two-point-line multi-geometries can produce their box
    /// from the coordinates directly.
    pub fn needs_bbox(&self) -> bool {
        match &self.kind {
            GeometryKind::Point(_) => false,
            GeometryKind::Line(points) => points.len() > 2,
            GeometryKind::Collection {
                geometry_type: GeometryType::MultiPoint,
                geometries,
            } => geometries.len() != 1,
            GeometryKind::Collection {
                geometry_type: GeometryType::MultiLine,
                geometries,
            } => geometries.len() != 1 || self.num_points() > 2,
            _ => true,
        }
    }

    /// Calculates and caches the bounding box, unless the geometry is empty or already has one.
    pub fn add_bbox(&mut self) -> Result<(), TesseraTypesError> {
        if self.bbox.is_none() && !self.is_empty() {
            self.bbox = self.calculate_gbox()?;
        }

        Ok(())
    }

    /// Drops cached bounding boxes of the geometry and all its children.
    pub fn drop_bbox(&mut self) {
        self.bbox = None;
        if let GeometryKind::Collection { geometries, .. } = &mut self.kind {
            for child in geometries {
                child.drop_bbox();
            }
        }
    }

    /// Sets the SRID of the geometry and all its children.
    pub fn set_srid(&mut self, srid: Srid) {
        self.srid = srid;
        if let GeometryKind::Collection { geometries, .. } = &mut self.kind {
            for child in geometries {
                child.set_srid(srid);
            }
        }
    }

    /// Switches between the cartesian and the geodetic coordinate model. Coordinates are not changed, but the cached
    /// box is dropped since its meaning changes.
    pub fn set_geodetic(&mut self, geodetic: bool) {
        if self.flags.geodetic != geodetic {
            self.bbox = None;
        }

        self.flags.geodetic = geodetic;
        match &mut self.kind {
            GeometryKind::Point(points)
            | GeometryKind::Line(points)
            | GeometryKind::CircularString(points)
            | GeometryKind::Triangle(points) => points.set_geodetic(geodetic),
            GeometryKind::Polygon(rings) => rings.iter_mut().for_each(|ring| ring.set_geodetic(geodetic)),
            GeometryKind::Collection { geometries, .. } => {
                for child in geometries {
                    child.set_geodetic(geodetic);
                }
            }
        }
    }

    /// Copy of the geometry that reads coordinates from this geometry's storage instead of copying them. The copy is
    /// read-only: in-place transforms on it fail.
    pub fn clone_shallow(&self) -> Geometry<'_> {
        fn view<'b>(points: &'b PointArray<'_>) -> PointArray<'b> {
            points.view().into()
        }

        let kind = match &self.kind {
            GeometryKind::Point(points) => GeometryKind::Point(view(points)),
            GeometryKind::Line(points) => GeometryKind::Line(view(points)),
            GeometryKind::CircularString(points) => GeometryKind::CircularString(view(points)),
            GeometryKind::Triangle(points) => GeometryKind::Triangle(view(points)),
            GeometryKind::Polygon(rings) => GeometryKind::Polygon(rings.iter().map(view).collect()),
            GeometryKind::Collection {
                geometry_type,
                geometries,
            } => GeometryKind::Collection {
                geometry_type: *geometry_type,
                geometries: geometries.iter().map(|g| g.clone_shallow()).collect(),
            },
        };

        Geometry {
            srid: self.srid,
            flags: self.flags,
            bbox: self.bbox,
            kind,
        }
    }

    /// Fully owned copy of the geometry.
    pub fn clone_deep(&self) -> Geometry<'static> {
        self.clone().into_owned()
    }

    /// Converts the geometry into a fully owned one, copying all borrowed coordinates.
    pub fn into_owned(self) -> Geometry<'static> {
        let kind = match self.kind {
            GeometryKind::Point(points) => GeometryKind::Point(points.into_owned()),
            GeometryKind::Line(points) => GeometryKind::Line(points.into_owned()),
            GeometryKind::CircularString(points) => GeometryKind::CircularString(points.into_owned()),
            GeometryKind::Triangle(points) => GeometryKind::Triangle(points.into_owned()),
            GeometryKind::Polygon(rings) => {
                GeometryKind::Polygon(rings.into_iter().map(PointArray::into_owned).collect())
            }
            GeometryKind::Collection {
                geometry_type,
                geometries,
            } => GeometryKind::Collection {
                geometry_type,
                geometries: geometries.into_iter().map(Geometry::into_owned).collect(),
            },
        };

        Geometry {
            srid: self.srid,
            flags: self.flags,
            bbox: self.bbox,
            kind,
        }
    }

    /// Returns true if any coordinates are borrowed.
    pub fn is_read_only(&self) -> bool {
        match &self.kind {
            GeometryKind::Point(points)
            | GeometryKind::Line(points)
            | GeometryKind::CircularString(points)
            | GeometryKind::Triangle(points) => points.is_read_only(),
            GeometryKind::Polygon(rings) => rings.iter().any(|ring| ring.is_read_only()),
            GeometryKind::Collection { geometries, .. } => geometries.iter().any(|g| g.is_read_only()),
        }
    }
}

impl Geometry<'static> {
    /// Point from a single coordinate.
    pub fn from_point4d(srid: Srid, flags: Flags, point: Point4d) -> Self {
        Self {
            srid,
            flags,
            bbox: None,
            kind: GeometryKind::Point(PointBuf::from_points(flags, [point]).into()),
        }
    }
}

impl PartialEq for Geometry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.srid == other.srid && self.flags == other.flags && self.kind == other.kind
    }
}

fn check_ring(ring: &PointArray<'_>, check: ParseCheck, geometry_type: GeometryType) -> Result<(), TesseraTypesError> {
    if ring.is_empty() {
        return Ok(());
    }

    if check.min_points && ring.len() < 4 {
        return Err(TesseraTypesError::TooFewPoints {
            geometry_type,
            required: 4,
            actual: ring.len(),
        });
    }

    if check.closure && !ring.is_closed_2d() {
        return Err(TesseraTypesError::RingNotClosed(geometry_type));
    }

    Ok(())
}

fn check_continuity(segments: &[Geometry<'_>]) -> Result<(), TesseraTypesError> {
    let mut previous_end: Option<Point4d> = None;
    for (index, segment) in segments.iter().enumerate() {
        let Some((start, end)) = segment.end_points() else {
            continue;
        };

        if let Some(previous) = previous_end {
            if !previous.same_2d(&start) {
                return Err(TesseraTypesError::DisconnectedSegments { index });
            }
        }
        previous_end = Some(end);
    }

    Ok(())
}
