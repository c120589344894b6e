//! Coordinate storage used by every geometry.
//!
//! [`PointBuf`] is an owned, growable buffer. [`PointView`] is a read-only view over coordinates owned by someone else
//! (usually a serialized buffer). A geometry stores either of them as a [`PointArray`]. All read-only algorithms are
//! defined once in the [`PointSequence`] trait.

mod algorithm;
mod buf;
mod view;

pub use buf::PointBuf;
pub use view::PointView;

use crate::context::Context;
use crate::error::TesseraTypesError;
use crate::flags::Flags;
use crate::gbox::GBox;
use crate::point::Point4d;
use crate::segment::{Segment, Side};

/// Position of a point relative to a closed ring.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RingPosition {
    /// Point is inside of the ring.
    Inside,
    /// Point lies on one of the ring edges.
    Boundary,
    /// Point is outside of the ring.
    Outside,
}

/// Read access to a sequence of points.
pub trait PointSequence {
    /// Dimensionality of the points.
    fn flags(&self) -> Flags;

    /// Number of points.
    fn len(&self) -> usize;

    /// Returns the point at `index`, or `None` if the index is out of range.
    fn point(&self, index: usize) -> Option<Point4d>;

    /// Returns true if there are no points.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Same as [`PointSequence::point`], but reports out of range index as an error.
    fn get_point(&self, index: usize) -> Result<Point4d, TesseraTypesError> {
        self.point(index).ok_or(TesseraTypesError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Iterates over all points in order.
    fn iter_points(&self) -> impl Iterator<Item = Point4d> + '_ {
        (0..self.len()).filter_map(move |i| self.point(i))
    }

    /// Iterates over pairs of consecutive points.
    fn iter_segments(&self) -> impl Iterator<Item = (Point4d, Point4d)> + '_ {
        self.iter_points().zip(self.iter_points().skip(1))
    }

    /// First point.
    fn first(&self) -> Option<Point4d> {
        self.point(0)
    }

    /// Last point.
    fn last(&self) -> Option<Point4d> {
        self.len().checked_sub(1).and_then(|i| self.point(i))
    }

    /// Returns true if the first and the last points have the same X and Y.
    fn is_closed_2d(&self) -> bool {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => first.same_2d(&last),
            _ => false,
        }
    }

    /// Returns true if the first and the last points have the same X, Y and Z.
    fn is_closed_3d(&self) -> bool {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => first.same_3d(&last),
            _ => false,
        }
    }

    /// Closure test using Z when the points have it.
    fn is_closed(&self) -> bool {
        if self.flags().has_z {
            self.is_closed_3d()
        } else {
            self.is_closed_2d()
        }
    }

    /// Planar length of the line through the points.
    fn length_2d(&self) -> f64 {
        self.iter_segments().map(|(a, b)| a.distance_2d(&b)).sum()
    }

    /// Length of the line through the points using Z. Falls back to [`PointSequence::length_2d`] without Z.
    fn length_3d(&self) -> f64 {
        if !self.flags().has_z {
            return self.length_2d();
        }

        self.iter_segments().map(|(a, b)| a.distance_3d(&b)).sum()
    }

    /// Signed planar area of the ring formed by the points. Positive for counter-clockwise rings.
    fn signed_area_2d(&self) -> f64 {
        if self.len() < 3 {
            return 0.0;
        }

        let sum: f64 = self.iter_segments().map(|(a, b)| a.x * b.y - b.x * a.y).sum();
        sum / 2.0
    }

    /// Locates the point relative to the closed ring formed by the points, using the winding number rule.
    ///
    /// Zero length edges are ignored.
    fn contains_point_2d(&self, p: &Point4d) -> RingPosition {
        let mut winding = 0i32;
        for (a, b) in self.iter_segments() {
            if a.same_2d(&b) {
                continue;
            }

            if p.y > a.y.max(b.y) || p.y < a.y.min(b.y) {
                continue;
            }

            let segment = Segment(&a, &b);
            let side = segment.side(p);
            if side == Side::Collinear && segment.contains_collinear(p) {
                return RingPosition::Boundary;
            }

            if side == Side::Left && a.y <= p.y && p.y < b.y {
                winding += 1;
            } else if side == Side::Right && b.y <= p.y && p.y < a.y {
                winding -= 1;
            }
        }

        if winding == 0 {
            RingPosition::Outside
        } else {
            RingPosition::Inside
        }
    }

    /// Cartesian bounding box of the points, or `None` for an empty sequence.
    fn calculate_gbox_cartesian(&self) -> Option<GBox> {
        let flags = self.flags().with_geodetic(false);
        GBox::from_points(flags, self.iter_points())
    }

    /// Copies the points into a new owned buffer.
    fn to_buf(&self) -> PointBuf {
        PointBuf::from_points(self.flags(), self.iter_points())
    }

    /// Returns a new array where no two consecutive points are farther than `max_distance` apart (in 2d), inserting
    /// interpolated points where needed.
    fn segmentize(&self, ctx: &Context, max_distance: f64) -> Result<PointBuf, TesseraTypesError>
    where
        Self: Sized,
    {
        algorithm::segmentize(ctx, self, max_distance)
    }

    /// Douglas-Peucker simplification.
    ///
    /// The result keeps at least `min_points` points (if the input has that many). First and last points are always
    /// kept.
    fn simplify(&self, ctx: &Context, epsilon: f64, min_points: usize) -> Result<PointBuf, TesseraTypesError>
    where
        Self: Sized,
    {
        algorithm::simplify(ctx, self, epsilon, min_points)
    }
}

/// Returns true if both sequences have the same dimensions and the same points in the same order.
pub fn same_points(a: &impl PointSequence, b: &impl PointSequence) -> bool {
    let flags = a.flags();
    flags.same_dims(&b.flags())
        && a.len() == b.len()
        && a.iter_points().zip(b.iter_points()).all(|(p, q)| p.same_as(&q, flags))
}

/// Point storage of a geometry: either owned or borrowed.
#[derive(Debug, Clone)]
pub enum PointArray<'a> {
    /// Owned, mutable storage.
    Owned(PointBuf),
    /// Read-only view over somebody else's storage.
    Borrowed(PointView<'a>),
}

impl<'a> PointArray<'a> {
    /// Creates an empty owned array.
    pub fn empty(flags: Flags) -> Self {
        Self::Owned(PointBuf::new(flags))
    }

    /// Returns true if the array cannot be modified.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Borrowed(_))
    }

    /// Mutable access to the owned buffer. Fails with [`TesseraTypesError::ReadOnly`] for borrowed arrays.
    pub fn as_buf_mut(&mut self) -> Result<&mut PointBuf, TesseraTypesError> {
        match self {
            Self::Owned(buf) => Ok(buf),
            Self::Borrowed(_) => Err(TesseraTypesError::ReadOnly),
        }
    }

    /// Appends a point to an owned array. See [`PointBuf::append`].
    pub fn append_point(&mut self, point: Point4d, allow_duplicate: bool) -> Result<(), TesseraTypesError> {
        self.as_buf_mut()?.append(point, allow_duplicate);
        Ok(())
    }

    /// Read-only view of the array contents, without copying.
    pub fn view(&self) -> PointView<'_> {
        match self {
            Self::Owned(buf) => buf.view(),
            Self::Borrowed(view) => *view,
        }
    }

    /// Converts the array into an owned one, copying borrowed data.
    pub fn into_owned(self) -> PointArray<'static> {
        match self {
            Self::Owned(buf) => PointArray::Owned(buf),
            Self::Borrowed(view) => PointArray::Owned(view.to_buf()),
        }
    }

    /// Sets the geodetic flag of the array. This only changes the interpretation of the coordinates and is allowed
    /// for borrowed arrays too.
    pub fn set_geodetic(&mut self, geodetic: bool) {
        match self {
            Self::Owned(buf) => buf.set_geodetic(geodetic),
            Self::Borrowed(view) => view.set_geodetic(geodetic),
        }
    }
}

impl PointSequence for PointArray<'_> {
    fn flags(&self) -> Flags {
        match self {
            Self::Owned(buf) => buf.flags(),
            Self::Borrowed(view) => view.flags(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Owned(buf) => buf.len(),
            Self::Borrowed(view) => view.len(),
        }
    }

    fn point(&self, index: usize) -> Option<Point4d> {
        match self {
            Self::Owned(buf) => buf.point(index),
            Self::Borrowed(view) => view.point(index),
        }
    }
}

impl PartialEq for PointArray<'_> {
    fn eq(&self, other: &Self) -> bool {
        same_points(self, other)
    }
}

impl From<PointBuf> for PointArray<'static> {
    fn from(value: PointBuf) -> Self {
        Self::Owned(value)
    }
}

impl<'a> From<PointView<'a>> for PointArray<'a> {
    fn from(value: PointView<'a>) -> Self {
        Self::Borrowed(value)
    }
}
