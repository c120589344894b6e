use crate::affine::AffineTransform;
use crate::error::TesseraTypesError;
use crate::flags::Flags;
use crate::point::Point4d;
use crate::point_array::{PointSequence, PointView};

/// Owned, growable point storage.
///
/// Ordinates are stored interleaved (`x, y[, z][, m]` for every point), so the stride is `8 * ndims` bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointBuf {
    flags: Flags,
    ordinates: Vec<f64>,
}

impl PointBuf {
    /// Creates an empty buffer.
    pub fn new(flags: Flags) -> Self {
        Self {
            flags,
            ordinates: Vec::new(),
        }
    }

    /// Creates an empty buffer with space for `capacity` points.
    pub fn with_capacity(flags: Flags, capacity: usize) -> Self {
        Self {
            flags,
            ordinates: Vec::with_capacity(capacity * flags.ndims()),
        }
    }

    /// Creates a buffer from the points, keeping the ordinates `flags` declares.
    pub fn from_points(flags: Flags, points: impl IntoIterator<Item = Point4d>) -> Self {
        let points = points.into_iter();
        let mut buf = Self::with_capacity(flags, points.size_hint().0);
        for p in points {
            p.write_ordinates(flags, &mut buf.ordinates);
        }

        buf
    }

    /// Creates a buffer from interleaved ordinates.
    pub fn from_ordinates(flags: Flags, ordinates: Vec<f64>) -> Result<Self, TesseraTypesError> {
        let ndims = flags.ndims();
        if ordinates.len() % ndims != 0 {
            return Err(TesseraTypesError::BufferSize {
                npoints: ordinates.len() / ndims,
                ndims,
                actual: ordinates.len() * 8,
            });
        }

        Ok(Self { flags, ordinates })
    }

    /// Interleaved ordinates.
    pub fn ordinates(&self) -> &[f64] {
        &self.ordinates
    }

    /// Number of points the buffer can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.ordinates.capacity() / self.flags.ndims()
    }

    /// Read-only view of the buffer.
    pub fn view(&self) -> PointView<'_> {
        PointView::from_ordinates_unchecked(self.flags, &self.ordinates)
    }

    pub(crate) fn set_geodetic(&mut self, geodetic: bool) {
        self.flags.geodetic = geodetic;
    }

    fn ordinate_range(&self, index: usize) -> std::ops::Range<usize> {
        let ndims = self.flags.ndims();
        index * ndims..(index + 1) * ndims
    }

    fn point_ordinates(&self, point: &Point4d) -> Vec<f64> {
        let mut ordinates = Vec::with_capacity(self.flags.ndims());
        point.write_ordinates(self.flags, &mut ordinates);
        ordinates
    }

    /// Appends a point to the end of the buffer.
    ///
    /// If `allow_duplicate` is false and the point is equal to the current last point on every dimension of the
    /// buffer, nothing is changed.
    pub fn append(&mut self, point: Point4d, allow_duplicate: bool) {
        if !allow_duplicate {
            if let Some(last) = self.last() {
                if last.same_as(&point, self.flags) {
                    return;
                }
            }
        }

        point.write_ordinates(self.flags, &mut self.ordinates);
    }

    /// Inserts a point at `index`, shifting the following points. `index` may be equal to the length of the buffer.
    pub fn insert(&mut self, index: usize, point: Point4d) -> Result<(), TesseraTypesError> {
        if index > self.len() {
            return Err(TesseraTypesError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }

        let start = index * self.flags.ndims();
        let ordinates = self.point_ordinates(&point);
        self.ordinates.splice(start..start, ordinates);

        Ok(())
    }

    /// Removes the point at `index` and returns it.
    pub fn remove(&mut self, index: usize) -> Result<Point4d, TesseraTypesError> {
        let point = self.get_point(index)?;
        let range = self.ordinate_range(index);
        self.ordinates.drain(range);

        Ok(point)
    }

    /// Replaces the point at `index`.
    pub fn set_point(&mut self, index: usize, point: Point4d) -> Result<(), TesseraTypesError> {
        if index >= self.len() {
            return Err(TesseraTypesError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }

        let range = self.ordinate_range(index);
        let ordinates = self.point_ordinates(&point);
        self.ordinates[range].copy_from_slice(&ordinates);

        Ok(())
    }

    /// Appends all points of `other`. Both arrays must have the same dimensions.
    ///
    /// If `skip_joint_duplicate` is true and the first point of `other` equals the last point of this buffer, it is
    /// not repeated.
    pub fn append_array(
        &mut self,
        other: &impl PointSequence,
        skip_joint_duplicate: bool,
    ) -> Result<(), TesseraTypesError> {
        if !self.flags.same_dims(&other.flags()) {
            return Err(TesseraTypesError::DimensionMismatch(format!(
                "cannot append {}D points to {}D array",
                other.flags().ndims(),
                self.flags.ndims()
            )));
        }

        let mut points = other.iter_points().peekable();
        if skip_joint_duplicate {
            if let (Some(last), Some(first)) = (self.last(), points.peek()) {
                if last.same_as(first, self.flags) {
                    points.next();
                }
            }
        }

        self.ordinates.reserve(other.len() * self.flags.ndims());
        for p in points {
            p.write_ordinates(self.flags, &mut self.ordinates);
        }

        Ok(())
    }

    /// Reverses the order of the points.
    pub fn reverse(&mut self) {
        let ndims = self.flags.ndims();
        let len = self.len();
        for i in 0..len / 2 {
            let j = len - 1 - i;
            for d in 0..ndims {
                self.ordinates.swap(i * ndims + d, j * ndims + d);
            }
        }
    }

    /// Applies an affine transformation to every point.
    pub fn affine(&mut self, transform: &AffineTransform) {
        for i in 0..self.len() {
            let range = self.ordinate_range(i);
            let point = Point4d::from_ordinates(&self.ordinates[range.clone()], self.flags);
            let transformed = transform.apply(&point, self.flags.has_z);
            let ordinates = self.point_ordinates(&transformed);
            self.ordinates[range].copy_from_slice(&ordinates);
        }
    }

    /// Multiplies every ordinate by the corresponding factor.
    pub fn scale(&mut self, factor: &Point4d) {
        let ndims = self.flags.ndims();
        let mut factors = Vec::with_capacity(ndims);
        factor.write_ordinates(self.flags, &mut factors);

        for chunk in self.ordinates.chunks_exact_mut(ndims) {
            for (value, factor) in chunk.iter_mut().zip(&factors) {
                *value *= factor;
            }
        }
    }

    /// Returns a copy with the given dimensions. Added ordinates are set to zero, removed ones are dropped. The
    /// geodetic flag of this buffer is kept.
    pub fn force_dims(&self, has_z: bool, has_m: bool) -> PointBuf {
        let flags = Flags {
            has_z,
            has_m,
            geodetic: self.flags.geodetic,
        };

        PointBuf::from_points(flags, self.iter_points())
    }

    /// Returns a copy without consecutive points closer than `tolerance` to each other (in 2d).
    ///
    /// The last point is always kept, and the result never has fewer than `min_points` points if the input has that
    /// many.
    pub fn remove_repeated_points(&self, tolerance: f64, min_points: usize) -> PointBuf {
        let len = self.len();
        if len <= min_points {
            return self.clone();
        }

        let tolerance_sq = tolerance * tolerance;
        let mut out = PointBuf::with_capacity(self.flags, len);
        let mut last_kept: Option<Point4d> = None;

        for (i, p) in self.iter_points().enumerate() {
            let is_last = i == len - 1;
            if let Some(prev) = last_kept {
                let close = if tolerance == 0.0 {
                    prev.same_as(&p, self.flags)
                } else {
                    prev.distance_sq_2d(&p) <= tolerance_sq
                };

                if close && !is_last {
                    continue;
                }

                if close && is_last && out.len() > min_points.max(1) {
                    let _ = out.remove(out.len() - 1);
                }
            }

            p.write_ordinates(self.flags, &mut out.ordinates);
            last_kept = Some(p);
        }

        out
    }
}

impl PointSequence for PointBuf {
    fn flags(&self) -> Flags {
        self.flags
    }

    fn len(&self) -> usize {
        self.ordinates.len() / self.flags.ndims()
    }

    fn point(&self, index: usize) -> Option<Point4d> {
        if index >= self.len() {
            return None;
        }

        Some(Point4d::from_ordinates(
            &self.ordinates[self.ordinate_range(index)],
            self.flags,
        ))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn line(points: &[(f64, f64)]) -> PointBuf {
        PointBuf::from_points(Flags::xy(), points.iter().map(|&(x, y)| Point4d::xy(x, y)))
    }

    fn coords(buf: &PointBuf) -> Vec<(f64, f64)> {
        buf.iter_points().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn construct() {
        let buf = PointBuf::with_capacity(Flags::xyzm(), 10);
        assert_eq!(buf.len(), 0);
        assert!(buf.capacity() >= 10);
        assert!(buf.is_empty());
    }

    #[test]
    fn from_ordinates_checks_length() {
        assert!(PointBuf::from_ordinates(Flags::xyz(), vec![1.0, 2.0, 3.0]).is_ok());
        assert_matches!(
            PointBuf::from_ordinates(Flags::xyz(), vec![1.0, 2.0]),
            Err(TesseraTypesError::BufferSize { .. })
        );
    }

    #[test]
    fn insert_and_remove() {
        let mut buf = line(&[(0.0, 0.0), (2.0, 2.0)]);
        buf.insert(1, Point4d::xy(1.0, 1.0)).unwrap();
        buf.insert(3, Point4d::xy(3.0, 3.0)).unwrap();
        assert_eq!(coords(&buf), vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);

        assert_matches!(
            buf.insert(5, Point4d::xy(0.0, 0.0)),
            Err(TesseraTypesError::IndexOutOfRange { index: 5, len: 4 })
        );

        assert_eq!(buf.remove(0).unwrap(), Point4d::xy(0.0, 0.0));
        assert_eq!(coords(&buf), vec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert_matches!(buf.remove(3), Err(TesseraTypesError::IndexOutOfRange { .. }));
    }

    #[test]
    fn set_point() {
        let mut buf = PointBuf::from_points(Flags::xym(), [Point4d::xym(0.0, 0.0, 1.0)]);
        buf.set_point(0, Point4d::new(5.0, 6.0, 7.0, 8.0)).unwrap();
        assert_eq!(buf.point(0), Some(Point4d::xym(5.0, 6.0, 8.0)));
        assert!(buf.set_point(1, Point4d::default()).is_err());
    }

    #[test]
    fn append_respects_duplicates() {
        let mut buf = line(&[(1.0, 2.0), (3.0, 4.0)]);
        buf.append(Point4d::xy(3.0, 4.0), false);
        buf.append(Point4d::xy(3.0, 4.0), false);
        assert_eq!(buf.len(), 2);

        buf.append(Point4d::xy(3.0, 4.0), true);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn append_array() {
        let mut buf = line(&[(0.0, 0.0), (1.0, 1.0)]);
        buf.append_array(&line(&[(1.0, 1.0), (2.0, 2.0)]), true).unwrap();
        assert_eq!(coords(&buf), vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);

        buf.append_array(&line(&[(2.0, 2.0)]), false).unwrap();
        assert_eq!(buf.len(), 4);

        let z = PointBuf::from_points(Flags::xyz(), [Point4d::xyz(0.0, 0.0, 0.0)]);
        assert_matches!(
            buf.append_array(&z, true),
            Err(TesseraTypesError::DimensionMismatch(_))
        );
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn reverse() {
        let mut buf = line(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        buf.reverse();
        assert_eq!(coords(&buf), vec![(2.0, 2.0), (1.0, 1.0), (0.0, 0.0)]);

        let mut single = line(&[(5.0, 5.0)]);
        single.reverse();
        assert_eq!(coords(&single), vec![(5.0, 5.0)]);
    }

    #[test]
    fn affine_and_scale() {
        let mut buf = PointBuf::from_points(Flags::xyz(), [Point4d::xyz(1.0, 2.0, 3.0)]);
        buf.affine(&AffineTransform::translate(1.0, 1.0, 1.0));
        assert_eq!(buf.point(0), Some(Point4d::xyz(2.0, 3.0, 4.0)));

        buf.scale(&Point4d::new(2.0, 3.0, 4.0, 5.0));
        assert_eq!(buf.point(0), Some(Point4d::xyz(4.0, 9.0, 16.0)));
    }

    #[test]
    fn force_dims() {
        let buf = PointBuf::from_points(Flags::xym(), [Point4d::xym(1.0, 2.0, 3.0)]);
        let forced = buf.force_dims(true, false);
        assert_eq!(forced.flags(), Flags::xyz());
        assert_eq!(forced.ordinates(), &[1.0, 2.0, 0.0]);

        let forced = buf.force_dims(true, true);
        assert_eq!(forced.ordinates(), &[1.0, 2.0, 0.0, 3.0]);
    }

    #[test]
    fn remove_repeated_points() {
        let buf = line(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (1.05, 0.0), (2.0, 0.0), (2.0, 0.0)]);

        let exact = buf.remove_repeated_points(0.0, 2);
        assert_eq!(coords(&exact), vec![(0.0, 0.0), (1.0, 0.0), (1.05, 0.0), (2.0, 0.0)]);

        let tolerant = buf.remove_repeated_points(0.1, 2);
        assert_eq!(coords(&tolerant), vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);

        let short = line(&[(0.0, 0.0), (0.0, 0.0)]);
        assert_eq!(short.remove_repeated_points(1.0, 2).len(), 2);
    }
}
