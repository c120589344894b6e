//! Axis-aligned bounding boxes for cartesian and geodetic coordinates.

use std::fmt::{Display, Formatter};

use approx::AbsDiffEq;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::TesseraTypesError;
use crate::flags::Flags;
use crate::point::Point4d;

/// Bounding volume of a set of coordinates.
///
/// For cartesian boxes `z` and `m` bounds are populated when the flags declare the dimension. For geodetic boxes the
/// `x`, `y` and `z` bounds describe the geocentric unit-sphere coordinates of the summarized points (not longitude and
/// latitude), and `z` is always populated.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GBox {
    /// Dimensionality of the box.
    pub flags: Flags,
    /// Minimum X.
    pub xmin: f64,
    /// Maximum X.
    pub xmax: f64,
    /// Minimum Y.
    pub ymin: f64,
    /// Maximum Y.
    pub ymax: f64,
    /// Minimum Z.
    pub zmin: f64,
    /// Maximum Z.
    pub zmax: f64,
    /// Minimum M.
    pub mmin: f64,
    /// Maximum M.
    pub mmax: f64,
}

impl GBox {
    /// Creates a zero-sized box at the origin.
    pub fn new(flags: Flags) -> Self {
        Self {
            flags,
            ..Default::default()
        }
    }

    /// Creates a zero-sized box around the point.
    pub fn from_point(flags: Flags, p: &Point4d) -> Self {
        Self {
            flags,
            xmin: p.x,
            xmax: p.x,
            ymin: p.y,
            ymax: p.y,
            zmin: p.z,
            zmax: p.z,
            mmin: p.m,
            mmax: p.m,
        }
    }

    /// Creates a zero-sized geodetic box around a unit-sphere vector.
    pub fn from_vector(flags: Flags, v: &Vector3<f64>) -> Self {
        Self {
            flags,
            xmin: v.x,
            xmax: v.x,
            ymin: v.y,
            ymax: v.y,
            zmin: v.z,
            zmax: v.z,
            mmin: 0.0,
            mmax: 0.0,
        }
    }

    /// Box covering all the given points, or `None` if there are no points.
    pub fn from_points(flags: Flags, points: impl IntoIterator<Item = Point4d>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bbox = Self::from_point(flags, &first);
        for p in points {
            bbox.merge_point(&p);
        }

        Some(bbox)
    }

    /// Returns true if the Z bounds are meaningful for this box.
    pub fn has_z_bounds(&self) -> bool {
        self.flags.has_z || self.flags.geodetic
    }

    /// Union of two optional boxes. If only one box is present, it is returned as is.
    ///
    /// The result only keeps the dimensions both boxes have: a 2d box and a 3d box unite into a 2d box, and the result
    /// is geodetic only if both inputs are. Bounds of dropped dimensions are zero.
    pub fn union(a: Option<&GBox>, b: Option<&GBox>) -> Option<GBox> {
        match (a, b) {
            (None, None) => None,
            (Some(a), None) => Some(*a),
            (None, Some(b)) => Some(*b),
            (Some(a), Some(b)) => {
                let flags = Flags {
                    has_z: a.flags.has_z && b.flags.has_z,
                    has_m: a.flags.has_m && b.flags.has_m,
                    geodetic: a.flags.geodetic && b.flags.geodetic,
                };

                let mut union = GBox {
                    flags,
                    xmin: a.xmin.min(b.xmin),
                    xmax: a.xmax.max(b.xmax),
                    ymin: a.ymin.min(b.ymin),
                    ymax: a.ymax.max(b.ymax),
                    zmin: 0.0,
                    zmax: 0.0,
                    mmin: 0.0,
                    mmax: 0.0,
                };

                if a.has_z_bounds() && b.has_z_bounds() && union.has_z_bounds() {
                    union.zmin = a.zmin.min(b.zmin);
                    union.zmax = a.zmax.max(b.zmax);
                }

                if flags.has_m {
                    union.mmin = a.mmin.min(b.mmin);
                    union.mmax = a.mmax.max(b.mmax);
                }

                Some(union)
            }
        }
    }

    /// Expands this box in place to cover `other`. Both boxes must have the same flags.
    pub fn merge(&mut self, other: &GBox) -> Result<(), TesseraTypesError> {
        if self.flags != other.flags {
            return Err(TesseraTypesError::BoxFlagsMismatch(format!(
                "{:?} vs {:?}",
                self.flags, other.flags
            )));
        }

        self.xmin = self.xmin.min(other.xmin);
        self.xmax = self.xmax.max(other.xmax);
        self.ymin = self.ymin.min(other.ymin);
        self.ymax = self.ymax.max(other.ymax);

        if self.has_z_bounds() {
            self.zmin = self.zmin.min(other.zmin);
            self.zmax = self.zmax.max(other.zmax);
        }

        if self.flags.has_m {
            self.mmin = self.mmin.min(other.mmin);
            self.mmax = self.mmax.max(other.mmax);
        }

        Ok(())
    }

    /// Expands this box to cover the point.
    pub fn merge_point(&mut self, p: &Point4d) {
        self.xmin = self.xmin.min(p.x);
        self.xmax = self.xmax.max(p.x);
        self.ymin = self.ymin.min(p.y);
        self.ymax = self.ymax.max(p.y);

        if self.has_z_bounds() {
            self.zmin = self.zmin.min(p.z);
            self.zmax = self.zmax.max(p.z);
        }

        if self.flags.has_m {
            self.mmin = self.mmin.min(p.m);
            self.mmax = self.mmax.max(p.m);
        }
    }

    /// Expands this box to cover a unit-sphere vector.
    pub fn merge_vector(&mut self, v: &Vector3<f64>) {
        self.xmin = self.xmin.min(v.x);
        self.xmax = self.xmax.max(v.x);
        self.ymin = self.ymin.min(v.y);
        self.ymax = self.ymax.max(v.y);
        self.zmin = self.zmin.min(v.z);
        self.zmax = self.zmax.max(v.z);
    }

    /// Grows the box by `distance` in every direction of X, Y and (when populated) Z.
    pub fn expand(&mut self, distance: f64) {
        self.xmin -= distance;
        self.xmax += distance;
        self.ymin -= distance;
        self.ymax += distance;
        if self.has_z_bounds() {
            self.zmin -= distance;
            self.zmax += distance;
        }
    }

    fn check_geodetic_match(&self, other: &GBox) -> Result<(), TesseraTypesError> {
        if self.flags.geodetic != other.flags.geodetic {
            return Err(TesseraTypesError::BoxFlagsMismatch(
                "cannot compare geodetic and non-geodetic boxes".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns true if the boxes share at least one point.
    ///
    /// Geodetic boxes are compared on X, Y and Z only. Cartesian boxes compare Z and M when both boxes have them.
    /// Comparing a geodetic box with a cartesian one is an error.
    pub fn overlaps(&self, other: &GBox) -> Result<bool, TesseraTypesError> {
        if !self.overlaps_2d(other)? {
            return Ok(false);
        }

        if self.flags.geodetic {
            return Ok(!(self.zmax < other.zmin || self.zmin > other.zmax));
        }

        if self.flags.has_z && other.flags.has_z && (self.zmax < other.zmin || self.zmin > other.zmax) {
            return Ok(false);
        }

        if self.flags.has_m && other.flags.has_m && (self.mmax < other.mmin || self.mmin > other.mmax) {
            return Ok(false);
        }

        Ok(true)
    }

    /// Returns true if the X/Y extents of the boxes share at least one point.
    pub fn overlaps_2d(&self, other: &GBox) -> Result<bool, TesseraTypesError> {
        self.check_geodetic_match(other)?;
        Ok(!(self.xmax < other.xmin
            || self.ymax < other.ymin
            || self.xmin > other.xmax
            || self.ymin > other.ymax))
    }

    /// Returns true if the X/Y extent of `inner` is inside this box.
    pub fn contains_2d(&self, inner: &GBox) -> bool {
        !(inner.xmin < self.xmin || inner.xmax > self.xmax || inner.ymin < self.ymin || inner.ymax > self.ymax)
    }

    /// Returns true if `inner` is inside this box on every dimension both boxes populate.
    pub fn contains(&self, inner: &GBox) -> bool {
        if !self.contains_2d(inner) {
            return false;
        }

        if self.has_z_bounds() && inner.has_z_bounds() && (inner.zmin < self.zmin || inner.zmax > self.zmax) {
            return false;
        }

        if self.flags.has_m && inner.flags.has_m && (inner.mmin < self.mmin || inner.mmax > self.mmax) {
            return false;
        }

        true
    }

    /// Returns true if the point is inside the X, Y and Z ranges of the box.
    pub fn contains_point3d(&self, p: &Vector3<f64>) -> bool {
        self.xmin <= p.x
            && self.xmax >= p.x
            && self.ymin <= p.y
            && self.ymax >= p.y
            && self.zmin <= p.z
            && self.zmax >= p.z
    }

    /// Returns true if the point is inside the X and Y ranges of the box.
    pub fn contains_point_2d(&self, p: &Point4d) -> bool {
        self.xmin <= p.x && self.xmax >= p.x && self.ymin <= p.y && self.ymax >= p.y
    }

    /// Exact comparison of flags and every populated bound.
    pub fn same(&self, other: &GBox) -> bool {
        if self.flags != other.flags || !self.same_2d(other) {
            return false;
        }

        if self.has_z_bounds() && (self.zmin != other.zmin || self.zmax != other.zmax) {
            return false;
        }

        if self.flags.has_m && (self.mmin != other.mmin || self.mmax != other.mmax) {
            return false;
        }

        true
    }

    /// Exact comparison of the X/Y bounds.
    pub fn same_2d(&self, other: &GBox) -> bool {
        self.xmin == other.xmin && self.xmax == other.xmax && self.ymin == other.ymin && self.ymax == other.ymax
    }

    /// Compares the X/Y bounds after rounding them outward to single precision. Use this to compare a computed box
    /// with one read back from a serialized buffer.
    pub fn same_2d_float(&self, other: &GBox) -> bool {
        (self.xmax == other.xmax || next_float_up(self.xmax) == next_float_up(other.xmax))
            && (self.ymax == other.ymax || next_float_up(self.ymax) == next_float_up(other.ymax))
            && (self.xmin == other.xmin || next_float_down(self.xmin) == next_float_down(other.xmin))
            && (self.ymin == other.ymin || next_float_down(self.ymin) == next_float_down(other.ymin))
    }

    /// Returns true if every populated bound is finite.
    pub fn is_valid(&self) -> bool {
        let finite = |a: f64, b: f64| a.is_finite() && b.is_finite();
        finite(self.xmin, self.xmax)
            && finite(self.ymin, self.ymax)
            && (!self.has_z_bounds() || finite(self.zmin, self.zmax))
            && (!self.flags.has_m || finite(self.mmin, self.mmax))
    }

    /// Widens every populated bound outward to the nearest single precision value, so the box can be stored as `f32`
    /// without becoming smaller than the original.
    pub fn float_round(&mut self) {
        self.xmin = next_float_down(self.xmin) as f64;
        self.xmax = next_float_up(self.xmax) as f64;
        self.ymin = next_float_down(self.ymin) as f64;
        self.ymax = next_float_up(self.ymax) as f64;

        if self.has_z_bounds() {
            self.zmin = next_float_down(self.zmin) as f64;
            self.zmax = next_float_up(self.zmax) as f64;
        }

        if self.flags.has_m {
            self.mmin = next_float_down(self.mmin) as f64;
            self.mmax = next_float_up(self.mmax) as f64;
        }
    }

    /// Number of `f32` values this box occupies in the serialized form.
    pub fn serialized_float_count(&self) -> usize {
        if self.flags.geodetic {
            6
        } else {
            2 * self.flags.ndims()
        }
    }

    /// Debug text representation, e.g. `GBOX((0,0,0),(1,1,1))`.
    pub fn to_text(&self) -> String {
        let (min, max): (Vec<f64>, Vec<f64>) = if self.flags.geodetic {
            (
                vec![self.xmin, self.ymin, self.zmin],
                vec![self.xmax, self.ymax, self.zmax],
            )
        } else {
            let mut min = vec![self.xmin, self.ymin];
            let mut max = vec![self.xmax, self.ymax];
            if self.flags.has_z {
                min.push(self.zmin);
                max.push(self.zmax);
            }
            if self.flags.has_m {
                min.push(self.mmin);
                max.push(self.mmax);
            }
            (min, max)
        };

        let join = |values: &[f64]| {
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",")
        };

        format!("GBOX(({}),({}))", join(&min), join(&max))
    }

    /// Parses the debug text representation.
    ///
    /// Three values per corner produce a geodetic box, two a cartesian 2d box and four a cartesian XYZM box.
    pub fn from_text(text: &str) -> Result<GBox, TesseraTypesError> {
        let parse_error = || TesseraTypesError::Parse {
            what: "GBOX",
            input: text.to_string(),
        };

        let start = text.find("GBOX((").ok_or_else(parse_error)?;
        let body = text[start + 6..].trim_end();
        let body = body.strip_suffix("))").ok_or_else(parse_error)?;
        let (min, max) = body.split_once("),(").ok_or_else(parse_error)?;

        let parse_values = |s: &str| -> Result<Vec<f64>, TesseraTypesError> {
            s.split(',')
                .map(|v| v.trim().parse::<f64>().map_err(|_| parse_error()))
                .collect()
        };
        let min = parse_values(min)?;
        let max = parse_values(max)?;
        if min.len() != max.len() {
            return Err(parse_error());
        }

        let mut bbox = match min.len() {
            2 => GBox::new(Flags::xy()),
            3 => GBox::new(Flags::xy().with_geodetic(true)),
            4 => GBox::new(Flags::xyzm()),
            _ => return Err(parse_error()),
        };

        bbox.xmin = min[0];
        bbox.ymin = min[1];
        bbox.xmax = max[0];
        bbox.ymax = max[1];
        if min.len() >= 3 {
            bbox.zmin = min[2];
            bbox.zmax = max[2];
        }
        if min.len() == 4 {
            bbox.mmin = min[3];
            bbox.mmax = max[3];
        }

        Ok(bbox)
    }
}

impl Display for GBox {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl AbsDiffEq for GBox {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.flags == other.flags
            && self.xmin.abs_diff_eq(&other.xmin, epsilon)
            && self.xmax.abs_diff_eq(&other.xmax, epsilon)
            && self.ymin.abs_diff_eq(&other.ymin, epsilon)
            && self.ymax.abs_diff_eq(&other.ymax, epsilon)
            && self.zmin.abs_diff_eq(&other.zmin, epsilon)
            && self.zmax.abs_diff_eq(&other.zmax, epsilon)
            && self.mmin.abs_diff_eq(&other.mmin, epsilon)
            && self.mmax.abs_diff_eq(&other.mmax, epsilon)
    }
}

/// Largest `f32` that is not greater than `d`. Values outside of the `f32` range are clamped.
pub fn next_float_down(d: f64) -> f32 {
    if d > f32::MAX as f64 {
        return f32::MAX;
    }
    if d <= -f32::MAX as f64 {
        return -f32::MAX;
    }

    let result = d as f32;
    if result as f64 <= d {
        return result;
    }

    step_toward_neg_infinity(result)
}

/// Smallest `f32` that is not less than `d`. Values outside of the `f32` range are clamped.
pub fn next_float_up(d: f64) -> f32 {
    if d >= f32::MAX as f64 {
        return f32::MAX;
    }
    if d < -f32::MAX as f64 {
        return -f32::MAX;
    }

    let result = d as f32;
    if result as f64 >= d {
        return result;
    }

    step_toward_pos_infinity(result)
}

fn step_toward_neg_infinity(value: f32) -> f32 {
    if value.is_nan() {
        value
    } else if value == 0.0 {
        -f32::from_bits(1)
    } else if value > 0.0 {
        f32::from_bits(value.to_bits() - 1)
    } else {
        f32::from_bits(value.to_bits() + 1)
    }
}

fn step_toward_pos_infinity(value: f32) -> f32 {
    if value.is_nan() {
        value
    } else if value == 0.0 {
        f32::from_bits(1)
    } else if value > 0.0 {
        f32::from_bits(value.to_bits() + 1)
    } else {
        f32::from_bits(value.to_bits() - 1)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use super::*;

    fn rect(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> GBox {
        GBox {
            xmin,
            xmax,
            ymin,
            ymax,
            ..GBox::new(Flags::xy())
        }
    }

    #[test]
    fn from_points() {
        let bbox = GBox::from_points(
            Flags::xyz(),
            [
                Point4d::xyz(1.0, 5.0, -1.0),
                Point4d::xyz(-2.0, 3.0, 4.0),
                Point4d::xyz(0.0, 7.0, 0.0),
            ],
        )
        .unwrap();

        assert_eq!(bbox.xmin, -2.0);
        assert_eq!(bbox.xmax, 1.0);
        assert_eq!(bbox.ymin, 3.0);
        assert_eq!(bbox.ymax, 7.0);
        assert_eq!(bbox.zmin, -1.0);
        assert_eq!(bbox.zmax, 4.0);

        assert!(GBox::from_points(Flags::xy(), []).is_none());
    }

    #[test]
    fn union_with_missing_box() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        assert_eq!(GBox::union(Some(&a), None), Some(a));
        assert_eq!(GBox::union(None, Some(&a)), Some(a));
        assert_eq!(GBox::union(None, None), None);

        let b = rect(2.0, -1.0, 3.0, 0.5);
        assert_eq!(GBox::union(Some(&a), Some(&b)), Some(rect(0.0, -1.0, 3.0, 1.0)));
    }

    #[test]
    fn union_keeps_shared_dimensions() {
        let planar = rect(0.0, 0.0, 1.0, 1.0);
        let mut measured = GBox::from_point(Flags::xyzm(), &Point4d::new(2.0, 3.0, 10.0, 20.0));
        measured.merge_point(&Point4d::new(4.0, 5.0, 11.0, 21.0));

        let union = GBox::union(Some(&planar), Some(&measured)).unwrap();
        assert_eq!(union.flags, Flags::xy());
        assert_eq!((union.xmin, union.ymin, union.xmax, union.ymax), (0.0, 0.0, 4.0, 5.0));
        assert_eq!((union.zmin, union.zmax, union.mmin, union.mmax), (0.0, 0.0, 0.0, 0.0));
        assert_eq!(GBox::union(Some(&measured), Some(&planar)), Some(union));

        let mut with_z = GBox::from_point(Flags::xyz(), &Point4d::xyz(-1.0, -1.0, -5.0));
        with_z.merge_point(&Point4d::xyz(0.0, 0.0, 5.0));
        let union = GBox::union(Some(&with_z), Some(&measured)).unwrap();
        assert_eq!(union.flags, Flags::xyz());
        assert_eq!((union.zmin, union.zmax), (-5.0, 11.0));
        assert_eq!((union.mmin, union.mmax), (0.0, 0.0));
    }

    #[test]
    fn merge_requires_same_flags() {
        let mut a = rect(0.0, 0.0, 1.0, 1.0);
        let b = GBox::new(Flags::xyz());
        assert_matches!(a.merge(&b), Err(TesseraTypesError::BoxFlagsMismatch(_)));
        assert_eq!(a, rect(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn overlaps() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        assert!(a.overlaps(&rect(1.0, 1.0, 2.0, 2.0)).unwrap());
        assert!(!a.overlaps(&rect(1.1, 0.0, 2.0, 2.0)).unwrap());

        let mut za = GBox::new(Flags::xyz());
        za.xmax = 1.0;
        za.ymax = 1.0;
        za.zmax = 1.0;
        let mut zb = za;
        zb.zmin = 2.0;
        zb.zmax = 3.0;
        assert!(!za.overlaps(&zb).unwrap());
        assert!(za.overlaps_2d(&zb).unwrap());
    }

    #[test]
    fn overlaps_rejects_mixed_models() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = GBox::new(Flags::xy().with_geodetic(true));
        assert_matches!(a.overlaps(&b), Err(TesseraTypesError::BoxFlagsMismatch(_)));
    }

    #[test]
    fn contains() {
        let outer = rect(0.0, 0.0, 10.0, 10.0);
        assert!(outer.contains(&rect(1.0, 1.0, 2.0, 2.0)));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&rect(-1.0, 1.0, 2.0, 2.0)));
        assert!(outer.contains_point_2d(&Point4d::xy(10.0, 0.0)));
    }

    #[test]
    fn same_float() {
        let a = rect(0.1, 0.2, 1.1, 1.3);
        let mut b = a;
        b.float_round();
        assert!(!a.same_2d(&b));
        assert!(a.same_2d_float(&b));
        assert!(b.contains(&a));
    }

    #[test]
    fn next_float() {
        assert_eq!(next_float_down(1.0), 1.0);
        assert_eq!(next_float_up(1.0), 1.0);
        assert!((next_float_down(0.1) as f64) < 0.1);
        assert!((next_float_up(0.1) as f64) > 0.1);
        assert!((next_float_down(-0.1) as f64) < -0.1);
        assert!((next_float_up(-0.1) as f64) > -0.1);
        assert_eq!(next_float_up(1e300), f32::MAX);
        assert_eq!(next_float_down(-1e300), -f32::MAX);
        assert_eq!(next_float_down(1e-300), 0.0);
        assert!(next_float_up(1e-300) > 0.0);
    }

    #[test]
    fn validity() {
        assert!(rect(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!rect(f64::NAN, 0.0, 1.0, 1.0).is_valid());

        let mut bbox = GBox::new(Flags::xy());
        bbox.zmin = f64::INFINITY;
        assert!(bbox.is_valid());
        bbox.flags = Flags::xyz();
        assert!(!bbox.is_valid());
    }

    #[test]
    fn serialized_float_count() {
        assert_eq!(GBox::new(Flags::xy()).serialized_float_count(), 4);
        assert_eq!(GBox::new(Flags::xym()).serialized_float_count(), 6);
        assert_eq!(GBox::new(Flags::xyzm()).serialized_float_count(), 8);
        assert_eq!(GBox::new(Flags::xy().with_geodetic(true)).serialized_float_count(), 6);
    }

    #[test]
    fn text_round_trip() {
        let bbox = GBox {
            xmin: -0.5,
            xmax: 0.25,
            ymin: 0.0,
            ymax: 1.0,
            zmin: -1.0,
            zmax: 0.75,
            ..GBox::new(Flags::xy().with_geodetic(true))
        };

        let text = bbox.to_text();
        assert_eq!(text, "GBOX((-0.5,0,-1),(0.25,1,0.75))");
        assert_eq!(GBox::from_text(&text).unwrap(), bbox);
        assert_eq!(bbox.to_string(), text);

        assert_eq!(rect(0.0, 1.0, 2.0, 3.0).to_text(), "GBOX((0,1),(2,3))");
        assert_eq!(GBox::from_text("GBOX((0,1),(2,3))").unwrap(), rect(0.0, 1.0, 2.0, 3.0));
    }

    #[test]
    fn text_parse_errors() {
        assert_matches!(GBox::from_text("BOX(0 0,1 1)"), Err(TesseraTypesError::Parse { .. }));
        assert_matches!(GBox::from_text("GBOX((0,a,1),(1,1,1))"), Err(TesseraTypesError::Parse { .. }));
        assert_matches!(GBox::from_text("GBOX((0,0,1),(1,1))"), Err(TesseraTypesError::Parse { .. }));
    }

    #[test]
    fn abs_diff_eq() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(1e-12, 0.0, 1.0, 1.0);
        assert_abs_diff_eq!(a, b, epsilon = 1e-9);
    }

    fn arb_box() -> impl Strategy<Value = GBox> {
        (
            -1e6..1e6f64,
            -1e6..1e6f64,
            0.0..1e4f64,
            0.0..1e4f64,
        )
            .prop_map(|(x, y, w, h)| rect(x, y, x + w, y + h))
    }

    proptest! {
        #[test]
        fn union_contains_both(a in arb_box(), b in arb_box()) {
            let u = GBox::union(Some(&a), Some(&b)).unwrap();
            prop_assert!(u.contains(&a));
            prop_assert!(u.contains(&b));
        }

        #[test]
        fn union_is_commutative(a in arb_box(), b in arb_box()) {
            prop_assert_eq!(GBox::union(Some(&a), Some(&b)), GBox::union(Some(&b), Some(&a)));
        }

        #[test]
        fn merge_with_self_is_noop(a in arb_box()) {
            let mut merged = a;
            merged.merge(&a).unwrap();
            prop_assert_eq!(merged, a);
        }

        #[test]
        fn overlaps_is_symmetric(a in arb_box(), b in arb_box()) {
            prop_assert_eq!(a.overlaps(&b).unwrap(), b.overlaps(&a).unwrap());
        }

        #[test]
        fn float_round_contains_original(a in arb_box()) {
            let mut rounded = a;
            rounded.float_round();
            prop_assert!(rounded.contains(&a));
        }
    }
}
