use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use crate::flags::Flags;

/// A coordinate tuple with up to four ordinates.
///
/// Ordinates that the owning array does not carry are kept at `0.0` and ignored by comparisons that take [`Flags`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point4d {
    /// X (or longitude in degrees for geodetic data).
    pub x: f64,
    /// Y (or latitude in degrees for geodetic data).
    pub y: f64,
    /// Z (elevation).
    pub z: f64,
    /// M (measure).
    pub m: f64,
}

impl Point4d {
    /// Creates a new point with all four ordinates.
    pub const fn new(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self { x, y, z, m }
    }

    /// Creates a new 2d point.
    pub const fn xy(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 0.0)
    }

    /// Creates a new point with a Z ordinate.
    pub const fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 0.0)
    }

    /// Creates a new point with an M ordinate.
    pub const fn xym(x: f64, y: f64, m: f64) -> Self {
        Self::new(x, y, 0.0, m)
    }

    /// Returns true if the points are equal on every ordinate `flags` declares.
    pub fn same_as(&self, other: &Self, flags: Flags) -> bool {
        self.x == other.x
            && self.y == other.y
            && (!flags.has_z || self.z == other.z)
            && (!flags.has_m || self.m == other.m)
    }

    /// Returns true if X and Y are equal.
    pub fn same_2d(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Returns true if X, Y and Z are equal.
    pub fn same_3d(&self, other: &Self) -> bool {
        self.same_2d(other) && self.z == other.z
    }

    /// Squared planar distance to `other`.
    pub fn distance_sq_2d(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Planar distance to `other`.
    pub fn distance_2d(&self, other: &Self) -> f64 {
        self.distance_sq_2d(other).sqrt()
    }

    /// Euclidean distance to `other` using X, Y and Z.
    pub fn distance_3d(&self, other: &Self) -> f64 {
        let dz = self.z - other.z;
        (self.distance_sq_2d(other) + dz * dz).sqrt()
    }

    /// Point on the segment `self`-`other` at the fraction `t`, with every ordinate interpolated linearly.
    pub fn interpolate(&self, other: &Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
            m: self.m + (other.m - self.m) * t,
        }
    }

    /// Appends the ordinates `flags` declares to `out`, in storage order.
    pub(crate) fn write_ordinates(&self, flags: Flags, out: &mut Vec<f64>) {
        out.push(self.x);
        out.push(self.y);
        if flags.has_z {
            out.push(self.z);
        }
        if flags.has_m {
            out.push(self.m);
        }
    }

    /// Builds a point from ordinates laid out as `flags` declares.
    pub(crate) fn from_ordinates(ordinates: &[f64], flags: Flags) -> Self {
        let mut point = Self::xy(ordinates[0], ordinates[1]);
        let mut index = 2;
        if flags.has_z {
            point.z = ordinates[index];
            index += 1;
        }
        if flags.has_m {
            point.m = ordinates[index];
        }
        point
    }
}

impl AbsDiffEq for Point4d {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
            && self.m.abs_diff_eq(&other.m, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn same_as_respects_flags() {
        let a = Point4d::new(1.0, 2.0, 3.0, 4.0);
        let b = Point4d::new(1.0, 2.0, 5.0, 4.0);

        assert!(a.same_as(&b, Flags::xy()));
        assert!(a.same_as(&b, Flags::xym()));
        assert!(!a.same_as(&b, Flags::xyz()));
    }

    #[test]
    fn interpolate() {
        let a = Point4d::new(0.0, 0.0, 0.0, 10.0);
        let b = Point4d::new(2.0, 4.0, 6.0, 20.0);
        assert_abs_diff_eq!(a.interpolate(&b, 0.5), Point4d::new(1.0, 2.0, 3.0, 15.0));
    }

    #[test]
    fn ordinates() {
        let p = Point4d::new(1.0, 2.0, 3.0, 4.0);
        let mut out = vec![];
        p.write_ordinates(Flags::xym(), &mut out);
        assert_eq!(out, vec![1.0, 2.0, 4.0]);
        assert_eq!(
            Point4d::from_ordinates(&out, Flags::xym()),
            Point4d::new(1.0, 2.0, 0.0, 4.0)
        );
    }
}
