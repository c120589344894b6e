use nalgebra::{Matrix3, Vector3};

use crate::point::Point4d;

/// Affine transformation of X, Y and Z: `p' = matrix * p + translation`.
///
/// When applied to coordinates without Z, only the upper-left 2x2 part of the matrix and the X/Y translation are used.
/// M values are never changed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AffineTransform {
    /// Linear part.
    pub matrix: Matrix3<f64>,
    /// Translation part.
    pub translation: Vector3<f64>,
}

impl AffineTransform {
    /// Creates a new transform.
    pub fn new(matrix: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self { matrix, translation }
    }

    /// Transform that does not change anything.
    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }

    /// Shift by the given offsets.
    pub fn translate(dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(Matrix3::identity(), Vector3::new(dx, dy, dz))
    }

    /// Scale along the axes relative to the origin.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self::new(Matrix3::from_diagonal(&Vector3::new(sx, sy, sz)), Vector3::zeros())
    }

    /// Counter-clockwise rotation around the Z axis, `angle` in radians.
    pub fn rotate_z(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        #[rustfmt::skip]
        let matrix = Matrix3::new(
            cos, -sin, 0.0,
            sin, cos, 0.0,
            0.0, 0.0, 1.0,
        );
        Self::new(matrix, Vector3::zeros())
    }

    /// Applies the transform to the point.
    pub fn apply(&self, p: &Point4d, has_z: bool) -> Point4d {
        if has_z {
            let v = self.matrix * Vector3::new(p.x, p.y, p.z) + self.translation;
            Point4d::new(v.x, v.y, v.z, p.m)
        } else {
            let m = &self.matrix;
            Point4d::new(
                m[(0, 0)] * p.x + m[(0, 1)] * p.y + self.translation.x,
                m[(1, 0)] * p.x + m[(1, 1)] * p.y + self.translation.y,
                p.z,
                p.m,
            )
        }
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn apply_2d_ignores_z() {
        let transform = AffineTransform::new(
            Matrix3::new(2.0, 0.0, 5.0, 0.0, 3.0, 5.0, 5.0, 5.0, 5.0),
            Vector3::new(1.0, 1.0, 100.0),
        );

        let p = transform.apply(&Point4d::new(1.0, 1.0, 7.0, 9.0), false);
        assert_eq!(p, Point4d::new(3.0, 4.0, 7.0, 9.0));
    }

    #[test]
    fn apply_3d() {
        let transform = AffineTransform::translate(1.0, 2.0, 3.0);
        let p = transform.apply(&Point4d::new(1.0, 1.0, 1.0, 4.0), true);
        assert_eq!(p, Point4d::new(2.0, 3.0, 4.0, 4.0));
    }

    #[test]
    fn rotate() {
        let transform = AffineTransform::rotate_z(std::f64::consts::FRAC_PI_2);
        let p = transform.apply(&Point4d::xy(1.0, 0.0), false);
        assert_abs_diff_eq!(p, Point4d::xy(0.0, 1.0), epsilon = 1e-12);
    }
}
