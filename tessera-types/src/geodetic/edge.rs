use std::ops::{BitOr, BitOrAssign};

use nalgebra::{Vector2, Vector3};

use crate::error::TesseraTypesError;
use crate::flags::Flags;
use crate::gbox::GBox;
use crate::geodetic::sphere::{ll2cart, normalize, normalize2d, point3d_equals, unit_normal};
use crate::geodetic::{fp_equals, fp_is_zero};
use crate::point::Point4d;
use crate::point_array::PointSequence;
use crate::segment::segment_side;

/// Set of flags describing how two great circle edges interact.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct EdgeInteraction(u8);

impl EdgeInteraction {
    /// Edges do not interact.
    pub const NO_INTERACT: Self = Self(0x00);
    /// Edges share at least one point.
    pub const INTERSECTS: Self = Self(0x01);
    /// Edges lie on the same great circle.
    pub const COLINEAR: Self = Self(0x02);
    /// An end point of the first edge lies on the second edge, the other end is to the right.
    pub const A_TOUCH_RIGHT: Self = Self(0x04);
    /// An end point of the first edge lies on the second edge, the other end is to the left.
    pub const A_TOUCH_LEFT: Self = Self(0x08);
    /// An end point of the second edge lies on the first edge, the other end is to the right.
    pub const B_TOUCH_RIGHT: Self = Self(0x10);
    /// An end point of the second edge lies on the first edge, the other end is to the left.
    pub const B_TOUCH_LEFT: Self = Self(0x20);

    /// Returns true if all flags of `other` are set.
    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if any flag of `other` is set.
    pub fn intersects(&self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Raw bits.
    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl BitOr for EdgeInteraction {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for EdgeInteraction {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Sign of the dot product with tolerance: `0` if the vectors are orthogonal.
fn dot_product_side(p: &Vector3<f64>, q: &Vector3<f64>) -> i32 {
    let dp = p.dot(q);
    if fp_is_zero(dp) {
        0
    } else if dp < 0.0 {
        -1
    } else {
        1
    }
}

/// Returns true if `p` lies inside the cone formed by the origin and the edge `a1`-`a2`.
pub fn point_in_cone(a1: &Vector3<f64>, a2: &Vector3<f64>, p: &Vector3<f64>) -> bool {
    if point3d_equals(a1, p) || point3d_equals(a2, p) {
        return true;
    }

    let ac = normalize(&(a1 + a2));
    let min_similarity = a1.dot(&ac);
    let similarity = p.dot(&ac);

    similarity > min_similarity || (similarity - min_similarity).abs() < 2e-16
}

/// Classifies the interaction of the great circle edges `a1`-`a2` and `b1`-`b2`.
pub fn edge_intersects(
    a1: &Vector3<f64>,
    a2: &Vector3<f64>,
    b1: &Vector3<f64>,
    b2: &Vector3<f64>,
) -> EdgeInteraction {
    let an = unit_normal(a1, a2);
    let bn = unit_normal(b1, b2);

    let ab_dot = an.dot(&bn);
    if fp_equals(ab_dot.abs(), 1.0) {
        if point_in_cone(a1, a2, b1)
            || point_in_cone(a1, a2, b2)
            || point_in_cone(b1, b2, a1)
            || point_in_cone(b1, b2, a2)
        {
            return EdgeInteraction::INTERSECTS | EdgeInteraction::COLINEAR;
        }

        return EdgeInteraction::NO_INTERACT;
    }

    let a1_side = dot_product_side(&bn, a1);
    let a2_side = dot_product_side(&bn, a2);
    let b1_side = dot_product_side(&an, b1);
    let b2_side = dot_product_side(&an, b2);

    if a1_side == a2_side && a1_side != 0 {
        return EdgeInteraction::NO_INTERACT;
    }

    if b1_side == b2_side && b1_side != 0 {
        return EdgeInteraction::NO_INTERACT;
    }

    if a1_side != a2_side && a1_side + a2_side == 0 && b1_side != b2_side && b1_side + b2_side == 0 {
        let vn = unit_normal(&an, &bn);
        if point_in_cone(a1, a2, &vn) && point_in_cone(b1, b2, &vn) {
            return EdgeInteraction::INTERSECTS;
        }

        let vn = -vn;
        if point_in_cone(a1, a2, &vn) && point_in_cone(b1, b2, &vn) {
            return EdgeInteraction::INTERSECTS;
        }

        return EdgeInteraction::NO_INTERACT;
    }

    let mut result = EdgeInteraction::INTERSECTS;
    let touch_side = |other_side: i32, right, left| if other_side < 0 { right } else { left };

    if a1_side == 0 {
        result |= touch_side(a2_side, EdgeInteraction::A_TOUCH_RIGHT, EdgeInteraction::A_TOUCH_LEFT);
    } else if a2_side == 0 {
        result |= touch_side(a1_side, EdgeInteraction::A_TOUCH_RIGHT, EdgeInteraction::A_TOUCH_LEFT);
    }

    if b1_side == 0 {
        result |= touch_side(b2_side, EdgeInteraction::B_TOUCH_RIGHT, EdgeInteraction::B_TOUCH_LEFT);
    } else if b2_side == 0 {
        result |= touch_side(b1_side, EdgeInteraction::B_TOUCH_RIGHT, EdgeInteraction::B_TOUCH_LEFT);
    }

    result
}

/// Bounding box of the great circle edge `a1`-`a2` in unit-sphere coordinates.
///
/// The arc between the end points can bulge past the end point coordinates. Every axis direction (`+x`, `-x`, `+y`,
/// `-y`, `+z`, `-z`) that falls on the far side of the edge chord is an extreme point of the arc and is added to the
/// box. Antipodal end points do not define a unique great circle and are rejected.
pub fn edge_calculate_gbox(a1: &Vector3<f64>, a2: &Vector3<f64>) -> Result<GBox, TesseraTypesError> {
    let mut bbox = GBox::from_vector(Flags::xy().with_geodetic(true), a1);
    bbox.merge_vector(a2);

    if point3d_equals(a1, a2) {
        return Ok(bbox);
    }

    if fp_equals(a1.x, -a2.x) && fp_equals(a1.y, -a2.y) && fp_equals(a1.z, -a2.z) {
        return Err(TesseraTypesError::AntipodalEdge);
    }

    let an = unit_normal(a1, a2);
    let a3 = unit_normal(&an, a1);

    let r1 = Point4d::xy(1.0, 0.0);
    let r2 = Point4d::xy(a2.dot(a1), a2.dot(&a3));
    let origin = Point4d::xy(0.0, 0.0);
    let o_side = segment_side(&r1, &r2, &origin);

    let axes = [
        Vector3::x(),
        -Vector3::x(),
        Vector3::y(),
        -Vector3::y(),
        Vector3::z(),
        -Vector3::z(),
    ];

    for axis in axes {
        let rx = normalize2d(&Vector2::new(axis.dot(a1), axis.dot(&a3)));
        if segment_side(&r1, &r2, &Point4d::xy(rx.x, rx.y)) != o_side {
            let extreme = a1 * rx.x + a3 * rx.y;
            bbox.merge_vector(&extreme);
        }
    }

    Ok(bbox)
}

/// Tests whether `pt_to_test` is inside of the ring on the sphere, by counting how many ring edges the great circle
/// edge from the test point to `pt_outside` crosses. Both points are longitude/latitude in degrees.
///
/// Points on the ring boundary count as inside. Rings with fewer than four points contain nothing.
pub fn ptarray_contains_point_sphere(
    ring: &impl PointSequence,
    pt_outside: &Point4d,
    pt_to_test: &Point4d,
) -> bool {
    if ring.len() < 4 {
        return false;
    }

    let s1 = ll2cart(pt_to_test.x, pt_to_test.y);
    let s2 = ll2cart(pt_outside.x, pt_outside.y);

    let mut points = ring.iter_points();
    let Some(first) = points.next() else {
        return false;
    };
    let mut e1 = ll2cart(first.x, first.y);
    let mut count = 0usize;

    for p in points {
        let e2 = ll2cart(p.x, p.y);

        if point3d_equals(&e1, &e2) {
            continue;
        }

        if point3d_equals(&s1, &e1) {
            return true;
        }

        let interaction = edge_intersects(&s1, &s2, &e1, &e2);
        if interaction.intersects(EdgeInteraction::INTERSECTS) {
            if interaction.intersects(EdgeInteraction::A_TOUCH_RIGHT | EdgeInteraction::A_TOUCH_LEFT) {
                return true;
            }

            // Right side touches and colinear runs are not crossings. The edge start is not advanced here.
            if interaction.intersects(EdgeInteraction::B_TOUCH_RIGHT | EdgeInteraction::COLINEAR) {
                continue;
            }

            count += 1;
        }

        e1 = e2;
    }

    count % 2 == 1
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::point_array::PointBuf;

    fn ll(lon: f64, lat: f64) -> Vector3<f64> {
        ll2cart(lon, lat)
    }

    #[test]
    fn crossing_edges() {
        let result = edge_intersects(&ll(-10.0, 0.0), &ll(10.0, 0.0), &ll(0.0, -10.0), &ll(0.0, 10.0));
        assert_eq!(result, EdgeInteraction::INTERSECTS);
    }

    #[test]
    fn disjoint_edges() {
        let result = edge_intersects(&ll(-10.0, 0.0), &ll(10.0, 0.0), &ll(0.0, 5.0), &ll(0.0, 10.0));
        assert_eq!(result, EdgeInteraction::NO_INTERACT);

        let result = edge_intersects(&ll(-10.0, 0.0), &ll(-5.0, 0.0), &ll(0.0, -10.0), &ll(0.0, 10.0));
        assert_eq!(result, EdgeInteraction::NO_INTERACT);
    }

    #[test]
    fn colinear_edges() {
        let result = edge_intersects(&ll(-10.0, 0.0), &ll(10.0, 0.0), &ll(5.0, 0.0), &ll(20.0, 0.0));
        assert!(result.contains(EdgeInteraction::INTERSECTS | EdgeInteraction::COLINEAR));

        let result = edge_intersects(&ll(-10.0, 0.0), &ll(10.0, 0.0), &ll(30.0, 0.0), &ll(40.0, 0.0));
        assert_eq!(result, EdgeInteraction::NO_INTERACT);
    }

    #[test]
    fn touching_edges() {
        let result = edge_intersects(&ll(0.0, 0.0), &ll(0.0, 10.0), &ll(-10.0, 0.0), &ll(10.0, 0.0));
        assert!(result.intersects(EdgeInteraction::INTERSECTS));
        assert!(result.intersects(EdgeInteraction::A_TOUCH_LEFT | EdgeInteraction::A_TOUCH_RIGHT));
    }

    #[test]
    fn cone() {
        let a1 = ll(0.0, 0.0);
        let a2 = ll(10.0, 0.0);
        assert!(point_in_cone(&a1, &a2, &ll(5.0, 1.0)));
        assert!(point_in_cone(&a1, &a2, &a1));
        assert!(!point_in_cone(&a1, &a2, &ll(20.0, 0.0)));
    }

    #[test]
    fn gbox_of_equator_edge() {
        let bbox = edge_calculate_gbox(&ll(-45.0, 0.0), &ll(45.0, 0.0)).unwrap();
        assert!((bbox.xmax - 1.0).abs() < 1e-12);
        assert!((bbox.xmin - 45f64.to_radians().cos()).abs() < 1e-12);
        assert!(bbox.zmin.abs() < 1e-12 && bbox.zmax.abs() < 1e-12);
    }

    #[test]
    fn gbox_of_polar_bulge() {
        let bbox = edge_calculate_gbox(&ll(0.0, 60.0), &ll(180.0, 60.0)).unwrap();
        assert!((bbox.zmax - 1.0).abs() < 1e-12);
    }

    #[test]
    fn antipodal_edge() {
        assert_matches!(
            edge_calculate_gbox(&ll(0.0, 0.0), &ll(180.0, 0.0)),
            Err(TesseraTypesError::AntipodalEdge)
        );
    }

    #[test]
    fn contains_point_on_sphere() {
        let ring = PointBuf::from_points(
            Flags::xy().with_geodetic(true),
            [
                Point4d::xy(0.0, 0.0),
                Point4d::xy(10.0, 0.0),
                Point4d::xy(10.0, 10.0),
                Point4d::xy(0.0, 10.0),
                Point4d::xy(0.0, 0.0),
            ],
        );
        let outside = Point4d::xy(-5.0, 5.0);

        assert!(ptarray_contains_point_sphere(&ring, &outside, &Point4d::xy(5.0, 5.0)));
        assert!(!ptarray_contains_point_sphere(&ring, &outside, &Point4d::xy(20.0, 5.0)));
        assert!(ptarray_contains_point_sphere(&ring, &outside, &Point4d::xy(0.0, 0.0)));
    }
}
