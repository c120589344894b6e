//! Planar circular arc helpers.
//!
//! An arc is defined by three points: start, any point on the arc, and end. If the start and end points coincide,
//! the arc is a full circle passing through the middle point.

use std::f64::consts::PI;

use crate::flags::Flags;
use crate::gbox::GBox;
use crate::geodetic::fp_equals;
use crate::point::Point4d;
use crate::segment::{segment_side, Side};

/// Tolerance used when deciding whether three points are collinear or lie on a common circle.
pub const EPSILON_SQLMM: f64 = 1e-8;

/// Computes the center and the radius of the circle through the three points.
///
/// Returns `None` if the points are collinear. Only X and Y are taken into account.
pub fn arc_center(p1: &Point4d, p2: &Point4d, p3: &Point4d) -> Option<(Point4d, f64)> {
    let dx21 = p2.x - p1.x;
    let dy21 = p2.y - p1.y;
    let dx31 = p3.x - p1.x;
    let dy31 = p3.y - p1.y;

    if fp_equals(p1.x, p3.x) && fp_equals(p1.y, p3.y) {
        let center = Point4d::xy(p1.x + dx21 / 2.0, p1.y + dy21 / 2.0);
        let radius = (dx21 * dx21 + dy21 * dy21).sqrt() / 2.0;
        return Some((center, radius));
    }

    let h21 = dx21 * dx21 + dy21 * dy21;
    let h31 = dx31 * dx31 + dy31 * dy31;

    let d = 2.0 * (dx21 * dy31 - dx31 * dy21);
    if d.abs() < EPSILON_SQLMM {
        return None;
    }

    let cx = p1.x + (h21 * dy31 - h31 * dy21) / d;
    let cy = p1.y - (h21 * dx31 - h31 * dx21) / d;
    let center = Point4d::xy(cx, cy);
    let radius = center.distance_2d(p1);

    Some((center, radius))
}

/// Returns true if the arc sweeps clockwise from `a1` to `a3`.
pub fn arc_is_clockwise(a1: &Point4d, a2: &Point4d, a3: &Point4d) -> bool {
    segment_side(a1, a3, a2) == Side::Left
}

/// Length of the arc in the XY plane.
///
/// Collinear points give the length of the chord, and matching end points give the full circumference.
pub fn arc_length(a1: &Point4d, a2: &Point4d, a3: &Point4d) -> f64 {
    if a1.same_2d(a2) && a2.same_2d(a3) {
        return 0.0;
    }

    let Some((center, radius)) = arc_center(a1, a2, a3) else {
        return a1.distance_2d(a3);
    };

    if a1.same_2d(a3) {
        return 2.0 * PI * radius;
    }

    let angle1 = (a1.y - center.y).atan2(a1.x - center.x);
    let angle3 = (a3.y - center.y).atan2(a3.x - center.x);

    let sweep = if arc_is_clockwise(a1, a2, a3) {
        if angle1 > angle3 {
            angle1 - angle3
        } else {
            2.0 * PI + angle1 - angle3
        }
    } else if angle3 > angle1 {
        angle3 - angle1
    } else {
        2.0 * PI + angle3 - angle1
    };

    radius * sweep
}

/// Signed angle at `b` between the directions to `a` and to `c`.
pub fn arc_angle(a: &Point4d, b: &Point4d, c: &Point4d) -> f64 {
    let ab_x = b.x - a.x;
    let ab_y = b.y - a.y;
    let cb_x = b.x - c.x;
    let cb_y = b.y - c.y;

    let dot = ab_x * cb_x + ab_y * cb_y;
    let cross = ab_x * cb_y - ab_y * cb_x;

    cross.atan2(dot)
}

/// Bounding box of the arc.
///
/// X and Y bounds cover the exact arc extent, including the circle extrema the arc passes through. Z and M bounds (if
/// the flags declare them) cover the three defining points.
pub fn arc_calculate_gbox_2d(flags: Flags, a1: &Point4d, a2: &Point4d, a3: &Point4d) -> GBox {
    let mut bbox = GBox::from_point(flags, a1);
    bbox.merge_point(a2);
    bbox.merge_point(a3);

    let Some((center, radius)) = arc_center(a1, a2, a3) else {
        set_xy_bounds(&mut bbox, a1, a3);
        include_xy(&mut bbox, a2);
        return bbox;
    };

    if a1.x == a3.x && a1.y == a3.y {
        bbox.xmin = center.x - radius;
        bbox.xmax = center.x + radius;
        bbox.ymin = center.y - radius;
        bbox.ymax = center.y + radius;
        include_xy(&mut bbox, a2);
        return bbox;
    }

    set_xy_bounds(&mut bbox, a1, a3);

    let a2_side = segment_side(a1, a3, a2);
    let extrema = [
        Point4d::xy(center.x - radius, center.y),
        Point4d::xy(center.x, center.y - radius),
        Point4d::xy(center.x + radius, center.y),
        Point4d::xy(center.x, center.y + radius),
    ];

    for extremum in &extrema {
        if segment_side(a1, a3, extremum) == a2_side {
            bbox.xmin = bbox.xmin.min(extremum.x);
            bbox.xmax = bbox.xmax.max(extremum.x);
            bbox.ymin = bbox.ymin.min(extremum.y);
            bbox.ymax = bbox.ymax.max(extremum.y);
        }
    }

    // the middle point can land a rounding error outside of the computed extrema
    include_xy(&mut bbox, a2);
    bbox
}

fn set_xy_bounds(bbox: &mut GBox, a: &Point4d, b: &Point4d) {
    bbox.xmin = a.x.min(b.x);
    bbox.xmax = a.x.max(b.x);
    bbox.ymin = a.y.min(b.y);
    bbox.ymax = a.y.max(b.y);
}

fn include_xy(bbox: &mut GBox, p: &Point4d) {
    bbox.xmin = bbox.xmin.min(p.x);
    bbox.xmax = bbox.xmax.max(p.x);
    bbox.ymin = bbox.ymin.min(p.y);
    bbox.ymax = bbox.ymax.max(p.y);
}

/// Interpolates a Z or M value at `angle` along an arc with the given point angles and values.
///
/// The value changes linearly with the angle between the first and the middle point, and between the middle and the
/// last point.
pub(crate) fn interpolate_arc(angle: f64, a1: f64, a2: f64, a3: f64, zm1: f64, zm2: f64, zm3: f64) -> f64 {
    if a1 < a2 {
        if angle <= a2 {
            zm1 + (zm2 - zm1) * (angle - a1) / (a2 - a1)
        } else {
            zm2 + (zm3 - zm2) * (angle - a2) / (a3 - a2)
        }
    } else if angle >= a2 {
        zm1 + (zm2 - zm1) * (a1 - angle) / (a1 - a2)
    } else {
        zm2 + (zm3 - zm2) * (a2 - angle) / (a2 - a3)
    }
}
