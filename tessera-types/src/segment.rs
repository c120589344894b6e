use crate::geodetic::fp_is_zero;
use crate::point::Point4d;

/// A straight line segment between two points. Only X and Y are taken into account.
#[derive(Debug, PartialEq)]
pub struct Segment<'a>(pub &'a Point4d, pub &'a Point4d);

impl Segment<'_> {
    /// Shortest euclidian distance (squared) between a point and the segment:
    ///
    /// * if the normal from the point to the segment ends inside the segment, the returned value is the squared length
    ///   of the normal
    /// * if the normal from the point to the segment ends outside of the segment, the returned value is the smaller one
    ///   of the distances between the point and the segment's endpoints
    pub fn distance_to_point_sq(&self, point: &Point4d) -> f64 {
        if self.0.same_2d(self.1) {
            return self.0.distance_sq_2d(point);
        }

        let dsx = self.1.x - self.0.x;
        let dsy = self.1.y - self.0.y;
        let dpx = point.x - self.0.x;
        let dpy = point.y - self.0.y;
        let ds_len = dsx * dsx + dsy * dsy;

        let r = (dpx * dsx + dpy * dsy) / ds_len;
        if r < 0.0 {
            self.0.distance_sq_2d(point)
        } else if r > 1.0 {
            self.1.distance_sq_2d(point)
        } else {
            let s = (dpy * dsx - dpx * dsy) / ds_len;
            (s * s) * ds_len
        }
    }

    /// Which side of the directed segment the point `q` lies on. See [`Side`].
    pub fn side(&self, q: &Point4d) -> Side {
        segment_side(self.0, self.1, q)
    }

    /// Returns true if `p`, known to be collinear with the segment, lies strictly between its end points in X or Y.
    pub fn contains_collinear(&self, p: &Point4d) -> bool {
        let (a, b) = (self.0, self.1);
        (a.x <= p.x && p.x < b.x)
            || (a.x >= p.x && p.x > b.x)
            || (a.y <= p.y && p.y < b.y)
            || (a.y >= p.y && p.y > b.y)
    }
}

/// Position of a point relative to a directed segment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    /// Point is to the left of the segment direction.
    Left,
    /// Point is on the line through the segment.
    Collinear,
    /// Point is to the right of the segment direction.
    Right,
}

impl Side {
    /// `-1` for left, `0` for collinear and `1` for right.
    pub fn signum(&self) -> i32 {
        match self {
            Side::Left => -1,
            Side::Collinear => 0,
            Side::Right => 1,
        }
    }
}

/// Side of the line `p1`-`p2` on which `q` lies. Cross products within
/// [`FP_TOLERANCE`](crate::geodetic::FP_TOLERANCE) of zero count as collinear.
pub fn segment_side(p1: &Point4d, p2: &Point4d, q: &Point4d) -> Side {
    let side = (q.x - p1.x) * (p2.y - p1.y) - (p2.x - p1.x) * (q.y - p1.y);
    if fp_is_zero(side) {
        Side::Collinear
    } else if side < 0.0 {
        Side::Left
    } else {
        Side::Right
    }
}
