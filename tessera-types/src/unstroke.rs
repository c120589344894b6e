//! Best-effort detection of circular arcs in linear geometries.
//!
//! Runs of consecutive edges whose vertices lie on a common circle, with equal turning angles, are replaced by
//! circular strings. This is a heuristic: it recovers arcs produced by [`stroke`](crate::stroke::stroke), but is not
//! guaranteed to reproduce the original curve.

use std::f64::consts::PI;

use crate::arc::{arc_angle, arc_center, EPSILON_SQLMM};
use crate::context::Context;
use crate::error::TesseraTypesError;
use crate::flags::{Flags, Srid};
use crate::geometry::{Geometry, GeometryKind, GeometryType};
use crate::point::Point4d;
use crate::point_array::{PointArray, PointBuf, PointSequence};
use crate::segment::segment_side;

/// Minimum number of edges per quadrant for a run of edges to be accepted as an arc.
const MIN_QUADRANT_EDGES: f64 = 2.0;

/// Replaces runs of edges that approximate circular arcs with curved geometries.
///
/// Lines become circular strings or compound curves, polygons become curve polygons, multi-lines become multi-curves
/// and multi-polygons become multi-surfaces, but only if at least one arc was found. Collections are processed child
/// by child. Other geometries are copied.
pub fn unstroke(ctx: &Context, geometry: &Geometry<'_>) -> Result<Geometry<'static>, TesseraTypesError> {
    let srid = geometry.srid();
    let flags = geometry.flags();

    match geometry.kind() {
        GeometryKind::Line(points) => unstroke_line(ctx, geometry, points),
        GeometryKind::Polygon(rings) => {
            let rings = rings
                .iter()
                .map(|ring| unstroke_points(ctx, srid, flags, ring))
                .collect::<Result<Vec<_>, _>>()?;

            if rings.iter().any(is_curve) {
                Geometry::collection(GeometryType::CurvePolygon, srid, flags, rings)
            } else {
                Ok(geometry.clone_deep())
            }
        }
        GeometryKind::Collection {
            geometry_type,
            geometries,
        } => match geometry_type {
            GeometryType::MultiLine => unstroke_children(ctx, geometry, geometries, GeometryType::MultiCurve),
            GeometryType::MultiPolygon => unstroke_children(ctx, geometry, geometries, GeometryType::MultiSurface),
            GeometryType::Collection => {
                let children = geometries
                    .iter()
                    .map(|child| unstroke(ctx, child))
                    .collect::<Result<Vec<_>, _>>()?;
                Geometry::collection(GeometryType::Collection, srid, flags, children)
            }
            _ => Ok(geometry.clone_deep()),
        },
        _ => Ok(geometry.clone_deep()),
    }
}

fn is_curve(geometry: &Geometry<'_>) -> bool {
    matches!(
        geometry.geometry_type(),
        GeometryType::CircularString | GeometryType::Compound | GeometryType::CurvePolygon
    )
}

fn unstroke_children(
    ctx: &Context,
    geometry: &Geometry<'_>,
    geometries: &[Geometry<'_>],
    curved_type: GeometryType,
) -> Result<Geometry<'static>, TesseraTypesError> {
    let children = geometries
        .iter()
        .map(|child| unstroke(ctx, child))
        .collect::<Result<Vec<_>, _>>()?;

    if children.iter().any(is_curve) {
        Geometry::collection(curved_type, geometry.srid(), geometry.flags(), children)
    } else {
        Ok(geometry.clone_deep())
    }
}

fn unstroke_line(
    ctx: &Context,
    geometry: &Geometry<'_>,
    points: &PointArray<'_>,
) -> Result<Geometry<'static>, TesseraTypesError> {
    if points.len() < 4 {
        return Ok(geometry.clone_deep());
    }

    unstroke_points(ctx, geometry.srid(), geometry.flags(), points)
}

/// Returns true if `b` lies on the circle through `a1`, `a2` and `a3`, continuing the arc with the same turning angle.
fn pt_continues_arc(a1: &Point4d, a2: &Point4d, a3: &Point4d, b: &Point4d) -> bool {
    let Some((center, radius)) = arc_center(a1, a2, a3) else {
        return false;
    };

    if (radius - b.distance_2d(&center)).abs() >= EPSILON_SQLMM {
        return false;
    }

    let angle1 = arc_angle(a1, a2, a3);
    let angle2 = arc_angle(a2, a3, b);
    if (angle1 - angle2).abs() > EPSILON_SQLMM {
        return false;
    }

    // A point on the same side of the chord as the middle point would be going back over the arc.
    segment_side(a1, a3, b) != segment_side(a1, a3, a2)
}

/// Number of quadrants spanned by the arc from `first` to `last`. `last_but_two` is a point on the arc.
fn arc_quadrants(first: &Point4d, last: &Point4d, last_but_two: &Point4d) -> f64 {
    if first.x == last.x && first.y == last.y {
        return 4.0;
    }

    let Some((center, _)) = arc_center(first, last, last_but_two) else {
        return 4.0;
    };

    let mut angle = arc_angle(first, &center, last);
    if segment_side(first, last_but_two, last).signum() >= 0 {
        angle = -angle;
    }
    if angle < 0.0 {
        angle += 2.0 * PI;
    }

    4.0 * angle / (2.0 * PI)
}

fn unstroke_points(
    ctx: &Context,
    srid: Srid,
    flags: Flags,
    points: &PointArray<'_>,
) -> Result<Geometry<'static>, TesseraTypesError> {
    let points: Vec<Point4d> = points.iter_points().collect();
    if points.len() < 4 {
        let buf = PointBuf::from_points(flags, points);
        return Geometry::new(srid, flags, GeometryKind::Line(buf.into()));
    }

    let num_edges = points.len() - 1;
    // Zero marks a straight edge, other values identify the arc the edge belongs to.
    let mut edges_in_arcs = vec![0usize; num_edges + 1];
    let mut current_arc = 1;
    let mut i = 0;

    while i + 2 < num_edges {
        ctx.check_interrupt()?;

        let first = points[i];
        let (mut a1, mut a2, mut a3) = (points[i], points[i + 1], points[i + 2]);
        let mut b = a3;
        let mut found_arc = false;

        let mut j = i + 3;
        while j <= num_edges {
            b = points[j];
            if !pt_continues_arc(&a1, &a2, &a3, &b) {
                current_arc += 1;
                break;
            }

            found_arc = true;
            edges_in_arcs[j - 3..j].fill(current_arc);

            a1 = a2;
            a2 = a3;
            a3 = b;
            j += 1;
        }

        if found_arc {
            let arc_edges = (j - 1 - i) as f64;
            let quadrants = arc_quadrants(&first, &b, &a1);
            if arc_edges < MIN_QUADRANT_EDGES * quadrants {
                log::trace!("Rejected arc of {arc_edges} edges spanning {quadrants} quadrants");
                edges_in_arcs[i..j].fill(0);
            }

            i = j - 1;
        } else {
            edges_in_arcs[i] = 0;
            i += 1;
        }
    }

    let mut parts = vec![];
    let mut start = 0;
    let mut edge_type = edges_in_arcs[0];
    for (edge, &arc) in edges_in_arcs.iter().enumerate().take(num_edges).skip(1) {
        if arc != edge_type {
            parts.push(part_from_points(srid, flags, &points, edge_type != 0, start, edge - 1)?);
            start = edge;
            edge_type = arc;
        }
    }
    parts.push(part_from_points(srid, flags, &points, edge_type != 0, start, num_edges - 1)?);

    log::debug!("Unstroked {} points into {} parts", points.len(), parts.len());

    if parts.len() == 1 {
        if let Some(part) = parts.pop() {
            return Ok(part);
        }
    }

    Geometry::collection(GeometryType::Compound, srid, flags, parts)
}

/// Builds a line or an arc from the edges `start..=end`.
fn part_from_points(
    srid: Srid,
    flags: Flags,
    points: &[Point4d],
    is_arc: bool,
    start: usize,
    end: usize,
) -> Result<Geometry<'static>, TesseraTypesError> {
    if is_arc {
        let arc = [points[start], points[(start + end + 1) / 2], points[end + 1]];
        let buf = PointBuf::from_points(flags, arc);
        Geometry::new(srid, flags, GeometryKind::CircularString(buf.into()))
    } else {
        let buf = PointBuf::from_points(flags, points[start..end + 2].iter().copied());
        Geometry::new(srid, flags, GeometryKind::Line(buf.into()))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::tests::{buf, line, polygon, square};
    use crate::stroke::stroke;

    fn half_circle() -> Geometry<'static> {
        Geometry::circular_string(Srid::UNKNOWN, buf(Flags::xy(), &[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)])).unwrap()
    }

    #[test]
    fn recovers_stroked_arc() {
        let ctx = Context::new();
        let stroked = stroke(&ctx, &half_circle(), 8).unwrap();
        let unstroked = unstroke(&ctx, &stroked).unwrap();

        assert_eq!(unstroked.geometry_type(), GeometryType::CircularString);
        let points: Vec<_> = unstroked.points().collect();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], Point4d::xy(0.0, 0.0));
        assert_abs_diff_eq!(points[1], Point4d::xy(1.0, 1.0), epsilon = 1e-9);
        assert_eq!(points[2], Point4d::xy(2.0, 0.0));
    }

    #[test]
    fn straight_prefix_gives_compound() {
        let ctx = Context::new();
        let stroked = stroke(&ctx, &half_circle(), 8).unwrap();
        let mut coords = PointBuf::from_points(Flags::xy(), [Point4d::xy(-1.0, 0.0)]);
        coords.append_array(stroked.point_array().unwrap(), true).unwrap();
        let input = Geometry::line(Srid::UNKNOWN, coords).unwrap();

        let unstroked = unstroke(&ctx, &input).unwrap();
        assert_eq!(unstroked.geometry_type(), GeometryType::Compound);

        let parts = unstroked.geometries().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], line(&[(-1.0, 0.0), (0.0, 0.0)]));
        assert_eq!(parts[1].geometry_type(), GeometryType::CircularString);
        assert_eq!(parts[1].points().last(), Some(Point4d::xy(2.0, 0.0)));
    }

    #[test]
    fn square_is_not_an_arc() {
        let ctx = Context::new();
        let poly = polygon(vec![square(0.0, 0.0, 1.0)]);
        assert_eq!(unstroke(&ctx, &poly).unwrap(), poly);

        let short = line(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        assert_eq!(unstroke(&ctx, &short).unwrap(), short);
    }

    #[test]
    fn stroked_circle_polygon_becomes_curve_polygon() {
        let ctx = Context::new();
        let circle =
            Geometry::circular_string(Srid::UNKNOWN, buf(Flags::xy(), &[(0.0, 0.0), (2.0, 0.0), (0.0, 0.0)]))
                .unwrap();
        let ring = stroke(&ctx, &circle, 4).unwrap();
        let GeometryKind::Line(points) = ring.into_kind() else {
            panic!("stroked circle is not a line");
        };

        let poly = polygon(vec![points, square(0.5, -0.25, 0.5)]);
        let unstroked = unstroke(&ctx, &poly).unwrap();
        assert_eq!(unstroked.geometry_type(), GeometryType::CurvePolygon);

        let rings = unstroked.geometries().unwrap();
        assert_eq!(rings[0].geometry_type(), GeometryType::CircularString);
        assert_eq!(rings[1].geometry_type(), GeometryType::Line);
    }

    #[test]
    fn multi_line_becomes_multi_curve() {
        let ctx = Context::new();
        let stroked = stroke(&ctx, &half_circle(), 8).unwrap();
        let multi = Geometry::collection(
            GeometryType::MultiLine,
            Srid::UNKNOWN,
            Flags::xy(),
            vec![stroked, line(&[(5.0, 5.0), (6.0, 6.0)])],
        )
        .unwrap();

        let unstroked = unstroke(&ctx, &multi).unwrap();
        assert_eq!(unstroked.geometry_type(), GeometryType::MultiCurve);

        let plain = Geometry::collection(
            GeometryType::MultiLine,
            Srid::UNKNOWN,
            Flags::xy(),
            vec![line(&[(5.0, 5.0), (6.0, 6.0)])],
        )
        .unwrap();
        assert_eq!(unstroke(&ctx, &plain).unwrap(), plain);
    }
}
