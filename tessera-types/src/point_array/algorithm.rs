use crate::context::Context;
use crate::error::TesseraTypesError;
use crate::point_array::{PointBuf, PointSequence};
use crate::segment::Segment;

pub(super) fn segmentize<S: PointSequence>(
    ctx: &Context,
    points: &S,
    max_distance: f64,
) -> Result<PointBuf, TesseraTypesError> {
    if max_distance.is_nan() || max_distance <= 0.0 {
        return Err(TesseraTypesError::InvalidArgument(format!(
            "segment length must be positive, got {max_distance}"
        )));
    }

    let flags = points.flags();
    let mut out = PointBuf::with_capacity(flags, points.len());
    let Some(first) = points.first() else {
        return Ok(out);
    };

    out.append(first, false);
    let allow_duplicate = points.len() == 2;

    for (p1, p2) in points.iter_segments() {
        ctx.check_interrupt()?;

        let segment_length = p1.distance_2d(&p2);
        let segment_count = (segment_length / max_distance).ceil();
        if segment_count.is_finite() && segment_count > 1.0 {
            let segment_count = segment_count as usize;
            for j in 1..segment_count {
                let fraction = j as f64 / segment_count as f64;
                out.append(p1.interpolate(&p2, fraction), false);
            }
        }

        out.append(p2, allow_duplicate);
    }

    Ok(out)
}

/// Index of the point between `start` and `end` that is farthest from the segment between them, together with the
/// squared distance. Distance is negative if there are no points in between.
fn find_split<S: PointSequence>(points: &S, start: usize, end: usize) -> (usize, f64) {
    let mut split = start;
    let mut max_distance = -1.0;

    if start + 1 < end {
        let (Some(a), Some(b)) = (points.point(start), points.point(end)) else {
            return (split, max_distance);
        };
        let segment = Segment(&a, &b);

        for k in start + 1..end {
            let Some(p) = points.point(k) else {
                continue;
            };

            let distance = segment.distance_to_point_sq(&p);
            if distance > max_distance {
                max_distance = distance;
                split = k;
            }
        }
    }

    (split, max_distance)
}

pub(super) fn simplify<S: PointSequence>(
    ctx: &Context,
    points: &S,
    epsilon: f64,
    min_points: usize,
) -> Result<PointBuf, TesseraTypesError> {
    let flags = points.flags();
    let len = points.len();
    if len < 3 {
        return Ok(points.to_buf());
    }

    let epsilon_sq = epsilon * epsilon;
    let mut out = PointBuf::with_capacity(flags, len);
    let mut stack = Vec::with_capacity(len);

    let mut start = 0;
    stack.push(len - 1);
    out.append(points.get_point(0)?, false);

    while let Some(&end) = stack.last() {
        ctx.check_interrupt()?;

        let (split, distance) = find_split(points, start, end);
        if distance > epsilon_sq || (out.len() + stack.len() < min_points && distance >= 0.0) {
            stack.push(split);
        } else {
            out.append(points.get_point(end)?, false);
            start = end;
            stack.pop();
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use super::*;
    use crate::context::request_interrupt;
    use crate::flags::Flags;
    use crate::point::Point4d;

    fn line(points: &[(f64, f64)]) -> PointBuf {
        PointBuf::from_points(Flags::xy(), points.iter().map(|&(x, y)| Point4d::xy(x, y)))
    }

    #[test]
    fn segmentize_interpolates_all_dims() {
        let ctx = Context::new();
        let buf = PointBuf::from_points(
            Flags::xyzm(),
            [Point4d::new(0.0, 0.0, 0.0, 0.0), Point4d::new(4.0, 0.0, 8.0, 4.0)],
        );

        let result = buf.segmentize(&ctx, 1.0).unwrap();
        assert_eq!(result.len(), 5);
        assert_eq!(result.point(1), Some(Point4d::new(1.0, 0.0, 2.0, 1.0)));
        assert_eq!(result.point(4), Some(Point4d::new(4.0, 0.0, 8.0, 4.0)));
    }

    #[test]
    fn segmentize_keeps_short_segments() {
        let ctx = Context::new();
        let buf = line(&[(0.0, 0.0), (0.5, 0.0), (0.5, 0.5)]);
        let result = buf.segmentize(&ctx, 1.0).unwrap();
        assert_eq!(result, buf);
    }

    #[test]
    fn segmentize_rejects_bad_distance() {
        let ctx = Context::new();
        let buf = line(&[(0.0, 0.0), (1.0, 0.0)]);
        assert_matches!(buf.segmentize(&ctx, 0.0), Err(TesseraTypesError::InvalidArgument(_)));
        assert_matches!(buf.segmentize(&ctx, f64::NAN), Err(TesseraTypesError::InvalidArgument(_)));
    }

    #[test]
    fn segmentize_can_be_interrupted() {
        let ctx = Context::new();
        let buf = line(&[(0.0, 0.0), (100.0, 0.0)]);
        request_interrupt(&ctx);
        assert_matches!(buf.segmentize(&ctx, 1.0), Err(TesseraTypesError::Interrupted));
    }

    #[test]
    fn simplify_removes_close_points() {
        let ctx = Context::new();
        let buf = line(&[(0.0, 0.0), (1.0, 0.1), (2.0, -0.1), (3.0, 5.0), (4.0, 6.0), (5.0, 7.0)]);

        let result = buf.simplify(&ctx, 0.5, 2).unwrap();
        let coords: Vec<_> = result.iter_points().map(|p| (p.x, p.y)).collect();
        assert_eq!(coords, vec![(0.0, 0.0), (2.0, -0.1), (3.0, 5.0), (5.0, 7.0)]);
    }

    #[test]
    fn simplify_respects_min_points() {
        let ctx = Context::new();
        let buf = line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);

        assert_eq!(buf.simplify(&ctx, 1.0, 2).unwrap().len(), 2);
        assert_eq!(buf.simplify(&ctx, 1.0, 3).unwrap().len(), 3);
    }

    #[test]
    fn simplify_short_input() {
        let ctx = Context::new();
        let buf = line(&[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(buf.simplify(&ctx, 10.0, 2).unwrap(), buf);
    }

    fn arb_line() -> impl Strategy<Value = PointBuf> {
        prop::collection::vec((-100.0..100.0f64, -100.0..100.0f64), 2..40).prop_map(|coords| line(&coords))
    }

    proptest! {
        #[test]
        fn simplify_keeps_end_points(buf in arb_line(), epsilon in 0.0..50.0f64) {
            let result = buf.simplify(&Context::new(), epsilon, 2).unwrap();
            prop_assert_eq!(result.first(), buf.first());
            prop_assert_eq!(result.last(), buf.last());
        }

        #[test]
        fn segmentize_bounds_segment_length(buf in arb_line(), max_distance in 0.5..20.0f64) {
            let result = buf.segmentize(&Context::new(), max_distance).unwrap();

            for (a, b) in result.iter_segments() {
                prop_assert!(a.distance_2d(&b) <= max_distance * (1.0 + 1e-9));
            }

            for p in buf.iter_points() {
                prop_assert!(result.iter_points().any(|q| q.same_2d(&p)));
            }

            assert_abs_diff_eq!(result.length_2d(), buf.length_2d(), epsilon = 1e-6);
        }
    }
}
