//! Approximation of circular arcs with line segments.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::arc::{arc_center, interpolate_arc};
use crate::context::Context;
use crate::error::TesseraTypesError;
use crate::flags::Flags;
use crate::geometry::{Geometry, GeometryKind, GeometryType};
use crate::point::Point4d;
use crate::point_array::{PointArray, PointBuf, PointSequence};
use crate::segment::{segment_side, Side};

/// Replaces every circular arc of the geometry with line segments, using `segments_per_quadrant` segments for every
/// quarter of a circle. Z and M are interpolated along the arc.
///
/// Curved types are converted into their linear counterparts (circular strings and compound curves into lines, curve
/// polygons into polygons, multi-curves into multi-lines, multi-surfaces into multi-polygons). Other geometries are
/// copied. The input is never modified.
pub fn stroke(
    ctx: &Context,
    geometry: &Geometry<'_>,
    segments_per_quadrant: u32,
) -> Result<Geometry<'static>, TesseraTypesError> {
    stroke_geometry(Some(ctx), geometry, segments_per_quadrant)
}

fn poll(ctx: Option<&Context>) -> Result<(), TesseraTypesError> {
    match ctx {
        Some(ctx) => ctx.check_interrupt(),
        None => Ok(()),
    }
}

pub(crate) fn stroke_geometry(
    ctx: Option<&Context>,
    geometry: &Geometry<'_>,
    segments_per_quadrant: u32,
) -> Result<Geometry<'static>, TesseraTypesError> {
    if segments_per_quadrant == 0 {
        return Err(TesseraTypesError::InvalidArgument(
            "number of segments per quadrant must be positive".into(),
        ));
    }

    let srid = geometry.srid();
    let flags = geometry.flags();

    let kind = match geometry.kind() {
        GeometryKind::CircularString(points) => {
            GeometryKind::Line(stroke_circular_string(ctx, points, segments_per_quadrant)?.into())
        }
        GeometryKind::Collection {
            geometry_type,
            geometries,
        } => match geometry_type {
            GeometryType::Compound => {
                GeometryKind::Line(stroke_compound(ctx, flags, geometries, segments_per_quadrant)?.into())
            }
            GeometryType::CurvePolygon => {
                let rings = geometries
                    .iter()
                    .map(|ring| stroke_ring(ctx, ring, segments_per_quadrant))
                    .collect::<Result<_, _>>()?;
                GeometryKind::Polygon(rings)
            }
            GeometryType::MultiCurve | GeometryType::MultiSurface | GeometryType::Collection => {
                let stroked_type = match geometry_type {
                    GeometryType::MultiCurve => GeometryType::MultiLine,
                    GeometryType::MultiSurface => GeometryType::MultiPolygon,
                    _ => GeometryType::Collection,
                };

                GeometryKind::Collection {
                    geometry_type: stroked_type,
                    geometries: geometries
                        .iter()
                        .map(|child| stroke_geometry(ctx, child, segments_per_quadrant))
                        .collect::<Result<_, _>>()?,
                }
            }
            _ => return Ok(geometry.clone_deep()),
        },
        _ => return Ok(geometry.clone_deep()),
    };

    Geometry::new(srid, flags, kind)
}

fn stroke_ring(
    ctx: Option<&Context>,
    ring: &Geometry<'_>,
    segments_per_quadrant: u32,
) -> Result<PointArray<'static>, TesseraTypesError> {
    let buf = match ring.kind() {
        GeometryKind::Line(points) => points.to_buf(),
        GeometryKind::CircularString(points) => stroke_circular_string(ctx, points, segments_per_quadrant)?,
        GeometryKind::Collection {
            geometry_type: GeometryType::Compound,
            geometries,
        } => stroke_compound(ctx, ring.flags(), geometries, segments_per_quadrant)?,
        _ => {
            return Err(TesseraTypesError::InvalidSubtype {
                parent: GeometryType::CurvePolygon,
                child: ring.geometry_type(),
            })
        }
    };

    Ok(buf.into())
}

fn stroke_compound(
    ctx: Option<&Context>,
    flags: Flags,
    segments: &[Geometry<'_>],
    segments_per_quadrant: u32,
) -> Result<PointBuf, TesseraTypesError> {
    let mut out = PointBuf::new(flags);
    for segment in segments {
        match segment.kind() {
            GeometryKind::Line(points) => out.append_array(points, true)?,
            GeometryKind::CircularString(points) => {
                let stroked = stroke_circular_string(ctx, points, segments_per_quadrant)?;
                out.append_array(&stroked, true)?;
            }
            _ => {
                return Err(TesseraTypesError::InvalidSubtype {
                    parent: GeometryType::Compound,
                    child: segment.geometry_type(),
                })
            }
        }
    }

    Ok(out)
}

/// Strokes consecutive arcs of a circular string. Degenerate arcs are kept as straight segments.
fn stroke_circular_string(
    ctx: Option<&Context>,
    points: &impl PointSequence,
    segments_per_quadrant: u32,
) -> Result<PointBuf, TesseraTypesError> {
    let mut out = PointBuf::new(points.flags());

    for i in (2..points.len()).step_by(2) {
        poll(ctx)?;

        let p1 = points.get_point(i - 2)?;
        let p2 = points.get_point(i - 1)?;
        let p3 = points.get_point(i)?;

        if !stroke_arc(&mut out, &p1, &p2, &p3, segments_per_quadrant) {
            out.append(p1, true);
            out.append(p2, true);
        }
    }

    if let Some(last) = points.last() {
        out.append(last, false);
    }

    Ok(out)
}

/// Appends the start point and the interior points of a stroked arc to `out`. The end point is not appended.
///
/// Returns false without touching `out` if the points are collinear (and do not form a full circle).
fn stroke_arc(out: &mut PointBuf, p1: &Point4d, p2: &Point4d, p3: &Point4d, segments_per_quadrant: u32) -> bool {
    let flags = out.flags();
    let p2_side = segment_side(p1, p3, p2);
    let is_circle = p1.x == p3.x && p1.y == p3.y;

    let (center, radius) = match arc_center(p1, p2, p3) {
        Some(center) if is_circle || p2_side != Side::Collinear => center,
        _ => return false,
    };

    let mut increment = FRAC_PI_2 / segments_per_quadrant as f64;
    let a1 = (p1.y - center.y).atan2(p1.x - center.x);
    let mut a2 = (p2.y - center.y).atan2(p2.x - center.x);
    let mut a3 = (p3.y - center.y).atan2(p3.x - center.x);

    if is_circle {
        a3 = a1 + 2.0 * PI;
        a2 = a1 + PI;
    } else if p2_side == Side::Left {
        // Clockwise sweep.
        increment = -increment;
        if a3 > a1 {
            a3 -= 2.0 * PI;
        }
        if a2 > a1 {
            a2 -= 2.0 * PI;
        }
    } else {
        if a3 < a1 {
            a3 += 2.0 * PI;
        }
        if a2 < a1 {
            a2 += 2.0 * PI;
        }
    }

    out.append(*p1, false);

    let steps = ((a3 - a1).abs() / increment.abs() - 1e-9).ceil().max(1.0) as usize;
    for k in 1..steps {
        let angle = a1 + k as f64 * increment;
        let mut point = Point4d::xy(center.x + radius * angle.cos(), center.y + radius * angle.sin());
        if flags.has_z {
            point.z = interpolate_arc(angle, a1, a2, a3, p1.z, p2.z, p3.z);
        }
        if flags.has_m {
            point.m = interpolate_arc(angle, a1, a2, a3, p1.m, p2.m, p3.m);
        }

        out.append(point, false);
    }

    true
}
