use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::error::TesseraTypesError;
use crate::flags::Flags;
use crate::gbox::GBox;
use crate::geodetic::edge::edge_calculate_gbox;
use crate::geodetic::sphere::{cart2geog, ll2cart, normalize};
use crate::point::Point4d;
use crate::point_array::PointSequence;

/// Flags of every box computed in the geodetic model.
pub const GEODETIC_BOX_FLAGS: Flags = Flags::xy().with_geodetic(true);

/// Extends a ring's geodetic box to the sphere surface on the axes it appears to enclose.
///
/// If the box straddles zero on both axes orthogonal to one of the X, Y or Z axes, the ring is assumed to go around
/// that axis, and the box is pushed to `+1` or `-1` on it depending on which half of the box is larger. This is a
/// heuristic that can be wrong for very large rings. Returns true if the box was changed.
pub fn gbox_check_poles(bbox: &mut GBox) -> bool {
    let mut changed = false;

    if bbox.xmin < 0.0 && bbox.xmax > 0.0 && bbox.ymin < 0.0 && bbox.ymax > 0.0 {
        if bbox.zmin + bbox.zmax > 0.0 {
            bbox.zmax = 1.0;
        } else {
            bbox.zmin = -1.0;
        }
        changed = true;
    }

    if bbox.xmin < 0.0 && bbox.xmax > 0.0 && bbox.zmin < 0.0 && bbox.zmax > 0.0 {
        if bbox.ymin + bbox.ymax > 0.0 {
            bbox.ymax = 1.0;
        } else {
            bbox.ymin = -1.0;
        }
        changed = true;
    }

    if bbox.ymin < 0.0 && bbox.ymax > 0.0 && bbox.zmin < 0.0 && bbox.zmax > 0.0 {
        if bbox.xmin + bbox.xmax > 0.0 {
            bbox.xmax = 1.0;
        } else {
            bbox.xmin = -1.0;
        }
        changed = true;
    }

    changed
}

/// Finds a longitude/latitude point (in degrees) that is guaranteed to be outside of the geodetic box.
///
/// The box is grown in steps starting from one arc minute until one of its corners, projected to the sphere, falls
/// outside of the original box.
pub fn gbox_pt_outside(bbox: &GBox) -> Result<Point4d, TesseraTypesError> {
    let mut grow = PI / 180.0 / 60.0;

    while grow < PI {
        let mut grown = *bbox;
        if grown.xmin > -1.0 {
            grown.xmin -= grow;
        }
        if grown.ymin > -1.0 {
            grown.ymin -= grow;
        }
        if grown.zmin > -1.0 {
            grown.zmin -= grow;
        }
        if grown.xmax < 1.0 {
            grown.xmax += grow;
        }
        if grown.ymax < 1.0 {
            grown.ymax += grow;
        }
        if grown.zmax < 1.0 {
            grown.zmax += grow;
        }

        let corners = [
            Vector3::new(grown.xmin, grown.ymin, grown.zmin),
            Vector3::new(grown.xmin, grown.ymax, grown.zmin),
            Vector3::new(grown.xmin, grown.ymin, grown.zmax),
            Vector3::new(grown.xmax, grown.ymin, grown.zmin),
            Vector3::new(grown.xmax, grown.ymax, grown.zmin),
            Vector3::new(grown.xmax, grown.ymin, grown.zmax),
            Vector3::new(grown.xmin, grown.ymax, grown.zmax),
            Vector3::new(grown.xmax, grown.ymax, grown.zmax),
        ];

        for corner in corners {
            let corner = normalize(&corner);
            if !bbox.contains_point3d(&corner) {
                let g = cart2geog(&corner);
                return Ok(Point4d::xy(g.lon.to_degrees(), g.lat.to_degrees()));
            }
        }

        grow *= 2.0;
    }

    Err(TesseraTypesError::NoOutsidePoint)
}

/// Geodetic box of the line through the points, taking the great circle bulge of every edge into account.
///
/// Coordinates are longitude/latitude in degrees. Returns `None` for an empty sequence.
pub fn ptarray_calculate_gbox_geodetic(points: &impl PointSequence) -> Result<Option<GBox>, TesseraTypesError> {
    let mut iter = points.iter_points();
    let Some(first) = iter.next() else {
        return Ok(None);
    };

    let mut a1 = ll2cart(first.x, first.y);
    let mut bbox = GBox::from_vector(GEODETIC_BOX_FLAGS, &a1);

    for p in iter {
        let a2 = ll2cart(p.x, p.y);
        let edge_box = edge_calculate_gbox(&a1, &a2)?;
        bbox.merge(&edge_box)?;
        a1 = a2;
    }

    Ok(Some(bbox))
}
