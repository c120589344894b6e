use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{Vector2, Vector3};

use crate::geodetic::{fp_equals, fp_is_zero, GeographicPoint, FP_TOLERANCE};

/// Unit-sphere vector of a geographic point.
pub fn geog2cart(g: &GeographicPoint) -> Vector3<f64> {
    let cos_lat = g.lat.cos();
    Vector3::new(cos_lat * g.lon.cos(), cos_lat * g.lon.sin(), g.lat.sin())
}

/// Geographic point of a unit-sphere vector.
pub fn cart2geog(p: &Vector3<f64>) -> GeographicPoint {
    GeographicPoint {
        lon: p.y.atan2(p.x),
        lat: p.z.asin(),
    }
}

/// Unit-sphere vector of a longitude/latitude pair given in degrees.
pub fn ll2cart(lon: f64, lat: f64) -> Vector3<f64> {
    let lon = lon.to_radians();
    let lat = lat.to_radians();
    let cos_lat = lat.cos();
    Vector3::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
}

/// Scales the vector to unit length. Vectors that are too short to have a direction become zero.
pub fn normalize(v: &Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    if norm <= FP_TOLERANCE {
        return Vector3::zeros();
    }

    v / norm
}

/// Same as [`normalize`] for 2d vectors.
pub fn normalize2d(v: &Vector2<f64>) -> Vector2<f64> {
    let norm = v.norm();
    if norm <= FP_TOLERANCE {
        return Vector2::zeros();
    }

    v / norm
}

/// Returns true if the vectors are equal within the floating point tolerance.
pub fn point3d_equals(a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
    fp_equals(a.x, b.x) && fp_equals(a.y, b.y) && fp_equals(a.z, b.z)
}

/// IEEE 754 remainder: `x - n * y` where `n` is `x / y` rounded to the nearest integer (ties to even).
fn ieee_remainder(x: f64, y: f64) -> f64 {
    x - (x / y).round_ties_even() * y
}

/// Brings longitude in radians into the `(-PI, PI]` range.
pub fn longitude_radians_normalize(lon: f64) -> f64 {
    let mut lon = lon;
    if lon == -PI {
        return PI;
    }
    if lon == -2.0 * PI {
        return 0.0;
    }

    if lon > 2.0 * PI {
        lon = ieee_remainder(lon, 2.0 * PI);
    }
    if lon < -2.0 * PI {
        lon = ieee_remainder(lon, -2.0 * PI);
    }
    if lon > PI {
        lon -= 2.0 * PI;
    }
    if lon < -PI {
        lon += 2.0 * PI;
    }
    if lon == -2.0 * PI {
        lon = -lon;
    }

    lon
}

/// Brings latitude in radians into the `[-PI/2, PI/2]` range, reflecting over the poles.
pub fn latitude_radians_normalize(lat: f64) -> f64 {
    let mut lat = lat;
    if lat > 2.0 * PI {
        lat = ieee_remainder(lat, 2.0 * PI);
    }
    if lat < -2.0 * PI {
        lat = ieee_remainder(lat, -2.0 * PI);
    }
    if lat > PI {
        lat = PI - lat;
    }
    if lat < -PI {
        lat = -PI - lat;
    }
    if lat > FRAC_PI_2 {
        lat = PI - lat;
    }
    if lat < -FRAC_PI_2 {
        lat = -PI - lat;
    }

    lat
}

/// Brings longitude in degrees into the `(-180, 180]` range.
pub fn longitude_degrees_normalize(lon: f64) -> f64 {
    let mut lon = lon;
    if lon > 360.0 {
        lon = ieee_remainder(lon, 360.0);
    }
    if lon < -360.0 {
        lon = ieee_remainder(lon, -360.0);
    }
    if lon > 180.0 {
        lon -= 360.0;
    }
    if lon < -180.0 {
        lon += 360.0;
    }
    if lon == -180.0 {
        return 180.0;
    }
    if lon == -360.0 {
        return 0.0;
    }

    lon
}

/// Brings latitude in degrees into the `[-90, 90]` range, reflecting over the poles.
pub fn latitude_degrees_normalize(lat: f64) -> f64 {
    let mut lat = lat;
    if lat > 360.0 {
        lat = ieee_remainder(lat, 360.0);
    }
    if lat < -360.0 {
        lat = ieee_remainder(lat, -360.0);
    }
    if lat > 180.0 {
        lat = 180.0 - lat;
    }
    if lat < -180.0 {
        lat = -180.0 - lat;
    }
    if lat > 90.0 {
        lat = 180.0 - lat;
    }
    if lat < -90.0 {
        lat = -180.0 - lat;
    }

    lat
}

/// Great circle distance between two points, in radians of arc.
pub fn sphere_distance(s: &GeographicPoint, e: &GeographicPoint) -> f64 {
    let d_lon = e.lon - s.lon;
    let cos_d_lon = d_lon.cos();
    let (sin_lat_e, cos_lat_e) = e.lat.sin_cos();
    let (sin_lat_s, cos_lat_s) = s.lat.sin_cos();

    let a1 = (cos_lat_e * d_lon.sin()).powi(2);
    let a2 = (cos_lat_s * sin_lat_e - sin_lat_s * cos_lat_e * cos_d_lon).powi(2);
    let a = (a1 + a2).sqrt();
    let b = sin_lat_s * sin_lat_e + cos_lat_s * cos_lat_e * cos_d_lon;

    a.atan2(b)
}

/// Initial azimuth (radians, clockwise from north) of the great circle from `s` to `e`. `d` is the distance between
/// the points as returned by [`sphere_distance`].
pub fn sphere_direction(s: &GeographicPoint, e: &GeographicPoint, d: f64) -> f64 {
    if fp_is_zero(s.lat.cos()) {
        return if s.lat > 0.0 { PI } else { 0.0 };
    }

    let f = (e.lat.sin() - s.lat.sin() * d.cos()) / (d.sin() * s.lat.cos());
    let mut heading = if fp_equals(f, 1.0) {
        0.0
    } else if fp_equals(f, -1.0) {
        PI
    } else {
        f.clamp(-1.0, 1.0).acos()
    };

    if (e.lon - s.lon).sin() < 0.0 {
        heading = -heading;
    }

    heading
}

/// Point at the given angular `distance` from `r` along the great circle with the given `azimuth`. Returns `None` if
/// the result cannot be computed.
pub fn sphere_project(r: &GeographicPoint, distance: f64, azimuth: f64) -> Option<GeographicPoint> {
    let (sin_lat1, cos_lat1) = r.lat.sin_cos();
    let (sin_d, cos_d) = distance.sin_cos();

    let lat2 = (sin_lat1 * cos_d + cos_lat1 * sin_d * azimuth.cos()).asin();
    let lon2 = if fp_equals(azimuth, PI) || fp_equals(azimuth, 0.0) {
        r.lon
    } else {
        r.lon + (azimuth.sin() * sin_d * cos_lat1).atan2(cos_d - sin_lat1 * lat2.sin())
    };

    if lat2.is_nan() || lon2.is_nan() {
        return None;
    }

    Some(GeographicPoint { lon: lon2, lat: lat2 })
}

/// Unit normal of the plane through the origin and the two vectors.
///
/// Very wide (dot product below zero) and very narrow (dot product above 0.95) angles are replaced by an equivalent
/// angle that is numerically better conditioned before taking the cross product.
pub fn unit_normal(p1: &Vector3<f64>, p2: &Vector3<f64>) -> Vector3<f64> {
    let p_dot = p1.dot(p2);
    let p3 = if p_dot < 0.0 {
        normalize(&(p1 + p2))
    } else if p_dot > 0.95 {
        normalize(&(p2 - p1))
    } else {
        *p2
    };

    normalize(&p1.cross(&p3))
}

/// Cross product of the unit vectors of two geographic points, computed with the trigonometric form that stays
/// accurate for nearly coincident and nearly antipodal points. The result is not normalized.
pub fn robust_cross_product(p: &GeographicPoint, q: &GeographicPoint) -> Vector3<f64> {
    let lon_qpp = (q.lon + p.lon) / -2.0;
    let lon_qmp = (q.lon - p.lon) / 2.0;
    let sin_p_lat_minus_q_lat = (p.lat - q.lat).sin();
    let sin_p_lat_plus_q_lat = (p.lat + q.lat).sin();
    let (sin_lon_qpp, cos_lon_qpp) = lon_qpp.sin_cos();
    let (sin_lon_qmp, cos_lon_qmp) = lon_qmp.sin_cos();

    Vector3::new(
        sin_p_lat_minus_q_lat * sin_lon_qpp * cos_lon_qmp - sin_p_lat_plus_q_lat * cos_lon_qpp * sin_lon_qmp,
        sin_p_lat_minus_q_lat * cos_lon_qpp * cos_lon_qmp + sin_p_lat_plus_q_lat * sin_lon_qpp * sin_lon_qmp,
        p.lat.cos() * q.lat.cos() * (q.lon - p.lon).sin(),
    )
}
