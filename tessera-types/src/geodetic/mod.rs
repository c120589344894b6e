//! Great circle math on the unit sphere.
//!
//! Geodetic geometries store longitude (X) and latitude (Y) in degrees. Computations convert them either into
//! [`GeographicPoint`] (radians) or into unit-sphere vectors (`nalgebra::Vector3<f64>`). Geodetic bounding boxes are
//! boxes of those unit vectors.

mod datum;
mod edge;
mod gbox;
mod sphere;

pub use datum::{Datum, Sphere};
pub use edge::{edge_calculate_gbox, edge_intersects, point_in_cone, ptarray_contains_point_sphere, EdgeInteraction};
pub use gbox::{gbox_check_poles, gbox_pt_outside, ptarray_calculate_gbox_geodetic, GEODETIC_BOX_FLAGS};
pub use sphere::{
    cart2geog, geog2cart, latitude_degrees_normalize, latitude_radians_normalize, ll2cart,
    longitude_degrees_normalize, longitude_radians_normalize, normalize, normalize2d, point3d_equals,
    robust_cross_product, sphere_direction, sphere_distance, sphere_project, unit_normal,
};

use num_traits::Float;

use crate::point::Point4d;

/// Tolerance used for floating point equality and side tests.
pub const FP_TOLERANCE: f64 = 1e-12;

pub(crate) fn fp_is_zero(a: f64) -> bool {
    a.abs() <= FP_TOLERANCE
}

pub(crate) fn fp_equals(a: f64, b: f64) -> bool {
    (a - b).abs() <= FP_TOLERANCE
}

/// A point with longitude and latitude.
pub trait GeoPoint {
    /// Numeric type of the coordinates.
    type Num: Float;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;
    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;

    /// Latitude in radians.
    fn lat_rad(&self) -> Self::Num {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> Self::Num {
        self.lon().to_radians()
    }
}

impl GeoPoint for Point4d {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.y
    }

    fn lon(&self) -> f64 {
        self.x
    }
}

/// Longitude and latitude in radians.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct GeographicPoint {
    /// Longitude in radians.
    pub lon: f64,
    /// Latitude in radians.
    pub lat: f64,
}

impl GeographicPoint {
    /// Creates a point from degrees, normalizing longitude into `(-PI, PI]` and latitude into `[-PI/2, PI/2]`.
    pub fn from_degrees(lon: f64, lat: f64) -> Self {
        Self {
            lon: longitude_radians_normalize(lon.to_radians()),
            lat: latitude_radians_normalize(lat.to_radians()),
        }
    }

    /// Creates a point from any [`GeoPoint`].
    pub fn from_geo_point(p: &impl GeoPoint<Num = f64>) -> Self {
        Self::from_degrees(p.lon(), p.lat())
    }
}

impl GeoPoint for GeographicPoint {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat.to_degrees()
    }

    fn lon(&self) -> f64 {
        self.lon.to_degrees()
    }

    fn lat_rad(&self) -> f64 {
        self.lat
    }

    fn lon_rad(&self) -> f64 {
        self.lon
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn geo_point_conversions() {
        let p = Point4d::xy(190.0, 45.0);
        let g = GeographicPoint::from_geo_point(&p);
        assert_relative_eq!(g.lon(), -170.0, epsilon = 1e-12);
        assert_relative_eq!(g.lat(), 45.0, epsilon = 1e-12);
        assert_relative_eq!(p.lat_rad(), std::f64::consts::FRAC_PI_4);
    }
}
