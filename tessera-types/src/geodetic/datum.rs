/// Reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    semimajor: f64,
    inv_flattening: f64,
}

impl Datum {
    /// WGS84 ellipsoid.
    pub const WGS84: Self = Datum {
        semimajor: 6_378_137.0,
        inv_flattening: 298.257223563,
    };

    /// Creates a datum from the semi-major axis (in metres) and the inverse flattening.
    pub const fn new(semimajor: f64, inv_flattening: f64) -> Self {
        Self {
            semimajor,
            inv_flattening,
        }
    }

    /// Semi-major axis in metres.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }

    /// Inverse flattening.
    pub fn inv_flattening(&self) -> f64 {
        self.inv_flattening
    }

    /// Semi-minor axis in metres.
    pub fn semiminor(&self) -> f64 {
        self.semimajor - self.semimajor / self.inv_flattening
    }

    /// Sphere with the mean radius `(2a + b) / 3` of the ellipsoid.
    pub fn mean_sphere(&self) -> Sphere {
        Sphere {
            radius: (2.0 * self.semimajor + self.semiminor()) / 3.0,
        }
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::WGS84
    }
}

/// Sphere used to convert angular distances into linear ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Radius in metres.
    pub radius: f64,
}

impl Sphere {
    /// Length of an arc with the given central angle (radians).
    pub fn arc_length(&self, angle: f64) -> f64 {
        angle * self.radius
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Datum::WGS84.mean_sphere()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn wgs84_mean_radius() {
        let sphere = Datum::WGS84.mean_sphere();
        assert_relative_eq!(sphere.radius, 6_371_008.771, epsilon = 1e-3);
        assert_relative_eq!(Datum::WGS84.semiminor(), 6_356_752.314, epsilon = 1e-3);
    }
}
