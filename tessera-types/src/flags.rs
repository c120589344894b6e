//! Dimensionality flags and spatial reference identifiers.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::context::Context;

/// Dimensionality and coordinate model of a point array, box or geometry.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flags {
    /// Coordinates carry a Z value.
    pub has_z: bool,
    /// Coordinates carry an M (measure) value.
    pub has_m: bool,
    /// Coordinates are longitude/latitude on a sphere.
    pub geodetic: bool,
}

impl Flags {
    /// Creates flags for the given dimensions in the cartesian model.
    pub const fn new(has_z: bool, has_m: bool) -> Self {
        Self {
            has_z,
            has_m,
            geodetic: false,
        }
    }

    /// Plain X/Y.
    pub const fn xy() -> Self {
        Self::new(false, false)
    }

    /// X/Y/Z.
    pub const fn xyz() -> Self {
        Self::new(true, false)
    }

    /// X/Y/M.
    pub const fn xym() -> Self {
        Self::new(false, true)
    }

    /// X/Y/Z/M.
    pub const fn xyzm() -> Self {
        Self::new(true, true)
    }

    /// Returns a copy with the geodetic flag set to `geodetic`.
    pub const fn with_geodetic(self, geodetic: bool) -> Self {
        Self { geodetic, ..self }
    }

    /// Number of ordinates per point (2 to 4).
    pub const fn ndims(&self) -> usize {
        2 + self.has_z as usize + self.has_m as usize
    }

    /// Returns true if both flag sets describe the same coordinate layout.
    pub const fn same_dims(&self, other: &Self) -> bool {
        self.has_z == other.has_z && self.has_m == other.has_m
    }

    /// Dimension suffix used in text representations: `""`, `"Z"`, `"M"` or `"ZM"`.
    pub fn suffix(&self) -> &'static str {
        match (self.has_z, self.has_m) {
            (false, false) => "",
            (true, false) => "Z",
            (false, true) => "M",
            (true, true) => "ZM",
        }
    }
}

/// Spatial reference identifier.
///
/// Zero is the "unknown" SRID. Values that cannot be stored in the 21-bit serialized field are folded into the
/// reserved range by [`Srid::clamp`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Srid(pub i32);

impl Srid {
    /// Unknown spatial reference.
    pub const UNKNOWN: Srid = Srid(0);
    /// Largest SRID that can be stored.
    pub const MAXIMUM: i32 = 999_999;
    /// Largest SRID available for user-defined systems. Larger values up to [`Srid::MAXIMUM`] are reserved.
    pub const USER_MAXIMUM: i32 = 998_999;

    /// Returns true for the unknown SRID.
    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }

    /// Brings the SRID into the storable range, reporting every adjustment as a notice.
    pub fn clamp(self, ctx: &Context) -> Srid {
        let srid = self.0;
        if srid <= 0 {
            if srid != Self::UNKNOWN.0 {
                ctx.notice(&format!(
                    "SRID value {srid} converted to the officially unknown SRID value 0"
                ));
            }
            return Self::UNKNOWN;
        }

        if srid > Self::MAXIMUM {
            let folded = Self::USER_MAXIMUM + 1 + (srid % (Self::MAXIMUM - Self::USER_MAXIMUM - 1));
            ctx.notice(&format!(
                "SRID value {srid} > SRID_MAXIMUM converted to {folded}"
            ));
            return Srid(folded);
        }

        self
    }
}

impl From<i32> for Srid {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl Display for Srid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn ndims() {
        assert_eq!(Flags::xy().ndims(), 2);
        assert_eq!(Flags::xyz().ndims(), 3);
        assert_eq!(Flags::xym().ndims(), 3);
        assert_eq!(Flags::xyzm().ndims(), 4);
        assert_eq!(Flags::xyzm().with_geodetic(true).ndims(), 4);
    }

    #[test]
    fn same_dims_ignores_geodetic() {
        assert!(Flags::xyz().same_dims(&Flags::xyz().with_geodetic(true)));
        assert!(!Flags::xyz().same_dims(&Flags::xym()));
    }

    #[test]
    fn clamp_srid() {
        let notices = Arc::new(Mutex::new(0));
        let counter = notices.clone();
        let ctx = Context::builder()
            .notice_handler(move |_| *counter.lock().unwrap() += 1)
            .build();

        assert_eq!(Srid(4326).clamp(&ctx), Srid(4326));
        assert_eq!(Srid(0).clamp(&ctx), Srid::UNKNOWN);
        assert_eq!(*notices.lock().unwrap(), 0);

        assert_eq!(Srid(-1).clamp(&ctx), Srid::UNKNOWN);
        assert_eq!(Srid(1_000_000).clamp(&ctx), Srid(999_001));
        assert_eq!(*notices.lock().unwrap(), 2);

        let clamped = Srid(i32::MAX).clamp(&ctx);
        assert!(clamped.0 > Srid::USER_MAXIMUM && clamped.0 <= Srid::MAXIMUM);
    }

    #[test]
    fn flags_serde() {
        let flags = Flags::xyzm().with_geodetic(true);
        let json = serde_json::to_string(&flags).unwrap();
        assert_eq!(serde_json::from_str::<Flags>(&json).unwrap(), flags);
    }
}
