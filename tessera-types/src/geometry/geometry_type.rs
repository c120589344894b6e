use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Type tag of a geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    /// Single point.
    Point,
    /// Line string.
    Line,
    /// Polygon with an exterior ring and optional holes.
    Polygon,
    /// Collection of points.
    MultiPoint,
    /// Collection of line strings.
    MultiLine,
    /// Collection of polygons.
    MultiPolygon,
    /// Heterogeneous collection.
    Collection,
    /// Sequence of circular arcs.
    CircularString,
    /// Continuous chain of lines and circular strings.
    Compound,
    /// Polygon with rings that may contain arcs.
    CurvePolygon,
    /// Collection of curves.
    MultiCurve,
    /// Collection of (possibly curved) polygons.
    MultiSurface,
    /// Collection of polygons sharing edges.
    PolyhedralSurface,
    /// Single triangle.
    Triangle,
    /// Triangulated irregular network.
    Tin,
}

impl GeometryType {
    /// All geometry types, ordered by their internal code.
    pub const ALL: [GeometryType; 15] = [
        Self::Point,
        Self::Line,
        Self::Polygon,
        Self::MultiPoint,
        Self::MultiLine,
        Self::MultiPolygon,
        Self::Collection,
        Self::CircularString,
        Self::Compound,
        Self::CurvePolygon,
        Self::MultiCurve,
        Self::MultiSurface,
        Self::PolyhedralSurface,
        Self::Triangle,
        Self::Tin,
    ];

    /// Internal type code, as stored in serialized geometries.
    pub fn code(&self) -> u32 {
        match self {
            Self::Point => 1,
            Self::Line => 2,
            Self::Polygon => 3,
            Self::MultiPoint => 4,
            Self::MultiLine => 5,
            Self::MultiPolygon => 6,
            Self::Collection => 7,
            Self::CircularString => 8,
            Self::Compound => 9,
            Self::CurvePolygon => 10,
            Self::MultiCurve => 11,
            Self::MultiSurface => 12,
            Self::PolyhedralSurface => 13,
            Self::Triangle => 14,
            Self::Tin => 15,
        }
    }

    /// Inverse of [`GeometryType::code`].
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }

    /// Base type number used in WKB.
    pub fn wkb_code(&self) -> u32 {
        match self {
            Self::PolyhedralSurface => 15,
            Self::Tin => 16,
            Self::Triangle => 17,
            other => other.code(),
        }
    }

    /// Inverse of [`GeometryType::wkb_code`].
    pub fn from_wkb_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.wkb_code() == code)
    }

    /// Returns true for types that hold child geometries.
    pub fn is_collection(&self) -> bool {
        !matches!(
            self,
            Self::Point | Self::Line | Self::Polygon | Self::CircularString | Self::Triangle
        )
    }

    /// Returns true for types that can contain circular arcs.
    pub fn is_curved(&self) -> bool {
        matches!(
            self,
            Self::CircularString | Self::Compound | Self::CurvePolygon | Self::MultiCurve | Self::MultiSurface
        )
    }

    /// Returns true if a collection of this type may contain a geometry of `child` type.
    pub fn allows_subtype(&self, child: GeometryType) -> bool {
        match self {
            Self::Collection => true,
            Self::MultiPoint => child == Self::Point,
            Self::MultiLine => child == Self::Line,
            Self::MultiPolygon | Self::PolyhedralSurface => child == Self::Polygon,
            Self::Tin => child == Self::Triangle,
            Self::Compound => matches!(child, Self::Line | Self::CircularString),
            Self::CurvePolygon | Self::MultiCurve => {
                matches!(child, Self::Line | Self::CircularString | Self::Compound)
            }
            Self::MultiSurface => matches!(child, Self::Polygon | Self::CurvePolygon),
            Self::Point | Self::Line | Self::Polygon | Self::CircularString | Self::Triangle => false,
        }
    }

    /// Multi-type that collects geometries of this type, if any.
    pub fn multi_type(&self) -> Option<Self> {
        match self {
            Self::Point => Some(Self::MultiPoint),
            Self::Line => Some(Self::MultiLine),
            Self::Polygon => Some(Self::MultiPolygon),
            Self::CircularString | Self::Compound => Some(Self::MultiCurve),
            Self::CurvePolygon => Some(Self::MultiSurface),
            Self::Triangle => Some(Self::Tin),
            _ => None,
        }
    }

    /// Upper-case name used in WKT.
    pub fn wkt_name(&self) -> &'static str {
        match self {
            Self::Point => "POINT",
            Self::Line => "LINESTRING",
            Self::Polygon => "POLYGON",
            Self::MultiPoint => "MULTIPOINT",
            Self::MultiLine => "MULTILINESTRING",
            Self::MultiPolygon => "MULTIPOLYGON",
            Self::Collection => "GEOMETRYCOLLECTION",
            Self::CircularString => "CIRCULARSTRING",
            Self::Compound => "COMPOUNDCURVE",
            Self::CurvePolygon => "CURVEPOLYGON",
            Self::MultiCurve => "MULTICURVE",
            Self::MultiSurface => "MULTISURFACE",
            Self::PolyhedralSurface => "POLYHEDRALSURFACE",
            Self::Triangle => "TRIANGLE",
            Self::Tin => "TIN",
        }
    }
}

impl Display for GeometryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Point => "Point",
            Self::Line => "LineString",
            Self::Polygon => "Polygon",
            Self::MultiPoint => "MultiPoint",
            Self::MultiLine => "MultiLineString",
            Self::MultiPolygon => "MultiPolygon",
            Self::Collection => "GeometryCollection",
            Self::CircularString => "CircularString",
            Self::Compound => "CompoundCurve",
            Self::CurvePolygon => "CurvePolygon",
            Self::MultiCurve => "MultiCurve",
            Self::MultiSurface => "MultiSurface",
            Self::PolyhedralSurface => "PolyhedralSurface",
            Self::Triangle => "Triangle",
            Self::Tin => "Tin",
        };

        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        for (i, t) in GeometryType::ALL.iter().enumerate() {
            assert_eq!(t.code(), i as u32 + 1);
            assert_eq!(GeometryType::from_code(t.code()), Some(*t));
            assert_eq!(GeometryType::from_wkb_code(t.wkb_code()), Some(*t));
        }

        assert_eq!(GeometryType::from_code(0), None);
        assert_eq!(GeometryType::from_code(16), None);
        assert_eq!(GeometryType::from_wkb_code(13), None);
        assert_eq!(GeometryType::Triangle.wkb_code(), 17);
    }

    #[test]
    fn subtypes() {
        assert!(GeometryType::MultiPolygon.allows_subtype(GeometryType::Polygon));
        assert!(!GeometryType::MultiPolygon.allows_subtype(GeometryType::Line));
        assert!(GeometryType::Compound.allows_subtype(GeometryType::CircularString));
        assert!(!GeometryType::Compound.allows_subtype(GeometryType::Compound));
        assert!(GeometryType::MultiSurface.allows_subtype(GeometryType::CurvePolygon));
        assert!(GeometryType::Collection.allows_subtype(GeometryType::Tin));
        assert!(!GeometryType::Line.allows_subtype(GeometryType::Point));
    }

    #[test]
    fn serde_names() {
        let json = serde_json::to_string(&GeometryType::MultiCurve).unwrap();
        assert_eq!(json, "\"MultiCurve\"");
        let parsed: GeometryType = serde_json::from_str("\"Tin\"").unwrap();
        assert_eq!(parsed, GeometryType::Tin);
    }
}
