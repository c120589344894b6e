//! Error type used by the crate.

use thiserror::Error;

use crate::geometry::GeometryType;

/// Error enum.
///
/// Every variant describes a condition that aborts the current operation. Expected outcomes such as "the geometry is
/// empty and has no bounding box" are reported with `Option` instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TesseraTypesError {
    /// Index is outside of the point array.
    #[error("point index {index} is out of range for an array of {len} points")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of points in the array.
        len: usize,
    },

    /// Attempt to modify storage that is borrowed from somewhere else.
    #[error("cannot modify a read-only point array")]
    ReadOnly,

    /// Two point arrays (or a geometry and its parts) disagree on dimensionality.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A container geometry cannot hold the given child type.
    #[error("invalid subtype {child} for collection type {parent}")]
    InvalidSubtype {
        /// Container type.
        parent: GeometryType,
        /// Rejected child type.
        child: GeometryType,
    },

    /// Geometry does not have enough points for its type.
    #[error("{geometry_type} must have at least {required} points, got {actual}")]
    TooFewPoints {
        /// Type of the geometry being built.
        geometry_type: GeometryType,
        /// Minimum number of points required.
        required: usize,
        /// Number of points supplied.
        actual: usize,
    },

    /// Curved geometry with an even number of points.
    #[error("{0} must have an odd number of points")]
    EvenPointCount(GeometryType),

    /// A ring is not closed.
    #[error("{0} ring is not closed")]
    RingNotClosed(GeometryType),

    /// Compound curve segment does not start where the previous segment ends.
    #[error("segment {index} of the compound curve does not start where the previous one ends")]
    DisconnectedSegments {
        /// Zero-based index of the offending segment.
        index: usize,
    },

    /// Coordinate buffer length does not match the declared number of points.
    #[error("coordinate buffer of {actual} bytes cannot hold {npoints} points of {ndims} dimensions")]
    BufferSize {
        /// Declared number of points.
        npoints: usize,
        /// Number of dimensions per point.
        ndims: usize,
        /// Actual buffer length in bytes.
        actual: usize,
    },

    /// Bounding boxes with different flags cannot be combined.
    #[error("bounding box flags do not match: {0}")]
    BoxFlagsMismatch(String),

    /// Geodetic edge with antipodal end points has no unique great circle.
    #[error("antipodal (180 degrees long) edge detected")]
    AntipodalEdge,

    /// Coordinates are outside of the allowed longitude/latitude range.
    #[error("coordinate values are out of range [-180 -90, 180 90] for a geodetic geometry")]
    GeodeticRange,

    /// No point outside of a geodetic box could be found, which happens when the box covers the whole sphere.
    #[error("could not generate a point outside of the geodetic box")]
    NoOutsidePoint,

    /// Argument value is not acceptable for the operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Text could not be parsed.
    #[error("failed to parse {what}: {input}")]
    Parse {
        /// What was being parsed.
        what: &'static str,
        /// Offending input.
        input: String,
    },

    /// Operation was stopped through the context interrupt flag.
    #[error("operation interrupted")]
    Interrupted,

    /// Operation is not defined for the given geometry type.
    #[error("{operation} is not supported for {geometry_type}")]
    Unsupported {
        /// Name of the operation.
        operation: &'static str,
        /// Type of the geometry.
        geometry_type: GeometryType,
    },

    /// Geometry conversion error.
    #[error("invalid input geometry: {0}")]
    Conversion(String),
}
