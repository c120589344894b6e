//! Core geometry types of Tessera.
//!
//! This crate contains the in-memory geometry model ([`Geometry`]) together with everything needed to build and
//! inspect it: point arrays that either own their coordinates or borrow them from a serialized buffer, bounding boxes,
//! circular arc math and stroking, and geodetic calculations on the sphere.
//!
//! Binary encodings live in the `tessera-wire` crate.

pub mod affine;
pub use affine::*;

pub mod arc;

mod context;
pub use context::*;

mod error;
pub use error::*;

mod flags;
pub use flags::*;

mod gbox;
pub use gbox::*;

pub mod geodetic;

pub mod geometry;
pub use geometry::{Geometry, GeometryKind, GeometryType, ParseCheck};

mod point;
pub use point::*;

pub mod point_array;
pub use point_array::{PointArray, PointBuf, PointSequence, PointView};

pub mod segment;

mod stroke;
pub use stroke::stroke;

mod unstroke;
pub use unstroke::unstroke;
