//! Tessera is a computational geometry engine with a compact binary representation of geometries.
//!
//! It consists of
//!
//! * the geometry model from [`tessera_types`]: points, lines, polygons, circular arcs and collections, with bounding
//!   boxes, measurements, stroking of curves and great circle math for geodetic coordinates, and
//! * the codecs from [`tessera_wire`]: the serialized storage format and well-known binary.
//!
//! # Quick start
//!
//! ```
//! use tessera::format::{decode, encode, Format};
//! use tessera::{Context, Flags, Geometry, ParseCheck, Point4d, PointBuf, Srid};
//!
//! let ctx = Context::new();
//! let ring = PointBuf::from_points(
//!     Flags::xy(),
//!     [
//!         Point4d::xy(0.0, 0.0),
//!         Point4d::xy(1.0, 0.0),
//!         Point4d::xy(1.0, 1.0),
//!         Point4d::xy(0.0, 0.0),
//!     ],
//! );
//! let mut polygon = Geometry::polygon(Srid(4326), Flags::xy(), vec![ring.into()])?;
//!
//! let bytes = encode(&ctx, &mut polygon, Format::GSerialized)?;
//! let decoded = decode(&ctx, &bytes, Format::GSerialized, ParseCheck::ALL)?;
//!
//! assert_eq!(decoded.area()?, 0.5);
//! assert_eq!(decoded.to_string(), "POLYGON ((0 0, 1 0, 1 1, 0 0))");
//! # Ok::<(), tessera::error::TesseraError>(())
//! ```
//!
//! Every operation that can report notices or be interrupted takes a [`Context`]. Contexts share no state, so each
//! thread can use its own.

pub mod error;
pub mod format;

pub use error::TesseraError;
pub use format::Format;

pub use tessera_types::geodetic;
pub use tessera_types::{
    cancel_interrupt, request_interrupt, stroke, unstroke, AffineTransform, Context, ContextBuilder, Flags, GBox,
    Geometry, GeometryKind, GeometryType, Interrupt, ParseCheck, Point4d, PointArray, PointBuf, PointSequence,
    PointView, Srid,
};
pub use tessera_wire::{
    from_gserialized, from_wkb, from_wkb_hex, peek_bbox, read_bbox, to_gserialized, to_wkb, to_wkb_hex, Endianness,
    WkbEncoding, WkbOptions, WkbVariant,
};

// Reexport member crates
pub use tessera_types;
pub use tessera_wire;
