//! Binary encodings of Tessera geometries.
//!
//! * [`gserialized`]: the compact storage format with an inlined bounding box. Decoding borrows coordinates from
//!   the input buffer.
//! * [`wkb`]: well-known binary in its plain, extended and ISO variants, as raw bytes or hex text.

mod endian;
pub use endian::Endianness;

mod error;
pub use error::TesseraWireError;

pub mod gserialized;
pub use gserialized::{from_gserialized, peek_bbox, read_bbox, serialized_size, to_gserialized, GSerializedHeader};

mod reader;
pub use reader::{ByteReader, MAX_NESTING_DEPTH};

pub mod wkb;
pub use wkb::{from_wkb, from_wkb_hex, to_wkb, to_wkb_hex, wkb_size, WkbEncoding, WkbOptions, WkbVariant};

mod writer;

pub use tessera_types::ParseCheck;
