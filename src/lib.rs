// spi-binary: codec for the binary encoding of radio service and
// programme information documents
//
// The wire format is a nested tag-length-value structure: every
// element and attribute is a tag byte, a one- to four-byte length
// field, and a payload. Attribute payloads carry no type tag; their
// kind is resolved from a static (parent tag, attribute tag) table.
// `decode` turns a byte buffer into an `Element` tree and `encode`
// does the reverse, byte for byte.

pub mod bits;
pub mod codec;
pub mod error;
pub mod types;

// Re-export the public codec surface
pub use codec::{decode, encode, Attribute, Element, TokenTable};
pub use error::{BinaryError, Result};
pub use types::{
    Bearer, ContentId, EnsembleId, Genre, GenreScheme, ServiceId, Timepoint, Value,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
