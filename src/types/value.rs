// The closed set of attribute value kinds

use serde::{Deserialize, Serialize};

use super::{Bearer, ContentId, Genre, Timepoint};

/// A decoded attribute payload.
///
/// The wire carries no kind discriminator: on decode the kind comes
/// from the (parent tag, attribute tag) dispatch table, on encode it
/// comes from the variant the caller attaches. Matching is exhaustive,
/// so there is no "unhandled kind" path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Unsigned integer with a declared bit width. The width must be a
    /// whole number of bytes on the wire; decode derives it from the
    /// payload length.
    Integer { value: u64, width: u32 },
    /// Raw UTF-8 text, no terminator.
    String(String),
    /// Seconds, 0-65535 (about 18.2 hours).
    Duration(u16),
    Timepoint(Timepoint),
    ContentId(ContentId),
    Genre(Genre),
    Bearer(Bearer),
    /// One-byte ordinal, with its symbolic name when the ordinal is
    /// listed for the owning (parent, attribute) pair. Unlisted
    /// ordinals keep `symbol = None` and decode with a warning rather
    /// than aborting the document. The symbol is derived from the
    /// ordinal, so deserialization leaves it unset.
    Enumeration {
        ordinal: u8,
        #[serde(skip_deserializing)]
        symbol: Option<&'static str>,
    },
}

impl Value {
    pub fn integer(value: u64, width: u32) -> Self {
        Value::Integer { value, width }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Value::String(text.into())
    }
}
