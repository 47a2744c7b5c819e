// Error types for the binary SPI codec

use thiserror::Error;

/// Failure modes of the binary codec.
///
/// Structural errors abort the whole document; the two deliberately
/// non-fatal conditions (unknown enumeration ordinal, unresolved token
/// substitution) are handled inline with a warning and never surface
/// here.
#[derive(Error, Debug)]
pub enum BinaryError {
    #[error("truncated input: {needed} bits needed, {available} available")]
    TruncatedInput { needed: usize, available: usize },

    #[error("invalid element tag 0x{tag:02x} (valid range 0x02-0x36)")]
    InvalidTag { tag: u8 },

    #[error("unknown tag 0x{tag:02x} under parent 0x{parent:02x}")]
    UnknownTag { tag: u8, parent: u8 },

    #[error("payload length {length} exceeds the 24-bit maximum")]
    LengthExceeded { length: usize },

    #[error("element 0x{tag:02x} has an empty payload")]
    EmptyPayload { tag: u8 },

    #[error("element 0x{tag:02x} carries more than one character data payload")]
    DuplicateCdata { tag: u8 },

    #[error("no value kind listed for attribute 0x{attr:02x} under parent 0x{parent:02x}")]
    UnknownAttributeType { parent: u8, attr: u8 },

    #[error("unknown genre classification scheme code {code}")]
    UnknownScheme { code: u8 },

    #[error("genre href is not a recognised TVA classification term: {href}")]
    InvalidGenreHref { href: String },

    #[error("value {value} does not fit in {width} bits")]
    Overflow { value: u64, width: u32 },

    #[error("timepoint fields out of range: mjd {mjd}, {hour:02}:{minute:02}:{second:02}")]
    InvalidTimepoint { mjd: i64, hour: u8, minute: u8, second: u8 },

    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("element nesting exceeds the maximum depth of {depth}")]
    NestingTooDeep { depth: usize },

    #[error("text payload is not valid UTF-8")]
    InvalidString(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, BinaryError>;
