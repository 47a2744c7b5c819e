// Attribute value dispatch: (parent tag, attribute tag) -> value kind
//
// The wire carries no kind discriminator, so decode resolves the kind
// from this table. Encode never consults it: the caller supplies the
// kind through the Value variant it attaches. The table is part of the
// wire contract.

use std::collections::HashMap;

use crate::bits::to_hex;
use crate::error::{BinaryError, Result};
use crate::types::Value;

use super::values;

/// Value kinds an attribute payload can decode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Integer,
    String,
    Duration,
    Timepoint,
    ContentId,
    Genre,
    Bearer,
    Enumeration,
}

lazy_static::lazy_static! {
    static ref ATTRIBUTE_KINDS: HashMap<(u8, u8), Kind> = {
        use Kind::*;
        let mut kinds = HashMap::new();
        let entries: &[(u8, u8, Kind)] = &[
            // epg / serviceInformation document headers
            (0x02, 0x80, Integer),
            (0x03, 0x80, Integer),
            (0x03, 0x81, Timepoint),
            (0x03, 0x82, String),
            (0x03, 0x83, String),
            (0x03, 0x84, Enumeration),
            (0x06, 0x80, String),
            // names
            (0x10, 0x80, String),
            (0x11, 0x80, String),
            (0x12, 0x80, String),
            // genre
            (0x14, 0x80, Genre),
            (0x14, 0x81, String),
            // membership
            (0x17, 0x80, String),
            (0x17, 0x81, Integer),
            (0x17, 0x82, Integer),
            // link
            (0x18, 0x80, String),
            (0x18, 0x81, String),
            (0x18, 0x83, String),
            (0x18, 0x84, Timepoint),
            // descriptions
            (0x1a, 0x80, String),
            (0x1b, 0x80, String),
            // programme
            (0x1c, 0x80, String),
            (0x1c, 0x81, Integer),
            (0x1c, 0x82, Integer),
            (0x1c, 0x83, Enumeration),
            (0x1c, 0x84, Enumeration),
            (0x1c, 0x87, Integer),
            // programme groups
            (0x20, 0x80, String),
            (0x20, 0x81, Timepoint),
            (0x20, 0x82, String),
            (0x20, 0x86, String),
            // schedule
            (0x21, 0x80, Integer),
            (0x21, 0x81, Timepoint),
            (0x21, 0x82, String),
            (0x23, 0x80, Integer),
            (0x23, 0x81, Integer),
            (0x23, 0x82, Integer),
            (0x23, 0x84, Integer),
            // scope
            (0x24, 0x80, Timepoint),
            (0x24, 0x81, Timepoint),
            (0x25, 0x80, Bearer),
            // ensemble
            (0x26, 0x80, ContentId),
            (0x26, 0x81, Integer),
            // service
            (0x29, 0x80, Bearer),
            (0x29, 0x82, String),
            (0x2a, 0x80, String),
            // multimedia
            (0x2b, 0x80, String),
            (0x2b, 0x81, String),
            (0x2b, 0x82, String),
            (0x2b, 0x83, Enumeration),
            (0x2b, 0x84, Integer),
            (0x2b, 0x85, Integer),
            // times and bearers within locations
            (0x2c, 0x80, Timepoint),
            (0x2c, 0x81, Duration),
            (0x2c, 0x82, Timepoint),
            (0x2c, 0x83, Duration),
            (0x2d, 0x80, Bearer),
            // programme events
            (0x2e, 0x80, String),
            (0x2e, 0x81, Integer),
            (0x2e, 0x82, Integer),
            (0x2e, 0x83, Enumeration),
            (0x2e, 0x84, Enumeration),
            // relative times
            (0x2f, 0x80, Duration),
            (0x2f, 0x81, Duration),
            // radiodns lookup
            (0x31, 0x80, String),
            (0x31, 0x81, String),
        ];
        for &(parent, attr, kind) in entries {
            kinds.insert((parent, attr), kind);
        }
        kinds
    };

    /// Symbolic names for the enumeration ordinals the standard lists.
    static ref ENUM_SYMBOLS: HashMap<(u8, u8, u8), &'static str> = {
        let mut symbols = HashMap::new();
        let entries: &[(u8, u8, u8, &'static str)] = &[
            // programme recommendation flag
            (0x1c, 0x83, 0x01, "no"),
            (0x1c, 0x83, 0x02, "yes"),
            // programme broadcast status
            (0x1c, 0x84, 0x01, "on-air"),
            (0x1c, 0x84, 0x02, "off-air"),
            // multimedia logo types
            (0x2b, 0x83, 0x02, "logo_unrestricted"),
            (0x2b, 0x83, 0x04, "logo_colour_square"),
            (0x2b, 0x83, 0x06, "logo_colour_rectangle"),
        ];
        for &(parent, attr, ordinal, symbol) in entries {
            symbols.insert((parent, attr, ordinal), symbol);
        }
        symbols
    };
}

/// The value kind listed for an attribute under a given parent element.
pub fn kind_of(parent: u8, attr: u8) -> Option<Kind> {
    ATTRIBUTE_KINDS.get(&(parent, attr)).copied()
}

/// Symbolic name for an enumeration ordinal, when one is listed.
pub fn enum_symbol(parent: u8, attr: u8, ordinal: u8) -> Option<&'static str> {
    ENUM_SYMBOLS.get(&(parent, attr, ordinal)).copied()
}

/// Decode one attribute payload under `parent` into a [`Value`].
pub fn decode_value(parent: u8, attr: u8, payload: &[u8]) -> Result<Value> {
    let kind = kind_of(parent, attr).ok_or(BinaryError::UnknownAttributeType { parent, attr })?;
    let value = match kind {
        Kind::Integer => Value::Integer {
            value: values::decode_integer(payload)?,
            width: payload.len() as u32 * 8,
        },
        Kind::String => Value::String(String::from_utf8(payload.to_vec())?),
        Kind::Duration => Value::Duration(values::decode_duration(payload)?),
        Kind::Timepoint => Value::Timepoint(values::decode_timepoint(payload)?),
        Kind::ContentId => Value::ContentId(values::decode_contentid(payload)?),
        Kind::Genre => Value::Genre(values::decode_genre(payload)?),
        Kind::Bearer => Value::Bearer(values::decode_bearer(payload)?),
        Kind::Enumeration => {
            if payload.len() != 1 {
                return Err(BinaryError::TruncatedInput {
                    needed: 8,
                    available: payload.len() * 8,
                });
            }
            let ordinal = payload[0];
            let symbol = enum_symbol(parent, attr, ordinal);
            if symbol.is_none() {
                tracing::warn!(
                    "no symbol listed for enum ordinal 0x{:02x} of attribute \
                     0x{:02x}/0x{:02x}, keeping the raw ordinal",
                    ordinal,
                    parent,
                    attr
                );
            }
            Value::Enumeration { ordinal, symbol }
        }
    };
    tracing::debug!(
        "decoded attribute 0x{:02x}/0x{:02x} from {}",
        parent,
        attr,
        to_hex(payload)
    );
    Ok(value)
}

/// Encode a value into its attribute payload. The kind is the variant
/// itself; no table lookup happens here.
pub fn encode_value(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::Integer { value, width } => values::encode_integer(*value, *width),
        Value::String(text) => Ok(text.as_bytes().to_vec()),
        Value::Duration(seconds) => Ok(values::encode_duration(*seconds)),
        Value::Timepoint(timepoint) => values::encode_timepoint(timepoint),
        Value::ContentId(id) => values::encode_contentid(id),
        Value::Genre(genre) => values::encode_genre(genre),
        Value::Bearer(bearer) => values::encode_bearer(bearer),
        Value::Enumeration { ordinal, .. } => Ok(vec![*ordinal]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_lookup() {
        assert_eq!(kind_of(0x2c, 0x81), Some(Kind::Duration));
        assert_eq!(kind_of(0x21, 0x81), Some(Kind::Timepoint));
        assert_eq!(kind_of(0x26, 0x80), Some(Kind::ContentId));
        assert_eq!(kind_of(0x14, 0x80), Some(Kind::Genre));
        assert_eq!(kind_of(0x1c, 0x85), None);
    }

    #[test]
    fn test_unknown_pair_is_fatal() {
        let err = decode_value(0x10, 0x85, &[0x01]).unwrap_err();
        assert!(matches!(
            err,
            BinaryError::UnknownAttributeType {
                parent: 0x10,
                attr: 0x85
            }
        ));
    }

    #[test]
    fn test_enum_with_symbol() {
        let value = decode_value(0x1c, 0x84, &[0x01]).unwrap();
        assert_eq!(
            value,
            Value::Enumeration {
                ordinal: 0x01,
                symbol: Some("on-air"),
            }
        );
        assert_eq!(encode_value(&value).unwrap(), vec![0x01]);
    }

    #[test]
    fn test_enum_unknown_ordinal_is_nonfatal() {
        let value = decode_value(0x2b, 0x83, &[0x7F]).unwrap();
        assert_eq!(
            value,
            Value::Enumeration {
                ordinal: 0x7F,
                symbol: None,
            }
        );
    }

    #[test]
    fn test_integer_width_from_payload_length() {
        let value = decode_value(0x1c, 0x81, &[0x01, 0x02, 0x03]).unwrap();
        assert_eq!(
            value,
            Value::Integer {
                value: 0x010203,
                width: 24
            }
        );
        assert_eq!(encode_value(&value).unwrap(), vec![0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_string_payload() {
        let value = decode_value(0x10, 0x80, b"en").unwrap();
        assert_eq!(value, Value::String("en".to_string()));
        assert!(decode_value(0x10, 0x80, &[0xFF, 0xFE]).is_err());
    }
}
