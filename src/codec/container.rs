// Tag-length-value envelope shared by elements, attributes and
// structural markers

use crate::error::{BinaryError, Result};

/// Marker byte introducing a 16-bit extended length.
pub const LEN_MARKER_16: u8 = 0xFE;
/// Marker byte introducing a 24-bit extended length.
pub const LEN_MARKER_24: u8 = 0xFF;
/// Largest payload the 24-bit extended length can describe.
pub const MAX_PAYLOAD: usize = 0xFF_FFFF;

/// A container sliced out of the input: its tag byte and payload.
#[derive(Debug, Clone, Copy)]
pub struct Container<'a> {
    pub tag: u8,
    pub payload: &'a [u8],
}

/// Append `tag | length | payload` to `out`.
///
/// Payloads up to 253 bytes use a single length byte; 254 to 65535 use
/// the 0xFE marker and a 16-bit length; above that, the 0xFF marker and
/// a 24-bit length, up to 16 777 215 bytes.
pub fn write_container(out: &mut Vec<u8>, tag: u8, payload: &[u8]) -> Result<()> {
    let length = payload.len();
    out.push(tag);
    if length <= 253 {
        out.push(length as u8);
    } else if length <= 0xFFFF {
        out.push(LEN_MARKER_16);
        out.extend_from_slice(&(length as u16).to_be_bytes());
    } else if length <= MAX_PAYLOAD {
        out.push(LEN_MARKER_24);
        let bytes = (length as u32).to_be_bytes();
        out.extend_from_slice(&bytes[1..]);
    } else {
        out.truncate(out.len() - 1);
        return Err(BinaryError::LengthExceeded { length });
    }
    out.extend_from_slice(payload);
    Ok(())
}

/// Read one container from the front of `input`, returning it and the
/// total number of bytes it occupied.
pub fn read_container(input: &[u8]) -> Result<(Container<'_>, usize)> {
    let truncated = |needed: usize| BinaryError::TruncatedInput {
        needed: needed * 8,
        available: input.len() * 8,
    };
    if input.len() < 2 {
        return Err(truncated(2));
    }
    let tag = input[0];
    let (length, header) = match input[1] {
        LEN_MARKER_16 => {
            if input.len() < 4 {
                return Err(truncated(4));
            }
            (u16::from_be_bytes([input[2], input[3]]) as usize, 4)
        }
        LEN_MARKER_24 => {
            if input.len() < 5 {
                return Err(truncated(5));
            }
            (
                u32::from_be_bytes([0, input[2], input[3], input[4]]) as usize,
                5,
            )
        }
        length => (length as usize, 2),
    };
    let end = header + length;
    if input.len() < end {
        return Err(truncated(end));
    }
    Ok((
        Container {
            tag,
            payload: &input[header..end],
        },
        end,
    ))
}
