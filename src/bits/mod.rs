// Bit-level I/O primitives for the SPI wire format
// Everything on the wire is big-endian, most significant bit first.

pub mod reader;
pub mod writer;

pub use reader::BitReader;
pub use writer::BitWriter;

/// Render bytes as space-separated uppercase hex, for logs and tests.
pub fn to_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse space-separated hex bytes, the inverse of [`to_hex`].
pub fn from_hex(s: &str) -> Option<Vec<u8>> {
    s.split_whitespace()
        .map(|byte| u8::from_str_radix(byte, 16).ok())
        .collect()
}
