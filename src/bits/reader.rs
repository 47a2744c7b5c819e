// Big-endian bit reader over a byte slice

use crate::error::{BinaryError, Result};

/// Reads big-endian unsigned integers of arbitrary bit width from a
/// byte slice, tracking the position in bits.
///
/// Every read is bounds-checked against the remaining input and fails
/// with [`BinaryError::TruncatedInput`] instead of running past the end.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of unread bits.
    pub fn remaining(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read `width` bits (at most 64) as a big-endian unsigned integer.
    pub fn read(&mut self, width: usize) -> Result<u64> {
        debug_assert!(width <= 64);
        if width > self.remaining() {
            return Err(BinaryError::TruncatedInput {
                needed: width,
                available: self.remaining(),
            });
        }
        let mut value: u64 = 0;
        for _ in 0..width {
            let byte = self.data[self.pos / 8];
            let bit = (byte >> (7 - self.pos % 8)) & 1;
            value = (value << 1) | u64::from(bit);
            self.pos += 1;
        }
        Ok(value)
    }

    /// Read a single bit as a flag.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read(1)? == 1)
    }

    /// Read `count` whole bytes from the current bit position.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(count);
        for _ in 0..count {
            bytes.push(self.read(8)? as u8);
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_widths() {
        // 0b1011_0110 0b1100_0011
        let mut reader = BitReader::new(&[0xB6, 0xC3]);
        assert_eq!(reader.read(1).unwrap(), 1);
        assert_eq!(reader.read(3).unwrap(), 0b011);
        assert_eq!(reader.read(4).unwrap(), 0b0110);
        assert_eq!(reader.read(8).unwrap(), 0xC3);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_spanning_bytes() {
        let mut reader = BitReader::new(&[0x12, 0x34, 0x56]);
        assert_eq!(reader.read(24).unwrap(), 0x123456);
    }

    #[test]
    fn test_truncated_read() {
        let mut reader = BitReader::new(&[0xFF]);
        reader.read(4).unwrap();
        let err = reader.read(8).unwrap_err();
        match err {
            BinaryError::TruncatedInput { needed, available } => {
                assert_eq!(needed, 8);
                assert_eq!(available, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_bytes() {
        let mut reader = BitReader::new(&[0xDE, 0xAD, 0xBE]);
        assert_eq!(reader.read_bytes(2).unwrap(), vec![0xDE, 0xAD]);
        assert_eq!(reader.remaining(), 8);
    }
}
