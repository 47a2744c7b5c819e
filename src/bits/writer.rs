// Big-endian bit writer backed by a byte vector

use crate::error::{BinaryError, Result};

/// Appends big-endian unsigned integers of arbitrary bit width to a
/// growing byte buffer, most significant bit first.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Append the low `width` bits of `value`, checking that the value
    /// actually fits the declared width.
    pub fn write(&mut self, value: u64, width: usize) -> Result<()> {
        debug_assert!(width <= 64);
        if width < 64 && value >> width != 0 {
            return Err(BinaryError::Overflow {
                value,
                width: width as u32,
            });
        }
        self.write_unchecked(value, width);
        Ok(())
    }

    /// Append a single flag bit.
    pub fn write_bool(&mut self, bit: bool) {
        self.write_unchecked(u64::from(bit), 1);
    }

    /// Append whole bytes at the current bit position.
    pub fn write_bytes(&mut self, data: &[u8]) {
        if self.bit_len % 8 == 0 {
            self.bytes.extend_from_slice(data);
            self.bit_len += data.len() * 8;
        } else {
            for &byte in data {
                self.write_unchecked(u64::from(byte), 8);
            }
        }
    }

    fn write_unchecked(&mut self, value: u64, width: usize) {
        for i in (0..width).rev() {
            let byte_idx = self.bit_len / 8;
            if byte_idx == self.bytes.len() {
                self.bytes.push(0);
            }
            if (value >> i) & 1 == 1 {
                self.bytes[byte_idx] |= 0x80 >> (self.bit_len % 8);
            }
            self.bit_len += 1;
        }
    }

    /// Finish writing, zero-padding any trailing partial byte.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
