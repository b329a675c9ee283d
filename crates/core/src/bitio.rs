//! Bit packing and unpacking, most significant bit first.
//!
//! [`BitWriter`] is the append-only bit sequence the container assembles
//! header, tree, separator and payload into. [`BitReader`] exposes a byte
//! slice as the same sequence for sequential consumption.
//!
//! # Padding Rules
//! - BitWriter: the final partial byte is filled with zero bits
//! - BitReader: padding is indistinguishable from data; the caller knows how
//!   many bits are meaningful from the length header
//!
//! # Example
//! ```
//! use hecodec_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bit(true);
//! writer.write_bits(0b0110_0001, 8).unwrap();
//! assert_eq!(writer.bit_len(), 9);
//!
//! let bytes = writer.finish();
//! assert_eq!(bytes, vec![0b1011_0000, 0b1000_0000]);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert!(reader.read_bit().unwrap());
//! assert_eq!(reader.read_bits(8).unwrap(), 0x61);
//! ```

use crate::error::{BitIoError, Result};

/// Append-only bit sequence packed into bytes MSB-first.
///
/// # Invariants
/// - `pending` holds `pending_len` bits, left-aligned, always fewer than 8
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    pending: u8,
    pending_len: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for roughly `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            ..Self::default()
        }
    }

    /// Append a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.pending |= 0x80 >> self.pending_len;
        }
        self.pending_len += 1;
        if self.pending_len == 8 {
            self.bytes.push(self.pending);
            self.pending = 0;
            self.pending_len = 0;
        }
    }

    /// Append the low `count` bits of `value`, highest of them first.
    ///
    /// # Errors
    /// `BitIoError::InvalidBitCount` if `count > 64`.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut left = count;
        while left > 0 {
            let room = 8 - self.pending_len as usize;
            let take = left.min(room);
            let chunk = ((value >> (left - take)) & ((1u64 << take) - 1)) as u8;

            self.pending |= chunk << (room - take);
            self.pending_len += take as u8;
            left -= take;

            if self.pending_len == 8 {
                self.bytes.push(self.pending);
                self.pending = 0;
                self.pending_len = 0;
            }
        }

        Ok(())
    }

    /// Total number of bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.pending_len as usize
    }

    /// Zero bits the final byte will be padded with.
    pub fn padding_bits(&self) -> usize {
        (8 - self.pending_len as usize) % 8
    }

    /// Pad to the next byte boundary with zeros and return the bytes.
    pub fn finish(mut self) -> Vec<u8> {
        if self.pending_len > 0 {
            self.bytes.push(self.pending);
        }
        self.bytes
    }
}

/// Sequential MSB-first view over a byte slice.
///
/// # Invariants
/// - `position` never exceeds `data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Read the next bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` at the end of the data.
    pub fn read_bit(&mut self) -> Result<bool> {
        let byte = *self
            .data
            .get(self.position / 8)
            .ok_or(BitIoError::UnexpectedEof)?;
        let bit = byte & (0x80 >> (self.position % 8)) != 0;
        self.position += 1;
        Ok(bit)
    }

    /// Read `count` bits (at most 64) as an unsigned value, first bit highest.
    ///
    /// Nothing is consumed when the read fails.
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let mut value = 0u64;
        for _ in 0..count {
            value = (value << 1) | self.read_bit()? as u64;
        }
        Ok(value)
    }

    /// Bits not yet consumed, padding included.
    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.position
    }

    /// Index of the next bit to be read.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_bits_fill_a_byte() {
        let mut writer = BitWriter::new();
        for bit in [true, false, true, true, false, false, true, false] {
            writer.write_bit(bit);
        }
        assert_eq!(writer.padding_bits(), 0);
        assert_eq!(writer.finish(), vec![0b1011_0010]);
    }

    #[test]
    fn test_padding_is_zero() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b111, 3).unwrap();
        assert_eq!(writer.padding_bits(), 5);
        assert_eq!(writer.finish(), vec![0b1110_0000]);
    }

    #[test]
    fn test_field_straddles_bytes() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b1, 1).unwrap();
        writer.write_bits(0xABCD, 16).unwrap();
        assert_eq!(writer.bit_len(), 17);

        let bytes = writer.finish();
        assert_eq!(bytes, vec![0b1101_0101, 0b1110_0110, 0b1000_0000]);

        let mut reader = BitReader::new(&bytes);
        assert!(reader.read_bit().unwrap());
        assert_eq!(reader.read_bits(16).unwrap(), 0xABCD);
        assert_eq!(reader.bits_remaining(), 7);
    }

    #[test]
    fn test_u32_header_field() {
        let mut writer = BitWriter::new();
        writer.write_bits(5, 32).unwrap();
        assert_eq!(writer.finish(), vec![0, 0, 0, 5]);
    }

    #[test]
    fn test_full_width_value() {
        let mut writer = BitWriter::new();
        writer.write_bit(false);
        writer.write_bits(u64::MAX - 1, 64).unwrap();

        let bytes = writer.finish();
        let mut reader = BitReader::new(&bytes);
        assert!(!reader.read_bit().unwrap());
        assert_eq!(reader.read_bits(64).unwrap(), u64::MAX - 1);
    }

    #[test]
    fn test_invalid_count() {
        let mut writer = BitWriter::new();
        assert!(writer.write_bits(0, 65).is_err());

        let mut reader = BitReader::new(&[0u8; 16]);
        assert!(reader.read_bits(65).is_err());
    }

    #[test]
    fn test_read_past_end_consumes_nothing() {
        let data = [0b1010_1010];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bits(6).unwrap(), 0b101010);
        assert!(reader.read_bits(3).is_err());
        assert_eq!(reader.position(), 6);
        assert_eq!(reader.read_bits(2).unwrap(), 0b10);
        assert!(reader.is_empty());
        assert!(reader.read_bit().is_err());
    }

    #[test]
    fn test_empty_writer() {
        let writer = BitWriter::with_capacity(100);
        assert_eq!(writer.bit_len(), 0);
        assert!(writer.finish().is_empty());
    }
}
