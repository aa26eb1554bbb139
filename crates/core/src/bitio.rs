//! Bit-level I/O utilities for packing individual bits into bytes and back.
//!
//! This module provides BitWriter and BitReader, the single bit convention
//! shared by the tree records and the compressed data stream. Both operate
//! LSB-first: the first bit produced lands in bit 0 of the first byte, the
//! eighth in bit 7, and the ninth starts the next byte.
//!
//! # Padding Rules
//! - BitWriter: a partial final byte is zero-padded in its high bits
//! - BitReader: padding is indistinguishable from data (caller must track
//!   how many symbols or bits are meaningful)
//!
//! # Example
//! ```
//! use huffpack_core::bitio::{BitWriter, BitReader};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();  // bits 1, 0, 1 (LSB of value first)
//! writer.write_bit(true);
//! // Total: bits 1,0,1,1 -> byte 0b0000_1101
//!
//! let bytes = writer.finish();
//! assert_eq!(bytes, vec![0b0000_1101]);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert!(reader.read_bit().unwrap());
//! ```

use crate::error::{BitIoError, Result};

/// Writes bits LSB-first into a byte buffer.
///
/// Accumulates bits in a buffer and moves complete bytes to the output.
/// When finished, the final partial byte is emitted zero-padded.
///
/// # Invariants
/// - `bit_count` is always < 8
/// - bits of `bit_buffer` at or above `bit_count` are zero
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (filled from bit 0 upward)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    /// Create a new BitWriter with empty output.
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Create a BitWriter whose output buffer can hold `bytes` bytes without
    /// reallocating.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Append a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        self.bit_buffer |= (bit as u8) << self.bit_count;
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }

    /// Write the low `count` bits of `value`, least significant bit first.
    ///
    /// This is how every fixed-width integer field is laid out: writing
    /// value=0b110 with count=3 appends bits 0, 1, 1 in that order.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        for i in 0..count {
            self.write_bit((value >> i) & 1 == 1);
        }

        Ok(())
    }

    /// Append every bit of `bits` in order.
    pub fn write_all_bits(&mut self, bits: &[bool]) {
        for &bit in bits {
            self.write_bit(bit);
        }
    }

    /// Remove and return the complete bytes written so far.
    ///
    /// Pending bits (fewer than 8) stay in the writer and carry forward into
    /// the next byte.
    pub fn take_complete(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }

    /// Finish writing and return the output bytes.
    ///
    /// If there are any remaining bits in the buffer, they are emitted as a
    /// final byte padded with zeros in the unfilled high positions.
    ///
    /// This consumes the writer.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        self.bytes
    }

    /// Return the number of complete bytes held by the writer.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Return the number of bits waiting for a complete byte (0-7).
    pub fn pending_bits(&self) -> usize {
        self.bit_count as usize
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads bits LSB-first from a byte buffer.
///
/// Caller must track how many bits are valid; padding bits at the end
/// of the buffer are not distinguishable from data.
///
/// # Invariants
/// - `bit_position` never exceeds `data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Source data
    data: &'a [u8],
    /// Current bit position (0 = LSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a new BitReader for the given data.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_position: 0,
        }
    }

    /// Read a single bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` if the buffer is exhausted.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.is_empty() {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let byte = self.data[self.bit_position / 8];
        let bit = (byte >> (self.bit_position % 8)) & 1 == 1;
        self.bit_position += 1;
        Ok(bit)
    }

    /// Read `count` bits and assemble them into an integer, the first bit
    /// read becoming the least significant bit.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if not enough bits remain
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let mut result = 0u64;
        for i in 0..count {
            if self.read_bit()? {
                result |= 1 << i;
            }
        }

        Ok(result)
    }

    /// Return the number of bits remaining in the buffer.
    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.bit_position
    }

    /// Return the current bit position.
    pub fn position(&self) -> usize {
        self.bit_position
    }

    /// Check if we're at the end of the buffer.
    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.data.len() * 8
    }
}

/// Expand one byte into its 8 bits, bit 0 first.
pub fn unpack_byte(byte: u8) -> [bool; 8] {
    std::array::from_fn(|i| (byte >> i) & 1 == 1)
}

/// Pack a bit sequence into bytes, zero-padding the last partial byte.
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut writer = BitWriter::with_capacity(bits.len().div_ceil(8));
    writer.write_all_bits(bits);
    writer.finish()
}
