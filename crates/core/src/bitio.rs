//! Bit-level packing of Huffman codes.
//!
//! [`BitWriter`] and [`BitReader`] move individual bits in and out of byte
//! buffers, most significant bit first. [`pack`] and [`unpack`] build the
//! Huffman payload on top of them.
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with zero bits and reports how many
//! - BitReader: reads only the first `bit_len` bits; the caller supplies the
//!   pad count recorded at packing time, it cannot be inferred from the bytes
//!
//! # Example
//! ```
//! use squeeze_core::bitio::{BitWriter, BitReader};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();  // Write 3 bits: 1, 0, 1
//! writer.write_bits(0b11, 2).unwrap();   // Write 2 bits: 1, 1
//! // Total: 10111 -> padded to 10111000
//!
//! let (bytes, pad) = writer.finish();
//! assert_eq!(pad, 3);
//! let mut reader = BitReader::with_padding(&bytes, pad).unwrap();
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(2).unwrap(), 0b11);
//! assert!(reader.is_empty());
//! ```

use tracing::debug;

use crate::codebook::{Code, Codebook};
use crate::error::{BitIoError, HuffmanError, Result};

/// Writes bits MSB-first into a byte buffer.
///
/// # Invariants
/// - `bit_count` is always < 8
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a writer expecting roughly `bytes` bytes of output.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Append one bit.
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.bit_buffer |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }

    /// Write the lowest `count` bits of `value`, highest of those first.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        for shift in (0..count).rev() {
            self.write_bit((value >> shift) & 1 == 1);
        }

        Ok(())
    }

    /// Append every bit of `code`.
    pub fn write_code(&mut self, code: &Code) {
        for &bit in code.bits() {
            self.write_bit(bit);
        }
    }

    /// Pad the final partial byte with zeros and return the bytes together
    /// with the number of padding bits (0-7).
    pub fn finish(mut self) -> (Vec<u8>, u8) {
        let pad = (8 - self.bit_count) % 8;
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        (self.bytes, pad)
    }

    /// Total number of bits written (including partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads bits MSB-first from a byte buffer, stopping at `bit_len`.
///
/// # Invariants
/// - `bit_position` never exceeds `bit_len`
/// - `bit_len` never exceeds `data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Number of meaningful bits in `data`
    bit_len: usize,
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    /// Read every bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_len: data.len() * 8,
            bit_position: 0,
        }
    }

    /// Read `data` minus the trailing `pad` bits.
    ///
    /// Returns `None` if `pad` exceeds 7 or the number of bits available.
    pub fn with_padding(data: &'a [u8], pad: u8) -> Option<Self> {
        let total = data.len() * 8;
        if pad > 7 || pad as usize > total {
            return None;
        }
        Some(Self {
            data,
            bit_len: total - pad as usize,
            bit_position: 0,
        })
    }

    /// Read a single bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` once `bit_len` bits have been read.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.bit_position >= self.bit_len {
            return Err(BitIoError::UnexpectedEof.into());
        }
        let byte = self.data[self.bit_position / 8];
        let bit = byte & (0x80 >> (self.bit_position % 8)) != 0;
        self.bit_position += 1;
        Ok(bit)
    }

    /// Read up to 64 bits into the low bits of a `u64`.
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
        for _ in 0..count {
            result = (result << 1) | self.read_bit()? as u64;
        }
        Ok(result)
    }

    pub fn bits_remaining(&self) -> usize {
        self.bit_len - self.bit_position
    }

    pub fn position(&self) -> usize {
        self.bit_position
    }

    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.bit_len
    }
}

/// Concatenate the code of every byte of `data` and pack the bits.
///
/// Returns the packed bytes and the number of zero bits appended to the last
/// byte.
///
/// # Errors
/// `HuffmanError::MissingCode` if a byte of `data` has no code.
pub fn pack(data: &[u8], codebook: &Codebook) -> Result<(Vec<u8>, u8)> {
    let mut writer = BitWriter::with_capacity(data.len());

    for &byte in data {
        let code = codebook
            .get(byte)
            .ok_or(HuffmanError::MissingCode { byte })?;
        writer.write_code(code);
    }

    let bit_len = writer.bit_len();
    let (bytes, pad) = writer.finish();
    debug!(bits = bit_len, bytes = bytes.len(), pad, "packed huffman payload");
    Ok((bytes, pad))
}

/// Decode a packed payload back into bytes.
///
/// Bits are consumed left to right; whenever the accumulated candidate equals
/// a code, its byte is emitted and the candidate restarts.
///
/// # Errors
/// `HuffmanError::MalformedStream` if the pad count is impossible, if the
/// candidate grows past the longest code, or if bits are left over at the end.
pub fn unpack(bytes: &[u8], codebook: &Codebook, pad: u8) -> Result<Vec<u8>> {
    let mut reader =
        BitReader::with_padding(bytes, pad).ok_or(HuffmanError::MalformedStream {
            position: 0,
            reason: "pad count exceeds available bits",
        })?;

    if codebook.is_empty() {
        if reader.is_empty() {
            return Ok(Vec::new());
        }
        return Err(HuffmanError::MalformedStream {
            position: 0,
            reason: "payload present but codebook is empty",
        }
        .into());
    }

    let inverse = codebook.inverse();
    let max_len = codebook.max_code_len();
    let mut output = Vec::with_capacity(bytes.len() * 2);
    let mut candidate: Vec<bool> = Vec::with_capacity(max_len);

    while !reader.is_empty() {
        candidate.push(reader.read_bit()?);

        if let Some(&byte) = inverse.get(candidate.as_slice()) {
            output.push(byte);
            candidate.clear();
        } else if candidate.len() >= max_len {
            return Err(HuffmanError::MalformedStream {
                position: reader.position(),
                reason: "bit sequence matches no code",
            }
            .into());
        }
    }

    if !candidate.is_empty() {
        return Err(HuffmanError::MalformedStream {
            position: reader.position(),
            reason: "trailing bits do not form a complete code",
        }
        .into());
    }

    debug!(bytes = output.len(), "unpacked huffman payload");
    Ok(output)
}
