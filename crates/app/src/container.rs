//! Single-file container for compressed output.
//!
//! Huffman output is only decodable together with its metadata, so the CLI
//! stores payload, metadata and algorithm side by side in one file, guarded
//! by a CRC.
//!
//! # Container Format
//!
//! ```text
//! +-------------------+
//! | Magic (4 bytes)   |  "SQZ1"
//! +-------------------+
//! | algorithm (1)     |  0 = huffman, 1 = rle
//! +-------------------+
//! | original_len (8)  |  u64 little-endian, uncompressed size
//! +-------------------+
//! | meta_len (4)      |  u32 length of metadata text (0 = none)
//! +-------------------+
//! | payload_len (8)   |  u64 length of compressed payload
//! +-------------------+
//! | crc32 (4)         |  u32 checksum, see below
//! +-------------------+
//! | metadata          |  UTF-8 JSON (meta_len bytes)
//! +-------------------+
//! | payload           |  compressed bytes (payload_len bytes)
//! +-------------------+
//! ```
//!
//! # CRC Coverage
//!
//! algorithm, original_len, meta_len, payload_len, metadata and payload.

use squeeze_core::codec::{self, Compressed};
use squeeze_core::stats::DecompressionStats;
use squeeze_core::Algorithm;
use thiserror::Error;

const MAGIC: [u8; 4] = *b"SQZ1";

/// Size of the container header in bytes
pub const HEADER_SIZE: usize = 29;

/// Container parsing and validation errors.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("container too short: need at least {required} bytes, got {actual}")]
    TooShort { required: usize, actual: usize },

    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    #[error("unknown algorithm tag {0}")]
    UnknownAlgorithm(u8),

    #[error("container length mismatch: header says {expected} bytes, got {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("metadata is not valid UTF-8")]
    InvalidUtf8,

    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    #[error("decompressed {actual} bytes, container records {expected}")]
    OriginalLengthMismatch { expected: u64, actual: u64 },

    #[error(transparent)]
    Codec(#[from] squeeze_core::Error),
}

/// A parsed container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub algorithm: Algorithm,
    /// Uncompressed size
    pub original_len: u64,
    pub metadata: Option<String>,
    pub payload: Vec<u8>,
    pub crc32: u32,
}

fn algorithm_tag(algorithm: Algorithm) -> u8 {
    match algorithm {
        Algorithm::Huffman => 0,
        Algorithm::Rle => 1,
    }
}

fn algorithm_from_tag(tag: u8) -> Result<Algorithm, ContainerError> {
    match tag {
        0 => Ok(Algorithm::Huffman),
        1 => Ok(Algorithm::Rle),
        other => Err(ContainerError::UnknownAlgorithm(other)),
    }
}

/// Serialize compressed output into container bytes.
pub fn serialize_container(algorithm: Algorithm, original_len: u64, compressed: &Compressed) -> Vec<u8> {
    let metadata = compressed.metadata.as_deref().unwrap_or("").as_bytes();
    let tag = algorithm_tag(algorithm);
    let meta_len = metadata.len() as u32;
    let payload_len = compressed.bytes.len() as u64;

    let crc32 = compute_crc(tag, original_len, meta_len, payload_len, metadata, &compressed.bytes);

    let mut out = Vec::with_capacity(HEADER_SIZE + metadata.len() + compressed.bytes.len());
    out.extend_from_slice(&MAGIC);
    out.push(tag);
    out.extend_from_slice(&original_len.to_le_bytes());
    out.extend_from_slice(&meta_len.to_le_bytes());
    out.extend_from_slice(&payload_len.to_le_bytes());
    out.extend_from_slice(&crc32.to_le_bytes());
    out.extend_from_slice(metadata);
    out.extend_from_slice(&compressed.bytes);
    out
}

/// Parse and verify container bytes.
///
/// # Errors
/// - `ContainerError::TooShort` / `LengthMismatch` for truncated or padded files
/// - `ContainerError::InvalidMagic` / `UnknownAlgorithm` for foreign files
/// - `ContainerError::Crc` if any covered byte changed
pub fn parse_container(bytes: &[u8]) -> Result<Container, ContainerError> {
    if bytes.len() < HEADER_SIZE {
        return Err(ContainerError::TooShort {
            required: HEADER_SIZE,
            actual: bytes.len(),
        });
    }

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&bytes[0..4]);
    if magic != MAGIC {
        return Err(ContainerError::InvalidMagic {
            expected: MAGIC,
            actual: magic,
        });
    }

    let tag = bytes[4];
    let original_len = read_u64(&bytes[5..13]);
    let meta_len = read_u32(&bytes[13..17]);
    let payload_len = read_u64(&bytes[17..25]);
    let crc32 = read_u32(&bytes[25..29]);

    // A forged payload_len near u64::MAX saturates and can never match.
    let expected = (HEADER_SIZE as u64 + meta_len as u64).saturating_add(payload_len);
    if bytes.len() as u64 != expected {
        return Err(ContainerError::LengthMismatch {
            expected,
            actual: bytes.len() as u64,
        });
    }

    let meta_end = HEADER_SIZE + meta_len as usize;
    let metadata = &bytes[HEADER_SIZE..meta_end];
    let payload = &bytes[meta_end..];

    let computed = compute_crc(tag, original_len, meta_len, payload_len, metadata, payload);
    if computed != crc32 {
        return Err(ContainerError::Crc {
            expected: crc32,
            actual: computed,
        });
    }

    let algorithm = algorithm_from_tag(tag)?;
    let metadata = if metadata.is_empty() {
        None
    } else {
        let text = std::str::from_utf8(metadata).map_err(|_| ContainerError::InvalidUtf8)?;
        Some(text.to_string())
    };

    Ok(Container {
        algorithm,
        original_len,
        metadata,
        payload: payload.to_vec(),
        crc32,
    })
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

fn compute_crc(
    tag: u8,
    original_len: u64,
    meta_len: u32,
    payload_len: u64,
    metadata: &[u8],
    payload: &[u8],
) -> u32 {
    let mut hasher = crc32fast::Hasher::new();

    hasher.update(&[tag]);
    hasher.update(&original_len.to_le_bytes());
    hasher.update(&meta_len.to_le_bytes());
    hasher.update(&payload_len.to_le_bytes());

    hasher.update(metadata);
    hasher.update(payload);

    hasher.finalize()
}

/// Decompress a parsed container and check the recorded original size.
pub fn decompress_container(
    container: &Container,
) -> Result<(Vec<u8>, DecompressionStats), ContainerError> {
    let (output, stats) = codec::decompress_with_stats(
        &container.payload,
        container.algorithm,
        container.metadata.as_deref(),
    )?;

    if output.len() as u64 != container.original_len {
        return Err(ContainerError::OriginalLengthMismatch {
            expected: container.original_len,
            actual: output.len() as u64,
        });
    }
    Ok((output, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container_bytes(data: &[u8], algorithm: Algorithm) -> Vec<u8> {
        let compressed = codec::compress(data, algorithm).unwrap();
        serialize_container(algorithm, data.len() as u64, &compressed)
    }

    #[test]
    fn test_round_trip() {
        let data = b"hello world! hello container! aaaaaaaaaaaaaaaaaaaa";
        for algorithm in Algorithm::ALL {
            let bytes = container_bytes(data, algorithm);
            let container = parse_container(&bytes).unwrap();
            assert_eq!(container.algorithm, algorithm);
            assert_eq!(container.original_len, data.len() as u64);
            assert_eq!(container.metadata.is_some(), algorithm.needs_metadata());

            let (output, stats) = decompress_container(&container).unwrap();
            assert_eq!(output, data);
            assert_eq!(stats.decompressed_size, data.len());
        }
    }

    #[test]
    fn test_empty_input() {
        for algorithm in Algorithm::ALL {
            let bytes = container_bytes(&[], algorithm);
            let container = parse_container(&bytes).unwrap();
            assert!(container.payload.is_empty());
            assert!(decompress_container(&container).unwrap().0.is_empty());
        }
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = container_bytes(b"abc", Algorithm::Rle);
        bytes[0] = b'X';
        assert!(matches!(
            parse_container(&bytes),
            Err(ContainerError::InvalidMagic { .. })
        ));
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            parse_container(&[0u8; 10]),
            Err(ContainerError::TooShort { required: HEADER_SIZE, actual: 10 })
        ));
    }

    #[test]
    fn test_truncated() {
        let bytes = container_bytes(b"some data to truncate", Algorithm::Huffman);
        assert!(matches!(
            parse_container(&bytes[..bytes.len() - 1]),
            Err(ContainerError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_oversized_payload_len() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC);
        bytes.push(1);
        bytes.extend_from_slice(&0u64.to_le_bytes());
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.push(b'{');
        assert_eq!(bytes.len(), HEADER_SIZE + 1);

        assert!(matches!(
            parse_container(&bytes),
            Err(ContainerError::LengthMismatch { expected: u64::MAX, actual: 30 })
        ));
    }

    #[test]
    fn test_crc_mismatch() {
        let mut bytes = container_bytes(b"test data", Algorithm::Huffman);
        let len = bytes.len();
        bytes[len - 1] ^= 0x01;
        assert!(matches!(parse_container(&bytes), Err(ContainerError::Crc { .. })));
    }

    #[test]
    fn test_unknown_algorithm_tag() {
        let compressed = Compressed {
            bytes: vec![1, 2],
            metadata: None,
        };
        let mut bytes = serialize_container(Algorithm::Rle, 1, &compressed);
        bytes[4] = 9;
        // Patch the CRC so the tag check is what fails.
        let crc = compute_crc(9, 1, 0, 2, &[], &[1, 2]);
        bytes[25..29].copy_from_slice(&crc.to_le_bytes());
        assert!(matches!(
            parse_container(&bytes),
            Err(ContainerError::UnknownAlgorithm(9))
        ));
    }

    #[test]
    fn test_original_length_checked() {
        let mut container = parse_container(&container_bytes(b"aaaa", Algorithm::Rle)).unwrap();
        container.original_len = 5;
        assert!(matches!(
            decompress_container(&container),
            Err(ContainerError::OriginalLengthMismatch { expected: 5, actual: 4 })
        ));
    }
}
