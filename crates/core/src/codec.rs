//! Algorithm selection and the compress/decompress entry points.
//!
//! This is the boundary other layers call into: a byte buffer and an
//! algorithm selector in, bytes and (for Huffman) a metadata string out.
//!
//! # Example
//! ```
//! use squeeze_core::codec::{self, Algorithm};
//!
//! let algorithm: Algorithm = "huffman".parse().unwrap();
//! let compressed = codec::compress(b"banana", algorithm).unwrap();
//! let restored = codec::decompress(
//!     &compressed.bytes,
//!     algorithm,
//!     compressed.metadata.as_deref(),
//! )
//! .unwrap();
//! assert_eq!(restored, b"banana");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metadata::CompressionMetadata;
use crate::stats::{CompressionStats, DecompressionStats, Stopwatch};
use crate::{huffman, rle};

/// Supported codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Huffman,
    Rle,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Huffman, Algorithm::Rle];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Huffman => "huffman",
            Algorithm::Rle => "rle",
        }
    }

    /// Whether decompression needs the metadata produced at compression time.
    pub fn needs_metadata(self) -> bool {
        matches!(self, Algorithm::Huffman)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "huffman" => Ok(Algorithm::Huffman),
            "rle" => Ok(Algorithm::Rle),
            other => Err(Error::InvalidAlgorithm(other.to_string())),
        }
    }
}

/// Compressed bytes and, for Huffman, the serialized metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressed {
    pub bytes: Vec<u8>,
    pub metadata: Option<String>,
}

/// Compress `data` with `algorithm`.
pub fn compress(data: &[u8], algorithm: Algorithm) -> Result<Compressed> {
    match algorithm {
        Algorithm::Huffman => {
            let output = huffman::compress(data)?;
            Ok(Compressed {
                bytes: output.bytes,
                metadata: Some(output.metadata.to_json()?),
            })
        }
        Algorithm::Rle => Ok(Compressed {
            bytes: rle::compress(data),
            metadata: None,
        }),
    }
}

/// Decompress `data` with `algorithm`.
///
/// `metadata` is required for Huffman and ignored for run-length.
///
/// # Errors
/// - `Error::MissingMetadata` if Huffman metadata is absent
/// - metadata parse errors, or the codec's own stream errors
pub fn decompress(data: &[u8], algorithm: Algorithm, metadata: Option<&str>) -> Result<Vec<u8>> {
    match algorithm {
        Algorithm::Huffman => {
            let text = metadata.ok_or(Error::MissingMetadata(algorithm.name()))?;
            let metadata = CompressionMetadata::from_json(text)?;
            huffman::decompress(data, &metadata)
        }
        Algorithm::Rle => rle::decompress(data),
    }
}

/// [`compress`], timed.
pub fn compress_with_stats(
    data: &[u8],
    algorithm: Algorithm,
) -> Result<(Compressed, CompressionStats)> {
    let watch = Stopwatch::start();
    let compressed = compress(data, algorithm)?;
    let stats = CompressionStats::new(data.len(), compressed.bytes.len(), watch.elapsed_ms());
    Ok((compressed, stats))
}

/// [`decompress`], timed.
pub fn decompress_with_stats(
    data: &[u8],
    algorithm: Algorithm,
    metadata: Option<&str>,
) -> Result<(Vec<u8>, DecompressionStats)> {
    let watch = Stopwatch::start();
    let output = decompress(data, algorithm, metadata)?;
    let stats = DecompressionStats::new(output.len(), watch.elapsed_ms());
    Ok((output, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HuffmanError, RleError};

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("huffman".parse::<Algorithm>().unwrap(), Algorithm::Huffman);
        assert_eq!("rle".parse::<Algorithm>().unwrap(), Algorithm::Rle);
        for bad in ["Huffman", "RLE", "lz77", ""] {
            assert!(matches!(
                bad.parse::<Algorithm>(),
                Err(Error::InvalidAlgorithm(_))
            ));
        }
    }

    #[test]
    fn test_display_matches_parse() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Algorithm::Rle).unwrap(), r#""rle""#);
        let parsed: Algorithm = serde_json::from_str(r#""huffman""#).unwrap();
        assert_eq!(parsed, Algorithm::Huffman);
    }

    #[test]
    fn test_round_trip_both() {
        let data = b"aaaaabbbbbcccccdddddeeeee and some more text";
        for algorithm in Algorithm::ALL {
            let compressed = compress(data, algorithm).unwrap();
            let restored =
                decompress(&compressed.bytes, algorithm, compressed.metadata.as_deref()).unwrap();
            assert_eq!(restored, data, "{} round trip", algorithm);
        }
    }

    #[test]
    fn test_metadata_presence() {
        assert!(compress(b"abc", Algorithm::Huffman).unwrap().metadata.is_some());
        assert!(compress(b"abc", Algorithm::Rle).unwrap().metadata.is_none());
    }

    #[test]
    fn test_empty_input() {
        let rle = compress(&[], Algorithm::Rle).unwrap();
        assert!(rle.bytes.is_empty());

        let huffman = compress(&[], Algorithm::Huffman).unwrap();
        assert!(huffman.bytes.is_empty());
        assert_eq!(huffman.metadata.as_deref(), Some(r#"{"codebook":{},"pad":0}"#));
        let restored =
            decompress(&huffman.bytes, Algorithm::Huffman, huffman.metadata.as_deref()).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_huffman_requires_metadata() {
        let result = decompress(&[0x00], Algorithm::Huffman, None);
        assert!(matches!(result, Err(Error::MissingMetadata("huffman"))));
    }

    #[test]
    fn test_rle_ignores_metadata() {
        let restored = decompress(&[2, 5], Algorithm::Rle, Some("not json")).unwrap();
        assert_eq!(restored, vec![5, 5]);
    }

    #[test]
    fn test_errors_propagate() {
        assert!(matches!(
            decompress(&[1], Algorithm::Rle, None),
            Err(Error::Rle(RleError::TruncatedStream { .. }))
        ));

        // Two-bit codes with one padding bit leave a dangling bit.
        let meta = r#"{"codebook":{"97":"00","98":"01","99":"10","100":"11"},"pad":1}"#;
        let result = decompress(&[0xFF], Algorithm::Huffman, Some(meta));
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::MalformedStream { .. }))
        ));
    }

    #[test]
    fn test_incomplete_codebook_rejected() {
        let meta = r#"{"codebook":{"97":"00"},"pad":6}"#;
        let result = decompress(&[0b0100_0000], Algorithm::Huffman, Some(meta));
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::MalformedStream { position: 2, .. }))
        ));
    }

    #[test]
    fn test_with_stats() {
        let data = vec![1u8; 1000];
        let (compressed, stats) = compress_with_stats(&data, Algorithm::Rle).unwrap();
        assert_eq!(stats.original_size, 1000);
        assert_eq!(stats.compressed_size, compressed.bytes.len());
        assert!(stats.ratio < 0.05);

        let (restored, stats) = decompress_with_stats(&compressed.bytes, Algorithm::Rle, None).unwrap();
        assert_eq!(restored, data);
        assert_eq!(stats.decompressed_size, 1000);
    }
}
