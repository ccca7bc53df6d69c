//! Huffman compression pipeline.
//!
//! Compression runs frequency analysis, tree construction, codebook
//! generation and bit packing, in that order. Decompression never rebuilds
//! the tree: the codebook and pad count from [`CompressionMetadata`] are all
//! the unpacker needs.
//!
//! # Example
//! ```
//! use squeeze_core::huffman;
//!
//! let output = huffman::compress(b"abracadabra").unwrap();
//! let restored = huffman::decompress(&output.bytes, &output.metadata).unwrap();
//! assert_eq!(restored, b"abracadabra");
//! ```

use tracing::debug;

use crate::bitio;
use crate::codebook::Codebook;
use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::metadata::CompressionMetadata;
use crate::tree::HuffmanTree;

/// Packed payload plus the metadata required to decode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanOutput {
    pub bytes: Vec<u8>,
    pub metadata: CompressionMetadata,
}

/// Build the codebook for `data`.
///
/// Returns an empty codebook for empty input.
pub fn build_codebook(data: &[u8]) -> Result<Codebook> {
    let freqs = FrequencyTable::from_bytes(data);
    if freqs.is_empty() {
        return Ok(Codebook::empty());
    }

    let tree = HuffmanTree::build(&freqs)?;
    let codebook = Codebook::from_tree(&tree);
    debug!(
        symbols = freqs.len(),
        max_code_len = codebook.max_code_len(),
        "built huffman codebook"
    );
    Ok(codebook)
}

/// Compress `data`.
///
/// Empty input produces an empty payload, an empty codebook and pad 0.
pub fn compress(data: &[u8]) -> Result<HuffmanOutput> {
    let codebook = build_codebook(data)?;
    let (bytes, pad) = bitio::pack(data, &codebook)?;

    debug!(
        input = data.len(),
        output = bytes.len(),
        pad,
        "huffman compress"
    );

    Ok(HuffmanOutput {
        bytes,
        metadata: CompressionMetadata::new(codebook, pad),
    })
}

/// Decompress a payload produced by [`compress`].
///
/// # Errors
/// `HuffmanError::MalformedStream` if the payload does not decode cleanly
/// with the given metadata.
pub fn decompress(bytes: &[u8], metadata: &CompressionMetadata) -> Result<Vec<u8>> {
    let output = bitio::unpack(bytes, &metadata.codebook, metadata.pad)?;
    debug!(input = bytes.len(), output = output.len(), "huffman decompress");
    Ok(output)
}
