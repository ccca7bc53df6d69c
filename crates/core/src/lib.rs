//! squeeze-core: lossless Huffman and run-length byte codecs
//!
//! Both codecs take a whole buffer in memory and return a new one. Huffman
//! output comes with a small metadata blob (codebook plus pad count) that is
//! required to decompress it; run-length output is self-describing.
//!
//! # Architecture
//!
//! - `frequency`: byte occurrence counts
//! - `tree`: arena Huffman tree with a deterministic tie-break
//! - `codebook`: prefix codes read off the tree
//! - `bitio`: MSB-first bit reading/writing, payload packing and unpacking
//! - `metadata`: codebook + pad count and their JSON form
//! - `huffman`: Huffman compress/decompress pipeline
//! - `rle`: run-length compress/decompress
//! - `codec`: algorithm selector and the public entry points
//! - `stats`: sizes, ratio and timing of a codec call
//!
//! # Design Principles
//!
//! - **No panics**: malformed input yields a structured error, never partial output
//! - **Deterministic**: the same input always compresses to the same bytes and metadata
//! - **Stateless**: nothing is shared between calls; buffers are only borrowed

pub mod bitio;
pub mod codebook;
pub mod codec;
pub mod error;
pub mod frequency;
pub mod huffman;
pub mod metadata;
pub mod rle;
pub mod stats;
pub mod tree;

// Re-export commonly used types
pub use codec::{compress, decompress, Algorithm, Compressed};
pub use error::{Error, Result};
pub use metadata::CompressionMetadata;
