//! Error types for the squeeze codecs.
//!
//! All operations return structured errors rather than panicking. Errors are
//! raised at the point where malformed data is detected and carry enough
//! context to tell corrupt input apart from a mismatched metadata blob.

use thiserror::Error;

/// Top-level error type for all operations in the library.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: reading/writing bits from/to byte buffers
/// - Huffman: tree construction, packing or unpacking failures
/// - Run-length: malformed run record streams
/// - Metadata: codebook/pad blob that cannot be parsed or validated
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman codec error
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Run-length codec error
    #[error("run-length codec error: {0}")]
    Rle(#[from] RleError),

    /// Compression metadata could not be parsed or is inconsistent
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Algorithm selector is neither "huffman" nor "rle"
    #[error("unsupported algorithm: {0:?}")]
    InvalidAlgorithm(String),

    /// Huffman decompression was requested without a metadata blob
    #[error("{0} decompression requires metadata")]
    MissingMetadata(&'static str),
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Huffman codec errors.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// No symbols with non-zero frequency (cannot build a tree)
    #[error("empty frequency table: cannot build tree")]
    EmptyFrequencyTable,

    /// Input contains a byte the codebook has no code for
    #[error("no code for byte {byte:#04x} in codebook")]
    MissingCode { byte: u8 },

    /// Bit stream does not resolve cleanly into codes
    #[error("malformed stream at bit {position}: {reason}")]
    MalformedStream { position: usize, reason: &'static str },
}

/// Run-length codec errors.
#[derive(Debug, Error)]
pub enum RleError {
    /// Stream ends with a count byte that has no value byte
    #[error("truncated run-length stream: length {len} is odd")]
    TruncatedStream { len: usize },

    /// Run record with a count of zero
    #[error("zero-length run at offset {offset}")]
    ZeroRun { offset: usize },
}

/// Metadata (de)serialization errors.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Text is not valid metadata JSON
    #[error("invalid metadata JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Codebook key is not a canonical decimal byte value
    #[error("invalid codebook key {0:?}: expected a decimal byte value 0-255")]
    InvalidKey(String),

    /// Code is empty or contains characters other than '0' and '1'
    #[error("invalid code {code:?} for byte {byte}")]
    InvalidCode { byte: u8, code: String },

    /// Pad count outside 0-7
    #[error("invalid pad count {0}: expected 0-7")]
    InvalidPad(u64),

    /// One code is a prefix of another, so decoding would be ambiguous
    #[error("codebook is not prefix-free: code for {shorter} is a prefix of code for {longer}")]
    NotPrefixFree { shorter: u8, longer: u8 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
