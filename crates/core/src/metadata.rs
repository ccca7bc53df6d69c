//! Huffman side metadata and its JSON form.
//!
//! Decoding needs the codebook and the pad count, neither of which can be
//! recovered from the packed bytes. They travel next to the payload as text:
//!
//! ```json
//! {"codebook":{"0":"0","1":"1"},"pad":2}
//! ```
//!
//! Codebook keys are byte values written as canonical decimal strings
//! (`u8::to_string`) and read back with `u8::from_str`. Keys that parse but
//! are not canonical (`"007"`, `"+7"`) are rejected so that the mapping stays
//! symmetric.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::codebook::{Code, Codebook};
use crate::error::{MetadataError, Result};

/// Everything the Huffman decoder needs besides the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MetadataWire", into = "MetadataWire")]
pub struct CompressionMetadata {
    pub codebook: Codebook,
    /// Zero bits appended to the last payload byte (0-7)
    pub pad: u8,
}

/// Text-friendly shape of [`CompressionMetadata`].
#[derive(Debug, Serialize, Deserialize)]
struct MetadataWire {
    codebook: BTreeMap<String, String>,
    pad: u64,
}

impl CompressionMetadata {
    pub fn new(codebook: Codebook, pad: u8) -> Self {
        Self { codebook, pad }
    }

    /// Metadata for an empty payload: no codes, no padding.
    pub fn empty() -> Self {
        Self::new(Codebook::empty(), 0)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self).map_err(MetadataError::Json)?)
    }

    /// Parse and validate metadata text.
    ///
    /// # Errors
    /// - `MetadataError::Json` for malformed JSON or missing fields
    /// - `MetadataError::InvalidKey` / `InvalidCode` / `InvalidPad` for bad values
    /// - `MetadataError::NotPrefixFree` if decoding would be ambiguous
    pub fn from_json(text: &str) -> Result<Self> {
        let wire: MetadataWire = serde_json::from_str(text).map_err(MetadataError::Json)?;
        Ok(Self::try_from(wire)?)
    }
}

impl From<CompressionMetadata> for MetadataWire {
    fn from(meta: CompressionMetadata) -> Self {
        let codebook = meta
            .codebook
            .iter()
            .map(|(byte, code)| (byte.to_string(), code.to_string()))
            .collect();
        Self {
            codebook,
            pad: meta.pad as u64,
        }
    }
}

impl TryFrom<MetadataWire> for CompressionMetadata {
    type Error = MetadataError;

    fn try_from(wire: MetadataWire) -> std::result::Result<Self, Self::Error> {
        let pad = u8::try_from(wire.pad)
            .ok()
            .filter(|&pad| pad <= 7)
            .ok_or(MetadataError::InvalidPad(wire.pad))?;

        let mut codes = BTreeMap::new();
        for (key, bits) in wire.codebook {
            let byte = parse_byte_key(&key)?;
            let code = Code::from_bit_str(&bits)
                .ok_or(MetadataError::InvalidCode { byte, code: bits })?;
            codes.insert(byte, code);
        }

        let codebook = Codebook::from_codes(codes);
        if let Some((shorter, longer)) = codebook.prefix_violation() {
            return Err(MetadataError::NotPrefixFree { shorter, longer });
        }

        Ok(Self { codebook, pad })
    }
}

fn parse_byte_key(key: &str) -> std::result::Result<u8, MetadataError> {
    key.parse::<u8>()
        .ok()
        .filter(|byte| byte.to_string() == key)
        .ok_or_else(|| MetadataError::InvalidKey(key.to_string()))
}
