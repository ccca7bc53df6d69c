//! Prefix codes derived from a Huffman tree.
//!
//! A [`Code`] is the root-to-leaf path of a symbol: a left edge contributes a
//! `0` bit and a right edge a `1` bit. Because codes only end at leaves, no
//! code is a prefix of another.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanTree, NodeKind};

/// A non-empty bit string, most significant (first emitted) bit first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(Vec<bool>);

impl Code {
    /// Parse a string of `'0'` and `'1'` characters.
    ///
    /// Returns `None` for an empty string or any other character.
    pub fn from_bit_str(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }
        s.chars()
            .map(|c| match c {
                '0' => Some(false),
                '1' => Some(true),
                _ => None,
            })
            .collect::<Option<Vec<bool>>>()
            .map(Code)
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, other: &Code) -> bool {
        self.0.starts_with(&other.0)
    }
}

impl Borrow<[bool]> for Code {
    fn borrow(&self) -> &[bool] {
        &self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Byte value to code mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codebook {
    codes: BTreeMap<u8, Code>,
}

impl Codebook {
    /// An empty codebook, used for empty input.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Walk `tree` and record the path to every real leaf.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        let mut stack = vec![(tree.root(), Vec::new())];

        while let Some((id, path)) = stack.pop() {
            match tree.node(id).kind {
                NodeKind::Leaf(byte) => {
                    codes.insert(byte, Code(path));
                }
                NodeKind::Internal { left, right } => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    stack.push((right, right_path));

                    let mut left_path = path;
                    left_path.push(false);
                    stack.push((left, left_path));
                }
                NodeKind::Phantom => {}
            }
        }

        Self { codes }
    }

    /// Wrap an already validated code map.
    pub(crate) fn from_codes(codes: BTreeMap<u8, Code>) -> Self {
        Self { codes }
    }

    pub fn get(&self, byte: u8) -> Option<&Code> {
        self.codes.get(&byte)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// `(byte, code)` pairs in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&byte, code)| (byte, code))
    }

    /// Length of the longest code, 0 for an empty codebook.
    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Code to byte mapping used for decoding.
    pub fn inverse(&self) -> HashMap<Code, u8> {
        self.codes
            .iter()
            .map(|(&byte, code)| (code.clone(), byte))
            .collect()
    }

    /// Number of bits needed to encode a buffer with these frequencies.
    ///
    /// Bytes without a code contribute nothing.
    pub fn encoded_bits(&self, freqs: &FrequencyTable) -> u64 {
        freqs
            .iter()
            .filter_map(|(byte, count)| self.get(byte).map(|code| count * code.len() as u64))
            .sum()
    }

    /// First pair `(shorter, longer)` where the code of `shorter` is a prefix
    /// of the code of `longer`, if any.
    ///
    /// After sorting, any prefix sorts directly before one of its extensions,
    /// so only neighbours need to be compared.
    pub fn prefix_violation(&self) -> Option<(u8, u8)> {
        let mut sorted: Vec<(&Code, u8)> = self.codes.iter().map(|(&b, c)| (c, b)).collect();
        sorted.sort();
        sorted
            .windows(2)
            .find(|pair| pair[1].0.starts_with(pair[0].0))
            .map(|pair| (pair[0].1, pair[1].1))
    }

    pub fn is_prefix_free(&self) -> bool {
        self.prefix_violation().is_none()
    }
}
