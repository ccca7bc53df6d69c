//! Byte frequency analysis.
//!
//! The first stage of Huffman compression: count how often each byte value
//! occurs. Counts live in a flat 256-entry array; a byte value is "present"
//! when its count is non-zero.

/// Occurrence count per byte value.
///
/// Built once per compression call and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
    distinct: usize,
}

impl FrequencyTable {
    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        let distinct = counts.iter().filter(|&&c| c > 0).count();
        Self { counts, distinct }
    }

    /// Occurrence count of `byte` (0 when absent).
    pub fn get(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Whether `byte` occurs at least once.
    pub fn contains(&self, byte: u8) -> bool {
        self.counts[byte as usize] > 0
    }

    /// Number of distinct byte values present.
    pub fn len(&self) -> usize {
        self.distinct
    }

    pub fn is_empty(&self) -> bool {
        self.distinct == 0
    }

    /// Sum of all counts, i.e. the length of the analyzed buffer.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Present `(byte, count)` pairs in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(byte, &count)| (byte as u8, count))
    }
}
