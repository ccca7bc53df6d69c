//! Run-length coding.
//!
//! The compressed stream is a sequence of two-byte run records:
//!
//! ```text
//! +-----------+-----------+
//! | count (1) | value (1) |   count in 1..=255
//! +-----------+-----------+
//! ```
//!
//! A run longer than 255 bytes is split into several records with the same
//! value. The stream is self-describing, no side metadata is needed.

use tracing::debug;

use crate::error::{Result, RleError};

/// Longest run a single record can describe.
pub const MAX_RUN: usize = u8::MAX as usize;

/// `count` consecutive copies of `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRecord {
    pub count: u8,
    pub value: u8,
}

impl RunRecord {
    pub fn to_bytes(self) -> [u8; 2] {
        [self.count, self.value]
    }
}

/// Iterator over the run records of a buffer.
///
/// Created by [`runs`].
#[derive(Debug, Clone)]
pub struct Runs<'a> {
    data: &'a [u8],
    position: usize,
}

impl Iterator for Runs<'_> {
    type Item = RunRecord;

    fn next(&mut self) -> Option<RunRecord> {
        let rest = &self.data[self.position..];
        let &value = rest.first()?;
        let count = rest
            .iter()
            .take(MAX_RUN)
            .take_while(|&&byte| byte == value)
            .count();
        self.position += count;
        Some(RunRecord {
            count: count as u8,
            value,
        })
    }
}

/// Split `data` into maximal runs, each capped at [`MAX_RUN`] bytes.
pub fn runs(data: &[u8]) -> Runs<'_> {
    Runs { data, position: 0 }
}

/// Compress `data` into `[count, value]` pairs.
pub fn compress(data: &[u8]) -> Vec<u8> {
    let output: Vec<u8> = runs(data).flat_map(RunRecord::to_bytes).collect();
    debug!(input = data.len(), output = output.len(), "rle compress");
    output
}

/// Expand a stream produced by [`compress`].
///
/// # Errors
/// - `RleError::TruncatedStream` if the stream length is odd
/// - `RleError::ZeroRun` if a record has a count of zero
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() % 2 != 0 {
        return Err(RleError::TruncatedStream { len: data.len() }.into());
    }

    let expanded: usize = data.chunks_exact(2).map(|pair| pair[0] as usize).sum();
    let mut output = Vec::with_capacity(expanded);

    for (index, pair) in data.chunks_exact(2).enumerate() {
        let (count, value) = (pair[0], pair[1]);
        if count == 0 {
            return Err(RleError::ZeroRun { offset: index * 2 }.into());
        }
        output.resize(output.len() + count as usize, value);
    }

    debug!(input = data.len(), output = output.len(), "rle decompress");
    Ok(output)
}
