//! Run summaries, logged for people and serialized as JSON for scripts.

use serde::Serialize;
use squeeze_core::stats::{CompressionStats, DecompressionStats};
use squeeze_core::Algorithm;
use tracing::{info, warn};

/// Width of the ratio bar in the comparison table.
const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Serialize)]
pub struct CompressReport {
    pub algorithm: Algorithm,
    pub stats: CompressionStats,
    /// Huffman metadata text, `None` for run-length
    pub meta: Option<String>,
}

impl CompressReport {
    pub fn log_summary(&self) {
        let s = &self.stats;
        info!("=== Compression ({}) ===", self.algorithm);
        info!("Original:   {} bytes ({:.2} KiB)", s.original_size, kib(s.original_size));
        info!("Compressed: {} bytes ({:.2} KiB)", s.compressed_size, kib(s.compressed_size));
        info!("Ratio:      {}", s.ratio_display());
        info!("Saved:      {:.1}%", s.savings_percent());
        info!("Time:       {} ms", s.time_ms);
        if s.original_size > 0 && s.compressed_size >= s.original_size {
            warn!("{} output is not smaller than the input", self.algorithm);
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DecompressReport {
    pub algorithm: Algorithm,
    pub stats: DecompressionStats,
}

impl DecompressReport {
    pub fn log_summary(&self) {
        info!("=== Decompression ({}) ===", self.algorithm);
        info!("Output: {} bytes", self.stats.decompressed_size);
        info!("Time:   {} ms", self.stats.time_ms);
    }
}

/// One algorithm's row in a comparison.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareEntry {
    pub algorithm: Algorithm,
    pub compression: CompressionStats,
    pub decompression: DecompressionStats,
    /// Decompressed output matched the input
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareReport {
    pub input_size: usize,
    pub entries: Vec<CompareEntry>,
}

impl CompareReport {
    /// Entry with the smallest compressed size.
    pub fn best(&self) -> Option<&CompareEntry> {
        self.entries
            .iter()
            .min_by_key(|entry| entry.compression.compressed_size)
    }

    pub fn all_verified(&self) -> bool {
        self.entries.iter().all(|entry| entry.verified)
    }

    pub fn log_summary(&self) {
        info!("=== Comparison ({} bytes in) ===", self.input_size);
        for entry in &self.entries {
            info!(
                "{:<8} {:>10} bytes  ratio {}  {:>4} ms  {} {}",
                entry.algorithm.name(),
                entry.compression.compressed_size,
                entry.compression.ratio_display(),
                entry.compression.time_ms,
                ratio_bar(entry.compression.ratio),
                if entry.verified { "ok" } else { "MISMATCH" },
            );
        }
        if let Some(best) = self.best() {
            info!("Smallest output: {}", best.algorithm);
        }
        if !self.all_verified() {
            warn!("at least one algorithm failed to round-trip");
        }
    }
}

fn kib(bytes: usize) -> f64 {
    bytes as f64 / 1024.0
}

/// Text bar proportional to `ratio`, capped at two full widths.
fn ratio_bar(ratio: f64) -> String {
    let filled = ((ratio * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH * 2);
    "#".repeat(filled)
}

/// Serialize any report as pretty JSON.
pub fn to_json<T: Serialize>(report: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
