//! Timing and size statistics for codec calls.
//!
//! Callers that report on a compression (sizes, ratio, elapsed time) wrap the
//! codec call with [`Stopwatch`] and build one of the stats structs below.
//! The core codecs themselves never measure anything.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Measures wall time of a single operation.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }
}

/// Outcome of one compression call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionStats {
    pub original_size: usize,
    pub compressed_size: usize,
    /// compressed / original, 0.0 for empty input
    pub ratio: f64,
    pub time_ms: u64,
}

impl CompressionStats {
    pub fn new(original_size: usize, compressed_size: usize, time_ms: u64) -> Self {
        let ratio = if original_size == 0 {
            0.0
        } else {
            compressed_size as f64 / original_size as f64
        };
        Self {
            original_size,
            compressed_size,
            ratio,
            time_ms,
        }
    }

    /// Ratio rounded to two decimals, e.g. `"0.42"`.
    pub fn ratio_display(&self) -> String {
        format!("{:.2}", self.ratio)
    }

    /// Bytes saved as a percentage of the original size (negative when the
    /// output grew).
    pub fn savings_percent(&self) -> f64 {
        if self.original_size == 0 {
            0.0
        } else {
            (1.0 - self.ratio) * 100.0
        }
    }

    /// Simple key=value rendering (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "original_size={}\n\
             compressed_size={}\n\
             ratio={:.4}\n\
             time_ms={}\n",
            self.original_size, self.compressed_size, self.ratio, self.time_ms,
        )
    }
}

/// Outcome of one decompression call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecompressionStats {
    pub decompressed_size: usize,
    pub time_ms: u64,
}

impl DecompressionStats {
    pub fn new(decompressed_size: usize, time_ms: u64) -> Self {
        Self {
            decompressed_size,
            time_ms,
        }
    }

    pub fn export_text(&self) -> String {
        format!(
            "decompressed_size={}\ntime_ms={}\n",
            self.decompressed_size, self.time_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio() {
        let stats = CompressionStats::new(1000, 750, 3);
        assert_eq!(stats.ratio, 0.75);
        assert_eq!(stats.ratio_display(), "0.75");
        assert_eq!(stats.savings_percent(), 25.0);
    }

    #[test]
    fn test_empty_input_ratio() {
        let stats = CompressionStats::new(0, 0, 0);
        assert_eq!(stats.ratio, 0.0);
        assert_eq!(stats.savings_percent(), 0.0);
    }

    #[test]
    fn test_growth() {
        let stats = CompressionStats::new(256, 512, 0);
        assert_eq!(stats.ratio_display(), "2.00");
        assert!(stats.savings_percent() < 0.0);
    }

    #[test]
    fn test_export_text() {
        let text = CompressionStats::new(1000, 500, 7).export_text();
        assert!(text.contains("original_size=1000"));
        assert!(text.contains("compressed_size=500"));
        assert!(text.contains("ratio=0.5000"));

        let text = DecompressionStats::new(42, 1).export_text();
        assert!(text.contains("decompressed_size=42"));
    }

    #[test]
    fn test_serialize_camel_case() {
        let value = serde_json::to_value(CompressionStats::new(10, 5, 1)).unwrap();
        assert_eq!(value["originalSize"], 10);
        assert_eq!(value["compressedSize"], 5);
        assert_eq!(value["timeMs"], 1);

        let value = serde_json::to_value(DecompressionStats::new(10, 2)).unwrap();
        assert_eq!(value["decompressedSize"], 10);
    }

    #[test]
    fn test_stopwatch() {
        let watch = Stopwatch::start();
        std::thread::sleep(Duration::from_millis(5));
        assert!(watch.elapsed() >= Duration::from_millis(5));
    }
}
