//! Sample input generation.
//!
//! When no input file is given, the CLI compresses a generated buffer whose
//! sections favour different codecs, so both algorithms have something to
//! show in the summary.
//!
//! # Design
//!
//! Generated data is a sequence of sections, each one of:
//! - long runs of a single byte (run-length friendly)
//! - text drawn from a small alphabet (Huffman friendly)
//! - a short repeating pattern (neither codec exploits it much)
//! - random bytes (incompressible for both)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Largest section emitted at once.
const SECTION_BYTES: usize = 4096;

const TEXT_ALPHABET: &[u8] = b"etaoinshrdlu etaoin cmfwyp .,\n";

/// Generate `size_bytes` of mixed-compressibility data from `seed`.
///
/// The same seed and size always produce the same bytes.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let section = (size_bytes - data.len()).min(SECTION_BYTES);

        match rng.gen_range(0..10u8) {
            // 30% runs
            0..=2 => push_runs(&mut rng, &mut data, section),
            // 40% text-like
            3..=6 => {
                for _ in 0..section {
                    data.push(TEXT_ALPHABET[rng.gen_range(0..TEXT_ALPHABET.len())]);
                }
            }
            // 10% repeating pattern
            7 => {
                let pattern = generate_pattern(&mut rng);
                data.extend(pattern.iter().cycle().take(section));
            }
            // 20% random bytes
            _ => {
                for _ in 0..section {
                    data.push(rng.gen());
                }
            }
        }
    }

    data.truncate(size_bytes);
    data
}

/// Runs of 1 to 600 bytes, so some exceed a single run record.
fn push_runs(rng: &mut ChaCha8Rng, data: &mut Vec<u8>, section: usize) {
    let mut written = 0;
    while written < section {
        let value: u8 = rng.gen();
        let run = rng.gen_range(1..=600).min(section - written);
        data.extend(std::iter::repeat(value).take(run));
        written += run;
    }
}

fn generate_pattern(rng: &mut ChaCha8Rng) -> Vec<u8> {
    let pattern_len = rng.gen_range(4..=32);
    (0..pattern_len).map(|_| rng.gen()).collect()
}

/// Seed for runs that did not ask for one, derived from the clock.
pub fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
