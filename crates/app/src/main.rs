//! squeeze: lossless Huffman and run-length compression from the command line.
//!
//! Logs go to stderr; `--json` reports go to stdout.

mod config;
mod container;
mod input_gen;
mod report;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use squeeze_core::codec;
use squeeze_core::Algorithm;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::{Args, Config, InputSource, Layout, Task};
use container::{decompress_container, parse_container, serialize_container};
use report::{CompareEntry, CompareReport, CompressReport, DecompressReport};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = Config::from_args(args)?;
    if config.print_config {
        config.print();
    }

    match &config.task {
        Task::Compress {
            algorithm,
            input,
            output,
            layout,
        } => run_compress(*algorithm, input, output, layout, config.json),
        Task::Decompress {
            algorithm,
            input,
            output,
            layout,
        } => run_decompress(*algorithm, input, output, layout, config.json),
        Task::Compare { input } => run_compare(input, config.json),
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_input(input: &InputSource) -> anyhow::Result<Vec<u8>> {
    let data = input
        .load()
        .with_context(|| format!("failed to read input {}", input.describe()))?;
    debug!(bytes = data.len(), "loaded {}", input.describe());
    Ok(data)
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn run_compress(
    algorithm: Algorithm,
    input: &InputSource,
    output: &Path,
    layout: &Layout,
    json: bool,
) -> anyhow::Result<()> {
    let data = load_input(input)?;
    let (compressed, stats) = codec::compress_with_stats(&data, algorithm)?;

    match layout {
        Layout::Container => {
            let bytes = serialize_container(algorithm, data.len() as u64, &compressed);
            write_file(output, &bytes)?;
        }
        Layout::Raw { meta } => {
            write_file(output, &compressed.bytes)?;
            if let Some(text) = &compressed.metadata {
                write_file(meta, text.as_bytes())?;
            }
        }
    }

    let report = CompressReport {
        algorithm,
        stats,
        meta: compressed.metadata,
    };
    if json {
        println!("{}", report::to_json(&report)?);
    } else {
        report.log_summary();
    }
    Ok(())
}

fn run_decompress(
    algorithm: Option<Algorithm>,
    input: &Path,
    output: &Path,
    layout: &Layout,
    json: bool,
) -> anyhow::Result<()> {
    let bytes = fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;

    let (algorithm, restored, stats) = match layout {
        Layout::Container => {
            let container = parse_container(&bytes)
                .with_context(|| format!("{} is not a valid container", input.display()))?;
            debug!(
                algorithm = %container.algorithm,
                crc32 = container.crc32,
                "parsed container"
            );
            let (restored, stats) = decompress_container(&container)?;
            (container.algorithm, restored, stats)
        }
        Layout::Raw { meta } => {
            let algorithm = algorithm.context("raw decompression needs an algorithm")?;
            let meta_text = if algorithm.needs_metadata() {
                let text = fs::read_to_string(meta)
                    .with_context(|| format!("failed to read metadata {}", meta.display()))?;
                Some(text)
            } else {
                None
            };
            let (restored, stats) =
                codec::decompress_with_stats(&bytes, algorithm, meta_text.as_deref())?;
            (algorithm, restored, stats)
        }
    };

    write_file(output, &restored)?;

    let report = DecompressReport { algorithm, stats };
    if json {
        println!("{}", report::to_json(&report)?);
    } else {
        report.log_summary();
    }
    Ok(())
}

fn run_compare(input: &InputSource, json: bool) -> anyhow::Result<()> {
    let data = load_input(input)?;

    let mut entries = Vec::with_capacity(Algorithm::ALL.len());
    for algorithm in Algorithm::ALL {
        let (compressed, compression) = codec::compress_with_stats(&data, algorithm)?;
        let (restored, decompression) = codec::decompress_with_stats(
            &compressed.bytes,
            algorithm,
            compressed.metadata.as_deref(),
        )?;
        entries.push(CompareEntry {
            algorithm,
            compression,
            decompression,
            verified: restored == data,
        });
    }

    let report = CompareReport {
        input_size: data.len(),
        entries,
    };
    if json {
        println!("{}", report::to_json(&report)?);
    } else {
        report.log_summary();
    }

    if !report.all_verified() {
        bail!("round trip verification failed");
    }
    Ok(())
}
