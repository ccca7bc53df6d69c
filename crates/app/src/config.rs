//! Command-line configuration.
//!
//! Arguments are parsed with clap into [`Args`] and then resolved into a
//! [`Config`] with every default filled in. The resolved configuration is
//! what the rest of the program reads, and it can be printed so a run with a
//! generated sample is reproducible from its seed.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use squeeze_core::Algorithm;
use thiserror::Error;
use tracing::info;

use crate::input_gen;

/// Default size of generated sample input (64 KiB).
pub const DEFAULT_SAMPLE_BYTES: usize = 64 * 1024;

#[derive(Parser, Debug)]
#[command(name = "squeeze")]
#[command(version)]
#[command(about = "Lossless Huffman and run-length compression", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Print the resolved configuration before running
    #[arg(long, global = true)]
    pub print_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compress a file (or generated sample data)
    Compress(CompressArgs),
    /// Decompress a container, or a raw payload with its metadata
    Decompress(DecompressArgs),
    /// Run every algorithm over the same input and compare the results
    Compare(CompareArgs),
}

/// Where input bytes come from.
#[derive(clap::Args, Debug, Clone)]
pub struct InputArgs {
    /// Input file (default: generate sample data)
    #[arg(long = "in", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Seed for generated sample data (default: time-based)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Size of generated sample data in bytes
    #[arg(long, default_value_t = DEFAULT_SAMPLE_BYTES)]
    pub sample_bytes: usize,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CompressArgs {
    /// Compression algorithm (huffman, rle)
    #[arg(short, long, value_parser = parse_algorithm)]
    pub algorithm: Algorithm,

    #[command(flatten)]
    pub input: InputArgs,

    /// Output file (default: ./out.sqz, or ./out.bin with --raw)
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Write the bare payload plus a metadata sidecar instead of a container
    #[arg(long)]
    pub raw: bool,

    /// Metadata sidecar path for --raw (default: <out>.meta.json)
    #[arg(long, value_name = "PATH")]
    pub meta: Option<PathBuf>,

    /// Print a JSON report on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct DecompressArgs {
    /// Algorithm of a raw payload (read from the header for containers)
    #[arg(short, long, value_parser = parse_algorithm)]
    pub algorithm: Option<Algorithm>,

    /// Compressed input file
    #[arg(long = "in", value_name = "PATH")]
    pub input: PathBuf,

    /// Output file (default: ./out.bin)
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Input is a bare payload rather than a container
    #[arg(long)]
    pub raw: bool,

    /// Metadata sidecar path for --raw huffman (default: <in>.meta.json)
    #[arg(long, value_name = "PATH")]
    pub meta: Option<PathBuf>,

    /// Print a JSON report on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print a JSON report on stdout
    #[arg(long)]
    pub json: bool,
}

fn parse_algorithm(s: &str) -> Result<Algorithm, String> {
    s.parse().map_err(|e: squeeze_core::Error| e.to_string())
}

/// Configuration errors found while resolving arguments.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--meta only applies together with --raw")]
    MetaWithoutRaw,

    #[error("--raw decompression needs --algorithm")]
    RawNeedsAlgorithm,

    #[error("--algorithm only applies together with --raw (containers record their algorithm)")]
    AlgorithmWithoutRaw,

    #[error("--seed and --sample-bytes only apply to generated input, not --in")]
    SampleOptionsWithFile,
}

/// Source of the bytes to compress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Sample { seed: u64, size: usize },
}

impl InputSource {
    fn resolve(args: &InputArgs) -> Result<Self, ConfigError> {
        match &args.input {
            Some(path) => {
                if args.seed.is_some() || args.sample_bytes != DEFAULT_SAMPLE_BYTES {
                    return Err(ConfigError::SampleOptionsWithFile);
                }
                Ok(InputSource::File(path.clone()))
            }
            None => Ok(InputSource::Sample {
                seed: args.seed.unwrap_or_else(input_gen::time_seed),
                size: args.sample_bytes,
            }),
        }
    }

    /// Read or generate the input bytes.
    pub fn load(&self) -> std::io::Result<Vec<u8>> {
        match self {
            InputSource::File(path) => std::fs::read(path),
            InputSource::Sample { seed, size } => Ok(input_gen::generate_sample_data(*seed, *size)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            InputSource::File(path) => path.display().to_string(),
            InputSource::Sample { seed, size } => {
                format!("generated sample ({} bytes, seed {})", size, seed)
            }
        }
    }
}

/// On-disk layout of compressed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Single self-checking container file
    Container,
    /// Bare payload; Huffman metadata in a JSON sidecar
    Raw { meta: PathBuf },
}

/// What to do, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Compress {
        algorithm: Algorithm,
        input: InputSource,
        output: PathBuf,
        layout: Layout,
    },
    Decompress {
        algorithm: Option<Algorithm>,
        input: PathBuf,
        output: PathBuf,
        layout: Layout,
    },
    Compare {
        input: InputSource,
    },
}

/// Complete configuration for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub task: Task,
    /// Emit a JSON report on stdout
    pub json: bool,
    pub print_config: bool,
}

impl Config {
    /// Resolve parsed arguments, filling in defaults.
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let (task, json) = match args.command {
            Command::Compress(cmd) => {
                let input = InputSource::resolve(&cmd.input)?;
                let output = cmd.out.unwrap_or_else(|| {
                    PathBuf::from(if cmd.raw { "./out.bin" } else { "./out.sqz" })
                });
                let layout = resolve_layout(cmd.raw, cmd.meta, &output)?;
                let task = Task::Compress {
                    algorithm: cmd.algorithm,
                    input,
                    output,
                    layout,
                };
                (task, cmd.json)
            }
            Command::Decompress(cmd) => {
                match (cmd.raw, cmd.algorithm) {
                    (true, None) => return Err(ConfigError::RawNeedsAlgorithm),
                    (false, Some(_)) => return Err(ConfigError::AlgorithmWithoutRaw),
                    _ => {}
                }
                let layout = resolve_layout(cmd.raw, cmd.meta, &cmd.input)?;
                let task = Task::Decompress {
                    algorithm: cmd.algorithm,
                    output: cmd.out.unwrap_or_else(|| PathBuf::from("./out.bin")),
                    input: cmd.input,
                    layout,
                };
                (task, cmd.json)
            }
            Command::Compare(cmd) => {
                let task = Task::Compare {
                    input: InputSource::resolve(&cmd.input)?,
                };
                (task, cmd.json)
            }
        };

        Ok(Config {
            task,
            json,
            print_config: args.print_config,
        })
    }

    /// Log the configuration in human-readable form.
    pub fn print(&self) {
        info!("=== Configuration ===");
        match &self.task {
            Task::Compress {
                algorithm,
                input,
                output,
                layout,
            } => {
                info!("Mode:      compress");
                info!("Algorithm: {}", algorithm);
                info!("Input:     {}", input.describe());
                info!("Output:    {}", output.display());
                log_layout(layout);
            }
            Task::Decompress {
                algorithm,
                input,
                output,
                layout,
            } => {
                info!("Mode:      decompress");
                info!(
                    "Algorithm: {}",
                    algorithm.map_or("(from container)", |a| a.name())
                );
                info!("Input:     {}", input.display());
                info!("Output:    {}", output.display());
                log_layout(layout);
            }
            Task::Compare { input } => {
                info!("Mode:      compare");
                info!("Input:     {}", input.describe());
            }
        }
        info!("JSON report: {}", if self.json { "yes" } else { "no" });
    }
}

fn resolve_layout(raw: bool, meta: Option<PathBuf>, base: &Path) -> Result<Layout, ConfigError> {
    match (raw, meta) {
        (false, Some(_)) => Err(ConfigError::MetaWithoutRaw),
        (false, None) => Ok(Layout::Container),
        (true, Some(meta)) => Ok(Layout::Raw { meta }),
        (true, None) => Ok(Layout::Raw {
            meta: sidecar_path(base),
        }),
    }
}

/// `<path>.meta.json`
pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".meta.json");
    PathBuf::from(name)
}

fn log_layout(layout: &Layout) {
    match layout {
        Layout::Container => info!("Layout:    container"),
        Layout::Raw { meta } => info!("Layout:    raw (metadata: {})", meta.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(argv: &[&str]) -> Result<Config, ConfigError> {
        let args = Args::try_parse_from(std::iter::once("squeeze").chain(argv.iter().copied()))
            .expect("arguments should parse");
        Config::from_args(args)
    }

    #[test]
    fn test_compress_defaults() {
        let config = config(&["compress", "--algorithm", "huffman", "--seed", "42"]).unwrap();
        assert_eq!(
            config.task,
            Task::Compress {
                algorithm: Algorithm::Huffman,
                input: InputSource::Sample {
                    seed: 42,
                    size: DEFAULT_SAMPLE_BYTES
                },
                output: PathBuf::from("./out.sqz"),
                layout: Layout::Container,
            }
        );
        assert!(!config.json);
    }

    #[test]
    fn test_compress_raw_sidecar_default() {
        let config = config(&["compress", "-a", "rle", "--in", "data.bin", "--out", "data.rle", "--raw"])
            .unwrap();
        match config.task {
            Task::Compress { layout, input, .. } => {
                assert_eq!(input, InputSource::File(PathBuf::from("data.bin")));
                assert_eq!(
                    layout,
                    Layout::Raw {
                        meta: PathBuf::from("data.rle.meta.json")
                    }
                );
            }
            other => panic!("unexpected task {:?}", other),
        }
    }

    #[test]
    fn test_unknown_algorithm_rejected_by_parser() {
        let result = Args::try_parse_from(["squeeze", "compress", "--algorithm", "lzw"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_decompress_flag_combinations() {
        assert!(matches!(
            config(&["decompress", "--in", "x.bin", "--raw"]),
            Err(ConfigError::RawNeedsAlgorithm)
        ));
        assert!(matches!(
            config(&["decompress", "--in", "x.sqz", "-a", "rle"]),
            Err(ConfigError::AlgorithmWithoutRaw)
        ));
        assert!(matches!(
            config(&["decompress", "--in", "x.sqz", "--meta", "m.json"]),
            Err(ConfigError::MetaWithoutRaw)
        ));

        let config = config(&["decompress", "--in", "x.bin", "--raw", "-a", "huffman"]).unwrap();
        match config.task {
            Task::Decompress { layout, output, .. } => {
                assert_eq!(
                    layout,
                    Layout::Raw {
                        meta: PathBuf::from("x.bin.meta.json")
                    }
                );
                assert_eq!(output, PathBuf::from("./out.bin"));
            }
            other => panic!("unexpected task {:?}", other),
        }
    }

    #[test]
    fn test_sample_options_with_file() {
        assert!(matches!(
            config(&["compare", "--in", "x.bin", "--seed", "1"]),
            Err(ConfigError::SampleOptionsWithFile)
        ));
    }

    #[test]
    fn test_global_flags() {
        let args = Args::try_parse_from([
            "squeeze",
            "compare",
            "--seed",
            "3",
            "--log-level",
            "debug",
            "--print-config",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.log_level, "debug");
        let config = Config::from_args(args).unwrap();
        assert!(config.print_config);
        assert!(config.json);
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(sidecar_path(Path::new("a/b.bin")), PathBuf::from("a/b.bin.meta.json"));
    }
}
