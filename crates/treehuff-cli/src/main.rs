//! Treehuff command-line compressor.
//!
//! ## Usage
//!
//! ```bash
//! # Compress a file
//! treehuff compress notes.txt notes.txt.hf
//!
//! # Decompress it again
//! treehuff decompress notes.txt.hf notes.txt
//!
//! # Show tree and size details
//! treehuff --log-level debug compress notes.txt notes.txt.hf
//! ```

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

use treehuff_core::{BitReader, BitWriter, CompressionStats, Error, Result};
use treehuff_huffman::HuffCodec;

#[derive(Parser, Debug)]
#[command(name = "treehuff")]
#[command(version)]
#[command(about = "Huffman file compressor with a tree-encoded header", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress INPUT into OUTPUT
    Compress {
        /// File to compress
        input: PathBuf,
        /// Destination of the compressed stream
        output: PathBuf,
    },
    /// Decompress INPUT into OUTPUT
    Decompress {
        /// Compressed file
        input: PathBuf,
        /// Destination of the restored data
        output: PathBuf,
    },
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Compress `input` into `output` (created or truncated).
fn compress_file(codec: &HuffCodec, input: &Path, output: &Path) -> Result<CompressionStats> {
    let mut reader = BitReader::new(File::open(input)?);
    let mut writer = BitWriter::new(File::create(output)?);
    codec.compress_stream(&mut reader, &mut writer)
}

/// Decompress `input` into `output`, removing `output` if decoding fails.
fn decompress_file(codec: &HuffCodec, input: &Path, output: &Path) -> Result<CompressionStats> {
    let mut reader = BitReader::new(File::open(input)?);
    let mut writer = BitWriter::new(File::create(output)?);

    let result = codec.decompress_stream(&mut reader, &mut writer);
    if result.is_err() {
        drop(writer);
        if let Err(e) = fs::remove_file(output) {
            error!("Could not remove partial output {}: {}", output.display(), e);
        }
    }
    result
}

/// Describe a failed run, naming corrupt input separately from I/O trouble.
fn failure_message(action: &str, input: &Path, err: &Error) -> String {
    if err.is_corrupt_input() {
        format!("{} is not a valid treehuff stream: {}", input.display(), err)
    } else {
        format!("{} {} failed ({}): {}", action, input.display(), err.category(), err)
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&args.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let codec = HuffCodec::new();
    let (action, input, result) = match &args.command {
        Command::Compress { input, output } => {
            ("compress", input, compress_file(&codec, input, output))
        }
        Command::Decompress { input, output } => {
            ("decompress", input, decompress_file(&codec, input, output))
        }
    };

    match result {
        Ok(stats) => {
            info!("{} {}: {}", action, input.display(), stats.summary());
            debug!("Throughput: {:.2} MB/s", stats.throughput_mbs());
            Ok(())
        }
        Err(e) => {
            error!("{}", failure_message(action, input, &e));
            Err(e.into())
        }
    }
}
