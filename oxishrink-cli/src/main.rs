//! OxiShrink CLI - heatshrink compression for files and pipes
//!
//! A Pure Rust front end for the streaming heatshrink encoder and decoder.

mod commands;
mod utils;

use clap::{Args, Parser, Subcommand};
use commands::{cmd_compress, cmd_decompress, cmd_test};
use oxishrink_codec::stream::DEFAULT_CHUNK_SIZE;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oxishrink")]
#[command(
    author,
    version,
    about = "OxiShrink - Pure Rust heatshrink (LZSS) compression"
)]
#[command(long_about = "
OxiShrink compresses data with the heatshrink LZSS bitstream used on
microcontrollers. Both sides of a stream must agree on the window and
lookahead sizes; there is no header.

Examples:
  oxishrink compress firmware.bin firmware.hs
  oxishrink compress -w 8 -l 4 log.txt log.hs
  oxishrink decompress -w 8 -l 4 log.hs log.txt
  oxishrink test --json data.bin
")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Window and lookahead parameters shared by every subcommand.
#[derive(Args, Debug, Clone, Copy)]
pub struct CodecArgs {
    /// log2 of the history window (4-15)
    #[arg(short, long, default_value_t = 10)]
    pub window_bits: u8,

    /// log2 of the longest match (3 to window bits - 1)
    #[arg(short, long, default_value_t = 5)]
    pub lookahead_bits: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    #[command(alias = "e")]
    Compress {
        /// Input file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        #[command(flatten)]
        codec: CodecArgs,

        /// I/O chunk size in bytes
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        buffer_size: usize,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Decompress a file
    #[command(alias = "d")]
    Decompress {
        /// Input file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        #[command(flatten)]
        codec: CodecArgs,

        /// Decoder input staging size in bytes
        #[arg(long, default_value_t = oxishrink_codec::config::DEFAULT_INPUT_BUFFER_SIZE)]
        input_buffer_size: usize,

        /// I/O chunk size in bytes
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        buffer_size: usize,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Compress and decompress a file in memory and verify the round trip
    #[command(alias = "t")]
    Test {
        /// Input file
        input: PathBuf,

        #[command(flatten)]
        codec: CodecArgs,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            codec,
            buffer_size,
            progress,
        } => cmd_compress(&input, &output, codec, buffer_size, progress),
        Commands::Decompress {
            input,
            output,
            codec,
            input_buffer_size,
            buffer_size,
            progress,
        } => cmd_decompress(
            &input,
            &output,
            codec,
            input_buffer_size,
            buffer_size,
            progress,
        ),
        Commands::Test { input, codec, json } => cmd_test(&input, codec, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
