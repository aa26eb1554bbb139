//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use huffpack_core::DEFAULT_CHUNK_SIZE;

/// Compress and decompress files with a static Huffman code
#[derive(Parser, Debug)]
#[command(name = "huffpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity (-d info, -dd debug, -ddd trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// I/O buffer size in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Print statistics after the run
    #[arg(long, global = true)]
    pub stats: bool,

    /// Overwrite the output file if it exists
    #[arg(short, long, global = true)]
    pub force: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compress a file (default output: <INPUT>.huff)
    Compress {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,

        /// Output path
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Decompress a .huff file (default output: INPUT without .huff)
    Decompress {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,

        /// Output path
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Write deterministic sample data of mixed compressibility
    Sample {
        /// Random seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Size in bytes
        #[arg(long, default_value_t = 1 << 20)]
        size: usize,

        /// Output path
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: PathBuf,
    },
}
