use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "huffcodec", version)]
#[command(about = "Static Huffman compression for text files.", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compress a text file to <stem>.bin and write its frequency sidecar
    Compress {
        input: PathBuf,
        /// Compressed output path (default: <stem>.bin)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Frequency sidecar path (default: <output stem>.freq)
        #[arg(long)]
        freq: Option<PathBuf>,
    },
    /// Decompress a .bin file using its frequency sidecar
    Decompress {
        input: PathBuf,
        /// Frequency sidecar path (default: <stem>.freq)
        #[arg(long)]
        freq: Option<PathBuf>,
        /// Decompressed output path (default: <stem>_decompressed.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compress then decompress a file and verify the result matches
    Roundtrip { input: PathBuf },
    /// Print the frequency and code tables for a text file
    Inspect { input: PathBuf },
}
